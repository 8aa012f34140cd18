pub struct DatabaseSettings {
    pub path: String,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "cinescore.db".to_string()),
        }
    }
}

pub struct AuthSettings {
    pub base_url: String,
    pub user_agent: &'static str,
    pub timeout_secs: u64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            base_url: std::env::var("AUTH_SERVICE_URL")
                .unwrap_or_else(|_| "http://localhost:9080".to_string()),
            user_agent: "Cinescore/0.1",
            timeout_secs: 10,
        }
    }
}

pub struct AppConfig {
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl AppConfig {
    pub fn new() -> Self {
        Self {
            database: DatabaseSettings::default(),
            auth: AuthSettings::default(),
        }
    }
}
