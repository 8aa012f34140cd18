use anyhow::{Context, Result};
use reqwest::Client;
use std::time::Duration;

use crate::config::settings::AuthSettings;

/// Client for the identity collaborator. Resolves a session id to the
/// username it was issued for; `Ok(None)` means the session is not
/// authenticated. Transport failures and timeouts surface as errors, never
/// as "unauthenticated".
pub struct AuthClient {
    client: Client,
    base_url: String,
}

impl AuthClient {
    pub fn new(settings: &AuthSettings) -> Result<Self> {
        let client = build_client(settings.user_agent, settings.timeout_secs)?;

        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
        })
    }

    pub async fn resolve_username(&self, session_id: &str) -> Result<Option<String>> {
        let url = format!("{}/session/resolve/{}", self.base_url, session_id);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .context("Failed to reach auth service")?;

        if !response.status().is_success() {
            return Ok(None);
        }

        let username = response
            .text()
            .await
            .context("Failed to read auth service response")?;
        let username = username.trim();
        if username.is_empty() {
            return Ok(None);
        }

        Ok(Some(username.to_string()))
    }
}

fn build_client(user_agent: &str, timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(user_agent)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("Failed to build HTTP client")
}
