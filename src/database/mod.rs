pub mod connection;
pub mod models;
pub mod movies;
pub mod ratings;
pub mod setup;
pub mod tags;

pub use connection::{create_pool, get_connection, DbConn, DbPool};
pub use models::*;
