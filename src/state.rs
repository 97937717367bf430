use crate::auth::TokenCodec;
use crate::config::AppConfig;
use sea_orm::DatabaseConnection;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Process configuration, read-only after startup
    pub config: Arc<AppConfig>,

    /// Pooled database connection, shared across requests
    pub db: DatabaseConnection,

    /// Session token codec (signing key loaded once, never rotated)
    pub tokens: TokenCodec,
}

impl AppState {
    pub fn new(config: AppConfig, db: DatabaseConnection) -> Self {
        let tokens = TokenCodec::new(&config.jwt_secret, config.token_ttl_hours);
        Self {
            config: Arc::new(config),
            db,
            tokens,
        }
    }
}
