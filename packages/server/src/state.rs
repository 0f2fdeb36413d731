use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;
use crate::utils::jwt::TokenService;

/// Shared, read-only handles passed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<AppConfig>,
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: AppConfig) -> Self {
        let tokens = TokenService::from_config(&config.auth);
        Self {
            db,
            config: Arc::new(config),
            tokens: Arc::new(tokens),
        }
    }
}
