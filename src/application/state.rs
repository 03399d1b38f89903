use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::config::Config;

/// Database connection type alias
pub type DbConn = DatabaseConnection;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    pub db: DbConn,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DbConn, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}
