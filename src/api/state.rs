use tokio_rusqlite::Connection;

use crate::core::AppConfig;

/// Shared by every request. The connection handle is cheap to clone
/// and serializes access to the database on its own thread.
pub struct AppState {
    pub db: Connection,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(db: Connection, config: AppConfig) -> Self {
        Self { db, config }
    }
}
