mod history_repository;
mod models;

use diesel::connection::SimpleConnection;
use diesel::r2d2::{ConnectionManager, CustomizeConnection, Pool, PooledConnection};
use diesel::sqlite::SqliteConnection;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

pub use history_repository::*;
pub use models::*;

use crate::errors::Error;

const CREATE_TABLES: &str = "
CREATE TABLE IF NOT EXISTS user_history (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id BIGINT NOT NULL,
    category VARCHAR(100) NOT NULL,
    request_text TEXT NOT NULL,
    response_text TEXT,
    response_data TEXT,
    created_at TIMESTAMP NOT NULL,
    message_id BIGINT
);
CREATE INDEX IF NOT EXISTS idx_user_history_user_id ON user_history(user_id);
CREATE INDEX IF NOT EXISTS idx_user_history_created_at ON user_history(created_at);
";

pub type SqlitePool = Pool<ConnectionManager<SqliteConnection>>;
pub type SqlitePooledConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Makes writers wait on a locked database instead of failing at once
#[derive(Debug)]
struct BusyTimeout;

impl CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for BusyTimeout {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

#[derive(Clone, Debug)]
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// Opens (creating if needed) the SQLite file at `db_path` and makes sure
    /// the history table exists.
    pub fn new(db_path: &str) -> Result<Self, Error> {
        if let Some(parent) = Path::new(db_path).parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    Error::Storage(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let manager = ConnectionManager::<SqliteConnection>::new(db_path);
        let pool = Pool::builder()
            .connection_customizer(Box::new(BusyTimeout))
            .build(manager)?;

        let database = Database {
            pool: Arc::new(pool),
        };
        database.get_conn()?.batch_execute(CREATE_TABLES)?;
        info!("History database ready at {}", db_path);
        Ok(database)
    }

    pub fn get_conn(&self) -> Result<SqlitePooledConnection, Error> {
        Ok(self.pool.get()?)
    }
}
