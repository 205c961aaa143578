use async_trait::async_trait;
use chrono::Utc;
use tracing::{debug, info, warn};

use super::{HistoryRecord, HistoryStore, NewHistoryRecord};
use crate::db::{Database, HistoryRepository, HistoryRow, NewHistoryRow};
use crate::errors::Error;

/// History store backed by the SQLite database
#[derive(Debug, Clone)]
pub struct SqliteHistoryStore {
    database: Database,
}

impl SqliteHistoryStore {
    pub fn new(database: Database) -> Self {
        SqliteHistoryStore { database }
    }

    /// Runs a repository call on the blocking pool.
    async fn with_repo<T, F>(&self, f: F) -> Result<T, Error>
    where
        T: Send + 'static,
        F: FnOnce(&mut HistoryRepository<'_>) -> Result<T, Error> + Send + 'static,
    {
        let database = self.database.clone();
        tokio::task::spawn_blocking(move || {
            let mut conn = database.get_conn()?;
            let mut repo = HistoryRepository::new(&mut conn);
            f(&mut repo)
        })
        .await
        .map_err(|e| Error::Storage(format!("history task failed: {}", e)))?
    }
}

/// A payload that no longer parses is dropped, the rest of the row is kept.
fn into_record(row: HistoryRow) -> HistoryRecord {
    let payload = row.response_data.as_deref().and_then(|data| {
        match serde_json::from_str(data) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Unreadable payload in history record {}: {}", row.id, e);
                None
            }
        }
    });
    HistoryRecord {
        id: row.id,
        user_id: row.user_id,
        category: row.category,
        request_text: row.request_text,
        response_text: row.response_text,
        payload,
        created_at: row.created_at,
        message_id: row.message_id,
    }
}

#[async_trait]
impl HistoryStore for SqliteHistoryStore {
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, Error> {
        let row = NewHistoryRow {
            user_id: record.user_id,
            category: record.category,
            request_text: record.request_text,
            response_text: record.response_text,
            response_data: record
                .payload
                .as_ref()
                .map(serde_json::to_string)
                .transpose()?,
            created_at: Utc::now().naive_utc(),
            message_id: record.message_id,
        };
        let id = self.with_repo(move |repo| repo.insert(&row)).await?;
        info!("Added history record with ID: {}", id);
        Ok(id)
    }

    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HistoryRecord>, Error> {
        let rows = self
            .with_repo(move |repo| repo.list_by_user(user_id, limit, offset))
            .await?;
        debug!("Loaded {} history records for user {}", rows.len(), user_id);
        Ok(rows.into_iter().map(into_record).collect())
    }

    async fn get(&self, record_id: i64, user_id: i64) -> Result<HistoryRecord, Error> {
        let row = self
            .with_repo(move |repo| repo.get(record_id, user_id))
            .await?
            .ok_or_else(|| Error::NotFound(format!("history record {}", record_id)))?;
        Ok(into_record(row))
    }

    async fn delete(&self, record_id: i64, user_id: i64) -> Result<bool, Error> {
        self.with_repo(move |repo| repo.delete(record_id, user_id))
            .await
    }

    async fn count_by_user(&self, user_id: i64) -> Result<i64, Error> {
        self.with_repo(move |repo| repo.count_by_user(user_id)).await
    }
}
