//! Interaction history: one record per completed task invocation.
//!
//! The controller talks to the store through [`HistoryStore`]; persistence
//! and id assignment belong to the implementation.

mod sqlite_store;

pub use sqlite_store::SqliteHistoryStore;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{REQUEST_PREVIEW_CHARS, RESPONSE_PREVIEW_CHARS};
use crate::errors::Error;
use crate::tasks::{TaskKind, TaskResult};
use crate::utils::preview;

/// A persisted history entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    pub user_id: i64,
    /// Category name, see `TaskKind::as_str`
    pub category: String,
    pub request_text: String,
    pub response_text: Option<String>,
    /// Structured task result
    pub payload: Option<Value>,
    pub created_at: NaiveDateTime,
    pub message_id: Option<i64>,
}

impl HistoryRecord {
    pub fn kind(&self) -> Option<TaskKind> {
        self.category.parse().ok()
    }

    pub fn request_preview(&self) -> String {
        preview(&self.request_text, REQUEST_PREVIEW_CHARS)
    }

    pub fn response_preview(&self) -> String {
        self.response_text
            .as_deref()
            .map(|text| preview(text, RESPONSE_PREVIEW_CHARS))
            .unwrap_or_default()
    }

    /// Decodes the stored payload back into a task result.
    pub fn result(&self) -> Option<TaskResult> {
        let kind = self.kind()?;
        let payload = self.payload.clone()?;
        TaskResult::from_payload(kind, payload).ok()
    }
}

/// Everything needed to append a record
#[derive(Debug, Clone, PartialEq)]
pub struct NewHistoryRecord {
    pub user_id: i64,
    pub category: String,
    pub request_text: String,
    pub response_text: Option<String>,
    pub payload: Option<Value>,
    pub message_id: Option<i64>,
}

impl NewHistoryRecord {
    /// Builds the record for a completed invocation.
    pub fn for_result(
        user_id: i64,
        kind: TaskKind,
        request_text: &str,
        result: &TaskResult,
        message_id: Option<i64>,
    ) -> Result<Self, Error> {
        Ok(NewHistoryRecord {
            user_id,
            category: kind.as_str().to_string(),
            request_text: request_text.to_string(),
            response_text: Some(result.summary_text()),
            payload: Some(result.to_payload()?),
            message_id,
        })
    }
}

/// Store of history records. Reads and deletes are always scoped to the
/// requesting user; another user's id behaves as if it did not exist.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Appends a record and returns its id
    async fn append(&self, record: NewHistoryRecord) -> Result<i64, Error>;

    /// Newest-first page of a user's records
    async fn list_by_user(
        &self,
        user_id: i64,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<HistoryRecord>, Error>;

    /// A single record, or `Error::NotFound`
    async fn get(&self, record_id: i64, user_id: i64) -> Result<HistoryRecord, Error>;

    /// Removes a record; false when nothing matched
    async fn delete(&self, record_id: i64, user_id: i64) -> Result<bool, Error>;

    async fn count_by_user(&self, user_id: i64) -> Result<i64, Error>;
}
