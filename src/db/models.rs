use crate::schema::user_history;
use chrono::NaiveDateTime;
use diesel::{Insertable, Queryable, Selectable};

/// Row of the `user_history` table
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = user_history)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct HistoryRow {
    pub id: i64,
    pub user_id: i64,
    /// Task category name (see `TaskKind::as_str`)
    pub category: String,
    /// The user's primary input
    pub request_text: String,
    /// Rendered summary of the result
    pub response_text: Option<String>,
    /// JSON serialized task result
    pub response_data: Option<String>,
    pub created_at: NaiveDateTime,
    /// Id of the chat message that triggered the task
    pub message_id: Option<i64>,
}

/// Insertable form of a history row; the id is assigned by SQLite
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = user_history)]
pub struct NewHistoryRow {
    pub user_id: i64,
    pub category: String,
    pub request_text: String,
    pub response_text: Option<String>,
    pub response_data: Option<String>,
    pub created_at: NaiveDateTime,
    pub message_id: Option<i64>,
}
