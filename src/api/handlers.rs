use axum::{
    extract::{Extension, Path, Query},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use crate::api::errors::ApiError;
use crate::constants::HISTORY_PAGE_SIZE;
use crate::core::{ConversationController, Incoming, Menu, Reply};
use crate::history::HistoryRecord;
use crate::tasks::{
    DocumentRequest, DocumentResult, FinanceRequest, FinanceResult, LegalRequest, LegalResult,
    MarketingRequest, MarketingResult, TaskRequest,
};

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ConversationController>,
}

/// Inbound chat message
#[derive(Deserialize)]
pub struct ChatMessageRequest {
    pub user_id: i64,
    pub text: String,
    #[serde(default)]
    pub message_id: Option<i64>,
}

/// A reply with its buttons spelled out
#[derive(Serialize)]
pub struct ReplyDTO {
    pub text: String,
    pub menu: Menu,
    pub buttons: Vec<Vec<&'static str>>,
}

impl From<Reply> for ReplyDTO {
    fn from(reply: Reply) -> Self {
        ReplyDTO {
            buttons: reply.menu.rows(),
            text: reply.text,
            menu: reply.menu,
        }
    }
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub replies: Vec<ReplyDTO>,
}

impl From<Vec<Reply>> for ChatResponse {
    fn from(replies: Vec<Reply>) -> Self {
        ChatResponse {
            replies: replies.into_iter().map(ReplyDTO::from).collect(),
        }
    }
}

#[derive(Deserialize)]
pub struct HistoryQuery {
    #[serde(default = "first_page")]
    pub page: i64,
}

fn first_page() -> i64 {
    1
}

/// One page of a user's history
#[derive(Serialize)]
pub struct HistoryPageDTO {
    pub page: i64,
    pub page_size: i64,
    pub total: i64,
    pub records: Vec<HistoryRecord>,
}

#[derive(Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub degraded: bool,
}

/// Generates social media post variants
#[axum::debug_handler]
pub async fn generate_posts(
    Extension(state): Extension<AppState>,
    Json(payload): Json<MarketingRequest>,
) -> Result<Json<MarketingResult>, ApiError> {
    TaskRequest::Marketing(payload.clone()).validate()?;
    let result = state
        .controller
        .tasks()
        .generate_marketing_posts(&payload)
        .await?;
    Ok(Json(result))
}

/// Drafts a business document
#[axum::debug_handler]
pub async fn generate_document(
    Extension(state): Extension<AppState>,
    Json(payload): Json<DocumentRequest>,
) -> Result<Json<DocumentResult>, ApiError> {
    TaskRequest::Document(payload.clone()).validate()?;
    let result = state.controller.tasks().generate_document(&payload).await?;
    Ok(Json(result))
}

/// Reviews a contract for risks
#[axum::debug_handler]
pub async fn analyze_contract(
    Extension(state): Extension<AppState>,
    Json(payload): Json<LegalRequest>,
) -> Result<Json<LegalResult>, ApiError> {
    TaskRequest::Legal(payload.clone()).validate()?;
    let result = state.controller.tasks().analyze_contract(&payload).await?;
    Ok(Json(result))
}

/// Analyzes financial figures
#[axum::debug_handler]
pub async fn analyze_data(
    Extension(state): Extension<AppState>,
    Json(payload): Json<FinanceRequest>,
) -> Result<Json<FinanceResult>, ApiError> {
    TaskRequest::Finance(payload.clone()).validate()?;
    let result = state
        .controller
        .tasks()
        .analyze_finance_data(&payload)
        .await?;
    Ok(Json(result))
}

/// Feeds one message into the user's conversation
#[axum::debug_handler]
pub async fn post_message(
    Extension(state): Extension<AppState>,
    Json(payload): Json<ChatMessageRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    info!("chat message from user {}", payload.user_id);
    let replies = state
        .controller
        .handle(Incoming {
            user_id: payload.user_id,
            text: payload.text,
            message_id: payload.message_id,
        })
        .await;
    Ok(Json(replies.into()))
}

#[axum::debug_handler]
pub async fn list_history(
    Path(user_id): Path<i64>,
    Query(query): Query<HistoryQuery>,
    Extension(state): Extension<AppState>,
) -> Result<Json<HistoryPageDTO>, ApiError> {
    let page = query.page.max(1);
    let history = state.controller.history();
    let total = history.count_by_user(user_id).await?;
    let records = history
        .list_by_user(user_id, HISTORY_PAGE_SIZE, (page - 1) * HISTORY_PAGE_SIZE)
        .await?;

    Ok(Json(HistoryPageDTO {
        page,
        page_size: HISTORY_PAGE_SIZE,
        total,
        records,
    }))
}

#[axum::debug_handler]
pub async fn get_history_record(
    Path((user_id, record_id)): Path<(i64, i64)>,
    Extension(state): Extension<AppState>,
) -> Result<Json<HistoryRecord>, ApiError> {
    let record = state.controller.history().get(record_id, user_id).await?;
    Ok(Json(record))
}

#[axum::debug_handler]
pub async fn delete_history_record(
    Path((user_id, record_id)): Path<(i64, i64)>,
    Extension(state): Extension<AppState>,
) -> Result<Json<DeleteResponse>, ApiError> {
    state.controller.delete_history(user_id, record_id).await?;
    Ok(Json(DeleteResponse { deleted: true }))
}

/// Replays a stored request through the conversation
#[axum::debug_handler]
pub async fn repeat_history_record(
    Path((user_id, record_id)): Path<(i64, i64)>,
    Extension(state): Extension<AppState>,
) -> Result<Json<ChatResponse>, ApiError> {
    let replies = state
        .controller
        .repeat_from_history(user_id, record_id, None)
        .await?;
    Ok(Json(replies.into()))
}

pub async fn health(Extension(state): Extension<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        degraded: state.controller.tasks().client().is_degraded(),
    })
}
