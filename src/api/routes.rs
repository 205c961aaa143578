//! API routes configuration module

use crate::api::handlers::*;
use axum::{
    routing::{get, post},
    Extension, Router,
};

/// Creates and configures the API router with all routes
///
/// # Arguments
/// * `state` - Controller and stores shared across handlers
///
/// # Returns
/// * `Router` - Configured router with all API endpoints
pub fn app(state: AppState) -> Router {
    let api = Router::new()
        .route("/marketing/generate-posts", post(generate_posts))
        .route("/documents/generate-document", post(generate_document))
        .route("/legal/analyze-contract", post(analyze_contract))
        .route("/finance/analyze-data", post(analyze_data))
        .route("/chat/messages", post(post_message))
        .route("/history/:user_id", get(list_history))
        .route(
            "/history/:user_id/:id",
            get(get_history_record).delete(delete_history_record),
        )
        .route("/history/:user_id/:id/repeat", post(repeat_history_record));

    Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api)
        .layer(Extension(state))
}
