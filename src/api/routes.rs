//! API route configuration.
//!
//! The caller is identified by the `X-User-ID` header through
//! [`crate::api::middleware::UserId`]; only the `/user/urls` endpoints require it.

use crate::api::handlers::{
    delete_user_urls_handler, list_user_urls_handler, shorten_batch_handler,
    shorten_json_handler, stats_handler,
};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// All routes mounted under `/api`.
///
/// # Endpoints
///
/// - `POST   /shorten`        - Shorten one URL (JSON)
/// - `POST   /shorten/batch`  - Shorten many URLs with correlation ids
/// - `GET    /user/urls`      - List the caller's links
/// - `DELETE /user/urls`      - Queue the caller's links for deletion
/// - `GET    /internal/stats` - Link and user counters
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/shorten", post(shorten_json_handler))
        .route("/shorten/batch", post(shorten_batch_handler))
        .route(
            "/user/urls",
            get(list_user_urls_handler).delete(delete_user_urls_handler),
        )
        .route("/internal/stats", get(stats_handler))
}
