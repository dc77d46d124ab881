//! Handlers for the calling user's links.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::history::UserUrlItem;
use crate::api::middleware::UserId;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the links created by the caller.
///
/// # Endpoint
///
/// `GET /api/user/urls`
///
/// # Response Codes
///
/// - **200 OK**: `[{"short_url": "...", "original_url": "..."}]`
/// - **204 No Content**: the caller has no live links
/// - **401 Unauthorized**: no user identity
pub async fn list_user_urls_handler(
    State(state): State<AppState>,
    user: UserId,
) -> Result<Response, AppError> {
    let owner_id = user.require()?;
    let history = state.coder.get_history(owner_id).await?;

    if history.is_empty() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let items: Vec<UserUrlItem> = history
        .into_iter()
        .map(|entry| UserUrlItem {
            short_url: state.short_url(&entry.code),
            original_url: entry.original_uri,
        })
        .collect();

    Ok(Json(items).into_response())
}

/// Queues the caller's links for deletion.
///
/// # Endpoint
///
/// `DELETE /api/user/urls`
///
/// # Request Body
///
/// ```json
/// ["Ab3dE6gH", "Zx9yW8vU"]
/// ```
///
/// # Response Codes
///
/// - **202 Accepted**: deletion is queued; the links stop resolving after the next flush
/// - **401 Unauthorized**: no user identity
///
/// Codes the caller does not own are ignored.
pub async fn delete_user_urls_handler(
    State(state): State<AppState>,
    user: UserId,
    Json(codes): Json<Vec<String>>,
) -> Result<StatusCode, AppError> {
    let owner_id = user.require()?;
    state.coder.delete_urls(codes, owner_id).await?;

    Ok(StatusCode::ACCEPTED)
}
