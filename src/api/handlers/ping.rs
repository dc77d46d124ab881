//! Handler for the storage health check.

use axum::extract::State;

use crate::error::AppError;
use crate::state::AppState;

/// Checks that the storage backend is reachable.
///
/// # Endpoint
///
/// `GET /ping`
///
/// # Response Codes
///
/// - **200 OK**: storage answered within the health-check timeout
/// - **500 Internal Server Error**: storage failed or timed out
pub async fn ping_handler(State(state): State<AppState>) -> Result<&'static str, AppError> {
    state.coder.health_check().await?;
    Ok("OK")
}
