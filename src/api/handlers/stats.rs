//! Handler for service statistics.

use axum::{Json, extract::State};

use crate::api::dto::stats::StatsResponse;
use crate::error::AppError;
use crate::state::AppState;

/// Returns the number of stored links and of distinct users.
///
/// # Endpoint
///
/// `GET /api/internal/stats`
///
/// # Response
///
/// ```json
/// { "urls": 3, "users": 2 }
/// ```
///
/// Deleted links and the anonymous user are counted.
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<StatsResponse>, AppError> {
    let stats = state.coder.get_stats().await?;
    Ok(Json(stats.into()))
}
