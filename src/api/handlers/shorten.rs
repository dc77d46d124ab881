//! Handlers for link shortening endpoints.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use crate::api::dto::shorten::{
    BatchShortenItem, BatchShortenResult, ShortenRequest, ShortenResponse,
};
use crate::api::middleware::UserId;
use crate::error::AppError;
use crate::state::AppState;

/// Shortens a URL sent as the raw request body.
///
/// # Endpoint
///
/// `POST /`
///
/// # Response
///
/// The short URL as `text/plain`:
///
/// - **201 Created**: new short link
/// - **409 Conflict**: URL was shortened before; body holds the existing short URL
/// - **400 Bad Request**: body is not an absolute URL
pub async fn shorten_text_handler(
    State(state): State<AppState>,
    user: UserId,
    body: String,
) -> Result<Response, AppError> {
    let (status, short_url) = shorten_one(&state, body.trim(), user).await?;

    Ok((status, short_url).into_response())
}

/// Shortens a URL sent as JSON.
///
/// # Endpoint
///
/// `POST /api/shorten`
///
/// # Request Body
///
/// ```json
/// { "url": "https://example.com" }
/// ```
///
/// # Response
///
/// ```json
/// { "result": "http://localhost:8080/Ab3dE6gH" }
/// ```
///
/// Status codes match [`shorten_text_handler`].
pub async fn shorten_json_handler(
    State(state): State<AppState>,
    user: UserId,
    Json(payload): Json<ShortenRequest>,
) -> Result<Response, AppError> {
    let (status, result) = shorten_one(&state, &payload.url, user).await?;

    Ok((status, Json(ShortenResponse { result })).into_response())
}

/// Shortens several URLs in one request.
///
/// # Endpoint
///
/// `POST /api/shorten/batch`
///
/// # Request Body
///
/// ```json
/// [
///   { "correlation_id": "1", "original_url": "https://example.com" }
/// ]
/// ```
///
/// # Response
///
/// **201 Created** with one item per input, in input order. URLs that were
/// shortened before get their existing short URL.
///
/// ```json
/// [
///   { "correlation_id": "1", "short_url": "http://localhost:8080/Ab3dE6gH" }
/// ]
/// ```
///
/// # Errors
///
/// Returns 400 Bad Request at the first invalid URL. Items before it stay stored.
pub async fn shorten_batch_handler(
    State(state): State<AppState>,
    user: UserId,
    Json(items): Json<Vec<BatchShortenItem>>,
) -> Result<(StatusCode, Json<Vec<BatchShortenResult>>), AppError> {
    let items = items
        .into_iter()
        .map(|item| (item.correlation_id, item.original_url))
        .collect();

    let encoded = state.coder.encode_batch(items, user.0).await?;

    let results = encoded
        .into_iter()
        .map(|(correlation_id, code)| BatchShortenResult {
            correlation_id,
            short_url: state.short_url(&code),
        })
        .collect();

    Ok((StatusCode::CREATED, Json(results)))
}

/// Encodes one URI, mapping an idempotent-encoding conflict to 409 with the existing short URL.
async fn shorten_one(
    state: &AppState,
    uri: &str,
    user: UserId,
) -> Result<(StatusCode, String), AppError> {
    match state.coder.to_code(uri, user.0).await {
        Ok(code) => Ok((StatusCode::CREATED, state.short_url(&code))),
        Err(AppError::Conflict { code }) => Ok((StatusCode::CONFLICT, state.short_url(&code))),
        Err(e) => Err(e),
    }
}
