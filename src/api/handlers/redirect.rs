//! Handler for short URL redirect.

use axum::{
    extract::{Path, State},
    response::Redirect,
};

use crate::api::middleware::UserId;
use crate::error::AppError;
use crate::state::AppState;

/// Redirects a short code to its original URL.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Response Codes
///
/// - **307 Temporary Redirect** with `Location` set to the original URL
/// - **404 Not Found**: unknown code
/// - **410 Gone**: the link was deleted by its owner
pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
    user: UserId,
) -> Result<Redirect, AppError> {
    let uri = state.coder.to_uri(&code, user.0).await?;

    Ok(Redirect::temporary(&uri))
}
