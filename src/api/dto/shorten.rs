//! DTOs for link shortening endpoints.

use serde::{Deserialize, Serialize};

/// Request body of `POST /api/shorten`.
#[derive(Debug, Deserialize)]
pub struct ShortenRequest {
    pub url: String,
}

/// Response body of `POST /api/shorten`.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub result: String,
}

/// One element of a `POST /api/shorten/batch` request.
#[derive(Debug, Deserialize)]
pub struct BatchShortenItem {
    pub correlation_id: String,
    pub original_url: String,
}

/// One element of a `POST /api/shorten/batch` response.
///
/// Carries the `correlation_id` of the request item it answers.
#[derive(Debug, Serialize)]
pub struct BatchShortenResult {
    pub correlation_id: String,
    pub short_url: String,
}
