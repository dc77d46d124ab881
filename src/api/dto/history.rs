//! DTOs for the user history endpoints.

use serde::Serialize;

/// One link in `GET /api/user/urls`.
#[derive(Debug, Serialize)]
pub struct UserUrlItem {
    pub short_url: String,
    pub original_url: String,
}
