//! Shared state injected into every HTTP handler.

use std::sync::Arc;

use crate::application::services::Coder;
use crate::infrastructure::persistence::StorageBackend;

/// Application state cloned into each request.
#[derive(Clone)]
pub struct AppState {
    pub coder: Arc<Coder<StorageBackend>>,
    /// Prefix of rendered short URLs, without a trailing slash.
    pub base_url: Arc<str>,
}

impl AppState {
    pub fn new(coder: Arc<Coder<StorageBackend>>, base_url: &str) -> Self {
        Self {
            coder,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    /// Renders the public short URL for `code`.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url, code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::services::CoderSettings;

    #[tokio::test]
    async fn test_short_url_joins_base_and_code() {
        let coder = Coder::new(Arc::new(StorageBackend::memory()), CoderSettings::default());
        let state = AppState::new(Arc::new(coder), "http://localhost:8080/");

        assert_eq!(state.short_url("Ab3dE6gH"), "http://localhost:8080/Ab3dE6gH");
    }
}
