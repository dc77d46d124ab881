#![allow(dead_code)]

use axum::http::{HeaderName, HeaderValue};
use axum_test::TestServer;
use std::sync::Arc;
use url_shortener::application::services::{Coder, CoderSettings};
use url_shortener::infrastructure::persistence::StorageBackend;
use url_shortener::routes::router;
use url_shortener::state::AppState;

pub const BASE_URL: &str = "http://localhost:8080";

/// State backed by in-memory storage. Must be called inside a tokio runtime.
pub fn create_test_state() -> AppState {
    let coder = Coder::new(Arc::new(StorageBackend::memory()), CoderSettings::default());
    AppState::new(Arc::new(coder), BASE_URL)
}

pub fn create_test_server(state: AppState) -> TestServer {
    TestServer::new(router(state)).unwrap()
}

/// Header identifying the caller as `id`.
pub fn user(id: i64) -> (HeaderName, HeaderValue) {
    (
        HeaderName::from_static("x-user-id"),
        HeaderValue::from_str(&id.to_string()).unwrap(),
    )
}

/// Extracts the code from a short URL rendered with [`BASE_URL`].
pub fn code_of(short_url: &str) -> String {
    short_url
        .strip_prefix(BASE_URL)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or_else(|| panic!("unexpected short url: {short_url}"))
        .to_string()
}
