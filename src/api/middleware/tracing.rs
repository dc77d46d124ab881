//! HTTP request/response tracing middleware.

use axum::http::Request;
use tower_http::LatencyUnit;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::trace::{DefaultOnResponse, MakeSpan, TraceLayer};
use tracing::{Level, Span, info_span};

use super::user::USER_ID_HEADER;

/// Span factory recording the method, the URI and the raw `X-User-ID` value.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        let user_id = request
            .headers()
            .get(&USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-");

        info_span!(
            "request",
            method = %request.method(),
            uri = %request.uri(),
            user_id,
        )
    }
}

/// Creates a tracing middleware for HTTP requests.
///
/// Each request gets an `INFO` span from [`RequestSpan`]; the response is
/// logged at `INFO` with its status and latency in milliseconds.
///
/// # Example Logs
///
/// ```text
/// INFO request{method=POST uri=/api/shorten user_id=7}: finished processing request latency=2 ms status=201
/// INFO request{method=GET uri=/Ab3dE6gH user_id=-}: finished processing request latency=0 ms status=307
/// ```
pub fn layer() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>, RequestSpan> {
    TraceLayer::new_for_http()
        .make_span_with(RequestSpan)
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        )
}
