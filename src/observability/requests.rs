//! Request logging hooks for `TraceLayer`
//!
//! Every request gets a span carrying its method and path. When the
//! response completes, one line is logged with status and latency. Error
//! responses produced by `ApiError` carry an `ErrorReport`, which is
//! logged at ERROR level together with the path from the span.

use std::time::Duration;

use axum::http::{Request, Response};
use tower_http::trace::{MakeSpan, OnResponse};
use tracing::Span;

use crate::posts::errors::ErrorReport;

/// Builds the per-request span.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSpan;

impl<B> MakeSpan<B> for RequestSpan {
    fn make_span(&mut self, request: &Request<B>) -> Span {
        tracing::info_span!(
            "request",
            method = %request.method(),
            path = %request.uri().path(),
        )
    }
}

/// Logs the outcome of each request.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestLogger;

impl<B> OnResponse<B> for RequestLogger {
    fn on_response(self, response: &Response<B>, latency: Duration, span: &Span) {
        let status = response.status().as_u16();
        let latency_ms = latency.as_millis() as u64;

        match response.extensions().get::<ErrorReport>() {
            Some(report) => tracing::error!(
                parent: span,
                status,
                latency_ms,
                error = %report.0,
                "request failed"
            ),
            None => tracing::info!(parent: span, status, latency_ms, "request completed"),
        }
    }
}
