//! Observability subsystem for posts-api
//!
//! This module provides:
//! - Structured JSON logging through `tracing`
//! - Typed lifecycle events
//! - Per-request logging hooks for `tower_http::trace::TraceLayer`
//!
//! # Usage
//!
//! ```ignore
//! use posts_api::observability::{init_logging, log_event_with_fields, Event};
//!
//! init_logging("posts_api=info")?;
//! log_event_with_fields(Event::ServerListening, &[("addr", "0.0.0.0:8000")]);
//! ```

mod events;
mod requests;

pub use events::Event;
pub use requests::{RequestLogger, RequestSpan};

use thiserror::Error;
use tracing_subscriber::EnvFilter;

/// Default filter when neither `RUST_LOG` nor the config supplies one.
pub const DEFAULT_LOG_FILTER: &str = "posts_api=info,tower_http=info";

/// Observability failures are never fatal to request handling; the only
/// one surfaced is a failure to install the subscriber at boot.
#[derive(Debug, Error)]
#[error("failed to install log subscriber: {0}")]
pub struct ObservabilityError(String);

/// Installs the global JSON subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set.
pub fn init_logging(default_filter: &str) -> Result<(), ObservabilityError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .map_err(|e| ObservabilityError(e.to_string()))?;

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .map_err(|e| ObservabilityError(e.to_string()))
}

/// Log a lifecycle event
pub fn log_event(event: Event) {
    tracing::info!(event = event.as_str());
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let rendered = fields
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join(" ");
    tracing::info!(event = event.as_str(), fields = %rendered);
}
