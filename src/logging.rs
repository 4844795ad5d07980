//! Structured logging with [`tracing`].
//!
//! [`init`] installs the global subscriber, and [`layer!`] builds the [`tower_http`] middleware that
//! opens a span for every HTTP request. The middleware's type contains function item types that
//! can't be spelled out, so it's built by a macro rather than returned from a function.

use std::time::Duration;

use axum::{extract::Request, response::Response};
use tower_http::classify::ServerErrorsFailureClass;
use tracing_subscriber::{filter::ParseError, EnvFilter};

/// Installs the global `tracing` subscriber, printing events allowed by `filter` to stdout.
///
/// # Errors
///
/// Fails if `filter` isn't a valid filter directive.
pub fn init(filter: &str) -> Result<(), ParseError> {
    let filter = EnvFilter::try_new(filter)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Creates a middleware that logs incoming HTTP requests along with their response status and
/// latency.
macro_rules! layer {
    () => {
        ::tower_http::trace::TraceLayer::new_for_http()
            .make_span_with($crate::logging::make_span)
            .on_response($crate::logging::on_response)
            .on_failure($crate::logging::on_failure)
    };
}

pub(crate) use layer;

#[doc(hidden)]
pub(crate) fn make_span(request: &Request) -> tracing::Span {
    tracing::info_span!(
        target: "campsite_favorites::http",
        "request",
        method = %request.method(),
        uri = %request.uri(),
        status = tracing::field::Empty,
        latency = tracing::field::Empty,
    )
}

#[doc(hidden)]
pub(crate) fn on_response(response: &Response, latency: Duration, span: &tracing::Span) {
    span.record("status", response.status().as_u16())
        .record("latency", format_args!("{latency:?}"));

    tracing::debug!(target: "campsite_favorites::http", "response sent");
}

#[doc(hidden)]
pub(crate) fn on_failure(
    failure: ServerErrorsFailureClass,
    _latency: Duration,
    _span: &tracing::Span,
) {
    match failure {
        ServerErrorsFailureClass::Error(error) => {
            tracing::error!(target: "campsite_favorites::http", %error, "request failed");
        }
        ServerErrorsFailureClass::StatusCode(status) => {
            tracing::error!(target: "campsite_favorites::http", %status, "request failed");
        }
    }
}
