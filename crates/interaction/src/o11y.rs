use std::time::Duration;

use axum::{body::Body, http::Request, response::Response};
use miette::Result;
use tower_http::{
    classify::{ServerErrorsAsFailures, SharedClassifier},
    trace::TraceLayer,
};
use tracing::{Span, info, info_span, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ObservabilityConfig;

/// Initialise logging
///
/// `RUST_LOG` takes precedence over the configured filter. A malformed
/// `RUST_LOG` falls back to the configured filter with a warning.
///
/// # Errors
/// Returns an error if the configured filter is invalid or a global subscriber is already set
pub fn init(config: &ObservabilityConfig) -> Result<()> {
    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let (env_filter, rejected) = select_filter(rust_log.as_deref(), &config.log_filter)?;

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .map_err(|e| miette::miette!("Failed to initialise logging: {e}"))?;

    if let Some(reason) = rejected {
        warn!(
            "Ignoring invalid {}: {reason}; using '{}'",
            EnvFilter::DEFAULT_ENV,
            config.log_filter
        );
    }

    Ok(())
}

/// Pick the env override when it parses, otherwise the configured filter
///
/// The second value carries the parse error of a rejected override.
fn select_filter(
    rust_log: Option<&str>,
    configured: &str,
) -> Result<(EnvFilter, Option<String>)> {
    let rejected = match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
        Some(directives) => match EnvFilter::try_new(directives) {
            Ok(filter) => return Ok((filter, None)),
            Err(e) => Some(format!("'{directives}' ({e})")),
        },
        None => None,
    };

    let filter = EnvFilter::try_new(configured)
        .map_err(|e| miette::miette!("Invalid log filter '{configured}': {e}"))?;

    Ok((filter, rejected))
}

pub type RequestTraceLayer = TraceLayer<
    SharedClassifier<ServerErrorsAsFailures>,
    fn(&Request<Body>) -> Span,
    (),
    fn(&Response, Duration, &Span),
>;

/// Request logging layer
///
/// Records method, path, status and latency. Bodies and query strings are never
/// logged since they carry submitted values.
#[must_use]
pub fn request_trace_layer() -> RequestTraceLayer {
    TraceLayer::new_for_http()
        .make_span_with(make_request_span as fn(&Request<Body>) -> Span)
        .on_request(())
        .on_response(log_response as fn(&Response, Duration, &Span))
}

fn make_request_span(request: &Request<Body>) -> Span {
    info_span!(
        "request",
        method = %request.method(),
        path = %request.uri().path(),
    )
}

fn log_response(response: &Response, latency: Duration, _span: &Span) {
    info!(
        status = response.status().as_u16(),
        latency_ms = latency.as_secs_f64() * 1000.0,
        "Request handled"
    );
}
