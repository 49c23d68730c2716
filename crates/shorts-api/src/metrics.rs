//! Prometheus metrics for the API server.

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{Request, Response};
use axum::middleware::Next;
use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use std::time::Instant;

/// Initialize the Prometheus metrics recorder.
/// Returns a handle that can be used to render metrics.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Metric names as constants for consistency.
pub mod names {
    // HTTP metrics
    pub const HTTP_REQUESTS_TOTAL: &str = "shorts_http_requests_total";
    pub const HTTP_REQUEST_DURATION_SECONDS: &str = "shorts_http_request_duration_seconds";
    pub const HTTP_REQUESTS_IN_FLIGHT: &str = "shorts_http_requests_in_flight";

    // Processing metrics
    pub const DOWNLOAD_DURATION_SECONDS: &str = "shorts_download_duration_seconds";
    pub const SEGMENTS_BUILT_TOTAL: &str = "shorts_segments_built_total";
    pub const SEGMENTS_DROPPED_TOTAL: &str = "shorts_segments_dropped_total";
    pub const PLACEHOLDER_RESPONSES_TOTAL: &str = "shorts_placeholder_responses_total";
}

/// Record an HTTP request.
pub fn record_http_request(method: &str, route: &str, status: u16, duration_secs: f64) {
    let labels = [
        ("method", method.to_string()),
        ("route", route.to_string()),
        ("status", status.to_string()),
    ];

    counter!(names::HTTP_REQUESTS_TOTAL, &labels).increment(1);
    histogram!(names::HTTP_REQUEST_DURATION_SECONDS, &labels).record(duration_secs);
}

/// Record download duration.
pub fn record_download_duration(duration_secs: f64) {
    histogram!(names::DOWNLOAD_DURATION_SECONDS).record(duration_secs);
}

/// Record the segments built and dropped by one builder run.
///
/// `path` is `processed` or `placeholder`.
pub fn record_segments(path: &'static str, built: usize, dropped: usize) {
    counter!(names::SEGMENTS_BUILT_TOTAL, "path" => path).increment(built as u64);
    counter!(names::SEGMENTS_DROPPED_TOTAL, "path" => path).increment(dropped as u64);
}

/// Record a placeholder response.
pub fn record_placeholder(reason: &'static str) {
    counter!(names::PLACEHOLDER_RESPONSES_TOTAL, "reason" => reason).increment(1);
}

/// Metrics middleware for HTTP requests.
///
/// Requests are labelled by matched route so unknown paths cannot grow the
/// label set.
pub async fn metrics_middleware(request: Request<Body>, next: Next) -> Response<Body> {
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());
    let start = Instant::now();

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).increment(1.0);

    let response = next.run(request).await;

    gauge!(names::HTTP_REQUESTS_IN_FLIGHT).decrement(1.0);

    let status = response.status().as_u16();
    let duration = start.elapsed().as_secs_f64();

    record_http_request(&method, &route, status, duration);

    response
}
