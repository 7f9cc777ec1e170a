//! Prometheus metrics for campus-service.
//!
//! Covers HTTP traffic and completion provider calls.

use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;
use std::time::Instant;

pub struct Metrics {
    registry: Registry,
    http_requests_total: IntCounterVec,
    http_request_duration_seconds: HistogramVec,
    completion_requests_total: IntCounterVec,
    completion_latency_seconds: HistogramVec,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

/// Process-wide metrics, registered on first use.
pub fn metrics() -> &'static Metrics {
    METRICS.get_or_init(Metrics::new)
}

impl Metrics {
    fn new() -> Self {
        let registry = Registry::new();

        let http_requests_total = IntCounterVec::new(
            Opts::new("http_requests_total", "Total number of HTTP requests"),
            &["method", "path", "status"],
        )
        .expect("Failed to create http_requests_total metric");

        let http_request_duration_seconds = HistogramVec::new(
            HistogramOpts::new(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
            ),
            &["method", "path", "status"],
        )
        .expect("Failed to create http_request_duration_seconds metric");

        // outcome: success or a provider/template error kind
        let completion_requests_total = IntCounterVec::new(
            Opts::new(
                "completion_requests_total",
                "Total completion requests per operation",
            ),
            &["operation", "outcome"],
        )
        .expect("Failed to create completion_requests_total metric");

        let completion_latency_seconds = HistogramVec::new(
            HistogramOpts::new(
                "completion_latency_seconds",
                "Completion provider latency in seconds",
            )
            .buckets(vec![0.1, 0.5, 1.0, 2.0, 5.0, 10.0, 30.0, 60.0, 120.0]),
            &["operation"],
        )
        .expect("Failed to create completion_latency_seconds metric");

        for collector in [
            Box::new(http_requests_total.clone()) as Box<dyn prometheus::core::Collector>,
            Box::new(http_request_duration_seconds.clone()),
            Box::new(completion_requests_total.clone()),
            Box::new(completion_latency_seconds.clone()),
        ] {
            registry
                .register(collector)
                .expect("Failed to register metric");
        }

        Self {
            registry,
            http_requests_total,
            http_request_duration_seconds,
            completion_requests_total,
            completion_latency_seconds,
        }
    }

    pub fn record_http(&self, method: &str, path: &str, status: &str, seconds: f64) {
        let labels = [method, path, status];
        self.http_requests_total.with_label_values(&labels).inc();
        self.http_request_duration_seconds
            .with_label_values(&labels)
            .observe(seconds);
    }

    pub fn record_completion(&self, operation: &str, outcome: &str, seconds: f64) {
        self.completion_requests_total
            .with_label_values(&[operation, outcome])
            .inc();
        self.completion_latency_seconds
            .with_label_values(&[operation])
            .observe(seconds);
    }

    /// Render all metrics in Prometheus text format.
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

/// Record count and latency of every HTTP request, labelled by route template.
///
/// Requests that match no route (404s) are labelled `unmatched`.
pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(req).await;

    metrics().record_http(
        &method,
        &path,
        response.status().as_str(),
        start.elapsed().as_secs_f64(),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recorded_completion_appears_in_output() {
        metrics().record_completion("generate-quiz", "success", 0.42);
        let output = metrics().gather().unwrap();

        assert!(output.contains("completion_requests_total"));
        assert!(output.contains("operation=\"generate-quiz\""));
    }
}
