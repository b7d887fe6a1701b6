//! Metrics and Observability
//!
//! Prometheus-compatible request metrics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::Response;
use tracing::{debug, info_span, Instrument};

/// Metrics collector
pub struct Metrics {
    /// Total HTTP requests
    pub http_requests_total: AtomicU64,
    /// HTTP requests by status code class
    pub http_requests_2xx: AtomicU64,
    pub http_requests_4xx: AtomicU64,
    pub http_requests_5xx: AtomicU64,
    /// Total request duration in milliseconds
    pub http_request_duration_ms_total: AtomicU64,
    /// Active connections
    pub active_connections: AtomicU64,
    /// Start time for uptime calculation
    start_time: Instant,
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    pub fn new() -> Self {
        Self {
            http_requests_total: AtomicU64::new(0),
            http_requests_2xx: AtomicU64::new(0),
            http_requests_4xx: AtomicU64::new(0),
            http_requests_5xx: AtomicU64::new(0),
            http_request_duration_ms_total: AtomicU64::new(0),
            active_connections: AtomicU64::new(0),
            start_time: Instant::now(),
        }
    }

    /// Record an HTTP request
    pub fn record_request(&self, status: StatusCode, duration_ms: u64) {
        self.http_requests_total.fetch_add(1, Ordering::Relaxed);
        self.http_request_duration_ms_total
            .fetch_add(duration_ms, Ordering::Relaxed);

        let code = status.as_u16();
        if (200..300).contains(&code) {
            self.http_requests_2xx.fetch_add(1, Ordering::Relaxed);
        } else if (400..500).contains(&code) {
            self.http_requests_4xx.fetch_add(1, Ordering::Relaxed);
        } else if code >= 500 {
            self.http_requests_5xx.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn connection_opened(&self) {
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn connection_closed(&self) {
        self.active_connections.fetch_sub(1, Ordering::Relaxed);
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Export metrics in Prometheus format
    pub fn export_prometheus(&self) -> String {
        let mut output = String::new();

        output.push_str("# HELP http_requests_total Total number of HTTP requests\n");
        output.push_str("# TYPE http_requests_total counter\n");
        output.push_str(&format!(
            "http_requests_total {}\n",
            self.http_requests_total.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP http_requests_by_status HTTP requests by status code range\n");
        output.push_str("# TYPE http_requests_by_status counter\n");
        output.push_str(&format!(
            "http_requests_by_status{{status=\"2xx\"}} {}\n",
            self.http_requests_2xx.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "http_requests_by_status{{status=\"4xx\"}} {}\n",
            self.http_requests_4xx.load(Ordering::Relaxed)
        ));
        output.push_str(&format!(
            "http_requests_by_status{{status=\"5xx\"}} {}\n",
            self.http_requests_5xx.load(Ordering::Relaxed)
        ));

        output.push_str(
            "# HELP http_request_duration_ms_total Total HTTP request duration in milliseconds\n",
        );
        output.push_str("# TYPE http_request_duration_ms_total counter\n");
        output.push_str(&format!(
            "http_request_duration_ms_total {}\n",
            self.http_request_duration_ms_total.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP active_connections Current number of active connections\n");
        output.push_str("# TYPE active_connections gauge\n");
        output.push_str(&format!(
            "active_connections {}\n",
            self.active_connections.load(Ordering::Relaxed)
        ));

        output.push_str("# HELP uptime_seconds Server uptime in seconds\n");
        output.push_str("# TYPE uptime_seconds gauge\n");
        output.push_str(&format!("uptime_seconds {}\n", self.uptime_seconds()));

        output
    }

    /// Export metrics as JSON
    pub fn export_json(&self) -> serde_json::Value {
        serde_json::json!({
            "http": {
                "requests_total": self.http_requests_total.load(Ordering::Relaxed),
                "requests_2xx": self.http_requests_2xx.load(Ordering::Relaxed),
                "requests_4xx": self.http_requests_4xx.load(Ordering::Relaxed),
                "requests_5xx": self.http_requests_5xx.load(Ordering::Relaxed),
                "request_duration_ms_total": self.http_request_duration_ms_total.load(Ordering::Relaxed),
                "active_connections": self.active_connections.load(Ordering::Relaxed),
            },
            "uptime_seconds": self.uptime_seconds(),
        })
    }
}

/// Metrics middleware
pub async fn metrics_middleware(
    State(metrics): State<Arc<Metrics>>,
    request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let uri = request.uri().path().to_string();

    metrics.connection_opened();

    let response = next
        .run(request)
        .instrument(info_span!("http_request", %method, %uri))
        .await;

    let duration = start.elapsed();
    let status = response.status();

    debug!(
        method = %method,
        uri = %uri,
        status = %status,
        duration_ms = %duration.as_millis(),
        "Request completed"
    );

    metrics.record_request(status, duration.as_millis() as u64);
    metrics.connection_closed();

    response
}

/// Handler for /metrics endpoint (Prometheus format)
pub async fn prometheus_metrics(State(metrics): State<Arc<Metrics>>) -> String {
    metrics.export_prometheus()
}

/// Handler for /metrics.json endpoint
pub async fn json_metrics(State(metrics): State<Arc<Metrics>>) -> axum::Json<serde_json::Value> {
    axum::Json(metrics.export_json())
}
