use lazy_static::lazy_static;
use prometheus::{
    register_histogram_vec, register_int_counter_vec, Encoder, HistogramVec, IntCounterVec,
    TextEncoder,
};

lazy_static! {
    // HTTP Metrics
    pub static ref HTTP_REQUESTS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "path", "status"]
    )
    .unwrap();

    pub static ref HTTP_REQUEST_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds",
        &["method", "path"],
        vec![0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0]
    )
    .unwrap();

    // Record store
    pub static ref RECORD_STORE_OPERATIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "record_store_operations_total",
        "Total number of record store operations",
        &["operation", "status"]
    )
    .unwrap();

    pub static ref RECORD_STORE_OPERATION_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "record_store_operation_duration_seconds",
        "Record store operation duration in seconds",
        &["operation"],
        vec![0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0]
    )
    .unwrap();

    // LLM provider
    pub static ref LLM_CALLS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "llm_calls_total",
        "Total number of LLM calls",
        &["purpose", "status"]
    )
    .unwrap();

    pub static ref LLM_CALL_DURATION_SECONDS: HistogramVec = register_histogram_vec!(
        "llm_call_duration_seconds",
        "LLM call duration in seconds",
        &["purpose"],
        vec![0.5, 1.0, 2.5, 5.0, 10.0, 20.0, 30.0, 60.0, 120.0]
    )
    .unwrap();

    // Business Metrics
    pub static ref SOLVE_OUTCOMES_TOTAL: IntCounterVec = register_int_counter_vec!(
        "solve_outcomes_total",
        "Solve requests by outcome",
        &["outcome"]
    )
    .unwrap();

    pub static ref RECORDS_APPENDED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "records_appended_total",
        "Attempt records appended to the record log",
        &["success"]
    )
    .unwrap();

    pub static ref DAILY_QUESTIONS_SERVED_TOTAL: IntCounterVec = register_int_counter_vec!(
        "daily_questions_served_total",
        "Daily questions served",
        &["strategy", "weak_match"]
    )
    .unwrap();

    pub static ref PLOT_EXECUTIONS_TOTAL: IntCounterVec = register_int_counter_vec!(
        "plot_executions_total",
        "Plot sandbox executions",
        &["status"]
    )
    .unwrap();
}

/// Renders all metrics in Prometheus text format
pub fn render_metrics() -> Result<String, prometheus::Error> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder.encode(&metric_families, &mut buffer)?;
    String::from_utf8(buffer)
        .map_err(|e| prometheus::Error::Msg(format!("Failed to convert metrics to UTF-8: {}", e)))
}

/// Helper: track record store operation with metrics
pub async fn track_store_operation<F, T, E>(operation: &str, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    RECORD_STORE_OPERATIONS_TOTAL
        .with_label_values(&[operation, status])
        .inc();

    RECORD_STORE_OPERATION_DURATION_SECONDS
        .with_label_values(&[operation])
        .observe(duration);

    result
}

/// Helper: track LLM call with metrics
pub async fn track_llm_call<F, T, E>(purpose: &str, future: F) -> Result<T, E>
where
    F: std::future::Future<Output = Result<T, E>>,
{
    let start = std::time::Instant::now();
    let result = future.await;
    let duration = start.elapsed().as_secs_f64();

    let status = if result.is_ok() { "success" } else { "error" };

    LLM_CALLS_TOTAL.with_label_values(&[purpose, status]).inc();

    LLM_CALL_DURATION_SECONDS
        .with_label_values(&[purpose])
        .observe(duration);

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_registration() {
        let _ = HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/health", "200"])
            .get();
    }

    #[test]
    fn test_render_metrics() {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&["GET", "/test", "200"])
            .inc();

        let output = render_metrics().unwrap();
        assert!(output.contains("http_requests_total"));
    }

    #[tokio::test]
    async fn track_store_operation_counts_errors() {
        let before = RECORD_STORE_OPERATIONS_TOTAL
            .with_label_values(&["metrics_test", "error"])
            .get();

        let result: Result<(), &str> =
            track_store_operation("metrics_test", async { Err("boom") }).await;

        assert!(result.is_err());
        let after = RECORD_STORE_OPERATIONS_TOTAL
            .with_label_values(&["metrics_test", "error"])
            .get();
        assert_eq!(after, before + 1);
    }
}
