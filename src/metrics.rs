use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

/// Install the Prometheus recorder and describe the calculator metrics
pub fn init_metrics() -> anyhow::Result<PrometheusHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    init_metric_descriptions();

    Ok(handle)
}

/// Initialize metric descriptions (can be called multiple times safely)
fn init_metric_descriptions() {
    describe_counter!(
        "cost_calculations_total",
        "Total number of cost/ROI calculations served"
    );
    describe_counter!(
        "cost_calculation_errors_total",
        "Total number of rejected calculations"
    );
    describe_gauge!(
        "cost_calculator_info",
        "Calculator version and build information"
    );

    gauge!("cost_calculator_info", "version" => env!("CARGO_PKG_VERSION")).set(1.0);
}

/// Record a served calculation
pub fn record_calculation(operation: &str, model: &str) {
    counter!(
        "cost_calculations_total",
        "operation" => operation.to_string(),
        "model" => model.to_string(),
    )
    .increment(1);
}

/// Record an error
pub fn record_error(error_type: &str) {
    counter!(
        "cost_calculation_errors_total",
        "error_type" => error_type.to_string(),
    )
    .increment(1);
}
