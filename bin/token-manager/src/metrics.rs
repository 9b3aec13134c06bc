//! Prometheus metrics for the token manager.
//!
//! All metrics are aggregated in the [`Metrics`] struct for easy tracking and management.

use crate::ErrorKind;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Aggregated metrics for the token manager.
///
/// Metrics are registered with the global metrics registry on creation.
/// Without an installed recorder every call is a no-op.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    /// Register metric descriptions with the global registry.
    fn register_descriptions() {
        // Operation metrics
        describe_counter!(
            "token_manager_operations_total",
            "Total number of operations by name"
        );
        describe_counter!(
            "token_manager_operation_failures_total",
            "Total number of failed operations by name and error kind"
        );

        // Transaction metrics
        describe_counter!(
            "token_manager_transactions_confirmed_total",
            "Total number of confirmed transactions by operation"
        );
        describe_histogram!(
            "token_manager_confirmation_duration_seconds",
            "Time from submission to receipt in seconds"
        );

        // Balance metrics (gauges - current values)
        describe_gauge!(
            "token_manager_token_balance",
            "Connected account balance of the active token, in display units"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Operation metrics
    // ─────────────────────────────────────────────────────────────────────────────

    /// Record the outcome of an operation.
    pub fn record_operation(&self, operation: &'static str, failure: Option<ErrorKind>) {
        counter!("token_manager_operations_total", "operation" => operation).increment(1);

        if let Some(kind) = failure {
            counter!(
                "token_manager_operation_failures_total",
                "operation" => operation,
                "kind" => kind.as_str()
            )
            .increment(1);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Transaction metrics
    // ─────────────────────────────────────────────────────────────────────────────

    /// Record a confirmed transaction.
    pub fn record_confirmation(&self, operation: &'static str, duration: Duration) {
        counter!("token_manager_transactions_confirmed_total", "operation" => operation)
            .increment(1);
        histogram!("token_manager_confirmation_duration_seconds").record(duration.as_secs_f64());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Balance metrics (gauges)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Set the current balance of the active token.
    pub fn set_token_balance(&self, symbol: &str, balance: f64) {
        gauge!("token_manager_token_balance", "symbol" => symbol.to_string()).set(balance);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
