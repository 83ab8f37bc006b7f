//! # Observability Infrastructure
//!
//! Structured logging and metrics for per-filter configuration translation.

pub mod logging;
pub mod metrics;

pub use self::logging::{env_filter, init_logging};
pub use self::metrics::{describe_metrics, MetricsRecorder};

use crate::config::ObservabilityConfig;
use crate::errors::Result;
use ::tracing::info;

/// Initialize logging and, when enabled, register metric descriptions.
///
/// Returns the recorder the matching layer should use.
pub fn init_observability(config: &ObservabilityConfig) -> Result<MetricsRecorder> {
    init_logging(config)?;

    if config.enable_metrics {
        describe_metrics();
    }

    info!(
        service_name = %config.service_name,
        metrics_enabled = config.enable_metrics,
        "Observability initialized"
    );

    Ok(MetricsRecorder::new(config.enable_metrics))
}
