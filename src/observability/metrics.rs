//! # Metrics Collection
//!
//! Counters for per-filter configuration translation, recorded through the
//! `metrics` facade. Without an installed recorder these calls are no-ops; the
//! embedding control plane owns the exporter.

use metrics::{counter, describe_counter, Unit};

pub const ATTACHED_TOTAL: &str = "per_filter_config_attached_total";
pub const SKIPPED_TOTAL: &str = "per_filter_config_skipped_total";
pub const FAILURES_TOTAL: &str = "per_filter_config_failures_total";

/// Register metric descriptions with the installed recorder
pub fn describe_metrics() {
    describe_counter!(
        ATTACHED_TOTAL,
        Unit::Count,
        "Per-filter configuration entries written, by output scope"
    );
    describe_counter!(
        SKIPPED_TOTAL,
        Unit::Count,
        "Destinations for which no per-filter configuration was attached, by reason"
    );
    describe_counter!(
        FAILURES_TOTAL,
        Unit::Count,
        "Per-filter configuration passes that failed, by error kind"
    );
}

/// Metrics recorder for the matching and attachment layers
#[derive(Debug, Clone, Copy)]
pub struct MetricsRecorder {
    enabled: bool,
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl MetricsRecorder {
    /// Create a recorder; a disabled recorder drops every event
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Record a configuration entry written to the given output scope
    pub fn record_attached(&self, scope: &'static str) {
        if self.enabled {
            counter!(ATTACHED_TOTAL, "scope" => scope).increment(1);
        }
    }

    /// Record a destination left without configuration
    pub fn record_skipped(&self, reason: &'static str) {
        if self.enabled {
            counter!(SKIPPED_TOTAL, "reason" => reason).increment(1);
        }
    }

    /// Record a failed pass
    pub fn record_failure(&self, kind: &'static str) {
        if self.enabled {
            counter!(FAILURES_TOTAL, "kind" => kind).increment(1);
        }
    }
}
