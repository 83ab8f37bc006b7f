//! # Configuration Settings
//!
//! Defines the configuration structure for per-filter configuration translation.

use crate::errors::{FilterBindError, Result};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Destination-to-cluster matching behaviour
    #[validate(nested)]
    pub matching: MatchingConfig,

    /// Logging and metrics configuration
    #[validate(nested)]
    pub observability: ObservabilityConfig,
}

impl AppConfig {
    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        Validate::validate(self).map_err(FilterBindError::from)?;
        self.validate_custom()?;
        Ok(())
    }

    fn validate_custom(&self) -> Result<()> {
        let level = self.observability.log_level.to_ascii_lowercase();
        // A bare level is checked here; directive strings are left to EnvFilter.
        if !level.contains('=')
            && !level.contains(',')
            && !matches!(level.as_str(), "trace" | "debug" | "info" | "warn" | "error" | "off")
        {
            return Err(FilterBindError::validation_field(
                format!("Unknown log level '{}'", self.observability.log_level),
                "observability.log_level",
            ));
        }

        Ok(())
    }
}

/// How a weighted destination finds its `ClusterWeight` entry in the output route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ClusterMatch {
    /// Entry `i` belongs to destination `i`; counts must agree
    #[default]
    Positional,
    /// The entry whose name equals the upstream's namespace-qualified cluster name
    ByName,
}

/// What to do when a destination that produced configuration has no entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MissingClusterPolicy {
    /// Treat it as a structural precondition violation
    #[default]
    Fail,
    /// Log a warning and move on to the next destination
    Skip,
}

/// Destination matching configuration
#[derive(Debug, Clone, Serialize, Deserialize, Validate, Default)]
#[serde(default)]
pub struct MatchingConfig {
    pub cluster_match: ClusterMatch,
    pub on_missing_cluster: MissingClusterPolicy,
}

impl MatchingConfig {
    /// Positional matching that fails on any mismatch
    pub fn strict() -> Self {
        Self::default()
    }

    /// Name-based matching
    pub fn by_name() -> Self {
        Self { cluster_match: ClusterMatch::ByName, ..Self::default() }
    }

    /// Returns a copy with the given missing-cluster policy
    pub fn with_missing_cluster_policy(mut self, policy: MissingClusterPolicy) -> Self {
        self.on_missing_cluster = policy;
        self
    }
}

/// Observability configuration for logging and metrics
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level or `EnvFilter` directive, used when `RUST_LOG` is not set
    #[validate(length(min = 1, message = "Log level cannot be empty"))]
    pub log_level: String,

    /// Enable JSON structured logging
    pub json_logging: bool,

    /// Record attachment counters through the `metrics` facade
    pub enable_metrics: bool,

    /// Service name attached to log output
    #[validate(length(min = 1, message = "Service name cannot be empty"))]
    pub service_name: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logging: false,
            enable_metrics: true,
            service_name: "filterbind".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.matching.cluster_match, ClusterMatch::Positional);
        assert_eq!(config.matching.on_missing_cluster, MissingClusterPolicy::Fail);
    }

    #[test]
    fn test_empty_service_name_rejected() {
        let mut config = AppConfig::default();
        config.observability.service_name = String::new();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, FilterBindError::Validation { .. }));
    }

    #[test]
    fn test_unknown_log_level_rejected() {
        let mut config = AppConfig::default();
        config.observability.log_level = "loud".to_string();
        assert!(config.validate().is_err());

        config.observability.log_level = "filterbind=debug,info".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_matching_deserializes_from_snake_case() {
        let config: MatchingConfig =
            serde_json::from_str(r#"{"cluster_match":"by_name","on_missing_cluster":"skip"}"#)
                .unwrap();
        assert_eq!(config.cluster_match, ClusterMatch::ByName);
        assert_eq!(config.on_missing_cluster, MissingClusterPolicy::Skip);
    }

    #[test]
    fn test_matching_builders() {
        let config = MatchingConfig::by_name().with_missing_cluster_policy(MissingClusterPolicy::Skip);
        assert_eq!(config.cluster_match, ClusterMatch::ByName);
        assert_eq!(config.on_missing_cluster, MissingClusterPolicy::Skip);
        assert_eq!(MatchingConfig::strict().cluster_match, ClusterMatch::Positional);
    }
}
