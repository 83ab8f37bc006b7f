//! # Structured Logging
//!
//! Subscriber setup and span helpers built on the tracing ecosystem.
//!
//! `RUST_LOG` wins when it is set; otherwise the configured `log_level` is used
//! as the `EnvFilter` directive.

use crate::config::ObservabilityConfig;
use crate::errors::{FilterBindError, Result};
use tracing_subscriber::EnvFilter;

/// Create a tracing span for one per-filter configuration pass.
///
/// ```rust,ignore
/// let span = translation_span!("envoy.filters.http.jwt_authn", "api-route", ctx.translation_id());
/// ```
#[macro_export]
macro_rules! translation_span {
    ($filter:expr, $route:expr, $translation_id:expr) => {
        tracing::debug_span!(
            "per_filter_config",
            filter = %$filter,
            route = %$route,
            translation_id = %$translation_id
        )
    };
    ($filter:expr, $route:expr, $translation_id:expr, $($field:tt)*) => {
        tracing::debug_span!(
            "per_filter_config",
            filter = %$filter,
            route = %$route,
            translation_id = %$translation_id,
            $($field)*
        )
    };
}

/// Build the `EnvFilter` for the given configuration
pub fn env_filter(config: &ObservabilityConfig) -> Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&config.log_level).map_err(|e| {
        FilterBindError::config_with_source(
            format!("Invalid log level '{}'", config.log_level),
            Box::new(e),
        )
    })
}

/// Install the global tracing subscriber.
///
/// Returns `Ok(false)` when a subscriber was already installed (e.g. by the
/// embedding control plane or a test harness).
pub fn init_logging(config: &ObservabilityConfig) -> Result<bool> {
    let filter = env_filter(config)?;

    let installed = if config.json_logging {
        tracing_subscriber::fmt().json().with_env_filter(filter).try_init().is_ok()
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).try_init().is_ok()
    };

    if installed {
        tracing::info!(
            service_name = %config.service_name,
            log_level = %config.log_level,
            json_logging = config.json_logging,
            "Logging initialized"
        );
    }

    Ok(installed)
}
