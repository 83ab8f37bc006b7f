//! # Configuration Management
//!
//! Settings are read from `FILTERBIND`-prefixed environment variables, with `__`
//! separating nested keys (e.g. `FILTERBIND__MATCHING__CLUSTER_MATCH=by_name`).

pub mod settings;

pub use settings::{
    AppConfig, ClusterMatch, MatchingConfig, MissingClusterPolicy, ObservabilityConfig,
};

use crate::Result;

/// Prefix for environment variables read by [`AppConfig::from_env`]
pub const ENV_PREFIX: &str = "FILTERBIND";

impl AppConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config: AppConfig = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }
}
