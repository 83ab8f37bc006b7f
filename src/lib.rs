//! # filterbind
//!
//! Per-filter configuration for Envoy route translation.
//!
//! HTTP filters in Envoy can be tuned per route, per virtual host and per
//! weighted-cluster entry through the `typed_per_filter_config` map. This crate
//! provides the small layer a control plane's route translator uses to fill
//! that map:
//!
//! ```text
//! Route rule (destinations) ──► extractor(destination) ──► Any payload
//!                                                             │
//!            Single ──► Route.typed_per_filter_config ◄───────┤
//!            Multi  ──► ClusterWeight.typed_per_filter_config ◄┘
//! ```
//!
//! ## Example Usage
//!
//! ```rust,ignore
//! use filterbind::{mark_per_filter_config, TranslationContext};
//!
//! let ctx = TranslationContext::new();
//! mark_per_filter_config(&ctx, &rule, &mut envoy_route, "envoy.filters.http.local_ratelimit", |dest| {
//!     Ok(rate_limits.get(&dest.upstream).cloned())
//! })?;
//! ```

pub mod config;
pub mod domain;
pub mod errors;
pub mod observability;
pub mod xds;

// Re-export commonly used types and traits
pub use config::{AppConfig, ClusterMatch, MatchingConfig, MissingClusterPolicy};
pub use domain::{Destination, Destinations, ResourceRef, Route, UpstreamGroup, UpstreamGroupSource};
pub use errors::{BoxError, Error, FilterBindError, Result};
pub use observability::{init_logging, init_observability, MetricsRecorder};
pub use xds::{
    mark_per_filter_config, set_route_per_filter_config, set_virtual_host_per_filter_config,
    set_weighted_cluster_per_filter_config, ConfigMessage, DestinationConfigExtractor,
    PerFilterConfigMarker, TranslationContext, TypedMessage,
};

/// Library version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name from Cargo.toml
pub const APP_NAME: &str = env!("CARGO_PKG_NAME");
