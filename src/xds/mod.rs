//! Envoy xDS output construction for per-filter configuration
//!
//! - [`filters`]: packing filter messages into `google.protobuf.Any`
//! - [`per_filter_config`]: attaching packed payloads to routes, virtual hosts
//!   and weighted-cluster entries
//! - [`destinations`]: deciding, per destination, where configuration lands

pub mod context;
pub mod destinations;
pub mod filters;
pub mod per_filter_config;

pub use context::TranslationContext;
pub use destinations::{
    mark_per_filter_config, with_context, DestinationConfigExtractor, PerFilterConfigMarker,
    WithContext,
};
pub use filters::{pack_message, unpack_message, ConfigMessage, TypedConfig, TypedMessage};
pub use per_filter_config::{
    get_per_filter_config, remove_per_filter_config, set_per_filter_config,
    set_route_per_filter_config, set_virtual_host_per_filter_config,
    set_weighted_cluster_per_filter_config, PerFilterConfigTarget,
};
