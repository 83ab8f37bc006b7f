//! Domain layer
//!
//! The internal routing model that per-filter configuration is derived from.
//! Domain types have no Envoy or infrastructure dependencies.
//!
//! ## Module Organization
//!
//! - `resource`: namespaced references to upstreams and upstream groups
//! - `route`: routing rules, route actions and their destinations
//! - `upstream_group`: stored weighted destination lists and their lookup

pub mod resource;
pub mod route;
pub mod upstream_group;

pub use resource::ResourceRef;
pub use route::{
    Action, Destination, DestinationSpec, Destinations, DirectResponseAction, MultiDestination,
    RedirectAction, Route, RouteAction, Subset, WeightedDestination,
};
pub use upstream_group::{UpstreamGroup, UpstreamGroupSource};
