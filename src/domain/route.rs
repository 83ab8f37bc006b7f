//! Route domain types
//!
//! The internal routing rule model consumed by the per-filter configuration
//! layer. A rule's route action names its destinations either as a single
//! upstream, as a weighted set of upstreams, or through a stored upstream group.
//! These types carry no Envoy dependencies.

use super::resource::ResourceRef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Label selector choosing a subset of an upstream's endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subset {
    #[serde(default)]
    pub values: BTreeMap<String, String>,
}

/// Upstream-kind specific settings for a destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DestinationSpec {
    /// Invoke a serverless function by name
    Function { function_name: String },
    /// Call a gRPC service method
    Grpc {
        package: String,
        service: String,
        function: String,
    },
    /// Transform into a REST call
    Rest {
        function_name: String,
        #[serde(default)]
        parameters: BTreeMap<String, String>,
    },
}

/// One upstream target of a route.
///
/// Everything beyond `upstream` is destination-specific data that extractors
/// may consult when deciding what configuration applies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Destination {
    pub upstream: ResourceRef,
    #[serde(default)]
    pub subset: Option<Subset>,
    #[serde(default)]
    pub destination_spec: Option<DestinationSpec>,
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
}

impl Destination {
    pub fn to_upstream(upstream: ResourceRef) -> Self {
        Self { upstream, ..Default::default() }
    }

    pub fn with_subset(mut self, subset: Subset) -> Self {
        self.subset = Some(subset);
        self
    }

    pub fn with_spec(mut self, spec: DestinationSpec) -> Self {
        self.destination_spec = Some(spec);
        self
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.upstream)
    }
}

/// A destination paired with its relative traffic weight
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeightedDestination {
    pub destination: Destination,
    #[serde(default)]
    pub weight: u32,
}

impl WeightedDestination {
    pub fn new(destination: Destination, weight: u32) -> Self {
        Self { destination, weight }
    }
}

/// Traffic split across several destinations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MultiDestination {
    pub destinations: Vec<WeightedDestination>,
}

/// Where a route action sends traffic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Destinations {
    /// Exactly one upstream
    Single(Destination),

    /// Weighted set of upstreams, in the same order as the output's weighted clusters
    Multi(MultiDestination),

    /// Reference to a stored upstream group
    UpstreamGroup(ResourceRef),
}

impl Destinations {
    pub fn kind(&self) -> &'static str {
        match self {
            Destinations::Single(_) => "single",
            Destinations::Multi(_) => "multi",
            Destinations::UpstreamGroup(_) => "upstream_group",
        }
    }
}

/// Forward matched requests to one or more upstreams
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteAction {
    /// `None` when the destination was never set
    #[serde(default)]
    pub destination: Option<Destinations>,
}

/// Answer matched requests with a redirect
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectAction {
    #[serde(default)]
    pub host_redirect: Option<String>,
    #[serde(default)]
    pub path_redirect: Option<String>,
    #[serde(default)]
    pub response_code: Option<u32>,
}

/// Answer matched requests directly
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DirectResponseAction {
    pub status: u32,
    #[serde(default)]
    pub body: Option<String>,
}

/// What a route does with matched requests
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Route(RouteAction),
    Redirect(RedirectAction),
    DirectResponse(DirectResponseAction),
}

impl Action {
    pub fn kind(&self) -> &'static str {
        match self {
            Action::Route(_) => "route",
            Action::Redirect(_) => "redirect",
            Action::DirectResponse(_) => "direct_response",
        }
    }
}

/// A routing rule in the internal API model
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub action: Option<Action>,
}

impl Route {
    /// Rule routing to a single upstream
    pub fn single(destination: Destination) -> Self {
        Self::with_destinations(Destinations::Single(destination))
    }

    /// Rule splitting traffic across weighted upstreams
    pub fn multi(destinations: Vec<WeightedDestination>) -> Self {
        Self::with_destinations(Destinations::Multi(MultiDestination { destinations }))
    }

    /// Rule routing through a stored upstream group
    pub fn upstream_group(group: ResourceRef) -> Self {
        Self::with_destinations(Destinations::UpstreamGroup(group))
    }

    fn with_destinations(destinations: Destinations) -> Self {
        Self {
            name: None,
            action: Some(Action::Route(RouteAction { destination: Some(destinations) })),
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Name used in logs; unnamed rules render as `<unnamed>`
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unnamed>")
    }

    /// The route action, if this rule forwards traffic
    pub fn route_action(&self) -> Option<&RouteAction> {
        match &self.action {
            Some(Action::Route(action)) => Some(action),
            _ => None,
        }
    }
}
