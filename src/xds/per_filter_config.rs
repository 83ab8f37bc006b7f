//! Attaching per-filter configuration to route-scoped constructs.
//!
//! Envoy lets a `Route`, a `VirtualHost` and a single weighted-cluster entry
//! (`ClusterWeight`) each carry a `typed_per_filter_config` map from HTTP filter
//! name to an `Any` payload. The filter reads the most specific entry at
//! request time.
//!
//! All three are handled by one generic operation over
//! [`PerFilterConfigTarget`]. Writing under a name that is already present
//! replaces the previous payload; entries are never merged.

use crate::errors::{FilterBindError, Result};
use crate::xds::filters::{pack_message, unpack_message, ConfigMessage, TypedMessage};
use envoy_types::pb::envoy::config::route::v3::weighted_cluster::ClusterWeight;
use envoy_types::pb::envoy::config::route::v3::{Route, VirtualHost};
use envoy_types::pb::google::protobuf::Any;
use std::collections::HashMap;
use tracing::debug;

/// An output construct owning a name-keyed per-filter configuration map.
pub trait PerFilterConfigTarget {
    /// Scope label used in logs and metrics
    const KIND: &'static str;

    fn per_filter_config(&self) -> &HashMap<String, Any>;

    fn per_filter_config_mut(&mut self) -> &mut HashMap<String, Any>;

    /// Human-readable identity of this construct (its name, when it has one)
    fn describe(&self) -> &str;
}

impl PerFilterConfigTarget for Route {
    const KIND: &'static str = "route";

    fn per_filter_config(&self) -> &HashMap<String, Any> {
        &self.typed_per_filter_config
    }

    fn per_filter_config_mut(&mut self) -> &mut HashMap<String, Any> {
        &mut self.typed_per_filter_config
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

impl PerFilterConfigTarget for VirtualHost {
    const KIND: &'static str = "virtual_host";

    fn per_filter_config(&self) -> &HashMap<String, Any> {
        &self.typed_per_filter_config
    }

    fn per_filter_config_mut(&mut self) -> &mut HashMap<String, Any> {
        &mut self.typed_per_filter_config
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

impl PerFilterConfigTarget for ClusterWeight {
    const KIND: &'static str = "cluster_weight";

    fn per_filter_config(&self) -> &HashMap<String, Any> {
        &self.typed_per_filter_config
    }

    fn per_filter_config_mut(&mut self) -> &mut HashMap<String, Any> {
        &mut self.typed_per_filter_config
    }

    fn describe(&self) -> &str {
        &self.name
    }
}

/// Pack `msg` and store it under `filter_name`, replacing any previous entry.
///
/// Nothing but the target's per-filter map is modified, and the map is left
/// untouched when packing fails.
pub fn set_per_filter_config<T, M>(target: &mut T, filter_name: &str, msg: &M) -> Result<()>
where
    T: PerFilterConfigTarget,
    M: ConfigMessage + ?Sized,
{
    if filter_name.is_empty() {
        return Err(FilterBindError::invalid_input(format!(
            "filter name must not be empty when attaching to {}",
            T::KIND
        )));
    }

    let any = pack_message(msg)?;
    let replaced =
        target.per_filter_config_mut().insert(filter_name.to_string(), any).is_some();

    debug!(
        scope = T::KIND,
        target = %target.describe(),
        filter = %filter_name,
        replaced,
        "Attached per-filter configuration"
    );

    Ok(())
}

/// Attach per-filter configuration to a route.
pub fn set_route_per_filter_config<M>(out: &mut Route, filter_name: &str, msg: &M) -> Result<()>
where
    M: ConfigMessage + ?Sized,
{
    set_per_filter_config(out, filter_name, msg)
}

/// Attach per-filter configuration to a virtual host.
pub fn set_virtual_host_per_filter_config<M>(
    out: &mut VirtualHost,
    filter_name: &str,
    msg: &M,
) -> Result<()>
where
    M: ConfigMessage + ?Sized,
{
    set_per_filter_config(out, filter_name, msg)
}

/// Attach per-filter configuration to one weighted-cluster entry.
pub fn set_weighted_cluster_per_filter_config<M>(
    out: &mut ClusterWeight,
    filter_name: &str,
    msg: &M,
) -> Result<()>
where
    M: ConfigMessage + ?Sized,
{
    set_per_filter_config(out, filter_name, msg)
}

/// Read back the entry stored under `filter_name`.
///
/// Returns `Ok(None)` when there is no entry, and an error when the entry holds
/// a different message type or does not decode.
pub fn get_per_filter_config<T, M>(target: &T, filter_name: &str) -> Result<Option<M>>
where
    T: PerFilterConfigTarget,
    M: TypedMessage,
{
    target.per_filter_config().get(filter_name).map(unpack_message::<M>).transpose()
}

/// Remove and return the entry stored under `filter_name`.
pub fn remove_per_filter_config<T>(target: &mut T, filter_name: &str) -> Option<Any>
where
    T: PerFilterConfigTarget,
{
    target.per_filter_config_mut().remove(filter_name)
}
