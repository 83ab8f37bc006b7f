//! Upstream groups
//!
//! A stored, named list of weighted destinations that routes can reference
//! instead of spelling out their traffic split inline.

use super::resource::ResourceRef;
use super::route::WeightedDestination;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpstreamGroup {
    pub metadata: ResourceRef,
    #[serde(default)]
    pub destinations: Vec<WeightedDestination>,
}

/// Lookup of upstream groups by reference, typically backed by the current snapshot.
pub trait UpstreamGroupSource {
    fn upstream_group(&self, reference: &ResourceRef) -> Option<&UpstreamGroup>;
}

impl UpstreamGroupSource for HashMap<ResourceRef, UpstreamGroup> {
    fn upstream_group(&self, reference: &ResourceRef) -> Option<&UpstreamGroup> {
        self.get(reference)
    }
}

impl UpstreamGroupSource for BTreeMap<ResourceRef, UpstreamGroup> {
    fn upstream_group(&self, reference: &ResourceRef) -> Option<&UpstreamGroup> {
        self.get(reference)
    }
}

impl UpstreamGroupSource for [UpstreamGroup] {
    fn upstream_group(&self, reference: &ResourceRef) -> Option<&UpstreamGroup> {
        self.iter().find(|group| &group.metadata == reference)
    }
}

impl UpstreamGroupSource for Vec<UpstreamGroup> {
    fn upstream_group(&self, reference: &ResourceRef) -> Option<&UpstreamGroup> {
        self.as_slice().upstream_group(reference)
    }
}
