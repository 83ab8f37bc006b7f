//! Destination-aware per-filter configuration.
//!
//! Filter plugins often need configuration that depends on *which upstream* a
//! request is sent to. A plugin supplies an extractor that looks at one
//! [`Destination`] and returns the configuration for it, or `None` when nothing
//! applies. This module decides where each result attaches:
//!
//! - a `Single` destination attaches to the output `Route`, the finest
//!   construct available for it;
//! - a `Multi` destination (or a resolved upstream group) attaches to the
//!   matching `ClusterWeight` entries only. The `Route` itself is never written
//!   in this case, since that would apply one destination's settings to every
//!   weighted target.
//!
//! The output route's base structure (action, cluster specifier, weighted
//! cluster list) must already be built; nothing here creates or reorders it.
//!
//! ```rust,ignore
//! mark_per_filter_config(&ctx, &rule, &mut envoy_route, "envoy.filters.http.aws_lambda", |dest| {
//!     Ok(lambda_config_for(dest))
//! })?;
//! ```

use crate::config::{AppConfig, ClusterMatch, MatchingConfig, MissingClusterPolicy};
use crate::domain::{
    Action, Destination, Destinations, ResourceRef, Route, UpstreamGroupSource, WeightedDestination,
};
use crate::errors::{BoxError, FilterBindError, Result};
use crate::observability::MetricsRecorder;
use crate::xds::context::TranslationContext;
use crate::xds::filters::ConfigMessage;
use crate::xds::per_filter_config::{
    set_route_per_filter_config, set_weighted_cluster_per_filter_config,
};
use envoy_types::pb::envoy::config::route::v3::route::Action as ActionProto;
use envoy_types::pb::envoy::config::route::v3::route_action::ClusterSpecifier;
use envoy_types::pb::envoy::config::route::v3::weighted_cluster::ClusterWeight;
use envoy_types::pb::envoy::config::route::v3::{Route as RouteProto, RouteAction as RouteActionProto};
use tracing::{debug, warn};

/// Produces the per-filter configuration for a single destination.
///
/// `Ok(None)` means no configuration applies to that destination. Any closure
/// `FnMut(&Destination) -> Result<Option<M>, BoxError>` is an extractor; use
/// [`with_context`] for one that also needs the [`TranslationContext`].
pub trait DestinationConfigExtractor<M> {
    fn extract(
        &mut self,
        ctx: &TranslationContext,
        destination: &Destination,
    ) -> std::result::Result<Option<M>, BoxError>;
}

impl<M, F> DestinationConfigExtractor<M> for F
where
    F: FnMut(&Destination) -> std::result::Result<Option<M>, BoxError>,
{
    fn extract(
        &mut self,
        _ctx: &TranslationContext,
        destination: &Destination,
    ) -> std::result::Result<Option<M>, BoxError> {
        self(destination)
    }
}

/// Extractor built from a closure that also receives the translation context
pub struct WithContext<F>(pub F);

impl<M, F> DestinationConfigExtractor<M> for WithContext<F>
where
    F: FnMut(&TranslationContext, &Destination) -> std::result::Result<Option<M>, BoxError>,
{
    fn extract(
        &mut self,
        ctx: &TranslationContext,
        destination: &Destination,
    ) -> std::result::Result<Option<M>, BoxError> {
        (self.0)(ctx, destination)
    }
}

/// Wrap a context-aware closure as an extractor.
pub fn with_context<M, F>(f: F) -> WithContext<F>
where
    F: FnMut(&TranslationContext, &Destination) -> std::result::Result<Option<M>, BoxError>,
{
    WithContext(f)
}

/// Attach destination-specific configuration using the default (strict) matching.
///
/// See [`PerFilterConfigMarker::mark`].
pub fn mark_per_filter_config<M, F>(
    ctx: &TranslationContext,
    rule: &Route,
    out: &mut RouteProto,
    filter_name: &str,
    extractor: F,
) -> Result<()>
where
    M: ConfigMessage,
    F: FnMut(&Destination) -> std::result::Result<Option<M>, BoxError>,
{
    PerFilterConfigMarker::default().mark(ctx, rule, out, filter_name, extractor)
}

/// Attaches destination-specific per-filter configuration to an output route.
#[derive(Clone)]
pub struct PerFilterConfigMarker<'a> {
    matching: MatchingConfig,
    upstream_groups: Option<&'a dyn UpstreamGroupSource>,
    cluster_namer: Option<&'a dyn Fn(&ResourceRef) -> String>,
    metrics: MetricsRecorder,
}

impl Default for PerFilterConfigMarker<'_> {
    fn default() -> Self {
        Self::new(MatchingConfig::default())
    }
}

impl std::fmt::Debug for PerFilterConfigMarker<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerFilterConfigMarker")
            .field("matching", &self.matching)
            .field("upstream_groups", &self.upstream_groups.is_some())
            .field("cluster_namer", &self.cluster_namer.is_some())
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl<'a> PerFilterConfigMarker<'a> {
    pub fn new(matching: MatchingConfig) -> Self {
        Self {
            matching,
            upstream_groups: None,
            cluster_namer: None,
            metrics: MetricsRecorder::default(),
        }
    }

    /// Marker configured from the application settings
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.matching.clone())
            .with_metrics(MetricsRecorder::new(config.observability.enable_metrics))
    }

    /// Enable routes that reference upstream groups
    pub fn with_upstream_groups(mut self, groups: &'a dyn UpstreamGroupSource) -> Self {
        self.upstream_groups = Some(groups);
        self
    }

    /// Override how an upstream reference maps to its weighted cluster name
    /// under by-name matching. Defaults to [`ResourceRef::cluster_name`].
    pub fn with_cluster_namer(mut self, namer: &'a dyn Fn(&ResourceRef) -> String) -> Self {
        self.cluster_namer = Some(namer);
        self
    }

    pub fn with_metrics(mut self, metrics: MetricsRecorder) -> Self {
        self.metrics = metrics;
        self
    }

    fn cluster_name(&self, upstream: &ResourceRef) -> String {
        match self.cluster_namer {
            Some(namer) => namer(upstream),
            None => upstream.cluster_name(),
        }
    }

    /// Invoke `extractor` for each of the rule's destinations and attach what it
    /// returns under `filter_name`.
    ///
    /// The first failure aborts the pass. Entries written before it stay in
    /// place; callers treat any error as fatal for the route being translated.
    pub fn mark<M, F>(
        &self,
        ctx: &TranslationContext,
        rule: &Route,
        out: &mut RouteProto,
        filter_name: &str,
        mut extractor: F,
    ) -> Result<()>
    where
        M: ConfigMessage,
        F: FnMut(&Destination) -> std::result::Result<Option<M>, BoxError>,
    {
        self.mark_with_extractor(ctx, rule, out, filter_name, &mut extractor)
    }

    /// Same as [`mark`](Self::mark) for any [`DestinationConfigExtractor`].
    pub fn mark_with_extractor<M, E>(
        &self,
        ctx: &TranslationContext,
        rule: &Route,
        out: &mut RouteProto,
        filter_name: &str,
        extractor: &mut E,
    ) -> Result<()>
    where
        M: ConfigMessage,
        E: DestinationConfigExtractor<M> + ?Sized,
    {
        let span = crate::translation_span!(
            filter_name,
            rule.display_name(),
            ctx.translation_id(),
            proxy = ctx.proxy().unwrap_or_default()
        );
        let _entered = span.enter();

        let result = self.mark_destinations(ctx, rule, out, filter_name, extractor);
        if let Err(e) = &result {
            self.metrics.record_failure(e.kind());
            debug!(error = %e, "Per-filter configuration pass failed");
        }
        result
    }

    fn mark_destinations<M, E>(
        &self,
        ctx: &TranslationContext,
        rule: &Route,
        out: &mut RouteProto,
        filter_name: &str,
        extractor: &mut E,
    ) -> Result<()>
    where
        M: ConfigMessage,
        E: DestinationConfigExtractor<M> + ?Sized,
    {
        if filter_name.is_empty() {
            return Err(FilterBindError::invalid_input("filter name must not be empty"));
        }

        let destinations = match &rule.action {
            Some(Action::Route(action)) => action.destination.as_ref().ok_or_else(|| {
                FilterBindError::invalid_input(format!(
                    "route '{}' has no destination set",
                    rule.display_name()
                ))
            })?,
            Some(other) => {
                return Err(FilterBindError::invalid_input(format!(
                    "route '{}' has a {} action, expected a route action",
                    rule.display_name(),
                    other.kind()
                )))
            }
            None => {
                return Err(FilterBindError::invalid_input(format!(
                    "route '{}' has no action",
                    rule.display_name()
                )))
            }
        };

        if !matches!(out.action, Some(ActionProto::Route(_))) {
            return Err(FilterBindError::invalid_input(format!(
                "output route '{}' does not carry a route action",
                out.name
            )));
        }

        debug!(destinations = destinations.kind(), "Marking per-filter configuration");

        match destinations {
            Destinations::Single(destination) => {
                self.mark_single(ctx, destination, out, filter_name, extractor)
            }
            Destinations::Multi(multi) => {
                let clusters = weighted_clusters_mut(out)?;
                self.mark_weighted(ctx, &multi.destinations, clusters, filter_name, extractor)
            }
            Destinations::UpstreamGroup(reference) => {
                let groups = self.upstream_groups.ok_or_else(|| {
                    FilterBindError::invalid_input(format!(
                        "route '{}' references upstream group '{}' but no upstream group source is configured",
                        rule.display_name(),
                        reference
                    ))
                })?;
                let group = groups
                    .upstream_group(reference)
                    .ok_or_else(|| FilterBindError::not_found("upstream_group", reference.to_string()))?;

                let clusters = weighted_clusters_mut(out)?;
                self.mark_weighted(ctx, &group.destinations, clusters, filter_name, extractor)
            }
        }
    }

    fn mark_single<M, E>(
        &self,
        ctx: &TranslationContext,
        destination: &Destination,
        out: &mut RouteProto,
        filter_name: &str,
        extractor: &mut E,
    ) -> Result<()>
    where
        M: ConfigMessage,
        E: DestinationConfigExtractor<M> + ?Sized,
    {
        match extract(ctx, extractor, destination)? {
            Some(msg) => {
                set_route_per_filter_config(out, filter_name, &msg)?;
                self.metrics.record_attached("route");
            }
            None => {
                debug!(destination = %destination, "No per-filter configuration for destination");
                self.metrics.record_skipped("no_config");
            }
        }
        Ok(())
    }

    fn mark_weighted<M, E>(
        &self,
        ctx: &TranslationContext,
        destinations: &[WeightedDestination],
        clusters: &mut [ClusterWeight],
        filter_name: &str,
        extractor: &mut E,
    ) -> Result<()>
    where
        M: ConfigMessage,
        E: DestinationConfigExtractor<M> + ?Sized,
    {
        if self.matching.cluster_match == ClusterMatch::Positional
            && self.matching.on_missing_cluster == MissingClusterPolicy::Fail
            && destinations.len() != clusters.len()
        {
            return Err(FilterBindError::mismatch(format!(
                "route has {} weighted destinations but the output route has {} weighted clusters",
                destinations.len(),
                clusters.len()
            )));
        }

        let mut claimed = vec![false; clusters.len()];

        for (index, weighted) in destinations.iter().enumerate() {
            let destination = &weighted.destination;

            let Some(msg) = extract(ctx, extractor, destination)? else {
                debug!(destination = %destination, index, "No per-filter configuration for destination");
                self.metrics.record_skipped("no_config");
                continue;
            };

            let position = match self.matching.cluster_match {
                ClusterMatch::Positional => (index < clusters.len()).then_some(index),
                ClusterMatch::ByName => {
                    let wanted = self.cluster_name(&destination.upstream);
                    clusters.iter().position(|cluster| cluster.name == wanted)
                }
            };

            match position {
                Some(position) if claimed[position] => {
                    return Err(FilterBindError::mismatch(format!(
                        "destination '{}' resolves to weighted cluster '{}', which already received configuration from another destination",
                        destination, clusters[position].name
                    )))
                }
                Some(position) => {
                    set_weighted_cluster_per_filter_config(&mut clusters[position], filter_name, &msg)?;
                    claimed[position] = true;
                    self.metrics.record_attached("cluster_weight");
                }
                None if self.matching.on_missing_cluster == MissingClusterPolicy::Skip => {
                    warn!(
                        destination = %destination,
                        index,
                        "No weighted cluster corresponds to destination, skipping per-filter configuration"
                    );
                    self.metrics.record_skipped("missing_cluster");
                }
                None => {
                    return Err(FilterBindError::mismatch(format!(
                        "no weighted cluster corresponds to destination '{}' at position {}",
                        destination, index
                    )))
                }
            }
        }

        Ok(())
    }
}

fn extract<M, E>(
    ctx: &TranslationContext,
    extractor: &mut E,
    destination: &Destination,
) -> Result<Option<M>>
where
    E: DestinationConfigExtractor<M> + ?Sized,
{
    extractor
        .extract(ctx, destination)
        .map_err(|source| FilterBindError::extractor(destination.to_string(), source))
}

fn weighted_clusters_mut(out: &mut RouteProto) -> Result<&mut Vec<ClusterWeight>> {
    match out.action.as_mut() {
        Some(ActionProto::Route(RouteActionProto {
            cluster_specifier: Some(ClusterSpecifier::WeightedClusters(weighted)),
            ..
        })) => Ok(&mut weighted.clusters),
        _ => Err(FilterBindError::mismatch(format!(
            "route has multiple destinations but output route '{}' does not use weighted clusters",
            out.name
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ResourceRef, UpstreamGroup};
    use crate::xds::per_filter_config::get_per_filter_config;
    use envoy_types::pb::envoy::config::route::v3::WeightedCluster;
    use prost_types::{value::Kind, Struct, Value};
    use std::collections::BTreeMap;

    const NAME: &str = "fakename";

    fn msg() -> Struct {
        Struct {
            fields: BTreeMap::from([(
                "test".to_string(),
                Value { kind: Some(Kind::BoolValue(true)) },
            )]),
        }
    }

    fn dest(name: &str) -> Destination {
        Destination::to_upstream(ResourceRef::named(name))
    }

    fn weighted(names: &[&str]) -> Vec<WeightedDestination> {
        names.iter().map(|n| WeightedDestination::new(dest(n), 1)).collect()
    }

    fn single_out(cluster: &str) -> RouteProto {
        #[allow(deprecated)]
        let action = RouteActionProto {
            cluster_specifier: Some(ClusterSpecifier::Cluster(cluster.to_string())),
            ..Default::default()
        };
        RouteProto { action: Some(ActionProto::Route(action)), ..Default::default() }
    }

    fn weighted_out(names: &[&str]) -> RouteProto {
        let clusters = names
            .iter()
            .map(|n| ClusterWeight { name: n.to_string(), ..Default::default() })
            .collect();
        #[allow(deprecated)]
        let action = RouteActionProto {
            cluster_specifier: Some(ClusterSpecifier::WeightedClusters(WeightedCluster {
                clusters,
                ..Default::default()
            })),
            ..Default::default()
        };
        RouteProto { action: Some(ActionProto::Route(action)), ..Default::default() }
    }

    fn clusters(out: &RouteProto) -> &[ClusterWeight] {
        match &out.action {
            Some(ActionProto::Route(RouteActionProto {
                cluster_specifier: Some(ClusterSpecifier::WeightedClusters(w)),
                ..
            })) => &w.clusters,
            _ => panic!("expected weighted clusters"),
        }
    }

    fn only_yes(d: &Destination) -> std::result::Result<Option<Struct>, BoxError> {
        Ok((d.upstream.name == "yes").then(msg))
    }

    #[test]
    fn single_destination_attaches_to_route() {
        let rule = Route::single(dest("test"));
        let mut out = single_out("test");

        mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, |_| Ok(Some(msg())))
            .unwrap();

        let back: Option<Struct> = get_per_filter_config(&out, NAME).unwrap();
        assert_eq!(back, Some(msg()));
        assert_eq!(out.typed_per_filter_config.len(), 1);
    }

    #[test]
    fn single_destination_without_config_attaches_nothing() {
        let rule = Route::single(dest("test"));
        let mut out = single_out("test");

        mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, |_| {
            Ok(None::<Struct>)
        })
        .unwrap();

        assert!(!out.typed_per_filter_config.contains_key(NAME));
    }

    #[test]
    fn multi_destination_attaches_only_to_relevant_cluster() {
        let rule = Route::multi(weighted(&["yes", "no"]));
        let mut out = weighted_out(&["yes", "no"]);

        mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, only_yes).unwrap();

        let yes: Option<Struct> = get_per_filter_config(&clusters(&out)[0], NAME).unwrap();
        assert_eq!(yes, Some(msg()));
        assert!(!clusters(&out)[1].typed_per_filter_config.contains_key(NAME));
        assert!(!out.typed_per_filter_config.contains_key(NAME));
    }

    #[test]
    fn multi_destination_keeps_existing_config_on_skipped_entry() {
        let rule = Route::multi(weighted(&["yes", "no"]));
        let mut out = weighted_out(&["yes", "no"]);
        if let Some(ActionProto::Route(RouteActionProto {
            cluster_specifier: Some(ClusterSpecifier::WeightedClusters(w)),
            ..
        })) = out.action.as_mut()
        {
            set_weighted_cluster_per_filter_config(&mut w.clusters[1], NAME, &Struct::default())
                .unwrap();
        }

        mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, only_yes).unwrap();

        let kept: Option<Struct> = get_per_filter_config(&clusters(&out)[1], NAME).unwrap();
        assert_eq!(kept, Some(Struct::default()));
    }

    #[test]
    fn extractor_failure_aborts_without_rollback() {
        let rule = Route::multi(weighted(&["yes", "boom", "later"]));
        let mut out = weighted_out(&["yes", "boom", "later"]);
        let mut calls = Vec::new();

        let err = mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, |d| {
            calls.push(d.upstream.name.clone());
            if d.upstream.name == "boom" {
                return Err("lookup failed".into());
            }
            Ok(Some(msg()))
        })
        .unwrap_err();

        match err {
            FilterBindError::Extractor { destination, source } => {
                assert_eq!(destination, "boom");
                assert_eq!(source.to_string(), "lookup failed");
            }
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(calls, vec!["yes".to_string(), "boom".to_string()]);
        assert!(clusters(&out)[0].typed_per_filter_config.contains_key(NAME));
        assert!(!clusters(&out)[2].typed_per_filter_config.contains_key(NAME));
    }

    #[test]
    fn positional_count_mismatch_fails_before_extracting() {
        let rule = Route::multi(weighted(&["yes", "no"]));
        let mut out = weighted_out(&["yes"]);
        let mut called = false;

        let err = mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, |_| {
            called = true;
            Ok(Some(msg()))
        })
        .unwrap_err();

        assert!(matches!(err, FilterBindError::StructuralMismatch { .. }));
        assert!(!called);
    }

    #[test]
    fn multi_destination_requires_weighted_output() {
        let rule = Route::multi(weighted(&["yes"]));
        let mut out = single_out("yes");

        let err = mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, only_yes)
            .unwrap_err();
        assert!(matches!(err, FilterBindError::StructuralMismatch { .. }));
    }

    #[test]
    fn by_name_matching_ignores_order() {
        let rule = Route::multi(weighted(&["yes", "no"]));
        let mut out = weighted_out(&["no", "yes"]);
        let marker = PerFilterConfigMarker::new(MatchingConfig::by_name());

        marker.mark(&TranslationContext::new(), &rule, &mut out, NAME, only_yes).unwrap();

        assert!(!clusters(&out)[0].typed_per_filter_config.contains_key(NAME));
        assert!(clusters(&out)[1].typed_per_filter_config.contains_key(NAME));
    }

    #[test]
    fn by_name_keeps_namespaces_apart() {
        let rule = Route::multi(vec![
            WeightedDestination::new(Destination::to_upstream(ResourceRef::new("team-a", "svc")), 1),
            WeightedDestination::new(Destination::to_upstream(ResourceRef::new("team-b", "svc")), 1),
        ]);
        let mut out = weighted_out(&["svc_team-b", "svc_team-a"]);
        let marker = PerFilterConfigMarker::new(MatchingConfig::by_name());

        marker
            .mark(&TranslationContext::new(), &rule, &mut out, NAME, |d| {
                Ok(Some(Struct {
                    fields: BTreeMap::from([(
                        "team".to_string(),
                        Value { kind: Some(Kind::StringValue(d.upstream.namespace.clone())) },
                    )]),
                }))
            })
            .unwrap();

        let team = |cluster: &ClusterWeight| {
            let s: Struct = get_per_filter_config(cluster, NAME).unwrap().unwrap();
            s.fields["team"].kind.clone()
        };
        assert_eq!(team(&clusters(&out)[0]), Some(Kind::StringValue("team-b".into())));
        assert_eq!(team(&clusters(&out)[1]), Some(Kind::StringValue("team-a".into())));
    }

    #[test]
    fn by_name_rejects_two_destinations_on_one_cluster() {
        let rule = Route::multi(vec![
            WeightedDestination::new(Destination::to_upstream(ResourceRef::new("team-a", "svc")), 1),
            WeightedDestination::new(Destination::to_upstream(ResourceRef::new("team-b", "svc")), 1),
        ]);
        let mut out = weighted_out(&["svc", "svc"]);
        let namer = |upstream: &ResourceRef| upstream.name.clone();
        let marker = PerFilterConfigMarker::new(MatchingConfig::by_name()).with_cluster_namer(&namer);

        let err = marker
            .mark(&TranslationContext::new(), &rule, &mut out, NAME, |_| Ok(Some(msg())))
            .unwrap_err();

        assert!(matches!(err, FilterBindError::StructuralMismatch { .. }));
        assert!(clusters(&out)[0].typed_per_filter_config.contains_key(NAME));
        assert!(!clusters(&out)[1].typed_per_filter_config.contains_key(NAME));
    }

    #[test]
    fn custom_cluster_namer_is_used() {
        let rule = Route::multi(vec![WeightedDestination::new(
            Destination::to_upstream(ResourceRef::new("gloo-system", "yes")),
            1,
        )]);
        let mut out = weighted_out(&["other", "gloo-system_yes"]);
        let namer = |upstream: &ResourceRef| format!("{}_{}", upstream.namespace, upstream.name);
        let marker = PerFilterConfigMarker::new(MatchingConfig::by_name()).with_cluster_namer(&namer);

        marker.mark(&TranslationContext::new(), &rule, &mut out, NAME, only_yes).unwrap();

        assert!(!clusters(&out)[0].typed_per_filter_config.contains_key(NAME));
        assert!(clusters(&out)[1].typed_per_filter_config.contains_key(NAME));
    }

    #[test]
    fn by_name_missing_cluster_fails_by_default() {
        let rule = Route::multi(weighted(&["yes"]));
        let mut out = weighted_out(&["other"]);
        let marker = PerFilterConfigMarker::new(MatchingConfig::by_name());

        let err = marker.mark(&TranslationContext::new(), &rule, &mut out, NAME, only_yes).unwrap_err();
        assert!(matches!(err, FilterBindError::StructuralMismatch { .. }));
    }

    #[test]
    fn skip_policy_continues_past_missing_cluster() {
        let rule = Route::multi(weighted(&["a", "b", "c"]));
        let mut out = weighted_out(&["a", "b"]);
        let marker = PerFilterConfigMarker::new(
            MatchingConfig::strict().with_missing_cluster_policy(MissingClusterPolicy::Skip),
        );

        marker
            .mark(&TranslationContext::new(), &rule, &mut out, NAME, |_| Ok(Some(msg())))
            .unwrap();

        assert!(clusters(&out).iter().all(|c| c.typed_per_filter_config.contains_key(NAME)));
    }

    #[test]
    #[tracing_test::traced_test]
    fn skipped_cluster_is_logged() {
        let rule = Route::multi(weighted(&["yes", "gone"]));
        let mut out = weighted_out(&["yes"]);
        let marker = PerFilterConfigMarker::new(
            MatchingConfig::by_name().with_missing_cluster_policy(MissingClusterPolicy::Skip),
        );

        marker
            .mark(&TranslationContext::new(), &rule, &mut out, NAME, |_| Ok(Some(msg())))
            .unwrap();

        assert!(logs_contain("No weighted cluster corresponds to destination"));
        assert!(logs_contain("gone"));
        assert!(clusters(&out)[0].typed_per_filter_config.contains_key(NAME));
    }

    #[test]
    fn upstream_group_resolves_to_weighted_clusters() {
        let group_ref = ResourceRef::new("default", "canary");
        let groups = vec![UpstreamGroup { metadata: group_ref.clone(), destinations: weighted(&["yes", "no"]) }];
        let marker = PerFilterConfigMarker::default().with_upstream_groups(&groups);
        let rule = Route::upstream_group(group_ref);
        let mut out = weighted_out(&["yes", "no"]);

        marker.mark(&TranslationContext::new(), &rule, &mut out, NAME, only_yes).unwrap();

        assert!(clusters(&out)[0].typed_per_filter_config.contains_key(NAME));
        assert!(!clusters(&out)[1].typed_per_filter_config.contains_key(NAME));
        assert!(!out.typed_per_filter_config.contains_key(NAME));
    }

    #[test]
    fn upstream_group_errors() {
        let rule = Route::upstream_group(ResourceRef::new("default", "missing"));
        let mut out = weighted_out(&["yes"]);

        let err = mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, only_yes)
            .unwrap_err();
        assert!(matches!(err, FilterBindError::InvalidInput { .. }));

        let groups: Vec<UpstreamGroup> = Vec::new();
        let marker = PerFilterConfigMarker::default().with_upstream_groups(&groups);
        let err = marker.mark(&TranslationContext::new(), &rule, &mut out, NAME, only_yes).unwrap_err();
        assert!(matches!(err, FilterBindError::NotFound { .. }));
    }

    #[test]
    fn unset_destination_is_invalid_input() {
        let rule = Route {
            name: Some("empty".into()),
            action: Some(Action::Route(Default::default())),
        };
        let mut out = single_out("test");

        let err = mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, only_yes)
            .unwrap_err();
        assert!(matches!(err, FilterBindError::InvalidInput { .. }));
    }

    #[test]
    fn non_route_actions_are_invalid_input() {
        let rule = Route {
            name: None,
            action: Some(Action::Redirect(Default::default())),
        };
        let mut out = single_out("test");
        let err = mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, only_yes)
            .unwrap_err();
        assert!(matches!(err, FilterBindError::InvalidInput { .. }));

        let rule = Route::single(dest("test"));
        let mut out = RouteProto::default();
        let err = mark_per_filter_config(&TranslationContext::new(), &rule, &mut out, NAME, only_yes)
            .unwrap_err();
        assert!(matches!(err, FilterBindError::InvalidInput { .. }));
    }

    #[test]
    fn context_is_passed_through_to_extractor() {
        let ctx = TranslationContext::new().with_proxy("gateway-proxy");
        let rule = Route::single(dest("test"));
        let mut out = single_out("test");
        let mut seen = None;

        let mut extractor = with_context(|ctx: &TranslationContext, _d: &Destination| {
            seen = ctx.proxy().map(str::to_string);
            Ok(Some(msg()))
        });
        PerFilterConfigMarker::default()
            .mark_with_extractor(&ctx, &rule, &mut out, NAME, &mut extractor)
            .unwrap();

        assert_eq!(seen.as_deref(), Some("gateway-proxy"));
        assert!(out.typed_per_filter_config.contains_key(NAME));
    }
}
