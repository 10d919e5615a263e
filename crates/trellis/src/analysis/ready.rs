//! Derived READY / BLOCKED classification.
//!
//! Readiness is never stored: it is recomputed from stored statuses and
//! the dependency closure on every query, which sidesteps the dirty
//! propagation a cached flag would need on every status change.

use std::collections::HashSet;

use crate::analysis::cycles;
use crate::domain::{BlockedFeature, Feature, FeatureId, FeatureStatus};
use crate::store::in_memory::StoreInner;

/// Features that are ready to start.
///
/// Ready means: stored status is `Pending`, every dependency is
/// `Complete`, and the feature is not a member of any dependency cycle
/// (cycle members always count as blocked, even when a naive
/// dependency-completion check would pass). An empty dependency set means
/// immediately ready.
///
/// The result is sorted by clamped priority, then id, so equal graph
/// states produce identical output.
pub(crate) fn ready_features(inner: &StoreInner) -> Vec<Feature> {
    let in_cycle = cycle_members_if_any(inner);

    let mut ready: Vec<Feature> = inner
        .features
        .values()
        .filter(|f| f.status == FeatureStatus::Pending)
        .filter(|f| !in_cycle.contains(&f.id))
        .filter(|f| deps_complete(inner, f))
        .cloned()
        .collect();

    ready.sort_by(|a, b| {
        a.clamped_priority()
            .cmp(&b.clamped_priority())
            .then_with(|| a.id.cmp(&b.id))
    });
    ready
}

/// Features that are pending but not ready, with the exact reason.
///
/// Sorted by id.
pub(crate) fn blocked_features(inner: &StoreInner) -> Vec<BlockedFeature> {
    let in_cycle = cycle_members_if_any(inner);

    let mut blocked: Vec<BlockedFeature> = inner
        .features
        .values()
        .filter(|f| f.status == FeatureStatus::Pending)
        .filter_map(|f| {
            let incomplete: Vec<FeatureId> = incomplete_deps(inner, f);
            let cyclic = in_cycle.contains(&f.id);
            if incomplete.is_empty() && !cyclic {
                return None;
            }
            Some(BlockedFeature {
                feature: f.clone(),
                incomplete_dependencies: incomplete,
                in_cycle: cyclic,
            })
        })
        .collect();

    blocked.sort_by(|a, b| a.feature.id.cmp(&b.feature.id));
    blocked
}

fn cycle_members_if_any(inner: &StoreInner) -> HashSet<FeatureId> {
    if cycles::has_cycle(inner) {
        cycles::cycle_members(inner)
    } else {
        HashSet::new()
    }
}

fn deps_complete(inner: &StoreInner, feature: &Feature) -> bool {
    feature.dependencies.iter().all(|dep| {
        inner
            .feature(dep)
            .is_some_and(|d| d.status == FeatureStatus::Complete)
    })
}

fn incomplete_deps(inner: &StoreInner, feature: &Feature) -> Vec<FeatureId> {
    let mut deps: Vec<FeatureId> = feature
        .dependencies
        .iter()
        .filter(|dep| {
            inner
                .feature(dep)
                .is_none_or(|d| d.status != FeatureStatus::Complete)
        })
        .cloned()
        .collect();
    deps.sort();
    deps
}
