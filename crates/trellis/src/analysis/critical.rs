//! Critical path analysis and priority scoring.
//!
//! The critical path is the effort-weighted longest chain from a source
//! (no dependencies) to a sink (no dependents); its total is the minimum
//! wall time to finish everything, and features on it get a scoring bonus
//! so the planners drain the bottleneck chain first.
//!
//! Score formula per feature:
//!
//! ```text
//! score = (100 - clamp(priority, 1, 100))
//!       + 10 * blocking_factor          // transitive dependents
//!       + 50 if on the critical path
//! ```
//!
//! All functions assume the caller has already verified the graph is
//! acyclic.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::analysis::topo;
use crate::domain::{CriticalPath, Feature, FeatureId};
use crate::store::in_memory::StoreInner;

/// Compute the critical path through the whole graph.
///
/// Dynamic programming over the reverse structural-topological order:
/// `longest(n) = effort(n) + max(longest(d) for d in dependents(n))`,
/// reconstructing the path from the maximizing successor of each node.
/// Effort ties at a choice point prefer the successor with the lower
/// priority value, then the smaller id, so the result is deterministic.
pub(crate) fn critical_path(inner: &StoreInner) -> CriticalPath {
    let order = topo::structural_order(inner);
    if order.is_empty() {
        return CriticalPath {
            path: Vec::new(),
            total_effort: 0.0,
        };
    }

    let mut longest: HashMap<&FeatureId, f64> = HashMap::new();
    let mut successor: HashMap<&FeatureId, FeatureId> = HashMap::new();

    for id in order.iter().rev() {
        let Some(feature) = inner.feature(id) else {
            continue;
        };

        let mut best: Option<(&Feature, f64)> = None;
        for dependent_id in inner.dependents_of(id) {
            let Some(dependent) = inner.feature(&dependent_id) else {
                continue;
            };
            let dependent_total = longest.get(&dependent_id).copied().unwrap_or(0.0);
            best = Some(match best {
                None => (dependent, dependent_total),
                Some(current) => pick_successor(current, (dependent, dependent_total)),
            });
        }

        let (tail, chosen) = match best {
            Some((dependent, total)) => (total, Some(dependent.id.clone())),
            None => (0.0, None),
        };

        longest.insert(&feature.id, feature.effort_weight() + tail);
        if let Some(chosen) = chosen {
            successor.insert(&feature.id, chosen);
        }
    }

    // The path starts wherever the longest total is achieved; with
    // non-negative efforts that is always a source.
    let mut start: Option<(&FeatureId, f64)> = None;
    for (&id, &total) in &longest {
        start = Some(match start {
            None => (id, total),
            Some(current) => pick_start(inner, current, (id, total)),
        });
    }

    let Some((start_id, total_effort)) = start else {
        return CriticalPath {
            path: Vec::new(),
            total_effort: 0.0,
        };
    };

    let mut path = vec![start_id.clone()];
    let mut current = start_id;
    while let Some(next) = successor.get(current) {
        path.push(next.clone());
        let Some(next_ref) = inner.feature(next).map(|f| &f.id) else {
            break;
        };
        current = next_ref;
    }

    CriticalPath { path, total_effort }
}

/// Choose between two candidate successors at a DP choice point.
fn pick_successor<'a>(
    current: (&'a Feature, f64),
    candidate: (&'a Feature, f64),
) -> (&'a Feature, f64) {
    match candidate.1.total_cmp(&current.1) {
        std::cmp::Ordering::Greater => candidate,
        std::cmp::Ordering::Less => current,
        std::cmp::Ordering::Equal => {
            let by_priority = candidate
                .0
                .clamped_priority()
                .cmp(&current.0.clamped_priority());
            match by_priority.then_with(|| candidate.0.id.cmp(&current.0.id)) {
                std::cmp::Ordering::Less => candidate,
                _ => current,
            }
        }
    }
}

/// Choose between two candidate path starts.
fn pick_start<'a>(
    inner: &StoreInner,
    current: (&'a FeatureId, f64),
    candidate: (&'a FeatureId, f64),
) -> (&'a FeatureId, f64) {
    match candidate.1.total_cmp(&current.1) {
        std::cmp::Ordering::Greater => candidate,
        std::cmp::Ordering::Less => current,
        std::cmp::Ordering::Equal => {
            let priority = |id: &FeatureId| {
                inner
                    .feature(id)
                    .map_or(i64::MAX, Feature::clamped_priority)
            };
            let by_priority = priority(candidate.0).cmp(&priority(current.0));
            match by_priority.then_with(|| candidate.0.cmp(current.0)) {
                std::cmp::Ordering::Less => candidate,
                _ => current,
            }
        }
    }
}

/// Count of features that directly or transitively depend on each feature.
///
/// Transitive on purpose: completing a deep upstream feature unblocks its
/// whole dependent subtree, so it should outrank a leaf with one direct
/// dependent.
pub(crate) fn blocking_factors(inner: &StoreInner) -> HashMap<FeatureId, usize> {
    let mut factors = HashMap::with_capacity(inner.features.len());

    for id in inner.features.keys() {
        let mut visited: HashSet<FeatureId> = HashSet::new();
        let mut queue: VecDeque<FeatureId> = inner.dependents_of(id).into();

        while let Some(dependent) = queue.pop_front() {
            if visited.insert(dependent.clone()) {
                queue.extend(inner.dependents_of(&dependent));
            }
        }

        factors.insert(id.clone(), visited.len());
    }

    factors
}

/// Priority score for every feature in the graph.
pub(crate) fn priority_scores(inner: &StoreInner) -> HashMap<FeatureId, i64> {
    let critical: HashSet<FeatureId> = critical_path(inner).path.into_iter().collect();
    let factors = blocking_factors(inner);

    inner
        .features
        .values()
        .map(|feature| {
            let base = 100 - feature.clamped_priority();
            let blocking = factors.get(&feature.id).copied().unwrap_or(0) as i64;
            let bonus = if critical.contains(&feature.id) { 50 } else { 0 };
            (feature.id.clone(), base + 10 * blocking + bonus)
        })
        .collect()
}
