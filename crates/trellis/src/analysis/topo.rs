//! Deterministic topological ordering via Kahn's algorithm.
//!
//! Two orderings share the same machinery:
//!
//! - the **structural** order ranges over every feature and ignores
//!   statuses entirely; it exists to drive the critical-path DP.
//! - the **scheduling** order ranges over non-terminal features, treats
//!   `Complete` dependencies as satisfied, and excludes the transitive
//!   dependents of `Failed` features (reported as unreachable).
//!
//! Both are fully deterministic: the frontier is drained through an
//! ordered heap, never in map iteration order.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::analysis::cycles;
use crate::domain::{FeatureId, FeatureStatus, PlanOptions};
use crate::error::CycleError;
use crate::store::in_memory::StoreInner;

/// Result of a scheduling-order computation.
#[derive(Debug)]
pub(crate) struct TopoOutcome {
    /// Non-terminal features in dependency-respecting order.
    pub(crate) order: Vec<FeatureId>,

    /// Non-terminal features excluded by a failed dependency (direct or
    /// transitive), sorted by id.
    pub(crate) unreachable: Vec<FeatureId>,
}

/// Status-blind topological order over every feature.
///
/// Frontier tie-break: lowest clamped priority value first, then smallest
/// id. Callers must have verified the graph is acyclic; on a cyclic graph
/// the returned order is partial.
pub(crate) fn structural_order(inner: &StoreInner) -> Vec<FeatureId> {
    let mut in_degree: HashMap<&FeatureId, usize> = HashMap::new();
    for feature in inner.features.values() {
        in_degree.insert(&feature.id, feature.dependencies.len());
    }

    // Min-heap on (clamped priority, id).
    let mut frontier: BinaryHeap<Reverse<(i64, &FeatureId)>> = BinaryHeap::new();
    for (&id, degree) in &in_degree {
        if *degree == 0 {
            if let Some(feature) = inner.feature(id) {
                frontier.push(Reverse((feature.clamped_priority(), &feature.id)));
            }
        }
    }

    let mut order = Vec::with_capacity(inner.features.len());
    while let Some(Reverse((_, id))) = frontier.pop() {
        order.push(id.clone());

        for dependent in inner.dependents_of(id) {
            let Some(degree) = in_degree.get_mut(&dependent) else {
                continue;
            };
            *degree -= 1;
            if *degree == 0 {
                if let Some(feature) = inner.feature(&dependent) {
                    frontier.push(Reverse((feature.clamped_priority(), &feature.id)));
                }
            }
        }
    }

    order
}

/// Scheduling order per the planner contract.
///
/// In-degree counts incomplete dependencies: a `Complete` dependency is
/// satisfied, a `Failed` one poisons its dependents (unless
/// `options.ignore_failed`), and `Pending`/`InProgress` dependencies must
/// appear earlier in the order. Frontier tie-break: highest priority score
/// first, then smallest id.
///
/// # Errors
///
/// Returns a [`CycleError`] if the frontier drains while eligible
/// features remain (a residual cycle). Callers are expected to run
/// [`cycles::ensure_acyclic`] first.
pub(crate) fn scheduling_order(
    inner: &StoreInner,
    scores: &HashMap<FeatureId, i64>,
    options: PlanOptions,
) -> Result<TopoOutcome, CycleError> {
    let excluded = failed_closure(inner, options);

    let eligible: HashSet<&FeatureId> = inner
        .features
        .values()
        .filter(|f| !f.status.is_terminal())
        .filter(|f| !excluded.contains(&f.id))
        .map(|f| &f.id)
        .collect();

    let mut in_degree: HashMap<&FeatureId, usize> = HashMap::new();
    for &id in &eligible {
        let open_deps = inner.feature(id).map_or(0, |feature| {
            feature
                .dependencies
                .iter()
                .filter(|dep| eligible.contains(dep))
                .count()
        });
        in_degree.insert(id, open_deps);
    }

    // Max-heap on (score, Reverse(id)).
    let mut frontier: BinaryHeap<(i64, Reverse<&FeatureId>)> = BinaryHeap::new();
    for (&id, degree) in &in_degree {
        if *degree == 0 {
            frontier.push((score_of(scores, id), Reverse(id)));
        }
    }

    let mut order = Vec::with_capacity(eligible.len());
    while let Some((_, Reverse(id))) = frontier.pop() {
        order.push(id.clone());

        for dependent in inner.dependents_of(id) {
            let Some(degree) = in_degree.get_mut(&dependent) else {
                continue;
            };
            *degree -= 1;
            if *degree == 0 {
                if let Some(feature) = inner.feature(&dependent) {
                    frontier.push((score_of(scores, &feature.id), Reverse(&feature.id)));
                }
            }
        }
    }

    if order.len() != eligible.len() {
        debug!(
            ordered = order.len(),
            eligible = eligible.len(),
            "scheduling frontier drained early; residual cycle"
        );
        return Err(CycleError {
            cycles: cycles::find_cycles(inner),
        });
    }

    let mut unreachable: Vec<FeatureId> = excluded.into_iter().collect();
    unreachable.sort();

    Ok(TopoOutcome { order, unreachable })
}

/// Non-terminal features that depend, directly or transitively, on a
/// `Failed` feature. Empty when `options.ignore_failed` is set.
fn failed_closure(inner: &StoreInner, options: PlanOptions) -> HashSet<FeatureId> {
    if options.ignore_failed {
        return HashSet::new();
    }

    let mut blocked: HashSet<FeatureId> = HashSet::new();
    let mut queue: VecDeque<FeatureId> = inner
        .features
        .values()
        .filter(|f| f.status == FeatureStatus::Failed)
        .map(|f| f.id.clone())
        .collect();

    // BFS over dependents; the failed features themselves are seeds, not
    // members (they are terminal, not "unreachable").
    while let Some(id) = queue.pop_front() {
        for dependent in inner.dependents_of(&id) {
            let is_open = inner
                .feature(&dependent)
                .is_some_and(|f| !f.status.is_terminal());
            if is_open && blocked.insert(dependent.clone()) {
                queue.push_back(dependent);
            }
        }
    }

    blocked
}

fn score_of(scores: &HashMap<FeatureId, i64>, id: &FeatureId) -> i64 {
    scores.get(id).copied().unwrap_or(0)
}
