//! Execution planning: sequential order, concurrent waves, next feature.
//!
//! Plans are pure functions of the current graph state; nothing here
//! caches across mutations. Callers are responsible for the fail-fast
//! cycle check before invoking any of these (the trait implementation
//! does it under the same lock acquisition).

use std::cmp::Reverse;
use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::analysis::{critical, ready, topo};
use crate::domain::{
    Feature, FeatureId, FeatureStatus, ParallelPlan, PlanOptions, SequentialPlan,
};
use crate::error::CycleError;
use crate::store::in_memory::StoreInner;

/// Deterministic linear execution plan.
///
/// The scheduling order filtered down to `Pending` features: completed
/// and failed work is gone, and in-progress work is already dispatched,
/// so neither is actionable.
pub(crate) fn sequential_plan(
    inner: &StoreInner,
    options: PlanOptions,
) -> Result<SequentialPlan, CycleError> {
    let scores = critical::priority_scores(inner);
    let outcome = topo::scheduling_order(inner, &scores, options)?;

    let order: Vec<FeatureId> = outcome
        .order
        .into_iter()
        .filter(|id| {
            inner
                .feature(id)
                .is_some_and(|f| f.status == FeatureStatus::Pending)
        })
        .collect();

    debug!(
        planned = order.len(),
        unreachable = outcome.unreachable.len(),
        "sequential plan computed"
    );

    Ok(SequentialPlan {
        order,
        unreachable: outcome.unreachable,
    })
}

/// Wave-based concurrent execution plan.
///
/// Iterative simulation: wave *k* holds every pending feature whose
/// dependencies are all hypothetically complete, where the hypothetical
/// set starts as `Complete ∪ InProgress` (dispatched work is assumed to
/// finish) and absorbs each emitted wave. `Failed` dependencies never
/// satisfy, so their dependent closure ends up in `unreachable` rather
/// than being silently dropped.
pub(crate) fn parallel_plan(inner: &StoreInner) -> ParallelPlan {
    let scores = critical::priority_scores(inner);

    let mut hypothetically_complete: HashSet<FeatureId> = inner
        .features
        .values()
        .filter(|f| {
            matches!(
                f.status,
                FeatureStatus::Complete | FeatureStatus::InProgress
            )
        })
        .map(|f| f.id.clone())
        .collect();

    let mut pending: BTreeSet<FeatureId> = inner
        .features
        .values()
        .filter(|f| f.status == FeatureStatus::Pending)
        .map(|f| f.id.clone())
        .collect();

    let mut waves: Vec<Vec<FeatureId>> = Vec::new();
    loop {
        let mut wave: Vec<FeatureId> = pending
            .iter()
            .filter(|id| {
                inner.feature(id).is_some_and(|f| {
                    f.dependencies
                        .iter()
                        .all(|dep| hypothetically_complete.contains(dep))
                })
            })
            .cloned()
            .collect();

        if wave.is_empty() {
            break;
        }

        sort_by_score_desc(&mut wave, &scores);

        for id in &wave {
            pending.remove(id);
            hypothetically_complete.insert(id.clone());
        }
        waves.push(wave);
    }

    let unreachable: Vec<FeatureId> = pending.into_iter().collect();
    debug!(
        waves = waves.len(),
        unreachable = unreachable.len(),
        "parallel plan computed"
    );

    ParallelPlan { waves, unreachable }
}

/// The single best feature to work on right now.
///
/// Highest priority score among the ready set; ties go to the smallest
/// id. `None` means nothing is ready - the caller distinguishes "nothing
/// ready yet" from "all done" by checking whether pending features remain
/// at all.
pub(crate) fn next_feature(inner: &StoreInner) -> Option<Feature> {
    let ready = ready::ready_features(inner);
    if ready.is_empty() {
        return None;
    }

    let scores = critical::priority_scores(inner);
    ready.into_iter().max_by_key(|f| {
        (
            scores.get(&f.id).copied().unwrap_or(0),
            Reverse(f.id.clone()),
        )
    })
}

fn sort_by_score_desc(wave: &mut [FeatureId], scores: &HashMap<FeatureId, i64>) {
    wave.sort_by_key(|id| (Reverse(scores.get(id).copied().unwrap_or(0)), id.clone()));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feature(id: &str, deps: &[&str], priority: i32, status: FeatureStatus) -> Feature {
        Feature {
            id: FeatureId::new(id),
            description: String::new(),
            priority,
            dependencies: deps.iter().map(|d| FeatureId::new(*d)).collect(),
            status,
            effort: None,
            extra: serde_json::Map::new(),
        }
    }

    fn store_with(features: Vec<Feature>) -> StoreInner {
        let mut inner = StoreInner::new();
        for f in &features {
            inner.insert_node(f.clone());
        }
        for f in &features {
            for dep in &f.dependencies {
                inner.insert_edge(&f.id, dep);
            }
        }
        inner
    }

    fn ids(list: &[FeatureId]) -> Vec<&str> {
        list.iter().map(FeatureId::as_str).collect()
    }

    #[test]
    fn sequential_plan_lists_pending_in_dependency_order() {
        let inner = store_with(vec![
            feature("c", &["b"], 50, FeatureStatus::Pending),
            feature("b", &["a"], 50, FeatureStatus::Pending),
            feature("a", &[], 50, FeatureStatus::Pending),
        ]);

        let plan = sequential_plan(&inner, PlanOptions::default()).unwrap();
        assert_eq!(ids(&plan.order), vec!["a", "b", "c"]);
        assert!(plan.unreachable.is_empty());
    }

    #[test]
    fn sequential_plan_drops_dispatched_and_terminal_work() {
        let inner = store_with(vec![
            feature("done", &[], 50, FeatureStatus::Complete),
            feature("running", &["done"], 50, FeatureStatus::InProgress),
            feature("todo", &["running"], 50, FeatureStatus::Pending),
        ]);

        let plan = sequential_plan(&inner, PlanOptions::default()).unwrap();
        assert_eq!(ids(&plan.order), vec!["todo"]);
    }

    #[test]
    fn waves_partition_the_pending_set() {
        let inner = store_with(vec![
            feature("base", &[], 50, FeatureStatus::Pending),
            feature("left", &["base"], 50, FeatureStatus::Pending),
            feature("right", &["base"], 50, FeatureStatus::Pending),
            feature("top", &["left", "right"], 50, FeatureStatus::Pending),
        ]);

        let plan = parallel_plan(&inner);
        assert_eq!(plan.waves.len(), 3);
        assert_eq!(ids(&plan.waves[0]), vec!["base"]);
        assert_eq!(ids(&plan.waves[1]), vec!["left", "right"]);
        assert_eq!(ids(&plan.waves[2]), vec!["top"]);
        assert!(plan.unreachable.is_empty());
    }

    #[test]
    fn waves_report_failed_closure_as_unreachable() {
        let inner = store_with(vec![
            feature("bad", &[], 50, FeatureStatus::Failed),
            feature("child", &["bad"], 50, FeatureStatus::Pending),
            feature("free", &[], 50, FeatureStatus::Pending),
        ]);

        let plan = parallel_plan(&inner);
        assert_eq!(plan.waves.len(), 1);
        assert_eq!(ids(&plan.waves[0]), vec!["free"]);
        assert_eq!(ids(&plan.unreachable), vec!["child"]);
    }

    #[test]
    fn waves_assume_dispatched_work_finishes() {
        let inner = store_with(vec![
            feature("running", &[], 50, FeatureStatus::InProgress),
            feature("next", &["running"], 50, FeatureStatus::Pending),
        ]);

        let plan = parallel_plan(&inner);
        assert_eq!(plan.waves.len(), 1);
        assert_eq!(ids(&plan.waves[0]), vec!["next"]);
        assert!(plan.unreachable.is_empty());
    }

    #[test]
    fn waves_are_ordered_by_score_descending() {
        let inner = store_with(vec![
            feature("minor", &[], 90, FeatureStatus::Pending),
            feature("major", &[], 1, FeatureStatus::Pending),
        ]);

        let plan = parallel_plan(&inner);
        assert_eq!(ids(&plan.waves[0]), vec!["major", "minor"]);
    }

    #[test]
    fn next_feature_picks_highest_score() {
        let inner = store_with(vec![
            feature("f1", &[], 1, FeatureStatus::Pending),
            feature("f2", &["f1"], 2, FeatureStatus::Pending),
        ]);

        let next = next_feature(&inner).unwrap();
        assert_eq!(next.id, FeatureId::new("f1"));
    }

    #[test]
    fn next_feature_breaks_score_ties_by_smallest_id() {
        let inner = store_with(vec![
            feature("beta", &[], 10, FeatureStatus::Pending),
            feature("alpha", &[], 10, FeatureStatus::Pending),
        ]);

        let next = next_feature(&inner).unwrap();
        assert_eq!(next.id, FeatureId::new("alpha"));
    }

    #[test]
    fn next_feature_is_none_when_nothing_ready() {
        let inner = store_with(vec![
            feature("f1", &[], 50, FeatureStatus::InProgress),
            feature("f2", &["f1"], 50, FeatureStatus::Pending),
        ]);

        assert!(next_feature(&inner).is_none());
    }
}
