//! Cycle detection and enumeration.
//!
//! The dependency relation must form a DAG for any ordering operation to
//! make sense. [`has_cycle`] is the cheap boolean check; [`find_cycles`]
//! enumerates every distinct elementary cycle for exact error reporting;
//! [`cycle_members`] feeds the derived-status rules (a feature on a cycle
//! is always blocked, never ready).

use std::collections::{HashMap, HashSet};

use petgraph::algo;
use petgraph::visit::EdgeRef;

use crate::domain::FeatureId;
use crate::error::CycleError;
use crate::store::in_memory::StoreInner;

/// Whether the dependency relation contains any cycle.
pub(crate) fn has_cycle(inner: &StoreInner) -> bool {
    algo::is_cyclic_directed(&inner.graph)
}

/// Fails with a [`CycleError`] carrying every cycle if the graph is cyclic.
///
/// Every planning operation calls this first, so a caller always sees the
/// exact member lists rather than a partial or undefined ordering.
pub(crate) fn ensure_acyclic(inner: &StoreInner) -> Result<(), CycleError> {
    if has_cycle(inner) {
        Err(CycleError {
            cycles: find_cycles(inner),
        })
    } else {
        Ok(())
    }
}

/// Ids of all features that participate in at least one cycle.
///
/// A node is on a cycle iff its strongly connected component has more
/// than one member (self-loops are rejected at insertion, so trivial
/// one-node cycles cannot exist).
pub(crate) fn cycle_members(inner: &StoreInner) -> HashSet<FeatureId> {
    algo::tarjan_scc(&inner.graph)
        .into_iter()
        .filter(|scc| scc.len() > 1)
        .flatten()
        .map(|node| inner.graph[node].clone())
        .collect()
}

/// Enumerate every distinct elementary cycle in the dependency relation.
///
/// Each cycle is returned as an ordered id sequence starting at the
/// lexicographically smallest id in the cycle, following dependency edges
/// (a feature's edges point to its dependencies). Multiple disjoint or
/// overlapping cycles are all reported. The result list is sorted, so the
/// output is fully deterministic.
pub(crate) fn find_cycles(inner: &StoreInner) -> Vec<Vec<FeatureId>> {
    // Restrict the search to non-trivial SCCs: every elementary cycle
    // lives entirely inside one of them.
    let mut scc_of: HashMap<&FeatureId, usize> = HashMap::new();
    for (index, scc) in algo::tarjan_scc(&inner.graph).into_iter().enumerate() {
        if scc.len() > 1 {
            for node in scc {
                scc_of.insert(&inner.graph[node], index);
            }
        }
    }

    if scc_of.is_empty() {
        return Vec::new();
    }

    // Sorted adjacency (dependent -> dependency) for deterministic walks.
    let mut adjacency: HashMap<&FeatureId, Vec<&FeatureId>> = HashMap::new();
    for (id, &node) in &inner.node_map {
        let mut deps: Vec<&FeatureId> = inner
            .graph
            .edges(node)
            .map(|edge| &inner.graph[edge.target()])
            .collect();
        deps.sort();
        adjacency.insert(id, deps);
    }

    let mut roots: Vec<&FeatureId> = scc_of.keys().copied().collect();
    roots.sort();

    // Rooted DFS: from each root, walk only ids greater than the root and
    // inside the root's SCC. Every elementary cycle is then discovered
    // exactly once, from its smallest member.
    let mut cycles = Vec::new();
    for root in roots {
        let root_scc = scc_of[root];
        let mut path = vec![root];
        let mut on_path: HashSet<&FeatureId> = HashSet::from([root]);
        dfs_cycles(
            root,
            root,
            root_scc,
            &adjacency,
            &scc_of,
            &mut path,
            &mut on_path,
            &mut cycles,
        );
    }

    cycles.sort();
    cycles
}

#[allow(clippy::too_many_arguments)]
fn dfs_cycles<'a>(
    current: &'a FeatureId,
    root: &'a FeatureId,
    root_scc: usize,
    adjacency: &HashMap<&'a FeatureId, Vec<&'a FeatureId>>,
    scc_of: &HashMap<&'a FeatureId, usize>,
    path: &mut Vec<&'a FeatureId>,
    on_path: &mut HashSet<&'a FeatureId>,
    cycles: &mut Vec<Vec<FeatureId>>,
) {
    let Some(neighbors) = adjacency.get(current) else {
        return;
    };

    for &next in neighbors {
        if next == root {
            cycles.push(path.iter().map(|id| (*id).clone()).collect());
            continue;
        }
        if next < root || on_path.contains(next) {
            continue;
        }
        if scc_of.get(next) != Some(&root_scc) {
            continue;
        }

        path.push(next);
        on_path.insert(next);
        dfs_cycles(next, root, root_scc, adjacency, scc_of, path, on_path, cycles);
        path.pop();
        on_path.remove(next);
    }
}
