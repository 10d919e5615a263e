//! Core in-memory graph data structures.
//!
//! This module contains the inner store that holds all features and the
//! dependency graph. It is wrapped in `Arc<Mutex<>>` by the trait
//! implementation; nothing here is thread-safe on its own.

use std::collections::HashMap;

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use crate::domain::{Feature, FeatureId};

/// Inner store structure (not thread-safe).
///
/// # Graph Representation
///
/// The dependency graph uses petgraph's `DiGraph` with edges directed from
/// **dependent to dependency** (source -> target means source depends on
/// target). Following outgoing edges therefore walks a feature's
/// dependencies; incoming edges walk its dependents.
#[derive(Debug)]
pub(crate) struct StoreInner {
    /// Features indexed by id for O(1) lookups.
    pub(crate) features: HashMap<FeatureId, Feature>,

    /// Dependency graph. Nodes carry `FeatureId` values; edges are bare.
    pub(crate) graph: DiGraph<FeatureId, ()>,

    /// Mapping from id to graph NodeIndex. Every feature in
    /// `self.features` has a corresponding entry here.
    pub(crate) node_map: HashMap<FeatureId, NodeIndex>,
}

impl StoreInner {
    /// Create a new empty store.
    pub(crate) fn new() -> Self {
        Self {
            features: HashMap::new(),
            graph: DiGraph::new(),
            node_map: HashMap::new(),
        }
    }

    /// Insert an already-validated feature, creating its node and its
    /// dependency edges.
    ///
    /// Callers must have verified that the id is fresh and every
    /// dependency id has a node. Used by `add_feature` (where dependencies
    /// always pre-exist) and as the edge pass of bulk import.
    pub(crate) fn insert_feature(&mut self, feature: Feature) {
        let node = self.graph.add_node(feature.id.clone());
        self.node_map.insert(feature.id.clone(), node);

        for dep in &feature.dependencies {
            if let Some(&dep_node) = self.node_map.get(dep) {
                self.graph.add_edge(node, dep_node, ());
            }
        }

        self.features.insert(feature.id.clone(), feature);
    }

    /// Insert a feature's node without edges (first pass of bulk import,
    /// which must tolerate forward references between records).
    pub(crate) fn insert_node(&mut self, feature: Feature) {
        let node = self.graph.add_node(feature.id.clone());
        self.node_map.insert(feature.id.clone(), node);
        self.features.insert(feature.id.clone(), feature);
    }

    /// Add a dependency edge for an already-inserted feature.
    pub(crate) fn insert_edge(&mut self, from: &FeatureId, to: &FeatureId) {
        if let (Some(&from_node), Some(&to_node)) =
            (self.node_map.get(from), self.node_map.get(to))
        {
            self.graph.add_edge(from_node, to_node, ());
        }
    }

    /// Look up a feature by id.
    pub(crate) fn feature(&self, id: &FeatureId) -> Option<&Feature> {
        self.features.get(id)
    }

    /// Immediate dependents of a feature (features that list it as a
    /// dependency).
    pub(crate) fn dependents_of(&self, id: &FeatureId) -> Vec<FeatureId> {
        let Some(&node) = self.node_map.get(id) else {
            return Vec::new();
        };
        self.graph
            .edges_directed(node, Direction::Incoming)
            .map(|edge| self.graph[edge.source()].clone())
            .collect()
    }
}
