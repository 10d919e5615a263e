//! Shared helpers for integration tests.

// Not every test binary uses every helper.
#![allow(dead_code)]

use trellis::domain::{Feature, FeatureId, FeatureStatus, NewFeature};

/// A `NewFeature` with the given priority and dependencies.
pub fn new_feature(id: &str, priority: i32, deps: &[&str]) -> NewFeature {
    NewFeature {
        id: FeatureId::new(id),
        description: format!("{id} description"),
        priority: Some(priority),
        effort: None,
        dependencies: deps.iter().map(|d| FeatureId::new(*d)).collect(),
    }
}

/// A full feature record for bulk import.
pub fn record(id: &str, priority: i32, deps: &[&str], status: FeatureStatus) -> Feature {
    Feature {
        id: FeatureId::new(id),
        description: format!("{id} description"),
        priority,
        dependencies: deps.iter().map(|d| FeatureId::new(*d)).collect(),
        status,
        effort: None,
        extra: serde_json::Map::new(),
    }
}

/// Ids of a feature list, as plain strs.
pub fn ids(features: &[Feature]) -> Vec<&str> {
    features.iter().map(|f| f.id.as_str()).collect()
}

/// Ids of an id list, as plain strs.
pub fn id_strs(list: &[FeatureId]) -> Vec<&str> {
    list.iter().map(FeatureId::as_str).collect()
}
