//! FeatureStore trait implementation for the in-memory store.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use tracing::debug;

use super::{InMemoryStore, StoreInner};
use crate::analysis::{critical, cycles, plan, ready};
use crate::domain::{
    BlockedFeature, CriticalPath, Feature, FeatureId, FeatureStatus, GraphSnapshot, NewFeature,
    ParallelPlan, PlanOptions, SequentialPlan, SnapshotNode,
};
use crate::error::{Error, Result, ValidationError};

#[async_trait]
impl crate::store::FeatureStore for InMemoryStore {
    async fn add_feature(&mut self, new_feature: NewFeature) -> Result<Feature> {
        let mut inner = self.lock().await;

        // Phase 1: all validations, no mutations.
        if inner.features.contains_key(&new_feature.id) {
            return Err(ValidationError::DuplicateId(new_feature.id).into());
        }

        let feature = new_feature.into_feature();
        feature.validate()?;

        for dep in &feature.dependencies {
            if !inner.features.contains_key(dep) {
                return Err(ValidationError::UnknownDependency {
                    feature: feature.id.clone(),
                    dependency: dep.clone(),
                }
                .into());
            }
        }

        // Phase 2: insert. Dependencies all pre-exist and the new node has
        // no dependents yet, so no cycle can be introduced here.
        debug!(id = %feature.id, deps = feature.dependencies.len(), "adding feature");
        inner.insert_feature(feature.clone());

        Ok(feature)
    }

    async fn set_status(&mut self, id: &FeatureId, status: FeatureStatus) -> Result<Feature> {
        let mut inner = self.lock().await;

        let feature = inner
            .features
            .get_mut(id)
            .ok_or_else(|| Error::NotFound(id.clone()))?;

        if !feature.status.can_transition_to(status) {
            return Err(Error::InvalidTransition {
                id: id.clone(),
                from: feature.status,
                to: status,
            });
        }

        debug!(id = %id, from = %feature.status, to = %status, "status transition");
        feature.status = status;

        Ok(feature.clone())
    }

    async fn import_features(&mut self, features: Vec<Feature>) -> Result<()> {
        let mut inner = self.lock().await;
        import_into(&mut inner, features)
    }

    async fn get(&self, id: &FeatureId) -> Result<Option<Feature>> {
        let inner = self.lock().await;
        Ok(inner.features.get(id).cloned())
    }

    async fn ready(&self) -> Result<Vec<Feature>> {
        let inner = self.lock().await;
        Ok(ready::ready_features(&inner))
    }

    async fn blocked(&self) -> Result<Vec<BlockedFeature>> {
        let inner = self.lock().await;
        Ok(ready::blocked_features(&inner))
    }

    async fn has_cycle(&self) -> Result<bool> {
        let inner = self.lock().await;
        Ok(cycles::has_cycle(&inner))
    }

    async fn find_cycles(&self) -> Result<Vec<Vec<FeatureId>>> {
        let inner = self.lock().await;
        Ok(cycles::find_cycles(&inner))
    }

    async fn sequential_plan(&self, options: Option<PlanOptions>) -> Result<SequentialPlan> {
        let inner = self.lock().await;
        cycles::ensure_acyclic(&inner)?;
        Ok(plan::sequential_plan(&inner, options.unwrap_or_default())?)
    }

    async fn parallel_plan(&self) -> Result<ParallelPlan> {
        let inner = self.lock().await;
        cycles::ensure_acyclic(&inner)?;
        Ok(plan::parallel_plan(&inner))
    }

    async fn next_feature(&self) -> Result<Option<Feature>> {
        let inner = self.lock().await;
        cycles::ensure_acyclic(&inner)?;
        Ok(plan::next_feature(&inner))
    }

    async fn critical_path(&self) -> Result<CriticalPath> {
        let inner = self.lock().await;
        cycles::ensure_acyclic(&inner)?;
        Ok(critical::critical_path(&inner))
    }

    async fn priority_scores(&self) -> Result<HashMap<FeatureId, i64>> {
        let inner = self.lock().await;
        cycles::ensure_acyclic(&inner)?;
        Ok(critical::priority_scores(&inner))
    }

    async fn snapshot(&self) -> Result<GraphSnapshot> {
        let inner = self.lock().await;

        let mut nodes: Vec<SnapshotNode> = inner
            .features
            .values()
            .map(|f| SnapshotNode {
                id: f.id.clone(),
                description: f.description.clone(),
                status: f.status,
            })
            .collect();
        nodes.sort_by(|a, b| a.id.cmp(&b.id));

        let mut edges: Vec<(FeatureId, FeatureId)> = inner
            .features
            .values()
            .flat_map(|f| {
                f.dependencies
                    .iter()
                    .map(|dep| (f.id.clone(), dep.clone()))
            })
            .collect();
        edges.sort();

        Ok(GraphSnapshot { nodes, edges })
    }

    async fn export_all(&self) -> Result<Vec<Feature>> {
        let inner = self.lock().await;

        let mut features: Vec<Feature> = inner.features.values().cloned().collect();
        // Deterministic export: stable record order and stable dependency
        // order prevent spurious diffs in version control.
        for feature in &mut features {
            feature.dependencies.sort();
        }
        features.sort_by(|a, b| a.id.cmp(&b.id));

        Ok(features)
    }

    async fn save(&self) -> Result<()> {
        // Plain in-memory storage has no backing file; the JSONL-backed
        // wrapper overrides this with a real write.
        Ok(())
    }
}

/// Bulk-import validation and insertion, shared by the trait method and
/// the JSONL loader.
///
/// Records may reference each other in any order and may form cycles
/// (cycles become queryable and block planning); duplicate ids, dangling
/// references and self-loops are hard errors, and nothing is inserted on
/// error.
pub(super) fn import_into(inner: &mut StoreInner, features: Vec<Feature>) -> Result<()> {
    // Validation pass: every record in isolation, then cross-record ids.
    let mut batch_ids: HashSet<&FeatureId> = HashSet::with_capacity(features.len());
    for feature in &features {
        if inner.features.contains_key(&feature.id) || !batch_ids.insert(&feature.id) {
            return Err(ValidationError::DuplicateId(feature.id.clone()).into());
        }
        feature.validate()?;
    }

    for feature in &features {
        for dep in &feature.dependencies {
            if !inner.features.contains_key(dep) && !batch_ids.contains(dep) {
                return Err(ValidationError::UnknownDependency {
                    feature: feature.id.clone(),
                    dependency: dep.clone(),
                }
                .into());
            }
        }
    }

    // Insertion: nodes first so edges can reference forward.
    for feature in &features {
        inner.insert_node(feature.clone());
    }
    for feature in &features {
        for dep in &feature.dependencies {
            inner.insert_edge(&feature.id, dep);
        }
    }

    debug!(count = features.len(), "imported features");
    Ok(())
}
