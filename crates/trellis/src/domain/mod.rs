//! Domain types for feature scheduling.
//!
//! This module contains the core domain types for the trellis scheduling
//! engine: features, their stored statuses, and the derived plan value
//! objects produced by the planners.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Priority assigned to a feature that doesn't specify one.
///
/// Priorities are "lower is more important" with 1 as the most important;
/// the default sits mid-range so explicit priorities can sort both above
/// and below unprioritized work.
pub const DEFAULT_PRIORITY: i32 = 50;

/// Unique identifier for a feature.
///
/// Ids are caller-supplied strings and stay stable for the lifetime of the
/// graph; the engine never generates or rewrites them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub String);

impl FeatureId {
    /// Create a new feature ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for FeatureId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for FeatureId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Stored status of a feature in its execution lifecycle.
///
/// READY and BLOCKED are deliberately absent: they are derived from the
/// dependency closure at query time, never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeatureStatus {
    /// Not started yet.
    #[default]
    Pending,

    /// Currently being worked on by a worker.
    InProgress,

    /// Finished successfully. Terminal.
    Complete,

    /// Finished unsuccessfully. Terminal; dependents become unreachable.
    Failed,
}

impl FeatureStatus {
    /// Returns `true` for statuses that permit no further transitions.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Whether moving from `self` to `next` is a legal transition.
    ///
    /// Transitions are monotone: `Pending -> InProgress -> Complete`, with
    /// `Pending -> Complete` allowed as a forward skip, and `Failed`
    /// reachable from either non-terminal status. Terminal statuses admit
    /// nothing - including re-asserting the same terminal status.
    pub fn can_transition_to(self, next: FeatureStatus) -> bool {
        match (self, next) {
            (Self::Pending, Self::InProgress | Self::Complete | Self::Failed) => true,
            (Self::InProgress, Self::Complete | Self::Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for FeatureStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Complete => "complete",
            Self::Failed => "failed",
        };
        write!(f, "{s}")
    }
}

/// A feature: one schedulable unit of work.
///
/// The serialized record shape is
/// `{id, description, priority, dependencies, status}` plus an optional
/// `effort`; any fields the engine doesn't model are captured in `extra`
/// and written back untouched on export, so external tools can annotate
/// the feature list without trellis erasing their data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feature {
    /// Unique identifier, stable for the graph's lifetime.
    pub id: FeatureId,

    /// Free text; not interpreted by the engine.
    #[serde(default)]
    pub description: String,

    /// Lower value = higher importance; 1 is most important.
    #[serde(default = "default_priority")]
    pub priority: i32,

    /// Ids of features that must reach `Complete` before this one is ready.
    /// Set semantics: duplicates are a validation error, order irrelevant.
    #[serde(default)]
    pub dependencies: Vec<FeatureId>,

    /// Stored lifecycle status.
    #[serde(default)]
    pub status: FeatureStatus,

    /// Optional unitless effort estimate, used as the critical-path weight.
    /// Absent means 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effort: Option<f64>,

    /// Unknown input fields, preserved verbatim for round-trip safety.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

fn default_priority() -> i32 {
    DEFAULT_PRIORITY
}

impl Feature {
    /// The effort weight used in critical-path analysis (1 when absent).
    pub fn effort_weight(&self) -> f64 {
        self.effort.unwrap_or(1.0)
    }

    /// Priority clamped to `[1, 100]`, as used in score computation.
    pub fn clamped_priority(&self) -> i64 {
        i64::from(self.priority.clamp(1, 100))
    }

    /// Validate the record in isolation (checks that don't need the rest
    /// of the graph): no self-dependency, no duplicate dependency entries,
    /// effort finite and non-negative.
    ///
    /// # Errors
    ///
    /// Returns the exact [`ValidationError`] naming the offending ids.
    pub fn validate(&self) -> std::result::Result<(), crate::error::ValidationError> {
        use crate::error::ValidationError;

        let mut seen = std::collections::HashSet::with_capacity(self.dependencies.len());
        for dep in &self.dependencies {
            if *dep == self.id {
                return Err(ValidationError::SelfDependency(self.id.clone()));
            }
            if !seen.insert(dep) {
                return Err(ValidationError::DuplicateDependency {
                    feature: self.id.clone(),
                    dependency: dep.clone(),
                });
            }
        }

        if let Some(effort) = self.effort {
            if !effort.is_finite() || effort < 0.0 {
                return Err(ValidationError::InvalidEffort {
                    feature: self.id.clone(),
                    effort,
                });
            }
        }

        Ok(())
    }
}

/// Data for inserting a new feature into the store.
///
/// A created feature always starts `Pending`; statuses other than that
/// enter the graph only through bulk import or explicit transitions.
#[derive(Debug, Clone)]
pub struct NewFeature {
    /// Unique identifier for the feature.
    pub id: FeatureId,

    /// Free-text description.
    pub description: String,

    /// Priority; defaults to [`DEFAULT_PRIORITY`] when `None`.
    pub priority: Option<i32>,

    /// Optional effort estimate.
    pub effort: Option<f64>,

    /// Dependencies; every id must already exist in the store.
    pub dependencies: Vec<FeatureId>,
}

impl NewFeature {
    /// Convenience constructor with no dependencies and default priority.
    pub fn new(id: impl Into<FeatureId>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            priority: None,
            effort: None,
            dependencies: Vec::new(),
        }
    }

    /// Builds the stored feature record.
    pub(crate) fn into_feature(self) -> Feature {
        Feature {
            id: self.id,
            description: self.description,
            priority: self.priority.unwrap_or(DEFAULT_PRIORITY),
            dependencies: self.dependencies,
            status: FeatureStatus::Pending,
            effort: self.effort,
            extra: serde_json::Map::new(),
        }
    }
}

/// Options controlling plan computation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanOptions {
    /// Treat `Failed` dependencies as satisfied for ordering purposes.
    ///
    /// By default a failed feature permanently excludes its (transitive)
    /// dependents from plans; this opt-in lets a caller plan past the
    /// failure without mutating any stored state.
    pub ignore_failed: bool,
}

/// A deterministic linear execution order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequentialPlan {
    /// Pending features in dependency-respecting priority order.
    pub order: Vec<FeatureId>,

    /// Pending features permanently excluded by a failed dependency.
    pub unreachable: Vec<FeatureId>,
}

/// A wave-based concurrent execution plan.
///
/// Features within one wave have no dependency relationships between them
/// and can run in parallel; wave `k` depends only on waves `1..k`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParallelPlan {
    /// Waves in execution order; each wave sorted by descending score.
    pub waves: Vec<Vec<FeatureId>>,

    /// Pending features that no wave can ever contain.
    pub unreachable: Vec<FeatureId>,
}

/// The longest effort-weighted dependency chain through the graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CriticalPath {
    /// Feature ids from a source (no dependencies) to a sink.
    pub path: Vec<FeatureId>,

    /// Sum of effort weights along the path.
    pub total_effort: f64,
}

/// A pending feature that is not ready, with the exact reason.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockedFeature {
    /// The blocked feature itself.
    pub feature: Feature,

    /// Dependencies that have not reached `Complete`.
    pub incomplete_dependencies: Vec<FeatureId>,

    /// Whether the feature participates in a dependency cycle. Cycle
    /// members are always blocked, even if every dependency is complete.
    pub in_cycle: bool,
}

/// One node of a read-only graph snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotNode {
    /// Feature id.
    pub id: FeatureId,

    /// Feature description (for labeling).
    pub description: String,

    /// Stored status at snapshot time.
    pub status: FeatureStatus,
}

/// Read-only projection of the graph for rendering collaborators.
///
/// Nodes are sorted by id and edges are sorted `(dependent, dependency)`
/// pairs, so two snapshots of the same graph state compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GraphSnapshot {
    /// All features, sorted by id.
    pub nodes: Vec<SnapshotNode>,

    /// Dependency edges as `(dependent, dependency)` pairs, sorted.
    pub edges: Vec<(FeatureId, FeatureId)>,
}
