//! Error types for trellis operations.
//!
//! The taxonomy mirrors the engine's contract: insertion problems are
//! [`ValidationError`]s, operations on unknown ids are [`Error::NotFound`],
//! illegal status changes are [`Error::InvalidTransition`], and planning on
//! a cyclic graph fails with a [`CycleError`] that carries every offending
//! cycle. Unreachable features are reported as data on plans, never as
//! errors.

use std::io;

use thiserror::Error;

use crate::domain::{FeatureId, FeatureStatus};

/// The error type for trellis operations.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error occurred.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing or serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A feature failed insertion-time validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Operation referenced a feature that doesn't exist.
    #[error("feature not found: {0}")]
    NotFound(FeatureId),

    /// Illegal status change.
    #[error("invalid status transition for {id}: {from} -> {to}")]
    InvalidTransition {
        /// The feature whose status change was rejected.
        id: FeatureId,
        /// Status the feature currently holds.
        from: FeatureStatus,
        /// Status the caller tried to move to.
        to: FeatureStatus,
    },

    /// Planning was attempted on a cyclic graph.
    #[error(transparent)]
    Cycle(#[from] CycleError),

    /// Backend-specific storage error.
    #[error("storage error: {0}")]
    Storage(String),
}

/// Insertion-time validation failures.
///
/// Every variant names the exact offending ids; callers must never see a
/// generic "invalid graph" message.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// A feature with this id already exists.
    #[error("duplicate feature id: {0}")]
    DuplicateId(FeatureId),

    /// A dependency references an id not present in the graph.
    #[error("feature {feature} depends on unknown feature {dependency}")]
    UnknownDependency {
        /// The feature being inserted.
        feature: FeatureId,
        /// The dependency id that doesn't exist.
        dependency: FeatureId,
    },

    /// A feature listed itself as a dependency.
    #[error("feature {0} depends on itself")]
    SelfDependency(FeatureId),

    /// The same dependency id appeared more than once in one list.
    #[error("feature {feature} lists dependency {dependency} more than once")]
    DuplicateDependency {
        /// The feature being inserted.
        feature: FeatureId,
        /// The repeated dependency id.
        dependency: FeatureId,
    },

    /// Effort must be a finite, non-negative number.
    #[error("feature {feature} has invalid effort {effort}: must be finite and non-negative")]
    InvalidEffort {
        /// The feature being inserted.
        feature: FeatureId,
        /// The rejected effort value.
        effort: f64,
    },
}

/// Planning failed because the dependency relation is cyclic.
///
/// Carries every distinct cycle so the caller can report the exact member
/// lists. The graph itself is left intact and mutable; the caller can fix
/// edges and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("dependency cycles detected: {}", render_cycles(.cycles))]
pub struct CycleError {
    /// Each cycle as an ordered id sequence starting at its lowest id.
    pub cycles: Vec<Vec<FeatureId>>,
}

fn render_cycles(cycles: &[Vec<FeatureId>]) -> String {
    cycles
        .iter()
        .map(|cycle| {
            // Close the loop visually: f1 -> f2 -> f3 -> f1
            let mut ids: Vec<&str> = cycle.iter().map(FeatureId::as_str).collect();
            if let Some(first) = cycle.first() {
                ids.push(first.as_str());
            }
            ids.join(" -> ")
        })
        .collect::<Vec<_>>()
        .join("; ")
}

/// A specialized Result type for trellis operations.
pub type Result<T> = std::result::Result<T, Error>;
