//! In-memory store backend using HashMap and petgraph.
//!
//! All data is held in RAM; persistence is layered on top via
//! [`load_from_jsonl`]/[`save_to_jsonl`] and the JSONL-backed wrapper in
//! the parent module.
//!
//! # Graph Representation
//!
//! - `HashMap<FeatureId, Feature>` for O(1) feature lookups
//! - `petgraph::DiGraph<FeatureId, ()>` for the dependency relation
//! - `HashMap<FeatureId, NodeIndex>` mapping features to graph nodes
//!
//! Edges point from **dependent to dependency**: source -> target means
//! source depends on target. Outgoing edges of a node are its
//! dependencies; incoming edges are its dependents.
//!
//! # Thread Safety
//!
//! The inner state is wrapped in `Arc<tokio::sync::Mutex<_>>` - one
//! exclusive lock around the whole graph. Every trait method acquires it
//! exactly once, so mutations are totally ordered, a plan computation
//! never observes a graph mid-mutation, and a status update racing a plan
//! is fully ordered before or after it. Fine-grained per-node locking
//! would buy nothing at the hundreds-of-nodes scale this engine targets
//! and would open races in the DAG traversals.

mod inner;
mod jsonl;
mod trait_impl;

use std::sync::Arc;

use tokio::sync::Mutex;

use crate::store::FeatureStore;
pub(crate) use inner::StoreInner;

// Re-export public API
pub use jsonl::{load_from_jsonl, save_to_jsonl};

/// Thread-safe in-memory store.
///
/// This type alias wraps the inner state in `Arc<Mutex<>>`; it implements
/// [`FeatureStore`] via the trait implementation in `trait_impl.rs`.
pub(crate) type InMemoryStore = Arc<Mutex<StoreInner>>;

/// Create a new, empty in-memory store.
pub fn new_in_memory_store() -> Box<dyn FeatureStore> {
    Box::new(Arc::new(Mutex::new(StoreInner::new())))
}
