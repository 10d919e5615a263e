//! Storage abstraction layer for trellis.
//!
//! This module provides the core store trait and factory for creating
//! store backends:
//!
//! - **In-memory**: fast, ephemeral storage backed by HashMap and petgraph
//! - **JSONL**: the in-memory store wrapped with file persistence
//!
//! # Architecture
//!
//! The store is the single mutation point of the engine. The trait is
//! async and object-safe, allowing dynamic dispatch via
//! `Box<dyn FeatureStore>`; the in-memory implementation guards the whole
//! graph behind one exclusive lock, so any two mutations are totally
//! ordered and every plan computation observes a consistent snapshot (see
//! the in-memory module docs for the locking discipline).
//!
//! # Example
//!
//! ```no_run
//! use trellis::domain::NewFeature;
//! use trellis::store::{create_store, FeatureStore, StoreBackend};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let mut store = create_store(StoreBackend::InMemory).await?;
//!
//!     store.add_feature(NewFeature::new("auth")).await?;
//!     let next = store.next_feature().await?;
//!     println!("work on: {:?}", next.map(|f| f.id));
//!
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use crate::domain::{
    BlockedFeature, CriticalPath, Feature, FeatureId, FeatureStatus, GraphSnapshot, NewFeature,
    ParallelPlan, PlanOptions, SequentialPlan,
};
use crate::error::Result;

// Store backend implementations
pub mod in_memory;

/// Core store trait for feature scheduling.
///
/// Implementations must be `Send + Sync` to support concurrent access in
/// async contexts: multiple workers may report completion of different
/// features concurrently, and each call must be linearizable with respect
/// to every other call.
///
/// # Method Categories
///
/// - **Mutation**: `add_feature`, `set_status`, `import_features`
/// - **Derived queries**: `ready`, `blocked`, `has_cycle`, `find_cycles`
/// - **Planning**: `sequential_plan`, `parallel_plan`, `next_feature`,
///   `critical_path`, `priority_scores`
/// - **Projection**: `get`, `snapshot`, `export_all`
/// - **Persistence**: `save`
///
/// # Error Handling
///
/// Planning methods check for cycles first and fail fast with
/// `Error::Cycle` carrying every cycle; the graph stays intact and
/// mutable, so callers can fix edges and retry. Validation and transition
/// errors are local and synchronous; nothing is retried internally.
#[async_trait]
pub trait FeatureStore: Send + Sync + std::fmt::Debug {
    // ========== Mutation ==========

    /// Insert a new feature.
    ///
    /// The feature starts `Pending`. Every dependency id must already
    /// exist in the store; insertion is rejected (with the exact
    /// offending id) on duplicate ids, dangling dependencies, self-loops,
    /// duplicate dependency entries, or invalid effort values.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation` describing the first violation found.
    async fn add_feature(&mut self, feature: NewFeature) -> Result<Feature>;

    /// Change a feature's stored status.
    ///
    /// Transitions are monotone (`Pending -> InProgress -> Complete`,
    /// `Failed` from either non-terminal state); terminal statuses admit
    /// no further change, including re-asserting themselves. The update is
    /// atomic; derived READY/BLOCKED sets are recomputed on the next
    /// query, never cached.
    ///
    /// # Errors
    ///
    /// `Error::NotFound` for unknown ids, `Error::InvalidTransition` for
    /// illegal changes.
    async fn set_status(&mut self, id: &FeatureId, status: FeatureStatus) -> Result<Feature>;

    /// Bulk-load features, e.g. from a persisted feature list.
    ///
    /// Unlike `add_feature`, records may reference each other in any
    /// order, and cyclic dependency structures are accepted (they become
    /// queryable via `find_cycles` and block planning). Semantic
    /// violations - duplicate ids, dangling references, self-loops - are
    /// still hard errors naming the exact ids.
    ///
    /// # Errors
    ///
    /// Returns `Error::Validation`; on error nothing from the batch is
    /// inserted.
    async fn import_features(&mut self, features: Vec<Feature>) -> Result<()>;

    // ========== Derived queries ==========

    /// Look up a feature by id (`None` if absent).
    async fn get(&self, id: &FeatureId) -> Result<Option<Feature>>;

    /// Features ready to start: `Pending`, every dependency `Complete`,
    /// and not a member of any cycle. Sorted by clamped priority, then id.
    async fn ready(&self) -> Result<Vec<Feature>>;

    /// Pending features that are not ready, each with its incomplete
    /// dependencies and cycle membership. Sorted by id.
    async fn blocked(&self) -> Result<Vec<BlockedFeature>>;

    /// Whether the dependency relation contains any cycle.
    async fn has_cycle(&self) -> Result<bool>;

    /// Every distinct dependency cycle, each starting at its
    /// lexicographically smallest id; empty iff `has_cycle` is false.
    async fn find_cycles(&self) -> Result<Vec<Vec<FeatureId>>>;

    // ========== Planning ==========

    /// Deterministic linear execution order over pending features.
    ///
    /// Pass `None` for default options.
    ///
    /// # Errors
    ///
    /// `Error::Cycle` if the graph is cyclic.
    async fn sequential_plan(&self, options: Option<PlanOptions>) -> Result<SequentialPlan>;

    /// Wave-based concurrent execution plan over pending features.
    ///
    /// # Errors
    ///
    /// `Error::Cycle` if the graph is cyclic.
    async fn parallel_plan(&self) -> Result<ParallelPlan>;

    /// The highest-priority-score member of the ready set, or `Ok(None)`
    /// when nothing is ready (which callers must distinguish from "all
    /// done" by checking for remaining pending features).
    ///
    /// # Errors
    ///
    /// `Error::Cycle` if the graph is cyclic.
    async fn next_feature(&self) -> Result<Option<Feature>>;

    /// The effort-weighted longest dependency chain.
    ///
    /// # Errors
    ///
    /// `Error::Cycle` if the graph is cyclic.
    async fn critical_path(&self) -> Result<CriticalPath>;

    /// Priority score per feature (priority + blocking factor +
    /// critical-path bonus).
    ///
    /// # Errors
    ///
    /// `Error::Cycle` if the graph is cyclic.
    async fn priority_scores(&self) -> Result<HashMap<FeatureId, i64>>;

    // ========== Projection ==========

    /// Read-only graph snapshot (nodes + edges + statuses) for rendering
    /// collaborators; the engine itself renders nothing.
    async fn snapshot(&self) -> Result<GraphSnapshot>;

    /// All features, sorted by id with sorted dependency lists, suitable
    /// for export or backup. Unknown input fields are preserved.
    async fn export_all(&self) -> Result<Vec<Feature>>;

    // ========== Persistence ==========

    /// Save to persistent storage.
    ///
    /// Takes `&self` so callers can persist after read-only operations;
    /// the in-memory backend is a no-op, the JSONL-backed wrapper writes
    /// the full feature list atomically.
    async fn save(&self) -> Result<()>;
}

/// Store backend configuration.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    /// In-memory storage (ephemeral).
    InMemory,

    /// JSONL file storage (persistent).
    Jsonl(PathBuf),
}

impl StoreBackend {
    /// Returns the data file path for file-based backends.
    pub fn data_path(&self) -> Option<&Path> {
        match self {
            StoreBackend::Jsonl(path) => Some(path),
            StoreBackend::InMemory => None,
        }
    }
}

/// Wrapper that adds JSONL file persistence to the in-memory store.
///
/// Delegates every operation; `save()` writes all features to the backing
/// file atomically.
#[derive(Debug)]
struct JsonlBackedStore {
    inner: Box<dyn FeatureStore>,
    path: PathBuf,
}

#[async_trait]
impl FeatureStore for JsonlBackedStore {
    async fn add_feature(&mut self, feature: NewFeature) -> Result<Feature> {
        self.inner.add_feature(feature).await
    }

    async fn set_status(&mut self, id: &FeatureId, status: FeatureStatus) -> Result<Feature> {
        self.inner.set_status(id, status).await
    }

    async fn import_features(&mut self, features: Vec<Feature>) -> Result<()> {
        self.inner.import_features(features).await
    }

    async fn get(&self, id: &FeatureId) -> Result<Option<Feature>> {
        self.inner.get(id).await
    }

    async fn ready(&self) -> Result<Vec<Feature>> {
        self.inner.ready().await
    }

    async fn blocked(&self) -> Result<Vec<BlockedFeature>> {
        self.inner.blocked().await
    }

    async fn has_cycle(&self) -> Result<bool> {
        self.inner.has_cycle().await
    }

    async fn find_cycles(&self) -> Result<Vec<Vec<FeatureId>>> {
        self.inner.find_cycles().await
    }

    async fn sequential_plan(&self, options: Option<PlanOptions>) -> Result<SequentialPlan> {
        self.inner.sequential_plan(options).await
    }

    async fn parallel_plan(&self) -> Result<ParallelPlan> {
        self.inner.parallel_plan().await
    }

    async fn next_feature(&self) -> Result<Option<Feature>> {
        self.inner.next_feature().await
    }

    async fn critical_path(&self) -> Result<CriticalPath> {
        self.inner.critical_path().await
    }

    async fn priority_scores(&self) -> Result<HashMap<FeatureId, i64>> {
        self.inner.priority_scores().await
    }

    async fn snapshot(&self) -> Result<GraphSnapshot> {
        self.inner.snapshot().await
    }

    async fn export_all(&self) -> Result<Vec<Feature>> {
        self.inner.export_all().await
    }

    async fn save(&self) -> Result<()> {
        in_memory::save_to_jsonl(self.inner.as_ref(), &self.path).await
    }
}

/// Create a store instance for the given backend.
///
/// For the JSONL backend, an existing file is loaded (resiliently:
/// malformed lines are logged and skipped, semantic violations are hard
/// errors) and a missing file starts an empty store.
///
/// # Errors
///
/// `Error::Io` if the backing file cannot be read, `Error::Validation`
/// if its records violate graph invariants.
pub async fn create_store(backend: StoreBackend) -> Result<Box<dyn FeatureStore>> {
    match backend {
        StoreBackend::InMemory => Ok(in_memory::new_in_memory_store()),
        StoreBackend::Jsonl(path) => {
            let inner = if path.exists() {
                let (store, warnings) = in_memory::load_from_jsonl(&path).await?;
                for warning in &warnings {
                    tracing::warn!(warning = %warning.description(), "feature list load warning");
                }
                store
            } else {
                in_memory::new_in_memory_store()
            };
            Ok(Box::new(JsonlBackedStore { inner, path }))
        }
    }
}
