//! Application context for CLI command execution.
//!
//! The `App` struct owns the store for one CLI invocation: it opens the
//! JSONL-backed store for the feature-list path, hands commands a store
//! reference, and persists after mutations.

use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::store::{create_store, FeatureStore, StoreBackend};

/// Application context for CLI operations.
pub struct App {
    /// The store (trait object, JSONL-backed).
    store: Box<dyn FeatureStore>,

    /// Path to the feature-list file.
    path: PathBuf,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("path", &self.path)
            .field("store", &"<dyn FeatureStore>")
            .finish()
    }
}

impl App {
    /// Open (or lazily create) the feature list at the given path.
    ///
    /// A missing file starts an empty store; it is created on the first
    /// `save`. A damaged file loads resiliently, with skipped lines
    /// reported through tracing.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read, or its
    /// records violate graph invariants.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let store = create_store(StoreBackend::Jsonl(path.clone())).await?;
        Ok(Self { store, path })
    }

    /// The backing feature-list path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Immutable store access.
    pub fn store(&self) -> &dyn FeatureStore {
        self.store.as_ref()
    }

    /// Mutable store access.
    pub fn store_mut(&mut self) -> &mut Box<dyn FeatureStore> {
        &mut self.store
    }

    /// Persist the current state to the backing file.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails; the previous file contents
    /// are left intact in that case.
    pub async fn save(&self) -> Result<()> {
        self.store.save().await
    }
}
