//! JSONL persistence for the in-memory store.
//!
//! Each line of the backing file is one serialized feature record.
//! Loading is resilient at the syntax level - damaged lines are skipped
//! and reported as warnings - but strict at the semantic level: duplicate
//! ids, dangling references and self-loops abort the load with the exact
//! offending ids, per the engine's fail-at-insertion contract. Cyclic
//! dependency structures load fine; they surface through `find_cycles`
//! and block planning instead.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::Mutex;
use trellis_jsonl::{read_jsonl_resilient, write_jsonl_atomic, Warning};

use super::StoreInner;
use crate::domain::Feature;
use crate::error::{Error, Result};
use crate::store::FeatureStore;

/// Load a store from a JSONL file.
///
/// Returns the store together with one [`Warning`] per skipped line;
/// callers should surface those to users, since they indicate a damaged
/// feature list that may need manual repair.
///
/// # Errors
///
/// `Error::Io` if the file cannot be read; `Error::Validation` if the
/// parsed records violate graph invariants (duplicate id, dangling
/// dependency, self-loop, invalid effort).
pub async fn load_from_jsonl(path: &Path) -> Result<(Box<dyn FeatureStore>, Vec<Warning>)> {
    let (features, warnings) = read_jsonl_resilient::<Feature, _>(path)
        .await
        .map_err(map_jsonl_error)?;

    let store = Arc::new(Mutex::new(StoreInner::new()));
    {
        let mut inner = store.lock().await;
        super::trait_impl::import_into(&mut inner, features)?;
    }

    Ok((Box::new(store), warnings))
}

/// Save a store to a JSONL file with an atomic write.
///
/// Features are exported in sorted order with sorted dependency lists,
/// so repeated saves of the same state are byte-identical; unknown input
/// fields round-trip untouched. The write goes through a temp file and an
/// atomic rename, so a crash never leaves a half-written feature list.
///
/// # Errors
///
/// `Error::Io` on filesystem failures, `Error::Json` if serialization
/// fails.
pub async fn save_to_jsonl(store: &dyn FeatureStore, path: &Path) -> Result<()> {
    let features = store.export_all().await?;
    write_jsonl_atomic(path, &features)
        .await
        .map_err(map_jsonl_error)
}

fn map_jsonl_error(e: trellis_jsonl::Error) -> Error {
    match e {
        trellis_jsonl::Error::Io(io_err) => Error::Io(io_err),
        trellis_jsonl::Error::Json(json_err) => Error::Json(json_err),
        trellis_jsonl::Error::InvalidFormat(msg) => Error::Storage(msg),
    }
}
