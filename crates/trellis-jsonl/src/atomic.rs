//! Atomic write operations for JSONL files.
//!
//! This module provides functionality for atomically writing JSONL data to
//! files, ensuring crash safety by using the temp-file-then-rename pattern.
//!
//! # Atomicity Guarantee
//!
//! On POSIX systems, file renames within the same filesystem are atomic
//! operations. This module exploits that property:
//!
//! 1. Data is first written to a temporary file with a `.tmp` extension
//! 2. The temporary file is flushed and closed
//! 3. The temporary file is atomically renamed to the target path
//!
//! If a crash occurs during step 1 or 2, the original file remains intact.

use std::path::Path;

use serde::Serialize;
use tokio::fs::File;

use crate::error::Result;
use crate::writer::JsonlWriter;

/// Atomically writes a slice of values to a JSONL file.
///
/// All data is written to a temporary file, then atomically renamed to the
/// target path, so the target file is never left in a partially-written
/// state.
///
/// # Errors
///
/// Returns an error if the temporary file cannot be created, any value
/// fails to serialize, an IO error occurs during writing, or the atomic
/// rename fails. On failure the original file (if it exists) is left
/// unchanged.
///
/// # Examples
///
/// ```no_run
/// use trellis_jsonl::write_jsonl_atomic;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct Record {
///     id: u32,
///     name: String,
/// }
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let records = vec![
///     Record { id: 1, name: "Alice".to_string() },
///     Record { id: 2, name: "Bob".to_string() },
/// ];
///
/// write_jsonl_atomic("data.jsonl", &records).await?;
/// # Ok(())
/// # }
/// ```
pub async fn write_jsonl_atomic<T, P>(path: P, values: &[T]) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    write_jsonl_atomic_iter(path, values.iter()).await
}

/// Atomically writes an iterator of values to a JSONL file.
///
/// This is a more flexible version of [`write_jsonl_atomic`] that accepts
/// any iterator of serializable values, avoiding the need to collect into
/// a slice first.
///
/// # Errors
///
/// See [`write_jsonl_atomic`] for error conditions.
pub async fn write_jsonl_atomic_iter<T, I, P>(path: P, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let temp_path = make_temp_path(path);

    // Write to temporary file; clean it up on failure so a later successful
    // write doesn't inherit stale partial data.
    if let Err(e) = write_to_temp_file(&temp_path, values).await {
        let _ = tokio::fs::remove_file(&temp_path).await;
        return Err(e);
    }

    // Atomic rename to target path
    tokio::fs::rename(&temp_path, path).await?;

    Ok(())
}

/// Creates a temporary file path for atomic write operations.
///
/// The temp path is created by appending `.tmp` to the original filename:
/// `data.jsonl` becomes `data.jsonl.tmp`, and an extensionless `data`
/// becomes `data.tmp`.
fn make_temp_path(path: &Path) -> std::path::PathBuf {
    let mut temp_path = path.to_path_buf();
    let new_extension = match path.extension() {
        Some(ext) => {
            let mut new_ext = ext.to_os_string();
            new_ext.push(".tmp");
            new_ext
        }
        None => std::ffi::OsString::from("tmp"),
    };
    temp_path.set_extension(new_extension);
    temp_path
}

/// Writes values to a temporary file, ensuring proper flush and close.
async fn write_to_temp_file<T, I>(temp_path: &Path, values: I) -> Result<()>
where
    T: Serialize,
    I: IntoIterator<Item = T>,
{
    let file = File::create(temp_path).await?;
    let mut writer = JsonlWriter::new(file);
    writer.write_all(values).await?;
    writer.flush().await?;
    Ok(())
}
