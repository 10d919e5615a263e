//! JSONL reading operations.
//!
//! This module provides async functionality for reading JSONL files
//! line-by-line with buffering and line number tracking for error
//! reporting. Two loading modes are offered:
//!
//! - **Strict** ([`read_jsonl`]): the first malformed line aborts the read.
//! - **Resilient** ([`read_jsonl_resilient`]): malformed lines are skipped
//!   and reported as [`Warning`]s while every intact record is loaded.

use std::path::Path;

use serde::de::DeserializeOwned;
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tracing::warn;

use crate::error::{Error, Result};
use crate::warning::Warning;

/// Async reader for JSONL (JSON Lines) data.
///
/// `JsonlReader` wraps an async reader and provides buffered reading of
/// JSONL formatted data. It tracks line numbers to provide useful context
/// in error messages when parsing fails.
///
/// # Examples
///
/// ```no_run
/// use trellis_jsonl::JsonlReader;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::open("data.jsonl").await?;
/// let mut reader = JsonlReader::new(file);
/// let records: Vec<serde_json::Value> = reader.read_all().await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonlReader<R> {
    /// Buffered reader wrapping the underlying async reader.
    reader: BufReader<R>,
    /// Current line number (1-based; 0 before any lines are read).
    line_number: usize,
}

impl<R: AsyncRead + Unpin> JsonlReader<R> {
    /// Creates a new `JsonlReader` wrapping the given async reader.
    #[must_use]
    pub fn new(reader: R) -> Self {
        Self {
            reader: BufReader::new(reader),
            line_number: 0,
        }
    }

    /// Creates a new `JsonlReader` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        Self {
            reader: BufReader::with_capacity(capacity, reader),
            line_number: 0,
        }
    }

    /// Returns the line number of the last line read (1-based; 0 before
    /// any lines have been read).
    #[must_use]
    pub fn line_number(&self) -> usize {
        self.line_number
    }

    /// Reads the next raw line, returning `None` at end of input.
    ///
    /// The trailing newline is stripped. The line counter advances for
    /// every physical line, including blank ones.
    async fn next_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        let bytes = self.reader.read_line(&mut line).await?;
        if bytes == 0 {
            return Ok(None);
        }
        self.line_number += 1;
        while line.ends_with('\n') || line.ends_with('\r') {
            line.pop();
        }
        Ok(Some(line))
    }

    /// Reads every record in the input, failing on the first malformed line.
    ///
    /// Blank lines are tolerated and skipped silently; anything else must
    /// parse as a complete JSON value of type `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Json`] on the first unparseable line and
    /// [`Error::Io`] if the underlying reader fails.
    pub async fn read_all<T: DeserializeOwned>(&mut self) -> Result<Vec<T>> {
        let mut records = Vec::new();
        while let Some(line) = self.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let record = serde_json::from_str(&line).map_err(Error::Json)?;
            records.push(record);
        }
        Ok(records)
    }

    /// Reads every record in the input, skipping malformed lines.
    ///
    /// Each line that fails to parse produces a [`Warning::MalformedJson`];
    /// blank lines in the middle of the file produce a
    /// [`Warning::SkippedLine`]. A blank final line (the conventional
    /// trailing newline) is not reported.
    ///
    /// # Errors
    ///
    /// Only IO failures abort the read; parse failures never do.
    pub async fn read_all_resilient<T: DeserializeOwned>(
        &mut self,
    ) -> Result<(Vec<T>, Vec<Warning>)> {
        let mut records = Vec::new();
        let mut warnings = Vec::new();
        let mut pending_blank: Option<usize> = None;

        while let Some(line) = self.next_line().await? {
            // Only report a blank line once we know it wasn't the last one.
            if let Some(blank_line) = pending_blank.take() {
                warnings.push(Warning::SkippedLine {
                    line_number: blank_line,
                    reason: "blank line".to_string(),
                });
            }

            if line.trim().is_empty() {
                pending_blank = Some(self.line_number);
                continue;
            }

            match serde_json::from_str(&line) {
                Ok(record) => records.push(record),
                Err(e) => {
                    warn!(line_number = self.line_number, error = %e, "skipping malformed JSONL line");
                    warnings.push(Warning::MalformedJson {
                        line_number: self.line_number,
                        error: e.to_string(),
                    });
                }
            }
        }

        Ok((records, warnings))
    }
}

/// Reads all records from a JSONL file, failing on the first malformed line.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or any line fails to parse.
pub async fn read_jsonl<T, P>(path: P) -> Result<Vec<T>>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    JsonlReader::new(file).read_all().await
}

/// Reads all records from a JSONL file, skipping malformed lines.
///
/// Returns the successfully parsed records together with a [`Warning`] for
/// every line that had to be skipped. Callers should surface the warnings
/// to users, as they indicate data corruption that may need manual repair.
///
/// # Errors
///
/// Returns an error only if the file cannot be opened or read.
///
/// # Examples
///
/// ```no_run
/// use trellis_jsonl::read_jsonl_resilient;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let (records, warnings) =
///     read_jsonl_resilient::<serde_json::Value, _>("features.jsonl").await?;
/// for warning in &warnings {
///     eprintln!("{}", warning.description());
/// }
/// println!("loaded {} records", records.len());
/// # Ok(())
/// # }
/// ```
pub async fn read_jsonl_resilient<T, P>(path: P) -> Result<(Vec<T>, Vec<Warning>)>
where
    T: DeserializeOwned,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref()).await?;
    JsonlReader::new(file).read_all_resilient().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Cursor;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Record {
        id: u32,
        name: String,
    }

    #[tokio::test]
    async fn read_all_parses_every_line() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"a\"}\n{\"id\":2,\"name\":\"b\"}\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let records: Vec<Record> = reader.read_all().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, 1);
        assert_eq!(records[1].name, "b");
        assert_eq!(reader.line_number(), 2);
    }

    #[tokio::test]
    async fn read_all_fails_on_malformed_line() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"a\"}\nnot json\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let result: Result<Vec<Record>> = reader.read_all().await;
        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn resilient_read_skips_malformed_lines() {
        let data = Cursor::new(
            b"{\"id\":1,\"name\":\"a\"}\ngarbage\n{\"id\":3,\"name\":\"c\"}\n".to_vec(),
        );
        let mut reader = JsonlReader::new(data);

        let (records, warnings): (Vec<Record>, _) = reader.read_all_resilient().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].id, 3);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].line_number(), 2);
        assert_eq!(warnings[0].kind(), "malformed_json");
    }

    #[tokio::test]
    async fn resilient_read_reports_interior_blank_lines() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"a\"}\n\n{\"id\":2,\"name\":\"b\"}\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let (records, warnings): (Vec<Record>, _) = reader.read_all_resilient().await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].kind(), "skipped_line");
        assert_eq!(warnings[0].line_number(), 2);
    }

    #[tokio::test]
    async fn resilient_read_ignores_trailing_blank_line() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"a\"}\n\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let (records, warnings): (Vec<Record>, _) = reader.read_all_resilient().await.unwrap();
        assert_eq!(records.len(), 1);
        assert!(warnings.is_empty());
    }

    #[tokio::test]
    async fn empty_input_yields_no_records() {
        let data = Cursor::new(Vec::new());
        let mut reader = JsonlReader::new(data);

        let records: Vec<Record> = reader.read_all().await.unwrap();
        assert!(records.is_empty());
        assert_eq!(reader.line_number(), 0);
    }

    #[tokio::test]
    async fn crlf_line_endings_are_stripped() {
        let data = Cursor::new(b"{\"id\":1,\"name\":\"a\"}\r\n".to_vec());
        let mut reader = JsonlReader::new(data);

        let records: Vec<Record> = reader.read_all().await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "a");
    }
}
