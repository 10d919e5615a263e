//! JSONL writing operations.
//!
//! This module provides async functionality for writing data in JSONL
//! format with buffering. Each serialized value occupies exactly one line.

use serde::Serialize;
use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use crate::error::Result;

/// Async writer for JSONL (JSON Lines) data.
///
/// `JsonlWriter` wraps an async writer and provides buffered writing of
/// JSONL formatted data. Each JSON value is serialized to a single line
/// followed by a newline character.
///
/// # Examples
///
/// ```no_run
/// use trellis_jsonl::JsonlWriter;
/// use tokio::fs::File;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let file = File::create("output.jsonl").await?;
/// let mut writer = JsonlWriter::new(file);
/// writer.write(&serde_json::json!({"id": 1})).await?;
/// writer.flush().await?;
/// # Ok(())
/// # }
/// ```
pub struct JsonlWriter<W> {
    /// Buffered writer wrapping the underlying async writer.
    writer: BufWriter<W>,
}

impl<W: AsyncWrite + Unpin> JsonlWriter<W> {
    /// Creates a new `JsonlWriter` wrapping the given async writer.
    #[must_use]
    pub fn new(writer: W) -> Self {
        Self {
            writer: BufWriter::new(writer),
        }
    }

    /// Creates a new `JsonlWriter` with a custom buffer capacity.
    #[must_use]
    pub fn with_capacity(writer: W, capacity: usize) -> Self {
        Self {
            writer: BufWriter::with_capacity(capacity, writer),
        }
    }

    /// Serializes a single value and writes it as one JSONL line.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails or the write fails.
    pub async fn write<T: Serialize>(&mut self, value: &T) -> Result<()> {
        let json = serde_json::to_string(value)?;
        self.writer.write_all(json.as_bytes()).await?;
        self.writer.write_all(b"\n").await?;
        Ok(())
    }

    /// Serializes and writes every value from the iterator, one per line.
    ///
    /// # Errors
    ///
    /// Returns an error on the first value that fails to serialize or write.
    pub async fn write_all<T, I>(&mut self, values: I) -> Result<()>
    where
        T: Serialize,
        I: IntoIterator<Item = T>,
    {
        for value in values {
            self.write(&value).await?;
        }
        Ok(())
    }

    /// Flushes buffered data to the underlying writer.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub async fn flush(&mut self) -> Result<()> {
        self.writer.flush().await?;
        Ok(())
    }

    /// Consumes the writer, returning the underlying buffered writer.
    ///
    /// Note: this does not flush. Call [`flush`](Self::flush) first to
    /// ensure all data is written.
    #[must_use]
    pub fn into_inner(self) -> BufWriter<W> {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Serialize;
    use std::io::Cursor;

    #[derive(Serialize)]
    struct Record {
        id: u32,
    }

    #[tokio::test]
    async fn write_emits_one_line_per_value() {
        let buffer = Cursor::new(Vec::new());
        let mut writer = JsonlWriter::new(buffer);

        writer
            .write_all(vec![Record { id: 1 }, Record { id: 2 }])
            .await
            .unwrap();
        writer.flush().await.unwrap();

        let bytes = writer.into_inner().into_inner().into_inner();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "{\"id\":1}\n{\"id\":2}\n");
    }

    #[tokio::test]
    async fn empty_iterator_writes_nothing() {
        let buffer = Cursor::new(Vec::new());
        let mut writer = JsonlWriter::new(buffer);

        writer.write_all(Vec::<Record>::new()).await.unwrap();
        writer.flush().await.unwrap();

        let bytes = writer.into_inner().into_inner().into_inner();
        assert!(bytes.is_empty());
    }
}
