//! Integration tests for read/write round-trip operations.
//!
//! These tests verify that data written with JsonlWriter can be correctly
//! read back with JsonlReader, ensuring consistency across the full I/O
//! cycle, including through the atomic file writer.

use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use tempfile::tempdir;
use trellis_jsonl::{read_jsonl, write_jsonl_atomic, JsonlReader, JsonlWriter};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct TestRecord {
    id: u32,
    name: String,
    active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct ComplexRecord {
    id: String,
    value: f64,
    tags: Vec<String>,
    metadata: Option<Metadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct Metadata {
    created_by: String,
    version: u32,
}

/// Helper to perform a write-then-read roundtrip in memory.
async fn roundtrip<T>(original: &T) -> T
where
    T: Serialize + for<'de> Deserialize<'de>,
{
    let buffer = Cursor::new(Vec::new());
    let mut writer = JsonlWriter::new(buffer);
    writer.write(original).await.unwrap();
    writer.flush().await.unwrap();

    let data = writer.into_inner().into_inner().into_inner();
    let mut reader = JsonlReader::new(Cursor::new(data));
    let mut records: Vec<T> = reader.read_all().await.unwrap();
    assert_eq!(records.len(), 1);
    records.pop().unwrap()
}

#[rstest]
#[case::simple(TestRecord { id: 1, name: "Alice".to_string(), active: true })]
#[case::special_chars(TestRecord { id: 42, name: "Line1\nLine2\tTabbed\"Quoted\"\\Backslash".to_string(), active: true })]
#[case::unicode(TestRecord { id: 1, name: "Hello, \u{4e16}\u{754c}! \u{1F600} \u{00e9}\u{00e8}".to_string(), active: true })]
#[case::empty_string(TestRecord { id: 1, name: String::new(), active: false })]
#[tokio::test]
async fn roundtrip_test_record(#[case] original: TestRecord) {
    let read_back = roundtrip(&original).await;
    assert_eq!(original, read_back);
}

#[rstest]
#[case::with_metadata(ComplexRecord {
    id: "rec-1".to_string(),
    value: 2.75,
    tags: vec!["a".to_string(), "b".to_string()],
    metadata: Some(Metadata { created_by: "test".to_string(), version: 3 }),
})]
#[case::without_metadata(ComplexRecord {
    id: "rec-2".to_string(),
    value: -0.5,
    tags: vec![],
    metadata: None,
})]
#[tokio::test]
async fn roundtrip_complex_record(#[case] original: ComplexRecord) {
    let read_back = roundtrip(&original).await;
    assert_eq!(original, read_back);
}

#[tokio::test]
async fn roundtrip_many_records_through_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("records.jsonl");

    let records: Vec<TestRecord> = (0..100)
        .map(|i| TestRecord {
            id: i,
            name: format!("record-{i}"),
            active: i % 2 == 0,
        })
        .collect();

    write_jsonl_atomic(&path, &records).await.unwrap();
    let loaded: Vec<TestRecord> = read_jsonl(&path).await.unwrap();

    assert_eq!(loaded, records);
}

#[tokio::test]
async fn unknown_fields_survive_via_value_roundtrip() {
    // Callers that need to preserve fields they don't model read records as
    // serde_json::Value (or flatten extras); the line format itself must not
    // lose anything.
    let dir = tempdir().unwrap();
    let path = dir.path().join("extra.jsonl");

    let original = serde_json::json!({
        "id": "f1",
        "custom_field": {"nested": [1, 2, 3]},
        "passes": true,
    });

    write_jsonl_atomic(&path, std::slice::from_ref(&original))
        .await
        .unwrap();
    let loaded: Vec<serde_json::Value> = read_jsonl(&path).await.unwrap();

    assert_eq!(loaded, vec![original]);
}
