//! Integration tests for JSONL persistence: round-trip safety, resilient
//! loading, and exact validation errors for damaged feature lists.

mod common;

use std::io::Write;

use common::{id_strs, ids, new_feature};
use tempfile::tempdir;
use trellis::domain::{FeatureId, FeatureStatus};
use trellis::error::{Error, ValidationError};
use trellis::store::in_memory::{load_from_jsonl, new_in_memory_store, save_to_jsonl};
use trellis::store::{create_store, FeatureStore, StoreBackend};

#[tokio::test]
async fn save_and_load_round_trip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("features.jsonl");

    let mut store = new_in_memory_store();
    store.add_feature(new_feature("auth", 1, &[])).await.unwrap();
    store
        .add_feature(new_feature("sessions", 2, &["auth"]))
        .await
        .unwrap();
    store
        .set_status(&FeatureId::new("auth"), FeatureStatus::Complete)
        .await
        .unwrap();

    save_to_jsonl(store.as_ref(), &path).await.unwrap();

    let (loaded, warnings) = load_from_jsonl(&path).await.unwrap();
    assert!(warnings.is_empty());
    assert_eq!(loaded.export_all().await.unwrap(), store.export_all().await.unwrap());
    assert_eq!(ids(&loaded.ready().await.unwrap()), vec!["sessions"]);
}

#[tokio::test]
async fn unknown_fields_survive_load_and_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("features.jsonl");

    std::fs::write(
        &path,
        concat!(
            "{\"id\":\"f1\",\"priority\":1,\"dependencies\":[],\"status\":\"pending\",",
            "\"passes\":true,\"owner\":{\"team\":\"core\"}}\n",
        ),
    )
    .unwrap();

    let (store, warnings) = load_from_jsonl(&path).await.unwrap();
    assert!(warnings.is_empty());

    let out = dir.path().join("rewritten.jsonl");
    save_to_jsonl(store.as_ref(), &out).await.unwrap();

    let text = std::fs::read_to_string(&out).unwrap();
    let value: serde_json::Value = serde_json::from_str(text.lines().next().unwrap()).unwrap();
    assert_eq!(value["passes"], serde_json::json!(true));
    assert_eq!(value["owner"]["team"], serde_json::json!("core"));
}

#[tokio::test]
async fn malformed_lines_are_skipped_with_warnings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("features.jsonl");

    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(file, "{{\"id\":\"f1\"}}").unwrap();
    writeln!(file, "this line is garbage").unwrap();
    writeln!(file, "{{\"id\":\"f2\",\"dependencies\":[\"f1\"]}}").unwrap();
    drop(file);

    let (store, warnings) = load_from_jsonl(&path).await.unwrap();

    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].line_number(), 2);

    let exported = store.export_all().await.unwrap();
    assert_eq!(ids(&exported), vec!["f1", "f2"]);
}

#[tokio::test]
async fn dangling_reference_in_file_fails_with_exact_ids() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("features.jsonl");

    std::fs::write(&path, "{\"id\":\"f2\",\"dependencies\":[\"f9\"]}\n").unwrap();

    let err = load_from_jsonl(&path).await.unwrap_err();
    match err {
        Error::Validation(ValidationError::UnknownDependency { feature, dependency }) => {
            assert_eq!(feature.as_str(), "f2");
            assert_eq!(dependency.as_str(), "f9");
        }
        other => panic!("expected UnknownDependency, got {other:?}"),
    }
}

#[tokio::test]
async fn cyclic_file_loads_and_reports_cycles() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("features.jsonl");

    std::fs::write(
        &path,
        concat!(
            "{\"id\":\"F1\",\"dependencies\":[\"F2\"]}\n",
            "{\"id\":\"F2\",\"dependencies\":[\"F3\"]}\n",
            "{\"id\":\"F3\",\"dependencies\":[\"F1\"]}\n",
        ),
    )
    .unwrap();

    let (store, _) = load_from_jsonl(&path).await.unwrap();

    assert!(store.has_cycle().await.unwrap());
    let cycles = store.find_cycles().await.unwrap();
    assert_eq!(cycles.len(), 1);
    assert_eq!(id_strs(&cycles[0]), vec!["F1", "F2", "F3"]);
    assert!(matches!(
        store.sequential_plan(None).await,
        Err(Error::Cycle(_))
    ));
}

#[tokio::test]
async fn repeated_saves_are_byte_identical() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("features.jsonl");

    let mut store = new_in_memory_store();
    store.add_feature(new_feature("b", 2, &[])).await.unwrap();
    store.add_feature(new_feature("a", 1, &["b"])).await.unwrap();

    save_to_jsonl(store.as_ref(), &path).await.unwrap();
    let first = std::fs::read(&path).unwrap();

    save_to_jsonl(store.as_ref(), &path).await.unwrap();
    let second = std::fs::read(&path).unwrap();

    assert_eq!(first, second);
}

#[tokio::test]
async fn jsonl_backed_store_persists_through_save() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("features.jsonl");

    let mut store = create_store(StoreBackend::Jsonl(path.clone())).await.unwrap();
    store.add_feature(new_feature("auth", 1, &[])).await.unwrap();
    store.save().await.unwrap();

    let reopened = create_store(StoreBackend::Jsonl(path)).await.unwrap();
    let feature = reopened.get(&FeatureId::new("auth")).await.unwrap();
    assert!(feature.is_some());
    assert_eq!(feature.unwrap().priority, 1);
}

#[tokio::test]
async fn missing_file_starts_empty() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("never-created.jsonl");

    let store = create_store(StoreBackend::Jsonl(path)).await.unwrap();
    assert!(store.export_all().await.unwrap().is_empty());
}
