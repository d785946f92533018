//! Integration tests for the JSON file profile store.

mod common;

use app_lib::adapters::storage::JsonFileStore;
use chefsync_core::ports::ProfileStore;

use common::profile;

#[tokio::test]
async fn profiles_round_trip_through_the_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profiles.json");
    let store = JsonFileStore::new(path);

    let saved = vec![profile("Asha"), profile("Ravi")];
    store.save_all(&saved).await.expect("save succeeds");

    let loaded = store.load_all().await.expect("load succeeds");
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, saved[0].id);
    assert_eq!(loaded[1].name, "Ravi");
    assert_eq!(loaded[0].pantry.veg, saved[0].pantry.veg);
}

#[tokio::test]
async fn missing_file_reads_as_an_empty_store() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonFileStore::new(dir.path().join("never-written.json"));

    let loaded = store.load_all().await.expect("load succeeds");
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn corrupted_blob_reads_as_empty_rather_than_failing() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profiles.json");
    std::fs::write(&path, b"{ not json at all").expect("seed corrupt file");

    let store = JsonFileStore::new(path);
    let loaded = store.load_all().await.expect("corruption is absorbed");
    assert!(loaded.is_empty());
}

#[tokio::test]
async fn save_replaces_the_blob_without_leaving_a_scratch_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profiles.json");
    let store = JsonFileStore::new(path.clone());

    store
        .save_all(&[profile("Asha"), profile("Ravi")])
        .await
        .expect("first save succeeds");
    store
        .save_all(&[profile("Meera")])
        .await
        .expect("second save succeeds");

    let loaded = store.load_all().await.expect("load succeeds");
    assert_eq!(loaded.len(), 1);
    assert_eq!(loaded[0].name, "Meera");
    assert!(!path.with_extension("json.tmp").exists());
}

#[tokio::test]
async fn save_creates_missing_parent_directories() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("nested").join("deeper").join("profiles.json");
    let store = JsonFileStore::new(path);

    store.save_all(&[profile("Asha")]).await.expect("save succeeds");
    let loaded = store.load_all().await.expect("load succeeds");
    assert_eq!(loaded.len(), 1);
}
