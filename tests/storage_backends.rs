use std::fs;

use doc_versions::storage::json::DEFAULT_KEY;
use doc_versions::storage::{FileStore, JsonStorage, KeyValueStore, MemoryStore, StorageError, StoragePort};
use tempfile::tempdir;

#[test]
fn memory_rejected_write_leaves_previous_value() {
    let mut store = MemoryStore::new();
    store.set("documents", "{}").unwrap();
    store.fail_writes(true);

    assert!(matches!(
        store.set("documents", "[]"),
        Err(StorageError::WriteRejected(_))
    ));
    assert_eq!(store.get("documents").unwrap().as_deref(), Some("{}"));
}

#[test]
fn file_missing_key_reads_as_none() {
    let dir = tempdir().unwrap();
    let store = FileStore::new(dir.path()).unwrap();
    assert_eq!(store.get("documents").unwrap(), None);
}

#[test]
fn file_set_replaces_value_without_leaving_temp_file() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    store.set("documents", "{\"a\":1}").unwrap();
    store.set("documents", "{}").unwrap();

    assert_eq!(store.get("documents").unwrap().as_deref(), Some("{}"));
    assert!(!dir.path().join("documents.json.tmp").exists());
}

#[cfg(unix)]
#[test]
fn file_failed_set_removes_temp_file() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();

    // A non-empty directory at the target path makes the final rename fail.
    let blocker = dir.path().join("documents.json");
    fs::create_dir(&blocker).unwrap();
    fs::write(blocker.join("keep"), "x").unwrap();

    assert!(matches!(
        store.set("documents", "{}"),
        Err(StorageError::Io(_))
    ));
    assert!(!dir.path().join("documents.json.tmp").exists());
    assert!(blocker.join("keep").exists());
}

#[test]
fn file_path_like_keys_are_rejected() {
    let dir = tempdir().unwrap();
    let mut store = FileStore::new(dir.path()).unwrap();
    for key in ["", "../escape", "a/b", ".hidden"] {
        assert!(matches!(store.get(key), Err(StorageError::InvalidKey(_))));
        assert!(matches!(store.set(key, "{}"), Err(StorageError::InvalidKey(_))));
    }
}

#[test]
fn json_garbage_loads_as_empty_and_is_left_in_place() {
    let mut backend = MemoryStore::new();
    backend.set(DEFAULT_KEY, "{not json").unwrap();
    let storage = JsonStorage::new(backend);

    assert!(storage.load().unwrap().is_empty());
    assert_eq!(
        storage.backend().get(DEFAULT_KEY).unwrap().as_deref(),
        Some("{not json")
    );
}

#[test]
fn json_wrong_shape_loads_as_empty() {
    let mut backend = MemoryStore::new();
    backend.set(DEFAULT_KEY, "[1, 2, 3]").unwrap();
    assert!(JsonStorage::new(backend).load().unwrap().is_empty());
}
