use doc_versions::document::{DocumentId, DocumentUpdate};
use doc_versions::storage::{JsonStorage, MemoryStore};
use doc_versions::store::{DocumentVersionStore, StoreConfig, VersionChange};

fn open_store() -> DocumentVersionStore<JsonStorage<MemoryStore>> {
    DocumentVersionStore::open(JsonStorage::new(MemoryStore::new()), StoreConfig::default())
        .unwrap()
}

#[test]
fn unchanged_content_creates_no_version() {
    let mut store = open_store();
    let doc = store.create_document("A", "same", None, Vec::<String>::new()).unwrap();

    let change = store
        .create_version_if_changed(doc.id(), "same", Some("noop"))
        .unwrap()
        .unwrap();

    assert!(matches!(change, VersionChange::Unchanged(ref v) if v.version() == 1));
    assert_eq!(store.get_versions(doc.id()).len(), 1);
    assert_eq!(store.get_document(doc.id()).unwrap(), doc);
}

#[test]
fn changed_content_creates_version() {
    let mut store = open_store();
    let doc = store.create_document("A", "one", None, Vec::<String>::new()).unwrap();

    let change = store
        .create_version_if_changed(doc.id(), "two", None)
        .unwrap()
        .unwrap();

    assert!(change.is_created());
    assert_eq!(change.version().version(), 2);
    assert_eq!(change.version().comment(), "Versão 2");
}

#[test]
fn comparison_uses_the_current_version_after_restore() {
    let mut store = open_store();
    let doc = store.create_document("A", "one", None, Vec::<String>::new()).unwrap();
    let first = doc.current_version_id().clone();
    store.create_version(doc.id(), "two", None).unwrap();
    store.restore_version(doc.id(), &first).unwrap();

    let same_as_restored = store
        .create_version_if_changed(doc.id(), "one", None)
        .unwrap()
        .unwrap();
    assert!(!same_as_restored.is_created());

    let same_as_latest = store
        .create_version_if_changed(doc.id(), "two", None)
        .unwrap()
        .unwrap();
    assert!(same_as_latest.is_created());
    assert_eq!(same_as_latest.version().version(), 3);
}

#[test]
fn plain_create_version_does_not_skip_identical_content() {
    let mut store = open_store();
    let doc = store.create_document("A", "same", None, Vec::<String>::new()).unwrap();
    let v2 = store.create_version(doc.id(), "same", None).unwrap().unwrap();
    assert_eq!(v2.version(), 2);
}

#[test]
fn save_document_updates_metadata_and_versions_together() {
    let mut store = open_store();
    let doc = store.create_document("Draft", "one", None, ["iso"]).unwrap();

    let saved = store
        .save_document(
            doc.id(),
            DocumentUpdate::new().title("Final").tags(["iso", "lgpd"]),
            "two",
            Some("review"),
        )
        .unwrap()
        .unwrap();

    assert_eq!(saved.document.title(), "Final");
    assert_eq!(saved.document.tags().len(), 2);
    assert!(saved.change.is_created());
    assert_eq!(saved.change.version().comment(), "review");
    assert_eq!(saved.document.current_version_id(), saved.change.version().id());
    assert_eq!(store.get_document(doc.id()).unwrap(), saved.document);
}

#[test]
fn save_document_with_same_content_only_updates_metadata() {
    let mut store = open_store();
    let doc = store.create_document("Draft", "one", None, Vec::<String>::new()).unwrap();

    let saved = store
        .save_document(doc.id(), DocumentUpdate::new().title("Renamed"), "one", None)
        .unwrap()
        .unwrap();

    assert!(!saved.change.is_created());
    assert_eq!(saved.document.title(), "Renamed");
    assert_eq!(saved.document.versions().len(), 1);
}

#[test]
fn save_on_unknown_document_is_not_found() {
    let mut store = open_store();
    let missing = DocumentId::from("missing");
    assert!(store
        .create_version_if_changed(&missing, "x", None)
        .unwrap()
        .is_none());
    assert!(store
        .save_document(&missing, DocumentUpdate::new(), "x", None)
        .unwrap()
        .is_none());
    assert!(store.is_empty());
}
