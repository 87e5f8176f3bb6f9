use vcs_fs::{Error, FileStore, Flush, MemoryStore, Store, StoreExt, StoreKey};
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde::{Deserialize, Serialize};
use std::fs;
use std::sync::Arc;
use tempfile::TempDir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Entry {
    id: String,
    remote: u64,
}

const ENTRIES: StoreKey<Vec<Entry>> = StoreKey::new("store_tests::Owner.entries");
const COUNTER: StoreKey<u64> = StoreKey::new("store_tests::Owner.counter");

fn sample() -> Vec<Entry> {
    vec![
        Entry { id: "1".into(), remote: 10 },
        Entry { id: "2".into(), remote: 20 },
    ]
}

#[test]
fn test_file_store_missing_file_is_empty() {
    let temp = TempDir::new().unwrap();
    let store = FileStore::open(temp.path().join("store.json")).unwrap();

    assert_eq!(store.get(&ENTRIES).unwrap(), None);
    assert_eq!(store.get(&COUNTER).unwrap(), None);
}

#[test]
fn test_file_store_empty_file_is_empty() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    fs::write(&path, "").unwrap();

    let store = FileStore::open(&path).unwrap();
    assert_eq!(store.get(&COUNTER).unwrap(), None);
}

#[test]
fn test_file_store_survives_reopen() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");

    let store = FileStore::open(&path).unwrap();
    store.put(&ENTRIES, &sample(), Flush::Immediate).unwrap();
    store.put(&COUNTER, &2, Flush::Immediate).unwrap();
    drop(store);

    let reopened = FileStore::open(&path).unwrap();
    assert_eq!(reopened.get(&ENTRIES).unwrap(), Some(sample()));
    assert_eq!(reopened.get(&COUNTER).unwrap(), Some(2));
}

#[test]
fn test_file_store_keys_are_qualified_names() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");

    let store = FileStore::open(&path).unwrap();
    store.put(&COUNTER, &5, Flush::Immediate).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw["store_tests::Owner.counter"], serde_json::json!(5));
}

#[test]
fn test_file_store_rejects_invalid_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("store.json");
    fs::write(&path, "{ not json").unwrap();

    let err = FileStore::open(&path).unwrap_err();
    assert!(matches!(err, Error::StoreCorrupt { .. }), "got {err}");
}

#[rstest]
#[case::immediate(Flush::Immediate, 1)]
#[case::deferred(Flush::Deferred, 0)]
fn test_memory_store_counts_durable_writes(#[case] flush: Flush, #[case] expected: usize) {
    let store = MemoryStore::new();
    store.put(&COUNTER, &1, flush).unwrap();
    assert_eq!(store.durable_writes(), expected);
}

#[test]
fn test_memory_store_shared_between_handles() {
    let store = Arc::new(MemoryStore::new());
    let writer: Arc<dyn Store> = store.clone();
    writer.put(&ENTRIES, &sample(), Flush::Deferred).unwrap();

    assert!(store.pending_keys().contains(&ENTRIES.name().to_string()));
    assert_eq!(store.get(&ENTRIES).unwrap(), Some(sample()));
}
