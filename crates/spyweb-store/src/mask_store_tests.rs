use super::*;
use crate::storage::{FileStorage, MemoryStorage};
use spyweb_protocols::{ElementKind, MaskSpec, Scope};
use tempfile::TempDir;

fn store() -> MaskStore {
    MaskStore::new(Arc::new(MemoryStorage::new()), "maskedElements")
}

fn record(selector: &str, domain: &str, spec: MaskSpec, scope: Scope) -> MaskRecord {
    MaskRecord::new(selector, domain, spec, ElementKind::Generic, scope)
}

#[tokio::test]
async fn test_empty_store() {
    let store = store();
    assert!(store.all().await.unwrap().is_empty());
    assert!(store.load("a.com").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_add_then_same_selector_updates() {
    let store = store();
    let first = record("#card", "a.com", MaskSpec::default(), Scope::Current);
    let second = record("#card", "a.com", MaskSpec::blur(), Scope::Current);

    assert_eq!(store.add("a.com", first.clone()).await.unwrap(), AddOutcome::Inserted);
    assert_eq!(
        store.add("a.com", second.clone()).await.unwrap(),
        AddOutcome::Updated { previous: first }
    );

    let records = store.records_for("a.com").await.unwrap();
    assert_eq!(records, vec![second]);
}

#[tokio::test]
async fn test_update_keeps_position_and_inserts_missing() {
    let store = store();
    store.add("a.com", record("#one", "a.com", MaskSpec::default(), Scope::Current)).await.unwrap();
    store.add("a.com", record("#two", "a.com", MaskSpec::default(), Scope::Current)).await.unwrap();

    let previous = store
        .update("a.com", "#one", record("#one", "a.com", MaskSpec::blur(), Scope::Current))
        .await
        .unwrap();
    assert!(previous.is_some());

    let records = store.records_for("a.com").await.unwrap();
    assert_eq!(records[0].selector, "#one");
    assert_eq!(records[0].mask_spec, MaskSpec::blur());

    let previous = store
        .update("a.com", "#three", record("#three", "a.com", MaskSpec::blur(), Scope::Current))
        .await
        .unwrap();
    assert!(previous.is_none());
    assert_eq!(store.records_for("a.com").await.unwrap().len(), 3);
}

#[tokio::test]
async fn test_load_merges_global_records() {
    let store = store();
    store.add("a.com", record("#local", "a.com", MaskSpec::default(), Scope::Current)).await.unwrap();
    store.add("b.com", record("#other", "b.com", MaskSpec::default(), Scope::Current)).await.unwrap();
    store.add("b.com", record(".ad", "b.com", MaskSpec::default(), Scope::All)).await.unwrap();

    let selectors: Vec<String> = store
        .load("a.com")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.selector)
        .collect();
    assert_eq!(selectors, vec!["#local", ".ad"]);

    // A domain's own global records are not duplicated.
    assert_eq!(store.load("b.com").await.unwrap().len(), 2);
    assert_eq!(store.load("c.com").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_drops_empty_domain() {
    let store = store();
    store.add("a.com", record("#x", "a.com", MaskSpec::default(), Scope::Current)).await.unwrap();

    assert!(store.remove("a.com", "#missing").await.unwrap().is_none());
    assert!(store.remove("b.com", "#x").await.unwrap().is_none());

    let removed = store.remove("a.com", "#x").await.unwrap();
    assert_eq!(removed.map(|r| r.selector), Some("#x".to_string()));
    assert!(!store.all().await.unwrap().contains_key("a.com"));
}

#[tokio::test]
async fn test_remove_at() {
    let store = store();
    for selector in ["#a", "#b", "#c"] {
        store.add("a.com", record(selector, "a.com", MaskSpec::default(), Scope::Current)).await.unwrap();
    }

    assert!(store.remove_at("a.com", 3).await.unwrap().is_none());
    let removed = store.remove_at("a.com", 1).await.unwrap().unwrap();
    assert_eq!(removed.selector, "#b");

    let selectors: Vec<String> = store
        .records_for("a.com")
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.selector)
        .collect();
    assert_eq!(selectors, vec!["#a", "#c"]);
}

#[tokio::test]
async fn test_clear_domain_and_all() {
    let store = store();
    store.add("a.com", record("#a", "a.com", MaskSpec::default(), Scope::Current)).await.unwrap();
    store.add("a.com", record("#b", "a.com", MaskSpec::default(), Scope::Current)).await.unwrap();
    store.add("b.com", record("#c", "b.com", MaskSpec::default(), Scope::Current)).await.unwrap();

    assert_eq!(store.clear_domain("a.com").await.unwrap(), 2);
    assert_eq!(store.clear_domain("a.com").await.unwrap(), 0);
    assert_eq!(store.all().await.unwrap().len(), 1);

    assert_eq!(store.clear_all().await.unwrap(), 1);
    assert!(store.all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unavailable_storage_propagates() {
    let storage = Arc::new(MemoryStorage::new());
    let store = MaskStore::new(storage.clone(), "maskedElements");
    storage.set_available(false);

    let result = store
        .add("a.com", record("#a", "a.com", MaskSpec::default(), Scope::Current))
        .await;
    assert!(matches!(result, Err(StoreError::Unavailable(_))));
}

#[tokio::test]
async fn test_malformed_collection() {
    let storage = Arc::new(MemoryStorage::new());
    storage
        .set("maskedElements", serde_json::json!({"a.com": "nope"}))
        .await
        .unwrap();
    let store = MaskStore::new(storage, "maskedElements");

    assert!(matches!(store.all().await, Err(StoreError::Serialization(_))));
}

#[tokio::test]
async fn test_file_backed_store_persists() {
    let temp_dir = TempDir::new().unwrap();
    let original = record("div.card > p", "a.com", MaskSpec::inherit(), Scope::All);
    {
        let storage = Arc::new(FileStorage::new(temp_dir.path()).await.unwrap());
        let store = MaskStore::new(storage, "maskedElements");
        store.add("a.com", original.clone()).await.unwrap();
    }

    let storage = Arc::new(FileStorage::new(temp_dir.path()).await.unwrap());
    let store = MaskStore::new(storage, "maskedElements");
    assert_eq!(store.records_for("a.com").await.unwrap(), vec![original]);
}
