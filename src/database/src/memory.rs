use crate::error::{DatabaseError, DatabaseResult};
use crate::store::{ensure_object, merge_fields, DocumentStore};
use async_trait::async_trait;
use log::debug;
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tokio::sync::Mutex;

/// Process-local store. Also used in tests, where writes can be counted and
/// made to fail on demand.
#[derive(Default)]
pub struct InMemoryStore {
    collections: Mutex<HashMap<String, BTreeMap<String, Value>>>,
    writes: AtomicU64,
    fail_writes: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_count(&self) -> u64 {
        self.writes.load(Ordering::SeqCst)
    }

    pub fn fail_writes(&self, enabled: bool) {
        self.fail_writes.store(enabled, Ordering::SeqCst);
    }

    fn begin_write(&self, collection: &str, id: &str) -> DatabaseResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            debug!("rejecting write to {}/{}", collection, id);
            return Err(DatabaseError::Unavailable("writes disabled".to_string()));
        }

        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    fn backend_tag(&self) -> &'static str {
        "memory"
    }

    async fn get(&self, collection: &str, id: &str) -> DatabaseResult<Option<Value>> {
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    async fn set(&self, collection: &str, id: &str, document: Value) -> DatabaseResult<()> {
        ensure_object(&document)?;
        self.begin_write(collection, id)?;

        self.collections
            .lock()
            .await
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);

        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> DatabaseResult<()> {
        let mut collections = self.collections.lock().await;

        let document = collections
            .get_mut(collection)
            .and_then(|documents| documents.get_mut(id))
            .ok_or_else(|| DatabaseError::not_found(collection, id))?;

        self.begin_write(collection, id)?;
        merge_fields(document, fields)
    }

    async fn delete(&self, collection: &str, id: &str) -> DatabaseResult<bool> {
        self.begin_write(collection, id)?;

        Ok(self
            .collections
            .lock()
            .await
            .get_mut(collection)
            .and_then(|documents| documents.remove(id))
            .is_some())
    }

    async fn list(&self, collection: &str) -> DatabaseResult<Vec<(String, Value)>> {
        Ok(self
            .collections
            .lock()
            .await
            .get(collection)
            .map(|documents| {
                documents
                    .iter()
                    .map(|(id, document)| (id.clone(), document.clone()))
                    .collect()
            })
            .unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_set_get_delete() {
        let store = InMemoryStore::new();

        store.set("c", "1", json!({ "a": 1 })).await.unwrap();

        assert_eq!(store.get("c", "1").await.unwrap(), Some(json!({ "a": 1 })));
        assert!(store.delete("c", "1").await.unwrap());
        assert!(!store.delete("c", "1").await.unwrap());
        assert_eq!(store.get("c", "1").await.unwrap(), None);
        assert_eq!(store.write_count(), 3);
    }

    #[tokio::test]
    async fn test_update_missing_document_is_not_found() {
        let store = InMemoryStore::new();

        let result = store.update("c", "missing", Map::new()).await;

        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
        assert_eq!(store.write_count(), 0);
    }

    #[tokio::test]
    async fn test_update_merges_top_level() {
        let store = InMemoryStore::new();
        store.set("c", "1", json!({ "a": 1, "b": 2 })).await.unwrap();

        let mut fields = Map::new();
        fields.insert("b".to_string(), json!(3));
        store.update("c", "1", fields).await.unwrap();

        assert_eq!(store.get("c", "1").await.unwrap(), Some(json!({ "a": 1, "b": 3 })));
    }

    #[tokio::test]
    async fn test_failed_writes_are_not_counted() {
        let store = InMemoryStore::new();
        store.fail_writes(true);

        assert!(store.set("c", "1", json!({})).await.is_err());
        assert_eq!(store.write_count(), 0);

        store.fail_writes(false);
        assert!(store.set("c", "1", json!({})).await.is_ok());
    }

    #[tokio::test]
    async fn test_query_by_field_and_insert() {
        let store = InMemoryStore::new();
        let first = store.insert("m", json!({ "ownerId": "a" })).await.unwrap();
        store.insert("m", json!({ "ownerId": "b" })).await.unwrap();

        let found = store.query_by_field("m", "ownerId", &json!("a")).await.unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].0, first);
    }

    #[tokio::test]
    async fn test_non_object_documents_rejected() {
        let store = InMemoryStore::new();

        assert!(matches!(
            store.set("c", "1", json!(42)).await,
            Err(DatabaseError::InvalidDocument)
        ));
    }
}
