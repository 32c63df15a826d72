use crate::error::{DatabaseError, DatabaseResult};
use async_trait::async_trait;
use serde_json::{Map, Value};
use uuid::Uuid;

pub mod collections {
    pub const EXERCISES: &str = "ejercicios_futsal";
    pub const MATCHES: &str = scoring::MATCHES_COLLECTION;
    pub const ROSTERS: &str = "plantillas";
    pub const USERS: &str = scoring::USERS_COLLECTION;
    pub const FAVORITES: &str = "favoritos";
}

/// Document database collaborator. Documents are JSON objects addressed by
/// collection name and id; there is no cross-document transaction.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    fn backend_tag(&self) -> &'static str;

    async fn get(&self, collection: &str, id: &str) -> DatabaseResult<Option<Value>>;

    async fn set(&self, collection: &str, id: &str, document: Value) -> DatabaseResult<()>;

    /// Shallow merge of top-level fields into an existing document.
    async fn update(&self, collection: &str, id: &str, fields: Map<String, Value>) -> DatabaseResult<()>;

    async fn delete(&self, collection: &str, id: &str) -> DatabaseResult<bool>;

    async fn list(&self, collection: &str) -> DatabaseResult<Vec<(String, Value)>>;

    async fn insert(&self, collection: &str, document: Value) -> DatabaseResult<String> {
        let id = Uuid::new_v4().to_string();
        self.set(collection, &id, document).await?;
        Ok(id)
    }

    async fn query_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &Value,
    ) -> DatabaseResult<Vec<(String, Value)>> {
        Ok(self
            .list(collection)
            .await?
            .into_iter()
            .filter(|(_, document)| document.get(field) == Some(value))
            .collect())
    }
}

pub(crate) fn ensure_object(document: &Value) -> DatabaseResult<()> {
    if document.is_object() {
        Ok(())
    } else {
        Err(DatabaseError::InvalidDocument)
    }
}

pub(crate) fn merge_fields(document: &mut Value, fields: Map<String, Value>) -> DatabaseResult<()> {
    let target = document.as_object_mut().ok_or(DatabaseError::InvalidDocument)?;

    for (key, value) in fields {
        target.insert(key, value);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_merge_replaces_only_given_fields() {
        let mut document = json!({ "a": 1, "b": { "x": 1 } });
        let mut fields = Map::new();
        fields.insert("b".to_string(), json!({ "y": 2 }));
        fields.insert("c".to_string(), json!(true));

        merge_fields(&mut document, fields).unwrap();

        assert_eq!(document, json!({ "a": 1, "b": { "y": 2 }, "c": true }));
    }

    #[test]
    fn test_merge_into_non_object_fails() {
        let mut document = json!([1, 2]);

        assert!(matches!(
            merge_fields(&mut document, Map::new()),
            Err(DatabaseError::InvalidDocument)
        ));
        assert!(ensure_object(&json!("text")).is_err());
    }
}
