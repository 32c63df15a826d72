use crate::error::DatabaseResult;
use crate::store::{collections, DocumentStore};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FavoritesDocument {
    #[serde(default)]
    exercise_ids: BTreeSet<String>,
}

/// Favorite exercises per user.
#[derive(Clone)]
pub struct FavoritesRepository {
    store: Arc<dyn DocumentStore>,
}

impl FavoritesRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        FavoritesRepository { store }
    }

    pub async fn get(&self, user_id: &str) -> DatabaseResult<BTreeSet<String>> {
        match self.store.get(collections::FAVORITES, user_id).await? {
            Some(value) => Ok(serde_json::from_value::<FavoritesDocument>(value)?.exercise_ids),
            None => Ok(BTreeSet::new()),
        }
    }

    pub async fn put(&self, user_id: &str, exercise_ids: &BTreeSet<String>) -> DatabaseResult<()> {
        let document = FavoritesDocument {
            exercise_ids: exercise_ids.clone(),
        };

        self.store
            .set(collections::FAVORITES, user_id, serde_json::to_value(document)?)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemoryStore;

    #[tokio::test]
    async fn test_favorites_roundtrip() {
        let repository = FavoritesRepository::new(Arc::new(InMemoryStore::new()));
        let favorites: BTreeSet<String> = ["ex-2".to_string(), "ex-1".to_string()].into_iter().collect();

        repository.put("coach-1", &favorites).await.unwrap();

        assert_eq!(repository.get("coach-1").await.unwrap(), favorites);
        assert!(repository.get("coach-2").await.unwrap().is_empty());
    }
}
