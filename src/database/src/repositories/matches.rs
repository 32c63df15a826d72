use crate::error::{DatabaseError, DatabaseResult};
use crate::store::{collections, DocumentStore};
use log::{debug, info, warn};
use scoring::MatchDocument;
use serde_json::{Map, Value};
use std::sync::Arc;

#[derive(Clone)]
pub struct MatchRepository {
    store: Arc<dyn DocumentStore>,
}

impl MatchRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        MatchRepository { store }
    }

    pub async fn create(&self, document: &MatchDocument) -> DatabaseResult<String> {
        let id = self
            .store
            .insert(collections::MATCHES, serde_json::to_value(document)?)
            .await?;

        info!("match {} created for {}", id, document.owner_id);

        Ok(id)
    }

    pub async fn get(&self, id: &str) -> DatabaseResult<Option<MatchDocument>> {
        match self.store.get(collections::MATCHES, id).await? {
            Some(value) => Ok(Some(MatchDocument::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn get_required(&self, id: &str) -> DatabaseResult<MatchDocument> {
        self.get(id)
            .await?
            .ok_or_else(|| DatabaseError::not_found(collections::MATCHES, id))
    }

    /// Partial write: only the given top-level fields are replaced.
    pub async fn update(&self, id: &str, fields: Map<String, Value>) -> DatabaseResult<()> {
        debug!("match {}: updating {} field(s)", id, fields.len());
        self.store.update(collections::MATCHES, id, fields).await
    }

    pub async fn delete(&self, id: &str) -> DatabaseResult<bool> {
        self.store.delete(collections::MATCHES, id).await
    }

    /// Documents that no longer parse are skipped so the rest stay listed.
    pub async fn list_by_owner(&self, owner_id: &str) -> DatabaseResult<Vec<(String, MatchDocument)>> {
        let documents = self
            .store
            .query_by_field(collections::MATCHES, "ownerId", &Value::from(owner_id))
            .await?
            .into_iter()
            .filter_map(|(id, value)| match MatchDocument::from_value(value) {
                Ok(document) => Some((id, document)),
                Err(e) => {
                    warn!("match {}: skipping unreadable document: {}", id, e);
                    None
                }
            })
            .collect();

        Ok(documents)
    }
}
