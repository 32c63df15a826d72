use crate::error::DatabaseResult;
use crate::store::{collections, DocumentStore};
use log::debug;
use scoring::{UserDocument, UserSession};
use std::sync::Arc;

#[derive(Clone)]
pub struct UserRepository {
    store: Arc<dyn DocumentStore>,
}

impl UserRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        UserRepository { store }
    }

    pub async fn get(&self, user_id: &str) -> DatabaseResult<Option<UserDocument>> {
        match self.store.get(collections::USERS, user_id).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    pub async fn put(&self, user_id: &str, document: &UserDocument) -> DatabaseResult<()> {
        self.store
            .set(collections::USERS, user_id, serde_json::to_value(document)?)
            .await
    }

    /// Builds a session with entitlements read fresh from the store. Unknown
    /// users get a session without entitlements.
    pub async fn load_session(&self, user_id: &str) -> DatabaseResult<UserSession> {
        match self.get(user_id).await? {
            Some(document) => Ok(UserSession::from_document(user_id, &document)),
            None => {
                debug!("no user document for {}", user_id);
                Ok(UserSession::anonymous(user_id))
            }
        }
    }
}
