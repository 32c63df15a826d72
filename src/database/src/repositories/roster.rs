use crate::error::DatabaseResult;
use crate::store::{collections, DocumentStore};
use scoring::Roster;
use std::sync::Arc;

/// One roster document per user, keyed by user id.
#[derive(Clone)]
pub struct RosterRepository {
    store: Arc<dyn DocumentStore>,
}

impl RosterRepository {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        RosterRepository { store }
    }

    pub async fn get(&self, user_id: &str) -> DatabaseResult<Roster> {
        match self.store.get(collections::ROSTERS, user_id).await? {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Ok(Roster::default()),
        }
    }

    pub async fn put(&self, user_id: &str, roster: &Roster) -> DatabaseResult<()> {
        self.store
            .set(collections::ROSTERS, user_id, serde_json::to_value(roster)?)
            .await
    }
}
