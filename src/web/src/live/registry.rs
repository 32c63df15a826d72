use crate::live::session::{MatchSession, SessionCommand};
use crate::live::view::LiveMatchView;
use crate::{ApiError, ApiResult};
use database::MatchRepository;
use log::debug;
use scoring::{LiveMatch, MatchSummary, UserSession};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, RwLock};

const SESSION_QUEUE: usize = 32;

/// Cheap handle to a running live session.
#[derive(Clone)]
pub struct MatchSessionHandle {
    match_id: String,
    owner_id: String,
    commands: mpsc::Sender<SessionCommand>,
}

impl MatchSessionHandle {
    pub fn match_id(&self) -> &str {
        &self.match_id
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }

    pub fn is_closed(&self) -> bool {
        self.commands.is_closed()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> SessionCommand,
    ) -> ApiResult<T> {
        let (reply, response) = oneshot::channel();

        self.commands
            .send(command(reply))
            .await
            .map_err(|_| self.gone())?;

        response.await.map_err(|_| self.gone())
    }

    fn gone(&self) -> ApiError {
        ApiError::NotFound(format!("Live session for match '{}' is closed", self.match_id))
    }

    pub async fn apply(&self, action: scoring::MatchAction) -> ApiResult<LiveMatchView> {
        self.request(|reply| SessionCommand::Apply { action, reply })
            .await?
    }

    pub async fn view(&self) -> ApiResult<LiveMatchView> {
        self.request(|reply| SessionCommand::View { reply }).await
    }

    pub async fn summary(&self) -> ApiResult<MatchSummary> {
        self.request(|reply| SessionCommand::Summary { reply }).await
    }

    pub async fn save(&self, session: UserSession, exit: bool) -> ApiResult<LiveMatchView> {
        self.request(|reply| SessionCommand::Save {
            session,
            exit,
            reply,
        })
        .await?
    }

    pub async fn close(&self) {
        if self.commands.send(SessionCommand::Close).await.is_err() {
            debug!("match {}: session already closed", self.match_id);
        }
    }
}

/// At most one live session per match in this process.
#[derive(Clone)]
pub struct SessionRegistry {
    sessions: Arc<RwLock<HashMap<String, MatchSessionHandle>>>,
    quiet_period: Duration,
}

impl SessionRegistry {
    pub fn new(quiet_period: Duration) -> Self {
        SessionRegistry {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            quiet_period,
        }
    }

    pub async fn get(&self, match_id: &str) -> Option<MatchSessionHandle> {
        self.sessions
            .read()
            .await
            .get(match_id)
            .filter(|handle| !handle.is_closed())
            .cloned()
    }

    /// Returns the running session for the match, or spawns one from `live`.
    pub async fn open(
        &self,
        live: LiveMatch,
        owner_id: &str,
        repository: MatchRepository,
        last_saved: Option<Map<String, Value>>,
    ) -> MatchSessionHandle {
        let mut sessions = self.sessions.write().await;

        sessions.retain(|_, handle| !handle.is_closed());

        if let Some(existing) = sessions.get(&live.id) {
            debug!("match {}: reusing live session", live.id);
            return existing.clone();
        }

        let (commands, receiver) = mpsc::channel(SESSION_QUEUE);

        let handle = MatchSessionHandle {
            match_id: live.id.clone(),
            owner_id: owner_id.to_string(),
            commands,
        };

        let session = MatchSession::new(
            live,
            owner_id.to_string(),
            repository,
            self.quiet_period,
            last_saved,
            receiver,
        );

        tokio::spawn(session.run());

        sessions.insert(handle.match_id.clone(), handle.clone());

        handle
    }

    pub async fn close(&self, match_id: &str) -> bool {
        let handle = self.sessions.write().await.remove(match_id);

        match handle {
            Some(handle) => {
                handle.close().await;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::InMemoryStore;
    use scoring::{MatchAction, MatchMetadata, Roster, SaveStatus};

    fn live(id: &str) -> LiveMatch {
        LiveMatch::new(id.to_string(), MatchMetadata::default(), &Roster::default(), 20)
    }

    #[tokio::test]
    async fn test_open_reuses_running_session() {
        let registry = SessionRegistry::new(Duration::from_secs(3));
        let repository = MatchRepository::new(Arc::new(InMemoryStore::new()));

        let first = registry.open(live("m1"), "coach-1", repository.clone(), None).await;
        first
            .apply(MatchAction::SetTeamNames {
                home_team_name: "Futsal Norte".to_string(),
                away_team_name: "Atlético Sur".to_string(),
            })
            .await
            .unwrap();

        let second = registry.open(live("m1"), "coach-1", repository, None).await;
        let view = second.view().await.unwrap();

        assert_eq!(view.metadata.home_team_name, "Futsal Norte");
        assert_eq!(view.save_status, SaveStatus::Unsaved);
    }

    #[tokio::test]
    async fn test_close_removes_session() {
        let registry = SessionRegistry::new(Duration::from_secs(3));
        let repository = MatchRepository::new(Arc::new(InMemoryStore::new()));

        let handle = registry.open(live("m1"), "coach-1", repository, None).await;

        assert!(registry.close("m1").await);
        assert!(!registry.close("m1").await);
        assert!(registry.get("m1").await.is_none());
        assert!(matches!(handle.view().await, Err(ApiError::NotFound(_))));
    }
}
