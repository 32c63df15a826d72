mod auth;
mod config;
mod error;
mod exercises;
mod live;
mod matches;
mod roster;
mod routes;

pub use auth::{ensure_owner, CurrentUser, USER_HEADER};
pub use config::ServerConfig;
pub use error::{ApiError, ApiResult};
pub use live::{LiveMatchView, SessionRegistry};

use crate::routes::ServerRoutes;
use axum::response::IntoResponse;
use database::{
    DocumentStore, ExerciseRepository, FavoritesRepository, MatchRepository, RosterRepository,
    UserRepository,
};
use log::{error, info};
use std::collections::{BTreeSet, HashMap};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

pub struct CoachServer {
    data: CoachAppData,
}

impl CoachServer {
    pub fn new(data: CoachAppData) -> Self {
        CoachServer { data }
    }

    pub async fn run(&self) -> std::io::Result<()> {
        let app = ServerRoutes::create()
            .layer(
                ServiceBuilder::new()
                    // Catch panics in handlers and convert them to 500 errors
                    .layer(CatchPanicLayer::custom(|_err| {
                        (
                            axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                            "Internal server error - handler panicked".to_string(),
                        )
                            .into_response()
                    })),
            )
            .with_state(self.data.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], self.data.config.port));

        let listener = TcpListener::bind(addr).await.inspect_err(|e| {
            error!("Failed to bind to address {}: {}", addr, e);
        })?;

        info!(
            "listen at: http://localhost:{} (store: {})",
            self.data.config.port,
            self.data.store.backend_tag()
        );

        if let Err(e) = axum::serve(listener, app).await {
            error!("Server error: {}", e);
            return Err(e);
        }

        Ok(())
    }
}

/// One lock per user, so a slow favorites write only blocks that user.
pub type UserFavorites = Arc<Mutex<BTreeSet<String>>>;

pub struct CoachAppData {
    pub store: Arc<dyn DocumentStore>,
    pub sessions: SessionRegistry,
    pub favorites: Arc<Mutex<HashMap<String, UserFavorites>>>,
    pub config: Arc<ServerConfig>,
}

impl CoachAppData {
    pub fn new(store: Arc<dyn DocumentStore>, config: ServerConfig) -> Self {
        CoachAppData {
            store,
            sessions: SessionRegistry::new(config.autosave_quiet_period),
            favorites: Arc::new(Mutex::new(HashMap::new())),
            config: Arc::new(config),
        }
    }

    pub fn matches(&self) -> MatchRepository {
        MatchRepository::new(Arc::clone(&self.store))
    }

    pub fn rosters(&self) -> RosterRepository {
        RosterRepository::new(Arc::clone(&self.store))
    }

    pub fn users(&self) -> UserRepository {
        UserRepository::new(Arc::clone(&self.store))
    }

    pub fn exercises(&self) -> ExerciseRepository {
        ExerciseRepository::new(Arc::clone(&self.store))
    }

    pub fn favorites_repository(&self) -> FavoritesRepository {
        FavoritesRepository::new(Arc::clone(&self.store))
    }
}

impl Clone for CoachAppData {
    fn clone(&self) -> Self {
        CoachAppData {
            store: Arc::clone(&self.store),
            sessions: self.sessions.clone(),
            favorites: Arc::clone(&self.favorites),
            config: Arc::clone(&self.config),
        }
    }
}
