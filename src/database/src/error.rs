/// Errors raised by document store backends and repositories.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("invalid document id '{0}'")]
    InvalidId(String),

    #[error("documents must be JSON objects")]
    InvalidDocument,

    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl DatabaseError {
    pub fn not_found(collection: &str, id: &str) -> Self {
        DatabaseError::NotFound {
            collection: collection.to_string(),
            id: id.to_string(),
        }
    }
}

pub type DatabaseResult<T> = Result<T, DatabaseError>;
