/// Errors raised by match-scoring operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScoringError {
    #[error("select which side is your team before saving")]
    MissingTeamSide,

    #[error("an active subscription is required to save or delete matches")]
    NotEntitled,

    #[error("player slot {index} does not exist")]
    PlayerNotFound { index: usize },

    #[error("half duration must be between 1 and 60 minutes, got {0}")]
    InvalidDuration(u32),

    #[error("team fouls follow player fouls; record the foul on a player")]
    TeamFoulsFromPlayers,
}

pub type ScoringResult<T> = Result<T, ScoringError>;
