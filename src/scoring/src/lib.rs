pub mod autosave;
pub mod clock;
pub mod document;
pub mod error;
pub mod goal;
pub mod half;
pub mod live;
pub mod optimistic;
pub mod player;
pub mod roster;
pub mod session;
pub mod summary;
pub mod team;

pub use autosave::{AutosaveCoordinator, SaveStatus, SaveTicket};
pub use clock::{
    validate_half_duration, ClockEvent, ClockState, MatchClock, DEFAULT_HALF_DURATION_MINUTES,
    MAX_HALF_DURATION_MINUTES,
};
pub use document::{MatchDocument, MatchMetadata, SavedPlayer, MATCHES_COLLECTION};
pub use error::{ScoringError, ScoringResult};
pub use goal::{ClockStamp, GoalEvent, GoalLedger};
pub use half::{Half, HalfStats};
pub use live::{ActionOutcome, LiveMatch, MatchAction};
pub use player::{
    OpponentPlayerRecord, PlayerCounter, PlayerCounters, PlayerMatchRecord, ScoredPlayer,
    OPPONENT_SLOTS,
};
pub use roster::{Roster, RosterPlayer};
pub use session::{UserDocument, UserSession, USERS_COLLECTION};
pub use summary::{MatchSummary, PlayerSummary, TeamSummary};
pub use team::{MatchSide, ShotStats, TeamKey, TeamStat, TeamStats, FOUL_LIMIT};
