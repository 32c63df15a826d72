use scoring::{
    ClockState, Half, LiveMatch, MatchMetadata, MatchSide, OpponentPlayerRecord, PlayerMatchRecord,
    SaveStatus, TeamKey, TeamStats, FOUL_LIMIT,
};
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClockView {
    pub state: ClockState,
    pub half: Half,
    pub display: String,
    pub remaining_secs: u32,
    pub elapsed_secs: u32,
    pub half_duration_minutes: u32,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamView {
    pub team: TeamKey,
    pub name: String,
    pub score: usize,
    pub fouls_in_half: u32,
    pub foul_limit_reached: bool,
    pub stats: TeamStats,
}

impl TeamView {
    fn build(live: &LiveMatch, team: TeamKey) -> Self {
        TeamView {
            team,
            name: live.team_name(team).to_string(),
            score: live.score(team),
            fouls_in_half: live.stats(team).faltas.get(live.active_half()),
            foul_limit_reached: live.foul_limit_reached(team),
            stats: *live.stats(team),
        }
    }
}

/// Everything a scoring screen renders, derived from the live match.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveMatchView {
    pub match_id: String,
    pub metadata: MatchMetadata,
    pub my_team_side: Option<MatchSide>,
    pub home_score: Option<usize>,
    pub away_score: Option<usize>,
    pub foul_limit: u32,
    pub clock: ClockView,
    pub save_status: SaveStatus,
    pub my_team: TeamView,
    pub opponent: TeamView,
    pub my_team_players: Vec<PlayerMatchRecord>,
    pub opponent_players: Vec<OpponentPlayerRecord>,
}

impl LiveMatchView {
    pub fn build(live: &LiveMatch, save_status: SaveStatus) -> Self {
        let clock = &live.clock;

        LiveMatchView {
            match_id: live.id.clone(),
            metadata: live.metadata.clone(),
            my_team_side: live.my_team_side,
            home_score: live.score_by_side(MatchSide::Home),
            away_score: live.score_by_side(MatchSide::Away),
            foul_limit: FOUL_LIMIT,
            clock: ClockView {
                state: clock.state(),
                half: clock.half(),
                display: clock.display(),
                remaining_secs: clock.remaining_secs(),
                elapsed_secs: clock.elapsed_secs(),
                half_duration_minutes: clock.half_duration_minutes(),
            },
            save_status,
            my_team: TeamView::build(live, TeamKey::MyTeam),
            opponent: TeamView::build(live, TeamKey::Opponent),
            my_team_players: live.my_team_players.clone(),
            opponent_players: live.opponent_players.clone(),
        }
    }

    /// Home/away ordering for display. Falls back to my team as home.
    pub fn home_and_away(&self) -> (&TeamView, &TeamView) {
        match self.my_team_side {
            Some(MatchSide::Away) => (&self.opponent, &self.my_team),
            _ => (&self.my_team, &self.opponent),
        }
    }
}
