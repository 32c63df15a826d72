use crate::clock::{ClockEvent, MatchClock};
use crate::document::{MatchDocument, MatchMetadata, SavedPlayer};
use crate::error::{ScoringError, ScoringResult};
use crate::goal::GoalEvent;
use crate::half::Half;
use crate::player::{OpponentPlayerRecord, PlayerCounter, PlayerMatchRecord, ScoredPlayer};
use crate::roster::Roster;
use crate::team::{MatchSide, TeamKey, TeamStat, TeamStats};
use log::{debug, info};
use serde::{Deserialize, Serialize};

/// Every mutation a scorer can perform on a live match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum MatchAction {
    SetTeamNames {
        home_team_name: String,
        away_team_name: String,
    },
    SetMyTeamSide {
        side: Option<MatchSide>,
    },
    SetMetadata {
        metadata: MatchMetadata,
    },
    AdjustTeamStat {
        team: TeamKey,
        stat: TeamStat,
        delta: i32,
    },
    AdjustPlayerStat {
        team: TeamKey,
        index: usize,
        counter: PlayerCounter,
        delta: i32,
    },
    AddGoal {
        team: TeamKey,
        index: usize,
    },
    RemoveLastGoal {
        team: TeamKey,
        index: usize,
    },
    SetOpponentPlayer {
        index: usize,
        dorsal: String,
        name: String,
    },
    StartClock,
    PauseClock,
    ResetClock,
    SwitchHalf {
        half: Half,
    },
    SetHalfDuration {
        minutes: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Persisted state changed and should be saved.
    Changed,
    /// Only transient state (the running clock) changed.
    Unchanged,
}

#[derive(Debug, Clone)]
pub struct LiveMatch {
    pub id: String,
    pub metadata: MatchMetadata,
    pub my_team_side: Option<MatchSide>,
    pub my_team_stats: TeamStats,
    pub opponent_stats: TeamStats,
    pub my_team_players: Vec<PlayerMatchRecord>,
    pub opponent_players: Vec<OpponentPlayerRecord>,
    pub clock: MatchClock,
}

impl LiveMatch {
    pub fn new(id: String, metadata: MatchMetadata, roster: &Roster, half_duration_minutes: u32) -> Self {
        LiveMatch {
            id,
            metadata,
            my_team_side: None,
            my_team_stats: TeamStats::default(),
            opponent_stats: TeamStats::default(),
            my_team_players: roster
                .active_players()
                .map(PlayerMatchRecord::from_roster)
                .collect(),
            opponent_players: OpponentPlayerRecord::padded(Vec::new()),
            clock: MatchClock::new(half_duration_minutes),
        }
    }

    /// Rebuilds a live match from its stored document. Active roster players
    /// come first with their saved counters; saved dorsals no longer on the
    /// roster are kept so no recorded data disappears.
    pub fn from_document(id: String, document: MatchDocument, roster: &Roster) -> Self {
        let mut saved = document.my_team_players;

        let mut my_team_players: Vec<PlayerMatchRecord> = roster
            .active_players()
            .map(|roster_player| {
                let mut record = PlayerMatchRecord::from_roster(roster_player);

                if let Some(pos) = saved.iter().position(|s| s.dorsal == roster_player.dorsal) {
                    let saved_player = saved.remove(pos);
                    record.goals = saved_player.goals;
                    record.counters = saved_player.counters;
                }

                record
            })
            .collect();

        for orphan in saved {
            debug!("match {}: dorsal {} not in roster, keeping saved row", id, orphan.dorsal);

            let name = roster
                .find_by_dorsal(&orphan.dorsal)
                .map(|p| p.name.clone())
                .unwrap_or_default();

            my_team_players.push(PlayerMatchRecord {
                dorsal: orphan.dorsal,
                name,
                position: String::new(),
                is_active: false,
                goals: orphan.goals,
                counters: orphan.counters,
            });
        }

        LiveMatch {
            id,
            metadata: document.metadata,
            my_team_side: document.my_team_side,
            my_team_stats: document.my_team_stats,
            opponent_stats: document.opponent_stats,
            my_team_players,
            opponent_players: OpponentPlayerRecord::padded(document.opponent_players),
            clock: MatchClock::restore(document.timer_duration, Half::FirstHalf),
        }
    }

    pub fn to_document(&self, owner_id: &str) -> MatchDocument {
        MatchDocument {
            owner_id: owner_id.to_string(),
            metadata: self.metadata.clone(),
            my_team_side: self.my_team_side,
            is_home: self.my_team_side == Some(MatchSide::Home),
            my_team_stats: self.my_team_stats,
            opponent_stats: self.opponent_stats,
            my_team_players: self
                .my_team_players
                .iter()
                .map(|p| SavedPlayer {
                    dorsal: p.dorsal.clone(),
                    goals: p.goals.clone(),
                    counters: p.counters,
                })
                .collect(),
            opponent_players: self
                .opponent_players
                .iter()
                .filter(|p| !p.is_empty())
                .cloned()
                .collect(),
            timer_duration: self.clock.configured_duration_minutes(),
        }
    }

    pub fn active_half(&self) -> Half {
        self.clock.half()
    }

    pub fn stats(&self, team: TeamKey) -> &TeamStats {
        match team {
            TeamKey::MyTeam => &self.my_team_stats,
            TeamKey::Opponent => &self.opponent_stats,
        }
    }

    fn stats_mut(&mut self, team: TeamKey) -> &mut TeamStats {
        match team {
            TeamKey::MyTeam => &mut self.my_team_stats,
            TeamKey::Opponent => &mut self.opponent_stats,
        }
    }

    fn player_mut(&mut self, team: TeamKey, index: usize) -> ScoringResult<&mut dyn ScoredPlayer> {
        let player: Option<&mut dyn ScoredPlayer> = match team {
            TeamKey::MyTeam => self
                .my_team_players
                .get_mut(index)
                .map(|p| p as &mut dyn ScoredPlayer),
            TeamKey::Opponent => self
                .opponent_players
                .get_mut(index)
                .map(|p| p as &mut dyn ScoredPlayer),
        };

        player.ok_or(ScoringError::PlayerNotFound { index })
    }

    /// Display name of a team. Until a side is chosen my team reads as home.
    pub fn team_name(&self, team: TeamKey) -> &str {
        let my_team_is_away = self.my_team_side == Some(MatchSide::Away);

        match (team, my_team_is_away) {
            (TeamKey::MyTeam, false) | (TeamKey::Opponent, true) => &self.metadata.home_team_name,
            (TeamKey::MyTeam, true) | (TeamKey::Opponent, false) => &self.metadata.away_team_name,
        }
    }

    pub fn score(&self, team: TeamKey) -> usize {
        match team {
            TeamKey::MyTeam => self.my_team_players.iter().map(|p| p.goals.len()).sum(),
            TeamKey::Opponent => self.opponent_players.iter().map(|p| p.goals.len()).sum(),
        }
    }

    /// Score of the home or away side, when the user has said which one is theirs.
    pub fn score_by_side(&self, side: MatchSide) -> Option<usize> {
        let my_side = self.my_team_side?;

        if side == my_side {
            Some(self.score(TeamKey::MyTeam))
        } else {
            Some(self.score(TeamKey::Opponent))
        }
    }

    pub fn foul_limit_reached(&self, team: TeamKey) -> bool {
        self.stats(team).foul_limit_reached(self.active_half())
    }

    fn adjust_team_stat(&mut self, team: TeamKey, stat: TeamStat, delta: i32) -> i32 {
        let half = self.active_half();
        self.stats_mut(team).adjust(stat, half, delta)
    }

    /// Player fouls are mirrored onto the team's fouls for the active half in
    /// the same step, by exactly the amount the player counter moved. A foul
    /// removed after the half changed is taken from the other half once the
    /// active half is at zero, so team fouls always equal the players' sum.
    pub fn adjust_player_stat(
        &mut self,
        team: TeamKey,
        index: usize,
        counter: PlayerCounter,
        delta: i32,
    ) -> ScoringResult<i32> {
        let applied = self.player_mut(team, index)?.counters_mut().adjust(counter, delta);

        if counter == PlayerCounter::Faltas && applied != 0 {
            let moved = self.adjust_team_stat(team, TeamStat::Faltas, applied);

            if moved != applied {
                let other = self.active_half().other();
                self.stats_mut(team).adjust(TeamStat::Faltas, other, applied - moved);
            }
        }

        Ok(applied)
    }

    pub fn add_goal(&mut self, team: TeamKey, index: usize) -> ScoringResult<GoalEvent> {
        let stamp = self.clock.stamp();
        let player = self.player_mut(team, index)?;
        let event = player.goals_mut().add(GoalEvent::new(stamp)).clone();

        info!(
            "goal for dorsal {} at {}:{:02} ({})",
            player.dorsal(),
            event.minute,
            event.second,
            event.half.as_str()
        );

        Ok(event)
    }

    pub fn remove_last_goal(&mut self, team: TeamKey, index: usize) -> ScoringResult<Option<GoalEvent>> {
        Ok(self.player_mut(team, index)?.goals_mut().remove_last())
    }

    pub fn tick(&mut self) -> Option<ClockEvent> {
        let event = self.clock.tick();

        if let Some(ClockEvent::HalfEnded(half)) = event {
            info!("match {}: {} ended", self.id, half.as_str());
        }

        event
    }

    pub fn apply(&mut self, action: MatchAction) -> ScoringResult<ActionOutcome> {
        use ActionOutcome::{Changed, Unchanged};

        let outcome = match action {
            MatchAction::SetTeamNames {
                home_team_name,
                away_team_name,
            } => {
                self.metadata.home_team_name = home_team_name;
                self.metadata.away_team_name = away_team_name;
                Changed
            }
            MatchAction::SetMyTeamSide { side } => {
                self.my_team_side = side;
                Changed
            }
            MatchAction::SetMetadata { metadata } => {
                self.metadata = metadata;
                Changed
            }
            MatchAction::AdjustTeamStat {
                stat: TeamStat::Faltas,
                ..
            } => return Err(ScoringError::TeamFoulsFromPlayers),
            MatchAction::AdjustTeamStat { team, stat, delta } => {
                changed_if(self.adjust_team_stat(team, stat, delta) != 0)
            }
            MatchAction::AdjustPlayerStat {
                team,
                index,
                counter,
                delta,
            } => changed_if(self.adjust_player_stat(team, index, counter, delta)? != 0),
            MatchAction::AddGoal { team, index } => {
                self.add_goal(team, index)?;
                Changed
            }
            MatchAction::RemoveLastGoal { team, index } => {
                changed_if(self.remove_last_goal(team, index)?.is_some())
            }
            MatchAction::SetOpponentPlayer { index, dorsal, name } => {
                let row = self
                    .opponent_players
                    .get_mut(index)
                    .ok_or(ScoringError::PlayerNotFound { index })?;
                row.dorsal = dorsal;
                row.name = name;
                Changed
            }
            MatchAction::StartClock => {
                self.clock.start();
                Unchanged
            }
            MatchAction::PauseClock => {
                self.clock.pause();
                Unchanged
            }
            MatchAction::ResetClock => {
                let before = self.clock.configured_duration_minutes();
                self.clock.reset();
                changed_if(before != self.clock.configured_duration_minutes())
            }
            MatchAction::SwitchHalf { half } => {
                self.clock.switch_half(half);
                Unchanged
            }
            MatchAction::SetHalfDuration { minutes } => {
                let before = self.clock.configured_duration_minutes();
                self.clock.set_half_duration(minutes)?;
                changed_if(before != minutes)
            }
        };

        Ok(outcome)
    }
}

fn changed_if(changed: bool) -> ActionOutcome {
    if changed {
        ActionOutcome::Changed
    } else {
        ActionOutcome::Unchanged
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::player::OPPONENT_SLOTS;
    use crate::roster::RosterPlayer;

    fn roster() -> Roster {
        Roster::new(vec![
            RosterPlayer {
                dorsal: "1".to_string(),
                name: "Pablo".to_string(),
                position: "Portero".to_string(),
                is_active: true,
            },
            RosterPlayer {
                dorsal: "7".to_string(),
                name: "Dani".to_string(),
                position: "Ala".to_string(),
                is_active: false,
            },
            RosterPlayer {
                dorsal: "10".to_string(),
                name: "Ricardo".to_string(),
                position: "Pívot".to_string(),
                is_active: true,
            },
        ])
    }

    fn live_match(minutes: u32) -> LiveMatch {
        LiveMatch::new(
            "match-1".to_string(),
            MatchMetadata {
                home_team_name: "Futsal Norte".to_string(),
                away_team_name: "Atlético Sur".to_string(),
                ..Default::default()
            },
            &roster(),
            minutes,
        )
    }

    fn index_of(live: &LiveMatch, dorsal: &str) -> usize {
        live.my_team_players
            .iter()
            .position(|p| p.dorsal == dorsal)
            .unwrap()
    }

    fn advance(live: &mut LiveMatch, seconds: u32) {
        for _ in 0..seconds {
            live.tick();
        }
    }

    #[test]
    fn test_new_seeds_active_roster_and_opponent_slots() {
        let live = live_match(20);

        assert_eq!(live.my_team_players.len(), 2);
        assert_eq!(live.opponent_players.len(), OPPONENT_SLOTS);
        assert!(live.my_team_players.iter().all(|p| p.is_active));
    }

    #[test]
    fn test_goal_scenario_across_halves() {
        let mut live = live_match(25);
        let ten = index_of(&live, "10");

        live.apply(MatchAction::StartClock).unwrap();
        advance(&mut live, 90);
        let first = live.add_goal(TeamKey::MyTeam, ten).unwrap();

        assert_eq!((first.minute, first.second, first.half), (1, 30, Half::FirstHalf));

        live.apply(MatchAction::SwitchHalf { half: Half::SecondHalf }).unwrap();
        live.apply(MatchAction::StartClock).unwrap();
        advance(&mut live, 10);
        let second = live.add_goal(TeamKey::MyTeam, ten).unwrap();

        assert_eq!((second.minute, second.second, second.half), (25, 10, Half::SecondHalf));
        assert_eq!(live.score(TeamKey::MyTeam), 2);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_second_half_goal_minutes_exceed_first_half() {
        for elapsed in [0, 1, 59, 600, 1199, 1200] {
            let mut live = live_match(20);
            live.apply(MatchAction::StartClock).unwrap();
            advance(&mut live, elapsed);
            let first = live.add_goal(TeamKey::Opponent, 0).unwrap();

            live.apply(MatchAction::SwitchHalf { half: Half::SecondHalf }).unwrap();
            let second = live.add_goal(TeamKey::Opponent, 0).unwrap();

            assert!(second.minute > first.minute, "elapsed {}", elapsed);
        }
    }

    #[test]
    fn test_remove_last_goal_on_empty_ledger_is_noop() {
        let mut live = live_match(20);

        let outcome = live
            .apply(MatchAction::RemoveLastGoal {
                team: TeamKey::MyTeam,
                index: 0,
            })
            .unwrap();

        assert_eq!(outcome, ActionOutcome::Unchanged);
        assert_eq!(live.score(TeamKey::MyTeam), 0);
    }

    #[test]
    fn test_player_fouls_mirror_team_fouls_without_drift() {
        let mut live = live_match(20);
        let steps: [(TeamKey, usize, i32, bool); 10] = [
            (TeamKey::MyTeam, 0, 1, false),
            (TeamKey::MyTeam, 1, 1, false),
            (TeamKey::Opponent, 3, 1, false),
            (TeamKey::MyTeam, 0, -1, false),
            (TeamKey::MyTeam, 0, -1, false),
            (TeamKey::Opponent, 3, 1, true),
            (TeamKey::Opponent, 5, -1, true),
            (TeamKey::MyTeam, 1, 1, true),
            (TeamKey::Opponent, 3, -1, true),
            (TeamKey::MyTeam, 0, 2, true),
        ];

        for (team, index, delta, switch_to_second) in steps {
            if switch_to_second && live.active_half() == Half::FirstHalf {
                live.apply(MatchAction::SwitchHalf { half: Half::SecondHalf }).unwrap();
            }

            live.apply(MatchAction::AdjustPlayerStat {
                team,
                index,
                counter: PlayerCounter::Faltas,
                delta,
            })
            .unwrap();
        }

        let my_player_fouls: u32 = live.my_team_players.iter().map(|p| p.counters.faltas).sum();
        let opponent_player_fouls: u32 = live.opponent_players.iter().map(|p| p.counters.faltas).sum();

        assert_eq!(live.my_team_stats.faltas.total(), my_player_fouls);
        assert_eq!(live.opponent_stats.faltas.total(), opponent_player_fouls);
        assert_eq!(live.my_team_stats.faltas.first_half, 1);
        assert_eq!(live.my_team_stats.faltas.second_half, 3);
    }

    #[test]
    fn test_team_fouls_cannot_be_adjusted_directly() {
        let mut live = live_match(20);
        live.apply(MatchAction::AdjustPlayerStat {
            team: TeamKey::Opponent,
            index: 1,
            counter: PlayerCounter::Faltas,
            delta: 1,
        })
        .unwrap();

        for delta in [1, -1] {
            let result = live.apply(MatchAction::AdjustTeamStat {
                team: TeamKey::Opponent,
                stat: TeamStat::Faltas,
                delta,
            });
            assert_eq!(result, Err(ScoringError::TeamFoulsFromPlayers));
        }

        let player_fouls: u32 = live.opponent_players.iter().map(|p| p.counters.faltas).sum();
        assert_eq!(live.opponent_stats.faltas.total(), player_fouls);
        assert_eq!(player_fouls, 1);

        assert_eq!(
            live.apply(MatchAction::AdjustTeamStat {
                team: TeamKey::Opponent,
                stat: TeamStat::Turnovers,
                delta: 1,
            }),
            Ok(ActionOutcome::Changed)
        );
    }

    #[test]
    fn test_oversized_half_duration_leaves_match_untouched() {
        let mut live = live_match(20);

        let result = live.apply(MatchAction::SetHalfDuration { minutes: u32::MAX });

        assert_eq!(result, Err(ScoringError::InvalidDuration(u32::MAX)));
        assert_eq!(live.clock.configured_duration_minutes(), 20);
        assert_eq!(live.clock.remaining_secs(), 20 * 60);
        assert_eq!(live.to_document("coach-1").timer_duration, 20);
    }

    #[test]
    fn test_removing_first_half_foul_in_second_half_keeps_totals() {
        let mut live = live_match(20);
        live.adjust_player_stat(TeamKey::MyTeam, 0, PlayerCounter::Faltas, 1)
            .unwrap();
        live.apply(MatchAction::SwitchHalf { half: Half::SecondHalf }).unwrap();

        live.adjust_player_stat(TeamKey::MyTeam, 0, PlayerCounter::Faltas, -1)
            .unwrap();

        assert_eq!(live.my_team_players[0].counters.faltas, 0);
        assert_eq!(live.my_team_stats.faltas.total(), 0);
    }

    #[test]
    fn test_foul_limit_warning_follows_active_half() {
        let mut live = live_match(20);

        for _ in 0..5 {
            live.adjust_player_stat(TeamKey::Opponent, 2, PlayerCounter::Faltas, 1)
                .unwrap();
        }

        assert!(live.foul_limit_reached(TeamKey::Opponent));
        assert!(!live.foul_limit_reached(TeamKey::MyTeam));

        live.apply(MatchAction::SwitchHalf { half: Half::SecondHalf }).unwrap();
        assert!(!live.foul_limit_reached(TeamKey::Opponent));
    }

    #[test]
    fn test_unknown_player_index_is_rejected() {
        let mut live = live_match(20);

        let result = live.apply(MatchAction::AddGoal {
            team: TeamKey::MyTeam,
            index: 9,
        });

        assert_eq!(result, Err(ScoringError::PlayerNotFound { index: 9 }));
    }

    #[test]
    fn test_clock_actions_do_not_dirty_state() {
        let mut live = live_match(20);

        assert_eq!(live.apply(MatchAction::StartClock).unwrap(), ActionOutcome::Unchanged);
        assert_eq!(live.apply(MatchAction::PauseClock).unwrap(), ActionOutcome::Unchanged);
        assert_eq!(
            live.apply(MatchAction::SetHalfDuration { minutes: 25 }).unwrap(),
            ActionOutcome::Changed
        );
    }

    #[test]
    fn test_to_document_filters_rows() {
        let mut live = live_match(20);
        live.my_team_side = Some(MatchSide::Away);
        live.opponent_players[4].counters.faltas = 1;

        let doc = live.to_document("coach-1");

        assert_eq!(doc.opponent_players.len(), 1);
        assert_eq!(doc.opponent_players[0].counters.faltas, 1);
        assert_eq!(doc.my_team_players.len(), 2);
        assert!(!doc.is_home);
        assert_eq!(doc.timer_duration, 20);
    }

    #[test]
    fn test_from_document_merges_roster_and_saved_rows() {
        let mut live = live_match(25);
        let ten = index_of(&live, "10");
        live.add_goal(TeamKey::MyTeam, ten).unwrap();
        live.adjust_player_stat(TeamKey::MyTeam, ten, PlayerCounter::YellowCards, 1)
            .unwrap();
        live.opponent_players[0].dorsal = "4".to_string();

        let mut doc = live.to_document("coach-1");
        doc.my_team_players.push(SavedPlayer {
            dorsal: "99".to_string(),
            ..Default::default()
        });

        let restored = LiveMatch::from_document("match-1".to_string(), doc, &roster());
        let ten = index_of(&restored, "10");

        assert_eq!(restored.my_team_players[ten].name, "Ricardo");
        assert_eq!(restored.my_team_players[ten].goals.len(), 1);
        assert_eq!(restored.my_team_players[ten].counters.yellow_cards, 1);
        assert_eq!(restored.my_team_players.len(), 3);
        assert_eq!(restored.opponent_players.len(), OPPONENT_SLOTS);
        assert_eq!(restored.opponent_players[0].dorsal, "4");
        assert_eq!(restored.clock.half_duration_minutes(), 25);
    }

    #[test]
    fn test_score_by_side_requires_assignment() {
        let mut live = live_match(20);
        live.add_goal(TeamKey::MyTeam, 0).unwrap();

        assert_eq!(live.score_by_side(MatchSide::Home), None);

        live.apply(MatchAction::SetMyTeamSide {
            side: Some(MatchSide::Away),
        })
        .unwrap();

        assert_eq!(live.score_by_side(MatchSide::Away), Some(1));
        assert_eq!(live.score_by_side(MatchSide::Home), Some(0));
    }

    #[test]
    fn test_action_json_shape() {
        let action: MatchAction = serde_json::from_value(serde_json::json!({
            "type": "adjustPlayerStat",
            "team": "opponent",
            "index": 2,
            "counter": "golesRecibidos",
            "delta": 1
        }))
        .unwrap();

        assert_eq!(
            action,
            MatchAction::AdjustPlayerStat {
                team: TeamKey::Opponent,
                index: 2,
                counter: PlayerCounter::GolesRecibidos,
                delta: 1
            }
        );
    }
}
