use crate::half::Half;
use crate::live::LiveMatch;
use crate::player::ScoredPlayer;
use crate::team::{TeamKey, TeamStats};
use itertools::Itertools;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerSummary {
    pub dorsal: String,
    pub name: String,
    pub goals: usize,
    pub goals_first_half: usize,
    pub goals_second_half: usize,
    pub yellow_cards: u32,
    pub red_cards: u32,
    pub faltas: u32,
    pub paradas: u32,
    pub goles_recibidos: u32,
    pub uno_vs_uno: u32,
}

impl PlayerSummary {
    fn from_player(player: &dyn ScoredPlayer) -> Self {
        let counters = player.counters();

        PlayerSummary {
            dorsal: player.dorsal().to_string(),
            name: player.name().to_string(),
            goals: player.goals().len(),
            goals_first_half: player.goals().in_half(Half::FirstHalf),
            goals_second_half: player.goals().in_half(Half::SecondHalf),
            yellow_cards: counters.yellow_cards,
            red_cards: counters.red_cards,
            faltas: counters.faltas,
            paradas: counters.paradas,
            goles_recibidos: counters.goles_recibidos,
            uno_vs_uno: counters.uno_vs_uno,
        }
    }

    fn has_activity(&self) -> bool {
        self.goals > 0
            || self.yellow_cards > 0
            || self.red_cards > 0
            || self.faltas > 0
            || self.paradas > 0
            || self.goles_recibidos > 0
            || self.uno_vs_uno > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamSummary {
    pub name: String,
    pub score: usize,
    pub stats: TeamStats,
    pub players: Vec<PlayerSummary>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchSummary {
    pub match_id: String,
    pub my_team: TeamSummary,
    pub opponent: TeamSummary,
}

impl MatchSummary {
    pub fn build(live: &LiveMatch) -> Self {
        MatchSummary {
            match_id: live.id.clone(),
            my_team: TeamSummary {
                name: live.team_name(TeamKey::MyTeam).to_string(),
                score: live.score(TeamKey::MyTeam),
                stats: live.my_team_stats,
                players: sort_players(
                    live.my_team_players
                        .iter()
                        .map(|p| PlayerSummary::from_player(p))
                        .collect(),
                ),
            },
            opponent: TeamSummary {
                name: live.team_name(TeamKey::Opponent).to_string(),
                score: live.score(TeamKey::Opponent),
                stats: live.opponent_stats,
                players: sort_players(
                    live.opponent_players
                        .iter()
                        .filter(|p| !p.is_empty())
                        .map(|p| PlayerSummary::from_player(p))
                        .collect(),
                ),
            },
        }
    }

    pub fn top_scorer(&self) -> Option<&PlayerSummary> {
        self.my_team.players.first().filter(|p| p.goals > 0)
    }
}

/// Goals first, then players with any recorded action, then by dorsal.
fn sort_players(players: Vec<PlayerSummary>) -> Vec<PlayerSummary> {
    players
        .into_iter()
        .sorted_by(|a, b| {
            b.goals
                .cmp(&a.goals)
                .then_with(|| b.has_activity().cmp(&a.has_activity()))
                .then_with(|| dorsal_key(&a.dorsal).cmp(&dorsal_key(&b.dorsal)))
        })
        .collect()
}

fn dorsal_key(dorsal: &str) -> (u32, String) {
    (dorsal.trim().parse().unwrap_or(u32::MAX), dorsal.to_string())
}
