use crate::goal::GoalLedger;
use crate::half::adjust_counter;
use crate::roster::RosterPlayer;
use serde::{Deserialize, Serialize};

pub const OPPONENT_SLOTS: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PlayerCounter {
    YellowCards,
    RedCards,
    Faltas,
    Paradas,
    GolesRecibidos,
    UnoVsUno,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerCounters {
    #[serde(default)]
    pub yellow_cards: u32,
    #[serde(default)]
    pub red_cards: u32,
    #[serde(default)]
    pub faltas: u32,
    #[serde(default)]
    pub paradas: u32,
    #[serde(default)]
    pub goles_recibidos: u32,
    #[serde(default)]
    pub uno_vs_uno: u32,
}

impl PlayerCounters {
    pub fn get(&self, counter: PlayerCounter) -> u32 {
        match counter {
            PlayerCounter::YellowCards => self.yellow_cards,
            PlayerCounter::RedCards => self.red_cards,
            PlayerCounter::Faltas => self.faltas,
            PlayerCounter::Paradas => self.paradas,
            PlayerCounter::GolesRecibidos => self.goles_recibidos,
            PlayerCounter::UnoVsUno => self.uno_vs_uno,
        }
    }

    pub fn adjust(&mut self, counter: PlayerCounter, delta: i32) -> i32 {
        let slot = match counter {
            PlayerCounter::YellowCards => &mut self.yellow_cards,
            PlayerCounter::RedCards => &mut self.red_cards,
            PlayerCounter::Faltas => &mut self.faltas,
            PlayerCounter::Paradas => &mut self.paradas,
            PlayerCounter::GolesRecibidos => &mut self.goles_recibidos,
            PlayerCounter::UnoVsUno => &mut self.uno_vs_uno,
        };

        adjust_counter(slot, delta)
    }

    pub fn is_zero(&self) -> bool {
        *self == PlayerCounters::default()
    }
}

/// Common access to the match-relevant part of a player row, for either team.
pub trait ScoredPlayer {
    fn dorsal(&self) -> &str;
    fn name(&self) -> &str;
    fn goals(&self) -> &GoalLedger;
    fn goals_mut(&mut self) -> &mut GoalLedger;
    fn counters(&self) -> &PlayerCounters;
    fn counters_mut(&mut self) -> &mut PlayerCounters;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerMatchRecord {
    pub dorsal: String,
    pub name: String,
    pub position: String,
    pub is_active: bool,
    pub goals: GoalLedger,
    #[serde(flatten)]
    pub counters: PlayerCounters,
}

impl PlayerMatchRecord {
    pub fn from_roster(player: &RosterPlayer) -> Self {
        PlayerMatchRecord {
            dorsal: player.dorsal.clone(),
            name: player.name.clone(),
            position: player.position.clone(),
            is_active: player.is_active,
            goals: GoalLedger::new(),
            counters: PlayerCounters::default(),
        }
    }
}

impl ScoredPlayer for PlayerMatchRecord {
    fn dorsal(&self) -> &str {
        &self.dorsal
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn goals(&self) -> &GoalLedger {
        &self.goals
    }

    fn goals_mut(&mut self) -> &mut GoalLedger {
        &mut self.goals
    }

    fn counters(&self) -> &PlayerCounters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut PlayerCounters {
        &mut self.counters
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpponentPlayerRecord {
    #[serde(default)]
    pub dorsal: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub goals: GoalLedger,
    #[serde(flatten)]
    pub counters: PlayerCounters,
}

impl OpponentPlayerRecord {
    /// A row nobody has typed into or scored against.
    pub fn is_empty(&self) -> bool {
        self.dorsal.trim().is_empty()
            && self.name.trim().is_empty()
            && self.goals.is_empty()
            && self.counters.is_zero()
    }

    pub fn padded(mut rows: Vec<OpponentPlayerRecord>) -> Vec<OpponentPlayerRecord> {
        if rows.len() < OPPONENT_SLOTS {
            rows.resize_with(OPPONENT_SLOTS, OpponentPlayerRecord::default);
        }

        rows
    }
}

impl ScoredPlayer for OpponentPlayerRecord {
    fn dorsal(&self) -> &str {
        &self.dorsal
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn goals(&self) -> &GoalLedger {
        &self.goals
    }

    fn goals_mut(&mut self) -> &mut GoalLedger {
        &mut self.goals
    }

    fn counters(&self) -> &PlayerCounters {
        &self.counters
    }

    fn counters_mut(&mut self) -> &mut PlayerCounters {
        &mut self.counters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_clamp_at_zero() {
        let mut counters = PlayerCounters::default();

        assert_eq!(counters.adjust(PlayerCounter::Paradas, -1), 0);
        assert_eq!(counters.adjust(PlayerCounter::Paradas, 2), 2);
        assert_eq!(counters.get(PlayerCounter::Paradas), 2);
        assert!(!counters.is_zero());
    }

    #[test]
    fn test_opponent_row_with_single_foul_is_not_empty() {
        let mut row = OpponentPlayerRecord::default();
        assert!(row.is_empty());

        row.counters.faltas = 1;
        assert!(!row.is_empty());
    }

    #[test]
    fn test_whitespace_only_row_is_empty() {
        let row = OpponentPlayerRecord {
            dorsal: "  ".to_string(),
            name: " ".to_string(),
            ..Default::default()
        };

        assert!(row.is_empty());
    }

    #[test]
    fn test_padding_keeps_longer_lists() {
        assert_eq!(OpponentPlayerRecord::padded(Vec::new()).len(), OPPONENT_SLOTS);

        let long = vec![OpponentPlayerRecord::default(); OPPONENT_SLOTS + 2];
        assert_eq!(OpponentPlayerRecord::padded(long).len(), OPPONENT_SLOTS + 2);
    }

    #[test]
    fn test_counters_flatten_into_record() {
        let mut row = OpponentPlayerRecord {
            dorsal: "9".to_string(),
            ..Default::default()
        };
        row.counters.goles_recibidos = 2;

        let value = serde_json::to_value(&row).unwrap();

        assert_eq!(value["golesRecibidos"], 2);
        assert_eq!(value["unoVsUno"], 0);
        assert!(value.get("counters").is_none());
    }
}
