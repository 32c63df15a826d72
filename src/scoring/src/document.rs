use crate::clock::DEFAULT_HALF_DURATION_MINUTES;
use crate::goal::GoalLedger;
use crate::player::{OpponentPlayerRecord, PlayerCounters};
use crate::team::{MatchSide, TeamStats};
use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const MATCHES_COLLECTION: &str = "partidos_estadisticas";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchMetadata {
    #[serde(default)]
    pub home_team_name: String,
    #[serde(default)]
    pub away_team_name: String,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub time: Option<NaiveTime>,
    #[serde(default)]
    pub competition: String,
    #[serde(default)]
    pub round: Option<String>,
}

/// My-team row as stored: dorsal plus counters, roster fields stripped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPlayer {
    pub dorsal: String,
    #[serde(default)]
    pub goals: GoalLedger,
    #[serde(flatten)]
    pub counters: PlayerCounters,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchDocument {
    #[serde(default)]
    pub owner_id: String,
    #[serde(flatten)]
    pub metadata: MatchMetadata,
    #[serde(default)]
    pub my_team_side: Option<MatchSide>,
    #[serde(default)]
    pub is_home: bool,
    #[serde(default)]
    pub my_team_stats: TeamStats,
    #[serde(default)]
    pub opponent_stats: TeamStats,
    #[serde(default)]
    pub my_team_players: Vec<SavedPlayer>,
    #[serde(default)]
    pub opponent_players: Vec<OpponentPlayerRecord>,
    #[serde(default = "default_timer_duration")]
    pub timer_duration: u32,
}

fn default_timer_duration() -> u32 {
    DEFAULT_HALF_DURATION_MINUTES
}

impl MatchDocument {
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    pub fn to_fields(&self) -> serde_json::Result<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            _ => Ok(Map::new()),
        }
    }

    /// Top-level fields whose value differs from `previous`. Everything is
    /// returned when there is no previous snapshot.
    pub fn changed_fields(
        &self,
        previous: Option<&Map<String, Value>>,
    ) -> serde_json::Result<Map<String, Value>> {
        let current = self.to_fields()?;

        let Some(previous) = previous else {
            return Ok(current);
        };

        Ok(current
            .into_iter()
            .filter(|(key, value)| previous.get(key) != Some(value))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::half::Half;

    fn document() -> MatchDocument {
        MatchDocument {
            owner_id: "coach-1".to_string(),
            metadata: MatchMetadata {
                home_team_name: "Futsal Norte".to_string(),
                away_team_name: "Atlético Sur".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 10, 12),
                time: NaiveTime::from_hms_opt(18, 30, 0),
                competition: "Liga".to_string(),
                round: Some("J5".to_string()),
            },
            my_team_side: Some(MatchSide::Home),
            is_home: true,
            my_team_stats: TeamStats::default(),
            opponent_stats: TeamStats::default(),
            my_team_players: vec![SavedPlayer {
                dorsal: "10".to_string(),
                ..Default::default()
            }],
            opponent_players: Vec::new(),
            timer_duration: 25,
        }
    }

    #[test]
    fn test_document_field_names() {
        let fields = document().to_fields().unwrap();

        assert_eq!(fields["homeTeamName"], "Futsal Norte");
        assert_eq!(fields["myTeamSide"], "local");
        assert_eq!(fields["timerDuration"], 25);
        assert_eq!(fields["myTeamPlayers"][0]["dorsal"], "10");
        assert!(fields["myTeamPlayers"][0].get("name").is_none());
        assert!(fields["myTeamPlayers"][0].get("position").is_none());
    }

    #[test]
    fn test_changed_fields_only_reports_differences() {
        let original = document();
        let snapshot = original.to_fields().unwrap();

        let mut edited = original.clone();
        edited.my_team_stats.faltas.increment(Half::FirstHalf);

        let changed = edited.changed_fields(Some(&snapshot)).unwrap();

        assert_eq!(changed.len(), 1);
        assert!(changed.contains_key("myTeamStats"));
        assert!(original.changed_fields(Some(&snapshot)).unwrap().is_empty());
    }

    #[test]
    fn test_minimal_document_uses_defaults() {
        let doc = MatchDocument::from_value(serde_json::json!({
            "homeTeamName": "A",
            "awayTeamName": "B"
        }))
        .unwrap();

        assert_eq!(doc.timer_duration, DEFAULT_HALF_DURATION_MINUTES);
        assert_eq!(doc.my_team_side, None);
        assert!(doc.opponent_players.is_empty());
    }

    #[test]
    fn test_document_roundtrips_through_value() {
        let doc = document();
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(MatchDocument::from_value(value).unwrap(), doc);
    }
}
