use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RosterPlayer {
    pub dorsal: String,
    pub name: String,
    #[serde(default)]
    pub position: String,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

/// A user's own squad, independent of any single match.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Roster {
    #[serde(default)]
    pub players: Vec<RosterPlayer>,
}

impl Roster {
    pub fn new(players: Vec<RosterPlayer>) -> Self {
        Roster { players }
    }

    pub fn active_players(&self) -> impl Iterator<Item = &RosterPlayer> {
        self.players.iter().filter(|p| p.is_active)
    }

    pub fn find_by_dorsal(&self, dorsal: &str) -> Option<&RosterPlayer> {
        self.players.iter().find(|p| p.dorsal == dorsal)
    }
}
