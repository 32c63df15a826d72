use crate::half::{Half, HalfStats};
use serde::{Deserialize, Serialize};

/// Fouls in a half at or above this count raise the foul-limit warning.
pub const FOUL_LIMIT: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamKey {
    MyTeam,
    Opponent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchSide {
    #[serde(rename = "local")]
    Home,
    #[serde(rename = "visitante")]
    Away,
}

impl MatchSide {
    pub fn other(self) -> MatchSide {
        match self {
            MatchSide::Home => MatchSide::Away,
            MatchSide::Away => MatchSide::Home,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TeamStat {
    ShotsOnTarget,
    ShotsOffTarget,
    ShotsBlocked,
    Turnovers,
    Steals,
    Timeouts,
    Faltas,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShotStats {
    #[serde(default)]
    pub on_target: HalfStats,
    #[serde(default)]
    pub off_target: HalfStats,
    #[serde(default)]
    pub blocked: HalfStats,
}

impl ShotStats {
    pub fn total(&self) -> u32 {
        self.on_target.total() + self.off_target.total() + self.blocked.total()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStats {
    #[serde(default)]
    pub shots: ShotStats,
    #[serde(default)]
    pub turnovers: HalfStats,
    #[serde(default)]
    pub steals: HalfStats,
    #[serde(default)]
    pub timeouts: HalfStats,
    #[serde(default)]
    pub faltas: HalfStats,
}

impl TeamStats {
    pub fn stat(&self, stat: TeamStat) -> &HalfStats {
        match stat {
            TeamStat::ShotsOnTarget => &self.shots.on_target,
            TeamStat::ShotsOffTarget => &self.shots.off_target,
            TeamStat::ShotsBlocked => &self.shots.blocked,
            TeamStat::Turnovers => &self.turnovers,
            TeamStat::Steals => &self.steals,
            TeamStat::Timeouts => &self.timeouts,
            TeamStat::Faltas => &self.faltas,
        }
    }

    pub fn stat_mut(&mut self, stat: TeamStat) -> &mut HalfStats {
        match stat {
            TeamStat::ShotsOnTarget => &mut self.shots.on_target,
            TeamStat::ShotsOffTarget => &mut self.shots.off_target,
            TeamStat::ShotsBlocked => &mut self.shots.blocked,
            TeamStat::Turnovers => &mut self.turnovers,
            TeamStat::Steals => &mut self.steals,
            TeamStat::Timeouts => &mut self.timeouts,
            TeamStat::Faltas => &mut self.faltas,
        }
    }

    pub fn adjust(&mut self, stat: TeamStat, half: Half, delta: i32) -> i32 {
        self.stat_mut(stat).adjust(half, delta)
    }

    pub fn foul_limit_reached(&self, half: Half) -> bool {
        self.faltas.get(half) >= FOUL_LIMIT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_foul_limit_per_half() {
        let mut stats = TeamStats::default();

        for _ in 0..4 {
            stats.adjust(TeamStat::Faltas, Half::FirstHalf, 1);
        }
        assert!(!stats.foul_limit_reached(Half::FirstHalf));

        stats.adjust(TeamStat::Faltas, Half::FirstHalf, 1);
        assert!(stats.foul_limit_reached(Half::FirstHalf));
        assert!(!stats.foul_limit_reached(Half::SecondHalf));
    }

    #[test]
    fn test_shot_paths_are_independent() {
        let mut stats = TeamStats::default();

        stats.adjust(TeamStat::ShotsOnTarget, Half::FirstHalf, 2);
        stats.adjust(TeamStat::ShotsBlocked, Half::SecondHalf, 1);
        stats.adjust(TeamStat::ShotsOffTarget, Half::FirstHalf, -1);

        assert_eq!(stats.shots.on_target.first_half, 2);
        assert_eq!(stats.shots.off_target.first_half, 0);
        assert_eq!(stats.shots.total(), 3);
    }

    #[test]
    fn test_side_serde_names() {
        assert_eq!(serde_json::to_string(&MatchSide::Home).unwrap(), "\"local\"");
        assert_eq!(
            serde_json::from_str::<MatchSide>("\"visitante\"").unwrap(),
            MatchSide::Away
        );
    }

    #[test]
    fn test_team_stats_deserialize_with_missing_fields() {
        let stats: TeamStats = serde_json::from_value(serde_json::json!({
            "faltas": { "firstHalf": 3 }
        }))
        .unwrap();

        assert_eq!(stats.faltas, HalfStats::new(3, 0));
        assert_eq!(stats.turnovers, HalfStats::default());
    }
}
