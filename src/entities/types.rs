use serde::{Deserialize, Serialize};

use crate::core::constants::*;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Players,
    Enemies,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityState {
    Idle,
    Attacking,
}

/// Enemy archetypes. Ordering is stable so weight tables iterate deterministically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Servant,
    Huntsman,
    Forester,
    Mercenary,
    Baron,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 5] = [
        EnemyKind::Servant,
        EnemyKind::Huntsman,
        EnemyKind::Forester,
        EnemyKind::Mercenary,
        EnemyKind::Baron,
    ];

    pub fn sprite_key(&self) -> &'static str {
        match self {
            EnemyKind::Servant => "servant",
            EnemyKind::Huntsman => "huntsman",
            EnemyKind::Forester => "forester",
            EnemyKind::Mercenary => "mercenary",
            EnemyKind::Baron => "baron",
        }
    }

    pub fn power_multiplier(&self) -> f64 {
        match self {
            EnemyKind::Servant => SERVANT_POWER_MULTIPLIER,
            EnemyKind::Huntsman => HUNTSMAN_POWER_MULTIPLIER,
            EnemyKind::Forester => FORESTER_POWER_MULTIPLIER,
            EnemyKind::Mercenary => MERCENARY_POWER_MULTIPLIER,
            EnemyKind::Baron => BARON_POWER_MULTIPLIER,
        }
    }

    pub fn is_boss(&self) -> bool {
        matches!(self, EnemyKind::Baron)
    }

    pub fn from_sprite_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.sprite_key() == key)
    }
}

/// Identity assigned at creation and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentifierInfo {
    pub key: String,
    pub sprite_key: String,
    pub team: Team,
}

/// Combat stats. `power` doubles as attack strength and remaining health.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattleInfo {
    pub alive: bool,
    pub state: EntityState,
    pub power: f64,
    /// Extra chain depth granted to every equipped item.
    #[serde(default)]
    pub repeat: u32,
    /// Extra shots granted to every equipped item.
    #[serde(default)]
    pub amount: f64,
}

impl BattleInfo {
    pub fn new(power: f64) -> Self {
        Self {
            alive: true,
            state: EntityState::Idle,
            power,
            repeat: 0,
            amount: 0.0,
        }
    }
}

/// Level progress. `chart[level]` is the experience needed to reach the next level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    pub experience: f64,
    pub chart: Vec<f64>,
}

impl LevelInfo {
    pub fn new(chart: Vec<f64>) -> Self {
        Self {
            level: 0,
            experience: 0.0,
            chart,
        }
    }

    /// Experience required for the next level, or `None` at the end of the chart.
    pub fn next_threshold(&self) -> Option<f64> {
        self.chart.get(self.level as usize).copied()
    }

    pub fn can_level_up(&self) -> bool {
        self.next_threshold()
            .is_some_and(|threshold| self.experience >= threshold)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enemy_kind_sprite_key_roundtrip() {
        for kind in EnemyKind::ALL {
            assert_eq!(EnemyKind::from_sprite_key(kind.sprite_key()), Some(kind));
        }
        assert_eq!(EnemyKind::from_sprite_key("dragon"), None);
    }

    #[test]
    fn test_only_baron_is_boss() {
        let bosses: Vec<EnemyKind> = EnemyKind::ALL.into_iter().filter(|k| k.is_boss()).collect();
        assert_eq!(bosses, vec![EnemyKind::Baron]);
    }

    #[test]
    fn test_level_info_threshold_past_end_of_chart() {
        let mut info = LevelInfo::new(vec![10.0]);
        info.experience = 50.0;
        assert!(info.can_level_up());
        info.level = 1;
        assert_eq!(info.next_threshold(), None);
        assert!(!info.can_level_up());
    }
}
