//! Tunable game configuration.
//!
//! Every value defaults to the constants in [`crate::core::constants`]; a JSON
//! file may override any subset of fields.

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::constants::*;
use crate::entities::EnemyKind;
use crate::equipment::EquipmentKind;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// One elapsed-time threshold that reweights the spawn table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MilestoneConfig {
    pub at_seconds: f64,
    #[serde(default)]
    pub weight_deltas: BTreeMap<EnemyKind, f64>,
    /// Clears every weight, introduces the boss, and starts the boss phase.
    #[serde(default)]
    pub boss: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimerConfig {
    pub starting_time: f64,
    pub doom_time: f64,
    pub kill_bonus: f64,
    pub initial_weights: BTreeMap<EnemyKind, f64>,
    pub milestones: Vec<MilestoneConfig>,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            starting_time: STARTING_TIME_SECONDS,
            doom_time: DOOM_TIME_SECONDS,
            kill_bonus: KILL_TIME_BONUS_SECONDS,
            initial_weights: BTreeMap::from([(EnemyKind::Servant, 1.0)]),
            milestones: vec![
                MilestoneConfig {
                    at_seconds: MILESTONE_HUNTSMAN_SECONDS,
                    weight_deltas: BTreeMap::from([(EnemyKind::Huntsman, 1.0)]),
                    boss: false,
                },
                MilestoneConfig {
                    at_seconds: MILESTONE_FORESTER_SECONDS,
                    weight_deltas: BTreeMap::from([
                        (EnemyKind::Forester, 1.0),
                        (EnemyKind::Servant, -0.5),
                    ]),
                    boss: false,
                },
                MilestoneConfig {
                    at_seconds: MILESTONE_MERCENARY_SECONDS,
                    weight_deltas: BTreeMap::from([(EnemyKind::Mercenary, 1.0)]),
                    boss: false,
                },
                MilestoneConfig {
                    at_seconds: MILESTONE_BOSS_SECONDS,
                    weight_deltas: BTreeMap::new(),
                    boss: true,
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub first_tick_ms: u64,
    pub tick_interval_ms: u64,
    pub base_wave_size: u32,
    pub wave_growth_every: u32,
    pub difficulty_divisor: f64,
    pub spawn_inner_distance: f64,
    pub spawn_outer_distance: f64,
    pub opening_ring_distance: f64,
    pub base_enemy_power: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            first_tick_ms: FIRST_WORLD_TICK_MS,
            tick_interval_ms: WORLD_TICK_INTERVAL_MS,
            base_wave_size: BASE_WAVE_SIZE,
            wave_growth_every: WAVE_GROWTH_EVERY_TICKS,
            difficulty_divisor: DIFFICULTY_RAMP_DIVISOR,
            spawn_inner_distance: SPAWN_INNER_DISTANCE,
            spawn_outer_distance: SPAWN_OUTER_DISTANCE,
            opening_ring_distance: OPENING_RING_DISTANCE,
            base_enemy_power: BASE_ENEMY_POWER,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatConfig {
    pub settle_window_ms: u64,
    pub chain_delay_ms: u64,
    pub pull_delay_ms: u64,
    pub dart_stagger_ms: u64,
    pub chain_range: f64,
    pub death_effect_ms: u64,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            settle_window_ms: SETTLE_WINDOW_MS,
            chain_delay_ms: CHAIN_DELAY_MS,
            pull_delay_ms: PULL_DELAY_MS,
            dart_stagger_ms: DART_STAGGER_MS,
            chain_range: CHAIN_RANGE,
            death_effect_ms: DEATH_EFFECT_MS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    pub starting_power: f64,
    pub power_per_level: f64,
    pub chart_levels: usize,
    pub chart_initial_cost: f64,
    pub chart_step: f64,
    pub chart_scalar: f64,
    pub exp_per_drop: f64,
    pub starting_equipment: Vec<EquipmentKind>,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            starting_power: PLAYER_STARTING_POWER,
            power_per_level: PLAYER_POWER_PER_LEVEL,
            chart_levels: EXP_CHART_LEVELS,
            chart_initial_cost: EXP_CHART_INITIAL_COST,
            chart_step: EXP_CHART_STEP,
            chart_scalar: EXP_CHART_SCALAR,
            exp_per_drop: EXP_PER_DROP,
            starting_equipment: vec![EquipmentKind::Dagger],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LootConfig {
    pub slots: usize,
    /// Weight of rolling `index + 1` upgrade picks.
    pub upgrade_count_weights: Vec<f64>,
}

impl Default for LootConfig {
    fn default() -> Self {
        Self {
            slots: LOOT_SLOTS,
            upgrade_count_weights: UPGRADE_COUNT_WEIGHTS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub timer: TimerConfig,
    pub world: WorldConfig,
    pub combat: CombatConfig,
    pub player: PlayerConfig,
    pub loot: LootConfig,
}

impl GameConfig {
    /// Parse and validate a JSON document. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let timer = &self.timer;
        if timer.starting_time <= 0.0 {
            return Err(invalid("timer.starting_time", "must be positive"));
        }
        if timer.doom_time < timer.starting_time {
            return Err(invalid(
                "timer.doom_time",
                format!(
                    "ceiling {} is below starting time {}",
                    timer.doom_time, timer.starting_time
                ),
            ));
        }
        if timer.kill_bonus < 0.0 {
            return Err(invalid("timer.kill_bonus", "must not be negative"));
        }
        if timer.initial_weights.values().any(|w| *w < 0.0) {
            return Err(invalid("timer.initial_weights", "weights must not be negative"));
        }
        if timer
            .milestones
            .windows(2)
            .any(|pair| pair[1].at_seconds <= pair[0].at_seconds)
        {
            return Err(invalid(
                "timer.milestones",
                "thresholds must be strictly increasing",
            ));
        }
        if timer.milestones.iter().any(|m| m.at_seconds < 0.0) {
            return Err(invalid("timer.milestones", "thresholds must not be negative"));
        }

        let world = &self.world;
        if world.first_tick_ms == 0 || world.tick_interval_ms == 0 {
            return Err(invalid("world.tick_interval_ms", "intervals must be positive"));
        }
        if world.wave_growth_every == 0 {
            return Err(invalid("world.wave_growth_every", "must be positive"));
        }
        if world.difficulty_divisor <= 0.0 {
            return Err(invalid("world.difficulty_divisor", "must be positive"));
        }
        if world.spawn_inner_distance > world.spawn_outer_distance {
            return Err(invalid(
                "world.spawn_inner_distance",
                "inner distance exceeds outer distance",
            ));
        }

        if self.combat.chain_range <= 0.0 {
            return Err(invalid("combat.chain_range", "must be positive"));
        }
        if self.player.starting_power <= 0.0 {
            return Err(invalid("player.starting_power", "must be positive"));
        }

        let loot = &self.loot;
        if loot.slots == 0 {
            return Err(invalid("loot.slots", "must offer at least one slot"));
        }
        if loot.upgrade_count_weights.is_empty() {
            return Err(invalid("loot.upgrade_count_weights", "must not be empty"));
        }
        if loot.upgrade_count_weights.iter().any(|w| *w < 0.0) {
            return Err(invalid(
                "loot.upgrade_count_weights",
                "weights must not be negative",
            ));
        }

        Ok(())
    }
}
