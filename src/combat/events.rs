//! Observable outcomes of the simulation, in the order they happened.
//!
//! The presentation layer drains these from the session and maps them to
//! effects, log lines and menus. Nothing here references presentation types.

use serde::{Deserialize, Serialize};

use crate::core::geometry::Vector2;
use crate::entities::EnemyKind;
use crate::equipment::{AttackId, EquipmentInfo, EquipmentKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// The boss was defeated.
    Victory,
    /// The countdown ran out.
    Doomed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChainDropReason {
    NoTarget,
    OutOfRange,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    // ── Actions ─────────────────────────────────────────────────
    /// The player started an action toward `aim`.
    ActionStarted { aim: Vector2 },

    /// One strike left its equipment.
    StrikeLaunched {
        attack: AttackId,
        equipment: EquipmentKind,
        chained: bool,
    },

    /// A chain continuation was queued from a resolved strike.
    ChainQueued { attack: AttackId, round: u32 },

    /// A queued continuation found nothing to strike.
    ChainDropped { reason: ChainDropReason },

    /// The wielder snapped onto a defeated target.
    WielderPulled { to: Vector2 },

    // ── Resolution ──────────────────────────────────────────────
    /// A strike weakened an enemy without defeating it.
    EnemyHit {
        enemy_key: String,
        damage: f64,
        remaining: f64,
    },

    EnemyDefeated {
        enemy_key: String,
        kind: Option<EnemyKind>,
        position: Vector2,
    },

    /// Kill reward added to the countdown.
    TimeExtended { remaining: f64 },

    // ── Progression ─────────────────────────────────────────────
    ExperienceGained { amount: f64, total: f64 },

    /// May occur several times for one experience gain.
    LevelUp { level: u32, power: f64 },

    LootOffered {
        level: u32,
        options: Vec<EquipmentInfo>,
    },

    EquipmentAdded { kind: EquipmentKind, level: u32 },

    // ── World ───────────────────────────────────────────────────
    MilestoneReached { at_seconds: f64, boss: bool },

    WaveSpawned { tick: u32, count: usize },

    BossSpawned,

    GameOver { outcome: Outcome, elapsed: f64 },
}
