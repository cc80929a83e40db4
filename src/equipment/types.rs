use serde::{Deserialize, Serialize};

/// Upgrade-stat tags an equipment variant may roll on level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpgradeStat {
    Power,
    Velocity,
    Repeat,
    Amount,
}

impl UpgradeStat {
    pub fn label(&self) -> &'static str {
        match self {
            UpgradeStat::Power => "Power",
            UpgradeStat::Velocity => "Velocity",
            UpgradeStat::Repeat => "Repeat",
            UpgradeStat::Amount => "Amount",
        }
    }
}

/// The four equipment variants, each with its own strike geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EquipmentKind {
    /// Single forward thrust; pulls the wielder onto a defeated target.
    Dagger,
    /// Several strikes fanned out at fixed angles around the aim.
    Fan,
    /// Strikes in flanking pairs on alternating sides of the aim.
    Cleave,
    /// Staggered homing shots at the enemy nearest the aim point.
    Dart,
}

/// Catalog order used by the loot generator.
pub const EQUIPMENT_CATALOG: [EquipmentKind; 4] = [
    EquipmentKind::Dagger,
    EquipmentKind::Fan,
    EquipmentKind::Cleave,
    EquipmentKind::Dart,
];

impl EquipmentKind {
    pub fn key(&self) -> &'static str {
        match self {
            EquipmentKind::Dagger => "dagger",
            EquipmentKind::Fan => "fan",
            EquipmentKind::Cleave => "cleave",
            EquipmentKind::Dart => "dart",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EquipmentKind::Dagger => "Dagger",
            EquipmentKind::Fan => "Fan",
            EquipmentKind::Cleave => "Cleave",
            EquipmentKind::Dart => "Dart",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            EquipmentKind::Dagger => "Thrusts toward the cursor, leaping onto enemies it defeats.",
            EquipmentKind::Fan => "Throws a spread of blades around the cursor direction.",
            EquipmentKind::Cleave => "Sweeps both flanks in pairs, widening with each extra pair.",
            EquipmentKind::Dart => "Fires darts in quick succession at the enemy nearest the cursor.",
        }
    }

    /// Stable catalog lookup from a stored key.
    pub fn from_key(key: &str) -> Option<Self> {
        EQUIPMENT_CATALOG.into_iter().find(|kind| kind.key() == key)
    }

    /// Fresh level-0 info for this variant, as the loot generator offers it.
    pub fn info(&self) -> EquipmentInfo {
        EquipmentInfo {
            kind: *self,
            key: self.key().to_string(),
            name: self.name().to_string(),
            level: 0,
            scaling: Vec::new(),
        }
    }
}

/// Descriptor of an equipment piece, as offered by loot and as held.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EquipmentInfo {
    #[serde(rename = "type")]
    pub kind: EquipmentKind,
    pub key: String,
    pub name: String,
    pub level: u32,
    /// Upgrade picks rolled for this offer.
    #[serde(default)]
    pub scaling: Vec<UpgradeStat>,
}

/// Identity of one physical attack instance (one launched strike).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AttackId(pub u64);

/// Per-invocation stat bundle computed from an item and its wielder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttackInfo {
    pub equipment_key: String,
    pub power: f64,
    pub pulls_wielder_to_target: bool,
    pub chain_depth: u32,
    pub shot_count: f64,
    pub travel_speed: f64,
}

impl AttackInfo {
    /// Whole strikes to launch; fractional shot counts round down, minimum one.
    pub fn strikes(&self) -> usize {
        (self.shot_count.floor().max(1.0)) as usize
    }
}

/// A held item: its descriptor plus every upgrade pick accumulated so far.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Equipment {
    pub info: EquipmentInfo,
    pub upgrades: Vec<UpgradeStat>,
}

impl Equipment {
    pub fn new(kind: EquipmentKind, upgrades: Vec<UpgradeStat>) -> Self {
        Self {
            info: kind.info(),
            upgrades,
        }
    }

    pub fn kind(&self) -> EquipmentKind {
        self.info.kind
    }

    pub fn key(&self) -> &str {
        &self.info.key
    }

    pub fn level(&self) -> u32 {
        self.info.level
    }
}
