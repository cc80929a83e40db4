//! Stat bundle computation for each equipment variant.
//!
//! A bundle is rebuilt on every attack from the variant's base table, the
//! item's accumulated upgrade picks, its level, and the wielder's stats.

use super::types::{AttackInfo, Equipment, EquipmentKind, UpgradeStat};
use crate::entities::types::BattleInfo;

/// Base values before upgrades, level scaling or wielder stats.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaseStats {
    pub power: f64,
    pub power_per_level: f64,
    pub pulls_wielder_to_target: bool,
    pub chain_depth: u32,
    pub shot_count: f64,
    pub travel_speed: f64,
    /// How long a launched strike stays live before it is retired.
    pub lifetime_ms: u64,
}

impl EquipmentKind {
    pub fn base_stats(&self) -> BaseStats {
        match self {
            EquipmentKind::Dagger => BaseStats {
                power: 1.0,
                power_per_level: 2.0,
                pulls_wielder_to_target: true,
                chain_depth: 0,
                shot_count: 1.0,
                travel_speed: 500.0,
                lifetime_ms: 250,
            },
            EquipmentKind::Fan => BaseStats {
                power: 1.0,
                power_per_level: 1.0,
                pulls_wielder_to_target: false,
                chain_depth: 0,
                shot_count: 3.0,
                travel_speed: 380.0,
                lifetime_ms: 600,
            },
            EquipmentKind::Cleave => BaseStats {
                power: 0.0,
                power_per_level: 3.0,
                pulls_wielder_to_target: false,
                chain_depth: 0,
                shot_count: 2.0,
                travel_speed: 300.0,
                lifetime_ms: 450,
            },
            EquipmentKind::Dart => BaseStats {
                power: 3.0,
                power_per_level: 1.0,
                pulls_wielder_to_target: false,
                chain_depth: 0,
                shot_count: 1.0,
                travel_speed: 900.0,
                lifetime_ms: 300,
            },
        }
    }

    /// Upgrade stats this variant may roll.
    pub fn legal_upgrades(&self) -> &'static [UpgradeStat] {
        match self {
            EquipmentKind::Dagger => &[UpgradeStat::Power, UpgradeStat::Repeat, UpgradeStat::Velocity],
            EquipmentKind::Fan => &[UpgradeStat::Power, UpgradeStat::Amount, UpgradeStat::Velocity],
            EquipmentKind::Cleave | EquipmentKind::Dart => &[
                UpgradeStat::Power,
                UpgradeStat::Velocity,
                UpgradeStat::Repeat,
                UpgradeStat::Amount,
            ],
        }
    }

    /// Increment one pick of `stat` applies. Picks outside the legal set add nothing.
    pub fn upgrade_increment(&self, stat: UpgradeStat) -> f64 {
        if !self.legal_upgrades().contains(&stat) {
            return 0.0;
        }
        match (self, stat) {
            (EquipmentKind::Dagger, UpgradeStat::Power) => 3.0,
            (EquipmentKind::Fan, UpgradeStat::Power) => 2.0,
            (EquipmentKind::Cleave, UpgradeStat::Power) => 3.0,
            (EquipmentKind::Dart, UpgradeStat::Power) => 4.0,
            (EquipmentKind::Dagger, UpgradeStat::Velocity) => 100.0,
            (EquipmentKind::Fan, UpgradeStat::Velocity) => 80.0,
            (EquipmentKind::Cleave, UpgradeStat::Velocity) => 150.0,
            (EquipmentKind::Dart, UpgradeStat::Velocity) => 120.0,
            (EquipmentKind::Cleave, UpgradeStat::Amount) => 2.0,
            (_, UpgradeStat::Amount) => 1.0,
            (_, UpgradeStat::Repeat) => 1.0,
        }
    }
}

impl Equipment {
    /// Base table plus level scaling plus every accumulated upgrade pick.
    pub fn apply_accumulated_upgrades(&self) -> AttackInfo {
        let kind = self.kind();
        let base = kind.base_stats();
        let mut info = AttackInfo {
            equipment_key: self.key().to_string(),
            power: base.power,
            pulls_wielder_to_target: base.pulls_wielder_to_target,
            chain_depth: base.chain_depth,
            shot_count: base.shot_count,
            travel_speed: base.travel_speed,
        };

        for upgrade in &self.upgrades {
            let increment = kind.upgrade_increment(*upgrade);
            match upgrade {
                UpgradeStat::Power => info.power += increment,
                UpgradeStat::Velocity => info.travel_speed += increment,
                UpgradeStat::Amount => info.shot_count += increment,
                UpgradeStat::Repeat => info.chain_depth += increment as u32,
            }
        }

        info.power += base.power_per_level * self.level() as f64;
        info
    }

    /// Full bundle for one attack by `wielder`. Never cached: wielder stats move.
    pub fn compute_attack_bundle(&self, wielder: &BattleInfo) -> AttackInfo {
        let mut info = self.apply_accumulated_upgrades();
        info.power += wielder.power;
        info.chain_depth += wielder.repeat;
        info.shot_count += wielder.amount;
        info
    }

    pub fn lifetime_ms(&self) -> u64 {
        self.kind().base_stats().lifetime_ms
    }
}
