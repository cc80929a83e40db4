use std::collections::HashSet;

use super::types::{BattleInfo, EnemyKind, EntityState, IdentifierInfo, LevelInfo, Team};
use crate::core::geometry::Vector2;
use crate::equipment::{AttackId, Equipment, EquipmentKind, UpgradeStat};
use crate::host::ActorHandle;

/// A player or enemy: identity, combat stats, optional level progress,
/// held equipment, and the per-action hit ledger.
#[derive(Debug, Clone)]
pub struct Entity {
    pub identifier: IdentifierInfo,
    pub battle: BattleInfo,
    pub level_info: Option<LevelInfo>,
    pub equipment: Vec<Equipment>,
    /// Last known world position, synced from the physics host each tick.
    pub position: Vector2,
    /// Render/physics actor backing this entity, once spawned.
    pub handle: Option<ActorHandle>,
    /// Archetype for enemies; `None` for players.
    pub enemy_kind: Option<EnemyKind>,
    hit_by_attack: HashSet<AttackId>,
    hit_by_equipment: HashSet<String>,
}

impl Entity {
    pub fn new(identifier: IdentifierInfo, battle: BattleInfo, level_info: Option<LevelInfo>) -> Self {
        Self {
            identifier,
            battle,
            level_info,
            equipment: Vec::new(),
            position: Vector2::ZERO,
            handle: None,
            enemy_kind: None,
            hit_by_attack: HashSet::new(),
            hit_by_equipment: HashSet::new(),
        }
    }

    pub fn key(&self) -> &str {
        &self.identifier.key
    }

    pub fn sprite_key(&self) -> &str {
        &self.identifier.sprite_key
    }

    pub fn team(&self) -> Team {
        self.identifier.team
    }

    pub fn power(&self) -> f64 {
        self.battle.power
    }

    pub fn alive(&self) -> bool {
        self.battle.alive
    }

    /// Only idle entities may start an action.
    pub fn ready(&self) -> bool {
        self.battle.state == EntityState::Idle
    }

    pub fn set_state(&mut self, state: EntityState) {
        self.battle.state = state;
    }

    pub fn is_boss(&self) -> bool {
        self.enemy_kind.is_some_and(|kind| kind.is_boss())
    }

    pub fn level(&self) -> u32 {
        self.level_info.as_ref().map_or(0, |info| info.level)
    }

    /// Add an item, stacking onto an existing one of the same type.
    ///
    /// Stacking raises the held item's level and appends the new picks to its
    /// accumulated upgrades, so each type is held at most once.
    pub fn add_equipment(&mut self, kind: EquipmentKind, upgrades: Vec<UpgradeStat>) -> &Equipment {
        match self.equipment.iter().position(|held| held.kind() == kind) {
            Some(index) => {
                let held = &mut self.equipment[index];
                held.info.level += 1;
                held.upgrades.extend(upgrades);
                &self.equipment[index]
            }
            None => {
                self.equipment.push(Equipment::new(kind, upgrades));
                &self.equipment[self.equipment.len() - 1]
            }
        }
    }

    pub fn held(&self, kind: EquipmentKind) -> Option<&Equipment> {
        self.equipment.iter().find(|held| held.kind() == kind)
    }

    pub fn held_kinds(&self) -> Vec<EquipmentKind> {
        self.equipment.iter().map(|held| held.kind()).collect()
    }

    /// Add experience. The caller loops [`Entity::try_level_up`] afterwards,
    /// since one gain can cross several thresholds.
    pub fn add_experience(&mut self, amount: f64) {
        if let Some(info) = self.level_info.as_mut() {
            info.experience += amount;
        }
    }

    /// Spend the next threshold and advance one level. Returns the new level.
    pub fn try_level_up(&mut self) -> Option<u32> {
        let info = self.level_info.as_mut()?;
        let threshold = info.next_threshold()?;
        if info.experience < threshold {
            return None;
        }
        info.experience -= threshold;
        info.level += 1;
        Some(info.level)
    }

    /// True if this attack instance, or any attack from this equipment, has
    /// already registered against this entity during the current action.
    pub fn confirm_hit(&self, attack: AttackId, equipment_key: &str) -> bool {
        self.hit_by_attack.contains(&attack) || self.hit_by_equipment.contains(equipment_key)
    }

    pub fn register_hit(&mut self, attack: AttackId, equipment_key: &str) {
        self.hit_by_attack.insert(attack);
        self.hit_by_equipment.insert(equipment_key.to_string());
    }

    /// Clear the ledger; called at the start of every player action.
    pub fn reset_hits(&mut self) {
        self.hit_by_attack.clear();
        self.hit_by_equipment.clear();
    }
}
