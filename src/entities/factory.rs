use uuid::Uuid;

use super::entity::Entity;
use super::types::{BattleInfo, EnemyKind, IdentifierInfo, LevelInfo, Team};
use crate::core::config::PlayerConfig;

pub const PLAYER_SPRITE_KEY: &str = "bandit";

fn next_key(prefix: &str) -> String {
    format!("{}-{}", prefix, Uuid::new_v4().simple())
}

/// Experience cost of each level: `floor((initial + step·i) · (1 + scalar·i))`.
pub fn generate_exp_chart(
    maximum_level: usize,
    initial_exp_cost: f64,
    initial_step: f64,
    scalar: f64,
) -> Vec<f64> {
    (0..maximum_level)
        .map(|i| {
            let i = i as f64;
            ((initial_exp_cost + initial_step * i) * (1.0 + scalar * i)).floor()
        })
        .collect()
}

/// A fresh level-0 player with the configured starting equipment.
pub fn create_player(config: &PlayerConfig) -> Entity {
    let identifier = IdentifierInfo {
        key: next_key("player"),
        sprite_key: PLAYER_SPRITE_KEY.to_string(),
        team: Team::Players,
    };

    let chart = generate_exp_chart(
        config.chart_levels,
        config.chart_initial_cost,
        config.chart_step,
        config.chart_scalar,
    );

    let mut player = Entity::new(
        identifier,
        BattleInfo::new(config.starting_power),
        Some(LevelInfo::new(chart)),
    );
    for kind in &config.starting_equipment {
        player.add_equipment(*kind, Vec::new());
    }
    player
}

/// An enemy whose power is `base_power` scaled by its archetype.
pub fn create_enemy(kind: EnemyKind, base_power: f64) -> Entity {
    let identifier = IdentifierInfo {
        key: next_key("enemy"),
        sprite_key: kind.sprite_key().to_string(),
        team: Team::Enemies,
    };

    let mut enemy = Entity::new(
        identifier,
        BattleInfo::new(base_power * kind.power_multiplier()),
        None,
    );
    enemy.enemy_kind = Some(kind);
    enemy
}
