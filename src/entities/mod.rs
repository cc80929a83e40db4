//! Entity model: players and enemies, their stats, and factories.

pub mod entity;
pub mod factory;
pub mod types;

pub use entity::Entity;
pub use factory::{create_enemy, create_player, generate_exp_chart};
pub use types::*;
