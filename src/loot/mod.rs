//! Level-up loot: which equipment is offered and which upgrades it carries.

pub mod generation;

pub use generation::{generate_loot, roll_upgrade_count, roll_upgrades, LootOffer};
