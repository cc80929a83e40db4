//! Doomseal - simulation core of a countdown survival game.
//!
//! The crate owns the rules: the world timer, entities and their equipment,
//! attack resolution with chains, loot, and the session that wires them to a
//! host renderer and physics engine. `HeadlessHost` lets the whole thing run
//! without a frontend, which is how the tests and the balance simulator drive it.

pub mod combat;
pub mod core;
pub mod entities;
pub mod equipment;
pub mod host;
pub mod loot;
pub mod pool;
pub mod session;
pub mod simulator;
pub mod world;
