//! Attack resolution engine, chain bookkeeping, and the event log.

pub mod context;
pub mod engine;
pub mod events;
pub mod repeat;

pub use context::{Deferred, SimContext};
pub use engine::{exchange_power, select_nearest, AttackEngine, HitOutcome, LiveStrike};
pub use events::{ChainDropReason, GameEvent, Outcome};
pub use repeat::RepeatTracker;
