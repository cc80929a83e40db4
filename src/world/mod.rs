//! World progression: the countdown timer and the spawn cadence it drives.

pub mod spawn;
pub mod timer;

pub use spawn::{opening_ring, SpawnDirector, WavePlan, OPENING_RING_SIZE};
pub use timer::{MilestoneReached, TimerAdvance, WorldPhase, WorldTimer};
