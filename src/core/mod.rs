//! Shared building blocks: tuning, constants, geometry and the task scheduler.

pub mod config;
pub mod constants;
pub mod geometry;
pub mod scheduler;

pub use config::{ConfigError, GameConfig};
pub use geometry::{Bounds, Vector2};
pub use scheduler::{Scheduler, TaskToken};
