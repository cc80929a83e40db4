//! Simulation configuration.

use crate::core::config::GameConfig;

/// Configuration for a batch of simulated playthroughs.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of simulation runs to perform
    pub num_runs: u32,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// Simulated seconds per run before it counts as timed out
    pub max_seconds: f64,

    /// Frame length fed to `Session::tick`
    pub tick_seconds: f64,

    /// Walking speed of the autopilot, in world units per second
    pub walk_speed: f64,

    /// Game tuning used by every run
    pub game: GameConfig,

    /// Log verbosity (0 = silent, 1 = summary, 2 = per run)
    pub verbosity: u8,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            num_runs: 100,
            seed: None,
            max_seconds: 600.0,
            tick_seconds: 1.0 / 30.0,
            walk_speed: 220.0,
            game: GameConfig::default(),
            verbosity: 1,
        }
    }
}

impl SimConfig {
    /// Few short runs, for smoke checks.
    pub fn quick() -> Self {
        Self {
            num_runs: 10,
            max_seconds: 120.0,
            ..Default::default()
        }
    }
}
