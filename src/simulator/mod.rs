//! Game balance simulator for Monte Carlo analysis.
//!
//! Plays many sessions on the headless host with an autopilot to analyze:
//! - How long runs survive against the countdown
//! - Level and kill pacing
//! - Which equipment builds emerge from loot choices
//! - Chain and pool behaviour under load
//!
//! The simulator drives the real `Session`, so its results follow gameplay
//! rules exactly.

mod config;
mod report;
mod runner;

pub use config::SimConfig;
pub use report::SimReport;
pub use runner::{run_simulation, simulate_single_run, RunStats};
