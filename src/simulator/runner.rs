//! Drives whole sessions on a headless host with a simple autopilot and
//! tallies what happened from the session's event stream.

use std::collections::BTreeMap;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use super::config::SimConfig;
use super::report::SimReport;
use crate::combat::{GameEvent, Outcome};
use crate::core::geometry::Vector2;
use crate::host::{HeadlessHost, Physics};
use crate::session::{Session, SessionState};

/// Statistics for one simulated playthrough.
#[derive(Debug, Clone, Serialize)]
pub struct RunStats {
    pub survived_seconds: f64,
    pub final_level: u32,
    pub kills: u32,
    pub outcome: Option<Outcome>,
    pub timed_out: bool,
    pub actions: u32,
    pub chains: u32,
    pub dropped_chains: u32,
    pub equipment_levels: BTreeMap<String, u32>,
    pub actors_created: usize,
    pub actors_reused: usize,
}

/// Run the full simulation and return a report.
pub fn run_simulation(config: &SimConfig) -> SimReport {
    let mut all_runs = Vec::with_capacity(config.num_runs as usize);

    for run_idx in 0..config.num_runs {
        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed + run_idx as u64),
            None => ChaCha8Rng::from_entropy(),
        };

        let run_stats = simulate_single_run(config, &mut rng);
        if config.verbosity >= 2 {
            log::info!(
                "run {}/{}: {:?} at {:.1}s, level {}, kills {}",
                run_idx + 1,
                config.num_runs,
                run_stats.outcome,
                run_stats.survived_seconds,
                run_stats.final_level,
                run_stats.kills
            );
        }
        all_runs.push(run_stats);
    }

    SimReport::from_runs(all_runs, config.max_seconds)
}

/// Play one session to completion (or the time cap).
pub fn simulate_single_run(config: &SimConfig, rng: &mut impl Rng) -> RunStats {
    let mut session = Session::new(config.game.clone(), HeadlessHost::new());
    session.start();

    let mut actions = 0;
    let mut chains = 0;
    let mut dropped_chains = 0;
    let mut frames = 0u64;
    let max_frames = (config.max_seconds / config.tick_seconds).ceil() as u64;

    while session.state() != SessionState::Over && frames < max_frames {
        match session.state() {
            SessionState::Paused => {
                let options = session.pending_loot().map_or(0, |offer| offer.options.len());
                if options == 0 || session.choose_loot(rng.gen_range(0..options)).is_none() {
                    break;
                }
                continue;
            }
            SessionState::Active => autopilot(&mut session, config.walk_speed),
            SessionState::Pending | SessionState::Over => break,
        }

        session.tick(config.tick_seconds, rng);
        session.host_mut().clear_log();
        frames += 1;

        for event in session.drain_events() {
            match event {
                GameEvent::ActionStarted { .. } => actions += 1,
                GameEvent::ChainQueued { .. } => chains += 1,
                GameEvent::ChainDropped { .. } => dropped_chains += 1,
                _ => {}
            }
        }
    }

    let player = session.player();
    let equipment_levels = player
        .equipment
        .iter()
        .map(|held| (held.key().to_string(), held.level()))
        .collect();
    let pool = session.pool().stats();

    RunStats {
        survived_seconds: session.timer().elapsed_time,
        final_level: player.level(),
        kills: session.enemies_defeated(),
        outcome: session.outcome(),
        timed_out: session.outcome().is_none(),
        actions,
        chains,
        dropped_chains,
        equipment_levels,
        actors_created: pool.created,
        actors_reused: pool.reused,
    }
}

/// Walk toward the closest enemy or uncollected drop and attack the
/// closest enemy whenever the player is ready.
fn autopilot(session: &mut Session<HeadlessHost>, walk_speed: f64) {
    let position = session.player().position;
    let nearest_enemy = session
        .living_enemies()
        .map(|enemy| enemy.position)
        .min_by(|a, b| position.distance(*a).total_cmp(&position.distance(*b)));
    let nearest_drop = session
        .drops()
        .iter()
        .filter(|drop| !drop.collected)
        .map(|drop| drop.position)
        .min_by(|a, b| position.distance(*a).total_cmp(&position.distance(*b)));

    let goal = match (nearest_enemy, nearest_drop) {
        (Some(enemy), Some(drop)) if position.distance(drop) < position.distance(enemy) => Some(drop),
        (Some(enemy), _) => Some(enemy),
        (None, drop) => drop,
    };

    if let Some(handle) = session.player().handle {
        match goal {
            Some(goal) if position.distance(goal) > 90.0 => {
                let direction = position.direction_to(goal);
                session.host_mut().apply_impulse(handle, direction, walk_speed);
            }
            _ => session.host_mut().halt(handle),
        }
    }

    if let Some(target) = nearest_enemy {
        if session.player().ready() {
            session.request_action(target);
        }
    } else if session.player().ready() {
        session.request_action(position + Vector2::new(1.0, 0.0));
    }
}
