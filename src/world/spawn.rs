//! World-tick cadence: wave sizing, difficulty ramp, and the boss wave.

use std::f64::consts::PI;

use rand::Rng;

use super::timer::{WorldPhase, WorldTimer};
use crate::core::config::WorldConfig;
use crate::core::geometry::{rand_within_donut, Vector2};
use crate::entities::EnemyKind;

/// Servants placed around the player when a session starts.
pub const OPENING_RING_SIZE: usize = 5;

/// What one world tick asks the session to spawn.
#[derive(Debug, Clone, PartialEq)]
pub struct WavePlan {
    pub tick: u32,
    pub spawns: Vec<(EnemyKind, Vector2)>,
    pub boss: bool,
}

#[derive(Debug, Clone, Default)]
pub struct SpawnDirector {
    pub tick_count: u32,
}

impl SpawnDirector {
    pub fn new() -> Self {
        Self::default()
    }

    /// `base + floor(tick / growth_every)` enemies for the current tick.
    pub fn wave_size(&self, config: &WorldConfig) -> u32 {
        config.base_wave_size + self.tick_count / config.wave_growth_every.max(1)
    }

    pub fn difficulty_increment(&self, config: &WorldConfig) -> f64 {
        self.tick_count as f64 / config.difficulty_divisor
    }

    /// Run one world tick against the timer.
    ///
    /// Standard phase: sample a wave around `center`, then ramp difficulty and
    /// count the tick. Boss-spawning phase: a single boss, and the timer moves
    /// to boss-active. Boss-active phase: nothing.
    pub fn plan_tick(
        &mut self,
        timer: &mut WorldTimer,
        config: &WorldConfig,
        center: Vector2,
        rng: &mut impl Rng,
    ) -> WavePlan {
        let tick = self.tick_count;
        match timer.phase {
            WorldPhase::Standard => {
                let count = self.wave_size(config);
                let spawns: Vec<(EnemyKind, Vector2)> = (0..count)
                    .filter_map(|_| {
                        let kind = timer.sample_enemy_type(rng)?;
                        let at = rand_within_donut(
                            center,
                            config.spawn_inner_distance,
                            config.spawn_outer_distance,
                            rng,
                        );
                        Some((kind, at))
                    })
                    .collect();

                timer.raise_difficulty(self.difficulty_increment(config));
                self.tick_count += 1;
                log::debug!(
                    "world tick {}: {} spawns, difficulty {:.3}",
                    tick,
                    spawns.len(),
                    timer.difficulty_scalar
                );
                WavePlan {
                    tick,
                    spawns,
                    boss: false,
                }
            }
            WorldPhase::BossSpawning => {
                let at = rand_within_donut(
                    center,
                    config.spawn_inner_distance,
                    config.spawn_outer_distance,
                    rng,
                );
                timer.mark_boss_spawned();
                log::info!("world tick {}: boss enters", tick);
                WavePlan {
                    tick,
                    spawns: vec![(EnemyKind::Baron, at)],
                    boss: true,
                }
            }
            WorldPhase::BossActive => WavePlan {
                tick,
                spawns: Vec::new(),
                boss: false,
            },
        }
    }
}

/// Evenly spaced points on a ring around `center`.
pub fn opening_ring(center: Vector2, distance: f64) -> Vec<Vector2> {
    (0..OPENING_RING_SIZE)
        .map(|i| {
            let angle = 2.0 * PI * i as f64 / OPENING_RING_SIZE as f64;
            Vector2::new(
                center.x + angle.cos() * distance,
                center.y + angle.sin() * distance,
            )
        })
        .collect()
}
