//! World-progression timer: countdown, difficulty drain, milestone reweighting
//! of the spawn table, and the boss phase.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::config::{MilestoneConfig, TimerConfig};
use crate::core::geometry::rand_weighted;
use crate::entities::EnemyKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorldPhase {
    Standard,
    BossSpawning,
    BossActive,
}

/// A milestone that fired during an advance.
#[derive(Debug, Clone, PartialEq)]
pub struct MilestoneReached {
    pub index: usize,
    pub at_seconds: f64,
    pub boss: bool,
}

/// Outcome of one [`WorldTimer::advance_with_report`] call.
#[derive(Debug, Clone, PartialEq)]
pub struct TimerAdvance {
    pub survives: bool,
    pub milestone: Option<MilestoneReached>,
}

#[derive(Debug, Clone)]
pub struct WorldTimer {
    pub elapsed_time: f64,
    pub expiry_time: f64,
    /// Ceiling for `expiry_time`; kills cannot bank time past it.
    pub doom_time: f64,
    pub difficulty_scalar: f64,
    pub phase: WorldPhase,
    pub doomed: bool,
    weights: BTreeMap<EnemyKind, f64>,
    milestones: Vec<MilestoneConfig>,
}

impl WorldTimer {
    pub fn new(config: &TimerConfig) -> Self {
        let mut milestones = config.milestones.clone();
        milestones.sort_by(|a, b| a.at_seconds.total_cmp(&b.at_seconds));

        Self {
            elapsed_time: 0.0,
            expiry_time: config.starting_time.min(config.doom_time),
            doom_time: config.doom_time,
            difficulty_scalar: 1.0,
            phase: WorldPhase::Standard,
            doomed: false,
            weights: config.initial_weights.clone(),
            milestones,
        }
    }

    pub fn remaining(&self) -> f64 {
        self.expiry_time
    }

    pub fn weights(&self) -> &BTreeMap<EnemyKind, f64> {
        &self.weights
    }

    pub fn weight(&self, kind: EnemyKind) -> f64 {
        self.weights.get(&kind).copied().unwrap_or(0.0)
    }

    /// Advance by `dt` seconds. Returns false once the countdown has run out.
    pub fn advance(&mut self, dt: f64) -> bool {
        self.advance_with_report(dt).survives
    }

    /// Advance by `dt` seconds, reporting any milestone that fired.
    ///
    /// The countdown drains `dt * difficulty_scalar` while elapsed time grows by
    /// `dt`. Milestones are checked highest threshold first and only the first
    /// one crossed this tick fires, even if a large step skipped past several.
    pub fn advance_with_report(&mut self, dt: f64) -> TimerAdvance {
        if self.doomed {
            return TimerAdvance {
                survives: false,
                milestone: None,
            };
        }

        let previous_elapsed = self.elapsed_time;
        self.expiry_time -= dt * self.difficulty_scalar;
        self.elapsed_time += dt;

        let crossed = self
            .milestones
            .iter()
            .enumerate()
            .rev()
            .find(|(_, m)| previous_elapsed <= m.at_seconds && m.at_seconds < self.elapsed_time)
            .map(|(index, _)| index);

        let milestone = crossed.map(|index| self.apply_milestone(index));

        if self.expiry_time <= 0.0 {
            self.expiry_time = 0.0;
            self.doomed = true;
            log::info!("world timer expired after {:.1}s", self.elapsed_time);
        }

        TimerAdvance {
            survives: !self.doomed,
            milestone,
        }
    }

    fn apply_milestone(&mut self, index: usize) -> MilestoneReached {
        let milestone = &self.milestones[index];
        let reached = MilestoneReached {
            index,
            at_seconds: milestone.at_seconds,
            boss: milestone.boss,
        };

        if milestone.boss {
            for weight in self.weights.values_mut() {
                *weight = 0.0;
            }
            self.weights.insert(EnemyKind::Baron, 1.0);
            if self.phase == WorldPhase::Standard {
                self.phase = WorldPhase::BossSpawning;
            }
        } else {
            for (kind, delta) in &milestone.weight_deltas {
                let weight = self.weights.entry(*kind).or_insert(0.0);
                *weight = (*weight + delta).max(0.0);
            }
        }

        log::debug!(
            "milestone {} at {:.0}s fired (boss: {}), weights now {:?}",
            index,
            reached.at_seconds,
            reached.boss,
            self.weights
        );
        reached
    }

    /// Add time as a reward, clamped to the doom ceiling.
    pub fn extend(&mut self, amount: f64) {
        if self.doomed {
            return;
        }
        self.expiry_time = (self.expiry_time + amount).min(self.doom_time);
    }

    pub fn raise_difficulty(&mut self, amount: f64) {
        self.difficulty_scalar += amount.max(0.0);
    }

    /// Mark the run as lost. Terminal.
    pub fn doom(&mut self) {
        self.doomed = true;
    }

    /// Record that the boss has entered the field.
    pub fn mark_boss_spawned(&mut self) {
        if self.phase == WorldPhase::BossSpawning {
            self.phase = WorldPhase::BossActive;
        }
    }

    /// Weighted draw over the spawn table; uniform over all listed types when
    /// every weight is zero, `None` when the table is empty.
    pub fn sample_enemy_type(&self, rng: &mut impl Rng) -> Option<EnemyKind> {
        let kinds: Vec<EnemyKind> = self.weights.keys().copied().collect();
        let weights: Vec<f64> = self.weights.values().copied().collect();
        rand_weighted(&weights, rng).map(|index| kinds[index])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn timer() -> WorldTimer {
        WorldTimer::new(&TimerConfig::default())
    }

    #[test]
    fn test_advance_drains_by_difficulty() {
        let mut t = timer();
        t.difficulty_scalar = 2.0;
        assert!(t.advance(1.0));
        assert_eq!(t.elapsed_time, 1.0);
        assert_eq!(t.expiry_time, 28.0);
    }

    #[test]
    fn test_advance_reports_doom_and_stays_doomed() {
        let mut t = timer();
        assert!(!t.advance(31.0));
        assert!(t.doomed);
        assert_eq!(t.remaining(), 0.0);
        let elapsed = t.elapsed_time;
        assert!(!t.advance(1.0));
        assert_eq!(t.elapsed_time, elapsed);
    }

    #[test]
    fn test_extend_is_clamped() {
        let mut t = timer();
        t.advance(5.0);
        t.extend(100.0);
        assert_eq!(t.expiry_time, t.doom_time);
    }

    #[test]
    fn test_extend_ignored_after_doom() {
        let mut t = timer();
        t.doom();
        let before = t.expiry_time;
        t.extend(1.0);
        assert_eq!(t.expiry_time, before);
    }

    #[test]
    fn test_single_milestone_applies_deltas() {
        let mut t = timer();
        t.extend(0.0);
        let report = t.advance_with_report(30.5);
        assert_eq!(report.milestone.map(|m| m.index), Some(0));
        assert_eq!(t.weight(EnemyKind::Huntsman), 1.0);
        assert_eq!(t.weight(EnemyKind::Servant), 1.0);
    }

    #[test]
    fn test_milestone_exactly_on_previous_elapsed_fires() {
        let mut config = TimerConfig::default();
        config.starting_time = 500.0;
        config.doom_time = 500.0;
        let mut t = WorldTimer::new(&config);
        t.advance(30.0);
        assert_eq!(t.weight(EnemyKind::Huntsman), 0.0);
        let report = t.advance_with_report(0.1);
        assert_eq!(report.milestone.map(|m| m.index), Some(0));
    }

    #[test]
    fn test_boss_milestone_clears_weights() {
        let mut config = TimerConfig::default();
        config.starting_time = 500.0;
        config.doom_time = 500.0;
        let mut t = WorldTimer::new(&config);
        for _ in 0..121 {
            t.advance(1.0);
        }
        assert_eq!(t.phase, WorldPhase::BossSpawning);
        assert_eq!(t.weight(EnemyKind::Servant), 0.0);
        assert_eq!(t.weight(EnemyKind::Mercenary), 0.0);
        assert_eq!(t.weight(EnemyKind::Baron), 1.0);

        let mut rng = ChaCha8Rng::seed_from_u64(5);
        for _ in 0..50 {
            assert_eq!(t.sample_enemy_type(&mut rng), Some(EnemyKind::Baron));
        }

        t.mark_boss_spawned();
        assert_eq!(t.phase, WorldPhase::BossActive);
    }

    #[test]
    fn test_weights_never_negative() {
        let mut config = TimerConfig::default();
        config.starting_time = 500.0;
        config.doom_time = 500.0;
        config.initial_weights = BTreeMap::from([(EnemyKind::Servant, 0.2)]);
        let mut t = WorldTimer::new(&config);
        t.advance(59.0);
        t.advance(2.0);
        assert_eq!(t.weight(EnemyKind::Servant), 0.0);
    }

    #[test]
    fn test_all_zero_weights_fall_back_to_uniform() {
        let mut config = TimerConfig::default();
        config.initial_weights =
            BTreeMap::from([(EnemyKind::Servant, 0.0), (EnemyKind::Huntsman, 0.0)]);
        let t = WorldTimer::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut seen_servant = false;
        let mut seen_huntsman = false;
        for _ in 0..200 {
            match t.sample_enemy_type(&mut rng) {
                Some(EnemyKind::Servant) => seen_servant = true,
                Some(EnemyKind::Huntsman) => seen_huntsman = true,
                other => panic!("unexpected draw {other:?}"),
            }
        }
        assert!(seen_servant && seen_huntsman);
    }

    #[test]
    fn test_empty_table_samples_nothing() {
        let mut config = TimerConfig::default();
        config.initial_weights.clear();
        let t = WorldTimer::new(&config);
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(t.sample_enemy_type(&mut rng), None);
    }
}
