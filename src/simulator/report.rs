//! Simulation report generation.

use std::collections::BTreeMap;

use serde::Serialize;

use super::runner::RunStats;
use crate::combat::Outcome;

/// Aggregated results from multiple simulation runs.
#[derive(Debug, Clone, Serialize)]
pub struct SimReport {
    pub num_runs: u32,
    pub victories: u32,
    pub doomed: u32,
    pub timed_out: u32,
    pub max_seconds: f64,

    // Aggregated stats
    pub avg_survival_seconds: f64,
    pub best_survival_seconds: f64,
    pub avg_final_level: f64,
    pub avg_kills: f64,
    pub avg_actions: f64,
    pub avg_chains: f64,
    pub chain_drop_rate: f64,

    // Distribution data
    pub level_distribution: BTreeMap<u32, u32>,

    // Equipment analysis
    /// Share of runs that ended holding each equipment type.
    pub equipment_hold_rate: BTreeMap<String, f64>,
    /// Mean level of each equipment type among runs holding it.
    pub avg_equipment_level: BTreeMap<String, f64>,

    /// Share of actor requests served from the pool.
    pub pool_reuse_rate: f64,

    #[serde(skip)]
    pub run_stats: Vec<RunStats>,
}

fn mean(values: impl Iterator<Item = f64>, count: usize) -> f64 {
    values.sum::<f64>() / count.max(1) as f64
}

impl SimReport {
    /// Create a new report from completed run stats.
    pub fn from_runs(runs: Vec<RunStats>, max_seconds: f64) -> Self {
        let n = runs.len();
        let count_outcome =
            |outcome: Outcome| runs.iter().filter(|r| r.outcome == Some(outcome)).count() as u32;

        let mut level_distribution = BTreeMap::new();
        for run in &runs {
            *level_distribution.entry(run.final_level).or_insert(0) += 1;
        }

        let mut holders: BTreeMap<String, Vec<u32>> = BTreeMap::new();
        for run in &runs {
            for (key, level) in &run.equipment_levels {
                holders.entry(key.clone()).or_default().push(*level);
            }
        }
        let equipment_hold_rate = holders
            .iter()
            .map(|(key, levels)| (key.clone(), levels.len() as f64 / n.max(1) as f64))
            .collect();
        let avg_equipment_level = holders
            .iter()
            .map(|(key, levels)| {
                (
                    key.clone(),
                    mean(levels.iter().map(|l| *l as f64), levels.len()),
                )
            })
            .collect();

        let total_chains: u32 = runs.iter().map(|r| r.chains).sum();
        let dropped_chains: u32 = runs.iter().map(|r| r.dropped_chains).sum();
        let created: usize = runs.iter().map(|r| r.actors_created).sum();
        let reused: usize = runs.iter().map(|r| r.actors_reused).sum();

        Self {
            num_runs: n as u32,
            victories: count_outcome(Outcome::Victory),
            doomed: count_outcome(Outcome::Doomed),
            timed_out: runs.iter().filter(|r| r.timed_out).count() as u32,
            max_seconds,
            avg_survival_seconds: mean(runs.iter().map(|r| r.survived_seconds), n),
            best_survival_seconds: runs
                .iter()
                .map(|r| r.survived_seconds)
                .fold(0.0, f64::max),
            avg_final_level: mean(runs.iter().map(|r| r.final_level as f64), n),
            avg_kills: mean(runs.iter().map(|r| r.kills as f64), n),
            avg_actions: mean(runs.iter().map(|r| r.actions as f64), n),
            avg_chains: mean(runs.iter().map(|r| r.chains as f64), n),
            chain_drop_rate: dropped_chains as f64 / total_chains.max(1) as f64,
            level_distribution,
            equipment_hold_rate,
            avg_equipment_level,
            pool_reuse_rate: reused as f64 / (created + reused).max(1) as f64,
            run_stats: runs,
        }
    }

    /// Generate a text report.
    pub fn to_text(&self) -> String {
        let mut report = String::new();

        report.push_str("═══════════════════════════════════════════════════════════════\n");
        report.push_str("                    SIMULATION REPORT\n");
        report.push_str("═══════════════════════════════════════════════════════════════\n\n");

        report.push_str(&format!(
            "Runs: {} total, {} victories, {} doomed, {} timed out ({:.0}s cap)\n\n",
            self.num_runs, self.victories, self.doomed, self.timed_out, self.max_seconds
        ));

        report.push_str("── SURVIVAL ─────────────────────────────────────────────────────\n");
        report.push_str(&format!(
            "  Avg Survival:        {:.1}s\n",
            self.avg_survival_seconds
        ));
        report.push_str(&format!(
            "  Best Survival:       {:.1}s\n",
            self.best_survival_seconds
        ));
        report.push_str(&format!("  Avg Final Level:     {:.1}\n", self.avg_final_level));
        report.push_str(&format!("  Avg Kills:           {:.1}\n\n", self.avg_kills));

        report.push_str("── COMBAT ───────────────────────────────────────────────────────\n");
        report.push_str(&format!("  Avg Actions:         {:.1}\n", self.avg_actions));
        report.push_str(&format!("  Avg Chains:          {:.1}\n", self.avg_chains));
        report.push_str(&format!(
            "  Chains Dropped:      {:.1}%\n",
            self.chain_drop_rate * 100.0
        ));
        report.push_str(&format!(
            "  Pool Reuse:          {:.1}%\n\n",
            self.pool_reuse_rate * 100.0
        ));

        report.push_str("── EQUIPMENT ────────────────────────────────────────────────────\n");
        for (key, rate) in &self.equipment_hold_rate {
            let level = self.avg_equipment_level.get(key).copied().unwrap_or(0.0);
            report.push_str(&format!(
                "  {:<8} held {:>5.1}%  avg level {:.1}\n",
                key,
                rate * 100.0,
                level
            ));
        }
        report.push('\n');

        report.push_str("── FINAL LEVEL ──────────────────────────────────────────────────\n");
        for (level, count) in &self.level_distribution {
            let pct = *count as f64 / self.num_runs.max(1) as f64 * 100.0;
            let bar: String = "█".repeat((pct / 5.0) as usize);
            report.push_str(&format!("  Level {:2}: {:>5.1}% {}\n", level, pct, bar));
        }

        report
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_else(|_| "{}".to_string())
    }
}
