// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Simulation Core

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};
use wasm_bindgen::prelude::*;

use crate::accumulator::TrialAccumulator;
use crate::pool::StationPool;
use crate::probe;
use crate::tree::TreeGeometry;
use crate::types::*;

/// Trials between two progress log lines.
pub const PROGRESS_INTERVAL: u64 = 10_000;

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("cannot allocate a pool of {stations} stations")]
    Allocation { stations: u32 },
}

// ─── ProbeSimulation struct ─────────────────────────────────────────────────

#[wasm_bindgen]
pub struct ProbeSimulation {
    pub(crate) config: SimulationConfig,
    /// Fixed seed for reproducible runs; entropy per run when `None`.
    pub(crate) seed: Option<u64>,
    pub(crate) last_report: Option<RunReport>,
}

// ─── Internal Logic (Testable, pure Rust) ────────────────────────────────────

impl ProbeSimulation {
    pub fn from_config(config: SimulationConfig) -> Self {
        Self { config, seed: None, last_report: None }
    }

    /// Every run re-seeds from `seed`, so repeated runs are identical.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self { config, seed: Some(seed), last_report: None }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Replaces the configuration and forgets the previous result.
    pub fn set_config(&mut self, config: SimulationConfig) {
        self.config = config;
        self.last_report = None;
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn last_report(&self) -> Option<&RunReport> {
        self.last_report.as_ref()
    }

    pub fn run(&mut self) -> Result<RunReport, SimulationError> {
        self.run_with(|_, _| {})
    }

    /// Runs every trial, handing each trial's raw counts to `on_trial`
    /// before they are folded into the averages.
    ///
    /// Out of range ready-station counts and probe levels are clamped first;
    /// the clamped values are kept as the simulation's configuration and
    /// reported in the status message.
    pub fn run_with<F>(&mut self, mut on_trial: F) -> Result<RunReport, SimulationError>
    where
        F: FnMut(u64, &ProbeCounts),
    {
        self.config.validate()?;
        let tree = TreeGeometry::new(self.config.stations);
        let adjustments = self.clamp(&tree);
        let config = self.config;

        let mut pool = StationPool::try_new(config.stations)
            .ok_or(SimulationError::Allocation { stations: config.stations })?;
        let mut rng = match self.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let start_level =
            probe::start_level(config.variant, &tree, config.probe_level, config.ready_stations);

        info!(
            stations = config.stations,
            ready = config.ready_stations,
            start_level,
            scenarios = config.scenarios,
            variant = %config.variant,
            "Starting simulation"
        );

        let mut accumulator = TrialAccumulator::new();
        let mut counts = ProbeCounts::default();
        for trial in 0..u64::from(config.scenarios) {
            pool.reset();
            pool.activate_random(config.ready_stations, &mut rng);
            probe::run_trial(
                config.variant,
                &tree,
                config.probe_level,
                config.ready_stations,
                &mut pool,
                &mut counts,
            );
            on_trial(trial, &counts);
            accumulator.absorb(&mut counts);

            let done = trial + 1;
            if done % PROGRESS_INTERVAL == 0 {
                debug!(done, total = config.scenarios, "Trials completed");
            }
        }

        let mut status = String::from("Finished simulation.\n");
        for adjustment in &adjustments {
            status.push(' ');
            status.push_str(&adjustment.to_string());
            status.push('\n');
        }

        let percentages = accumulator.percentages();
        info!(
            success = percentages.success,
            collision = percentages.collision,
            idle = percentages.idle,
            "Simulation finished"
        );

        let report = RunReport {
            status,
            adjustments,
            config,
            level_count: tree.level_count(),
            start_level,
            seed: self.seed,
            trials: accumulator.trials(),
            cumulative: accumulator.cumulative(),
            percentages,
            probes_per_trial: accumulator.probes_per_trial().summary(),
            success_ratio: accumulator.success_ratio().summary(),
        };
        self.last_report = Some(report.clone());
        Ok(report)
    }

    fn clamp(&mut self, tree: &TreeGeometry) -> Vec<ConfigAdjustment> {
        let mut adjustments = Vec::new();
        if self.config.ready_stations > self.config.stations {
            adjustments.push(ConfigAdjustment::ReadyStations {
                requested: self.config.ready_stations,
                applied: self.config.stations,
            });
            self.config.ready_stations = self.config.stations;
        }
        if self.config.probe_level > tree.max_level() {
            adjustments.push(ConfigAdjustment::ProbeLevel {
                requested: self.config.probe_level,
                applied: tree.max_level(),
            });
            self.config.probe_level = tree.max_level();
        }
        for adjustment in &adjustments {
            warn!(%adjustment, "Configuration clamped");
        }
        adjustments
    }

    /// Averaged percentages of the most recent run; zero before any run.
    pub fn percentages(&self) -> ProbePercentages {
        self.last_report
            .as_ref()
            .map(|r| r.percentages)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn config(stations: u32, ready: u32, level: u32, scenarios: u32, variant: Variant) -> SimulationConfig {
        SimulationConfig::new(stations, ready, level, scenarios, variant)
    }

    #[test]
    fn queries_are_zero_before_any_run() {
        let sim = ProbeSimulation::from_config(SimulationConfig::default());
        assert!(sim.last_report().is_none());
        assert_eq!(sim.success_percent(), 0.0);
        assert_eq!(sim.collision_percent(), 0.0);
        assert_eq!(sim.idle_percent(), 0.0);
    }

    #[test]
    fn invalid_configuration_is_rejected() {
        let mut sim = ProbeSimulation::with_seed(config(0, 1, 0, 1, Variant::Basic), 1);
        assert!(matches!(
            sim.run(),
            Err(SimulationError::Config(ConfigError::StationsOutOfRange { .. }))
        ));

        sim.set_config(config(8, 1, 0, 0, Variant::Basic));
        assert!(matches!(sim.run(), Err(SimulationError::Config(ConfigError::NoScenarios))));
    }

    #[test]
    fn clamps_are_kept_in_configuration() {
        let mut sim = ProbeSimulation::with_seed(config(8, 9, 12, 5, Variant::Basic), 4);
        let report = sim.run().unwrap();
        assert_eq!(sim.config().ready_stations, 8);
        assert_eq!(sim.config().probe_level, 3);
        assert_eq!(report.adjustments.len(), 2);
        assert!(report.status.starts_with("Finished simulation."));
    }

    #[test]
    fn set_config_discards_previous_result() {
        let mut sim = ProbeSimulation::with_seed(config(16, 2, 0, 10, Variant::Basic), 9);
        sim.run().unwrap();
        assert!(sim.success_percent() > 0.0);
        sim.set_config(config(32, 2, 0, 10, Variant::Basic));
        assert!(sim.last_report().is_none());
    }

    #[test]
    fn report_counts_every_trial() {
        let mut sim = ProbeSimulation::with_seed(config(64, 5, 2, 250, Variant::Advanced), 17);
        let report = sim.run().unwrap();
        assert_eq!(report.trials, 250);
        assert_eq!(report.probes_per_trial.n, 250);
        assert_eq!(report.start_level, 2);
        assert_eq!(report.level_count, 7);
        let p = report.percentages;
        assert_relative_eq!(p.success + p.collision + p.idle, 100.0, epsilon = 1e-9);
    }
}
