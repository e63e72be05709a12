// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Type Definitions

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::Stats;

/// Largest station population a simulation accepts (2^20).
pub const MAX_STATIONS: u32 = 1 << 20;

// ─── Variant ────────────────────────────────────────────────────────────────

/// Which collision-resolution walk a simulation uses.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Blind binary splitting from a fixed starting level.
    Basic,
    /// Splitting informed by the ready-station count, with sibling pruning.
    Advanced,
}

impl Default for Variant {
    fn default() -> Self { Variant::Basic }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Variant::Basic => write!(f, "basic"),
            Variant::Advanced => write!(f, "advanced"),
        }
    }
}

// ─── Configuration ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("station count {stations} is outside 1..={max}")]
    StationsOutOfRange { stations: u32, max: u32 },

    #[error("at least one ready station is required")]
    NoReadyStations,

    #[error("at least one scenario is required")]
    NoScenarios,
}

/// Parameters of one simulation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Total addressable stations (N).
    pub stations: u32,
    /// Stations that contend in every trial (K).
    pub ready_stations: u32,
    /// Fixed starting depth of the basic walk (I).
    pub probe_level: u32,
    /// Number of trials averaged into the result (X).
    pub scenarios: u32,
    pub variant: Variant,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            stations: 1024,
            ready_stations: 1,
            probe_level: 0,
            scenarios: 100,
            variant: Variant::Basic,
        }
    }
}

impl SimulationConfig {
    pub fn new(stations: u32, ready_stations: u32, probe_level: u32, scenarios: u32, variant: Variant) -> Self {
        Self { stations, ready_stations, probe_level, scenarios, variant }
    }

    /// Rejects values the engine does not correct by itself.
    ///
    /// Ready stations above the station count and probe levels below the
    /// leaves are clamped at run time instead, see [`ConfigAdjustment`].
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stations == 0 || self.stations > MAX_STATIONS {
            return Err(ConfigError::StationsOutOfRange {
                stations: self.stations,
                max: MAX_STATIONS,
            });
        }
        if self.ready_stations == 0 {
            return Err(ConfigError::NoReadyStations);
        }
        if self.scenarios == 0 {
            return Err(ConfigError::NoScenarios);
        }
        Ok(())
    }
}

/// A correction applied to the configuration before the trial loop.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "field", rename_all = "snake_case")]
pub enum ConfigAdjustment {
    ReadyStations { requested: u32, applied: u32 },
    ProbeLevel { requested: u32, applied: u32 },
}

impl fmt::Display for ConfigAdjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigAdjustment::ReadyStations { requested, applied } => write!(
                f,
                "Changed ready stations from {} to {} as it exceeded the station count.",
                requested, applied
            ),
            ConfigAdjustment::ProbeLevel { requested, applied } => write!(
                f,
                "Changed probe level from {} to {}, the last level of the tree.",
                requested, applied
            ),
        }
    }
}

// ─── Probe Counters ─────────────────────────────────────────────────────────

/// Result of probing one node range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Idle,
    Success,
    Collision,
}

/// Raw probe counts of a single trial.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProbeCounts {
    pub success: u64,
    pub collision: u64,
    pub idle: u64,
}

impl ProbeCounts {
    pub fn record(&mut self, outcome: ProbeOutcome) {
        match outcome {
            ProbeOutcome::Idle => self.idle += 1,
            ProbeOutcome::Success => self.success += 1,
            ProbeOutcome::Collision => self.collision += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.success + self.collision + self.idle
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Running sums of per-trial ratios (each trial adds at most 1.0 in total).
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct CumulativeRatios {
    pub success: f64,
    pub collision: f64,
    pub idle: f64,
}

/// Averaged outcome shares of a run, in percent.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ProbePercentages {
    pub success: f64,
    pub collision: f64,
    pub idle: f64,
}

// ─── Run Report ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Human readable summary, one line per clamp applied.
    pub status: String,
    pub adjustments: Vec<ConfigAdjustment>,
    /// Configuration after clamping.
    pub config: SimulationConfig,
    pub level_count: u32,
    /// Level the first row of probes was issued at.
    pub start_level: u32,
    pub seed: Option<u64>,
    pub trials: u64,
    pub cumulative: CumulativeRatios,
    pub percentages: ProbePercentages,
    pub probes_per_trial: Stats,
    pub success_ratio: Stats,
}
