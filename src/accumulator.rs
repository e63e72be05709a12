// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Trial Accumulator
//
// Averages per-trial ratios rather than pooling raw counts, so a trial that
// needed many probes weighs the same as one that needed a single probe.

use crate::stats::RunningStats;
use crate::types::{CumulativeRatios, ProbeCounts, ProbePercentages};

#[derive(Debug, Clone, Default)]
pub struct TrialAccumulator {
    sums: CumulativeRatios,
    trials: u64,
    probes_per_trial: RunningStats,
    success_ratio: RunningStats,
}

impl TrialAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Folds one finished trial into the sums and resets `counts` for the
    /// next trial. A trial without any probe is ignored.
    pub fn absorb(&mut self, counts: &mut ProbeCounts) {
        let total = counts.total();
        if total > 0 {
            let total = total as f64;
            let success = counts.success as f64 / total;
            self.sums.success += success;
            self.sums.collision += counts.collision as f64 / total;
            self.sums.idle += counts.idle as f64 / total;
            self.trials += 1;
            self.probes_per_trial.push(total);
            self.success_ratio.push(success);
        }
        counts.reset();
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn cumulative(&self) -> CumulativeRatios {
        self.sums
    }

    /// Mean of the per-trial ratios, in percent.
    pub fn percentages(&self) -> ProbePercentages {
        if self.trials == 0 {
            return ProbePercentages::default();
        }
        let scale = 100.0 / self.trials as f64;
        ProbePercentages {
            success: self.sums.success * scale,
            collision: self.sums.collision * scale,
            idle: self.sums.idle * scale,
        }
    }

    pub fn probes_per_trial(&self) -> &RunningStats {
        &self.probes_per_trial
    }

    pub fn success_ratio(&self) -> &RunningStats {
        &self.success_ratio
    }
}
