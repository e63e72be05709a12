// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Running Statistics
//
// Streaming mean / variance (Welford) so a run never has to keep its
// per-trial samples around.

use serde::{Deserialize, Serialize};

/// z-score of a two-sided 95% confidence interval.
const Z_95: f64 = 1.96;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Stats {
    pub mean: f64,
    pub std_dev: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    pub min: f64,
    pub max: f64,
    pub n: u64,
}

#[derive(Debug, Clone, Copy)]
pub struct RunningStats {
    n: u64,
    mean: f64,
    m2: f64,
    min: f64,
    max: f64,
}

impl Default for RunningStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunningStats {
    pub fn new() -> Self {
        Self { n: 0, mean: 0.0, m2: 0.0, min: f64::INFINITY, max: f64::NEG_INFINITY }
    }

    pub fn push(&mut self, sample: f64) {
        self.n += 1;
        let delta = sample - self.mean;
        self.mean += delta / self.n as f64;
        self.m2 += delta * (sample - self.mean);
        self.min = self.min.min(sample);
        self.max = self.max.max(sample);
    }

    pub fn len(&self) -> u64 {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    /// Sample statistics (n-1 denominator); all zero when nothing was pushed.
    pub fn summary(&self) -> Stats {
        if self.n == 0 {
            return Stats::default();
        }
        let variance = if self.n > 1 { self.m2 / (self.n - 1) as f64 } else { 0.0 };
        let std_dev = variance.sqrt();
        let stderr = std_dev / (self.n as f64).sqrt();
        Stats {
            mean: self.mean,
            std_dev,
            ci_lower: self.mean - Z_95 * stderr,
            ci_upper: self.mean + Z_95 * stderr,
            min: self.min,
            max: self.max,
            n: self.n,
        }
    }
}
