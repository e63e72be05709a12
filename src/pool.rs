// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Station Pool & Activation Sampler

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Station {
    /// Fixed identity; slots get reordered by sampling, indices never do.
    pub index: u32,
    /// Ready and not yet isolated in the current trial.
    pub active: bool,
}

/// Fixed arena of stations reused by every trial of one run.
#[derive(Debug, Clone)]
pub struct StationPool {
    stations: Vec<Station>,
}

impl StationPool {
    /// Builds a pool of `count` stations, or `None` when the arena cannot
    /// be reserved.
    pub fn try_new(count: u32) -> Option<Self> {
        let mut stations = Vec::new();
        stations.try_reserve_exact(count as usize).ok()?;
        stations.extend((0..count).map(|index| Station { index, active: false }));
        Some(Self { stations })
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn stations(&self) -> &[Station] {
        &self.stations
    }

    pub fn active_count(&self) -> usize {
        self.stations.iter().filter(|s| s.active).count()
    }

    pub fn reset(&mut self) {
        for station in &mut self.stations {
            station.active = false;
        }
    }

    /// Marks exactly `ready` distinct stations active, every subset of that
    /// size equally likely.
    ///
    /// A partial Fisher-Yates shuffle moves a uniform sample to the front of
    /// the arena; no rejection loop even when `ready` approaches the pool size.
    pub fn activate_random<R: Rng + ?Sized>(&mut self, ready: u32, rng: &mut R) {
        let amount = (ready as usize).min(self.stations.len());
        let (chosen, _) = self.stations.partial_shuffle(rng, amount);
        for station in chosen {
            station.active = true;
        }
    }

    /// Marks the station with identity `index` active. Returns `false` if no
    /// such station exists.
    pub fn activate_index(&mut self, index: u32) -> bool {
        match self.stations.iter_mut().find(|s| s.index == index) {
            Some(station) => {
                station.active = true;
                true
            }
            None => false,
        }
    }

    pub(crate) fn deactivate_slot(&mut self, slot: usize) {
        if let Some(station) = self.stations.get_mut(slot) {
            station.active = false;
        }
    }
}
