// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Address Tree Geometry
//
// Depth 0 is the root covering every station. A node at depth `d` is
// addressed by the station index shifted right by `shuffle = max_level - d`
// bits, so siblings partition the index space disjointly.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TreeGeometry {
    stations: u32,
    level_count: u32,
}

impl TreeGeometry {
    /// Smallest tree whose leaf row (2^(levels-1) wide) holds every station.
    pub fn new(stations: u32) -> Self {
        let mut level_count = 1;
        let mut level_width: u64 = 1;
        while level_width < u64::from(stations) {
            level_count += 1;
            level_width <<= 1;
        }
        Self { stations, level_count }
    }

    pub fn stations(&self) -> u32 {
        self.stations
    }

    pub fn level_count(&self) -> u32 {
        self.level_count
    }

    /// Depth of the leaf row.
    pub fn max_level(&self) -> u32 {
        self.level_count - 1
    }

    /// Low-order index bits ignored when addressing nodes at `level`.
    pub fn shuffle(&self, level: u32) -> u32 {
        self.max_level().saturating_sub(level)
    }

    /// Nodes in the first probe row when starting at `level`.
    ///
    /// Capped at the station count: only the leaf row of a tree whose
    /// width exceeds N has addresses with no station behind them.
    pub fn nodes_at(&self, level: u32) -> u32 {
        let width = 1u64 << level.min(self.max_level());
        width.min(u64::from(self.stations)) as u32
    }

    /// Starting level of the advanced walk: `round(log2(ready))`, so the
    /// first row holds roughly one ready station per node.
    pub fn informed_level(&self, ready_stations: u32) -> u32 {
        if ready_stations <= 1 {
            return 0;
        }
        let level = f64::from(ready_stations).log2().round() as u32;
        level.min(self.max_level())
    }

    pub fn clamp_level(&self, level: u32) -> u32 {
        level.min(self.max_level())
    }
}

/// Address of the node holding station `index` when `shuffle` bits are ignored.
#[inline]
pub fn node_address(index: u32, shuffle: u32) -> u32 {
    index >> shuffle
}
