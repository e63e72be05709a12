// Copyright 2026 Hypermesh Foundation. All rights reserved.
// Tree-Splitting Contention Simulator - Probe Walk
//
// One call walks the address tree for a single trial. Every probe scans the
// whole pool (O(N)), independent of how many ready stations remain.

use crate::pool::StationPool;
use crate::tree::{node_address, TreeGeometry};
use crate::types::{ProbeCounts, ProbeOutcome, Variant};

/// What a single scan of one node range found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Scan {
    Idle,
    /// Exactly one active station, at this pool slot.
    Single(usize),
    Collision,
}

/// Probe a node range: count active stations whose address matches.
fn scan(pool: &StationPool, address: u32, shuffle: u32) -> Scan {
    let mut found = None;
    let mut active = 0usize;
    for (slot, station) in pool.stations().iter().enumerate() {
        if station.active && node_address(station.index, shuffle) == address {
            active += 1;
            found = Some(slot);
        }
    }
    match (active, found) {
        (0, _) => Scan::Idle,
        (1, Some(slot)) => Scan::Single(slot),
        _ => Scan::Collision,
    }
}

/// Walk context: exclusive access to the pool and the trial's counters for
/// the whole recursion.
struct Walk<'a> {
    pool: &'a mut StationPool,
    counts: &'a mut ProbeCounts,
    ready_left: u32,
}

impl Walk<'_> {
    fn probe(&mut self, address: u32, shuffle: u32) -> Scan {
        let result = scan(self.pool, address, shuffle);
        self.counts.record(match result {
            Scan::Idle => ProbeOutcome::Idle,
            Scan::Single(_) => ProbeOutcome::Success,
            Scan::Collision => ProbeOutcome::Collision,
        });
        result
    }

    /// Blind splitting: every collision is split into both children, which
    /// are always probed.
    fn basic(&mut self, nodes: u32, shuffle: u32, offset: u32) {
        for node in 0..nodes {
            let address = node + offset;
            if self.probe(address, shuffle) == Scan::Collision {
                // Unique indices: a leaf never holds two stations.
                debug_assert!(shuffle > 0, "collision at leaf address {}", address);
                self.basic(2, shuffle - 1, address * 2);
            }
        }
    }

    /// Informed splitting. `split` is set when `nodes` are the two children
    /// of a node that collided.
    fn advanced(&mut self, nodes: u32, shuffle: u32, offset: u32, split: bool) {
        let mut sibling_idle = false;
        for node in 0..nodes {
            if self.ready_left == 0 {
                break;
            }
            let address = node + offset;

            // Parent held at least two, first child none: this one collides.
            if split && node == 1 && sibling_idle && shuffle > 0 {
                self.advanced(2, shuffle - 1, address * 2, true);
                continue;
            }

            match self.probe(address, shuffle) {
                Scan::Idle => sibling_idle = true,
                Scan::Single(slot) => {
                    sibling_idle = false;
                    self.ready_left -= 1;
                    self.pool.deactivate_slot(slot);
                }
                Scan::Collision => {
                    sibling_idle = false;
                    debug_assert!(shuffle > 0, "collision at leaf address {}", address);
                    self.advanced(2, shuffle - 1, address * 2, true);
                }
            }
        }
    }
}

/// Resolves every active station in `pool` with one walk of the tree,
/// adding each probe result to `counts`.
///
/// The basic walk starts at `probe_level`; the advanced walk ignores it and
/// starts at [`TreeGeometry::informed_level`] of `ready_stations`. Returns the
/// level the first row was probed at.
pub fn run_trial(
    variant: Variant,
    tree: &TreeGeometry,
    probe_level: u32,
    ready_stations: u32,
    pool: &mut StationPool,
    counts: &mut ProbeCounts,
) -> u32 {
    let level = start_level(variant, tree, probe_level, ready_stations);
    let nodes = tree.nodes_at(level);
    let shuffle = tree.shuffle(level);
    let mut walk = Walk { pool, counts, ready_left: ready_stations };
    match variant {
        Variant::Basic => walk.basic(nodes, shuffle, 0),
        Variant::Advanced => walk.advanced(nodes, shuffle, 0, false),
    }
    level
}

/// Level of the first probe row for `variant`.
pub fn start_level(variant: Variant, tree: &TreeGeometry, probe_level: u32, ready_stations: u32) -> u32 {
    match variant {
        Variant::Basic => tree.clamp_level(probe_level),
        Variant::Advanced => tree.informed_level(ready_stations),
    }
}
