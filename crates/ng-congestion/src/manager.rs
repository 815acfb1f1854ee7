//! Per-tick edge weight computation.
//!
//! # Weight model
//!
//! ```text
//! static(e) = length(e) × cost_factor(class(e))
//! weight(e) = static(e)
//!           × Π slowdown(x)             for live, non-degenerate x overlapping e
//!           × (1 + density_weight × objects_on(e) / capacity(class(e)))
//! ```
//!
//! Every factor is ≥ 1, so a weight never drops below the static cost and is
//! non-decreasing in each congestion input.  When the run has no external
//! objects at all the congestion pass is skipped and the snapshot stays the
//! static one.

use std::time::{Duration, Instant};

use log::trace;

use ng_classes::EdgeClasses;
use ng_core::{EdgeId, Tick};
use ng_spatial::{NetworkGraph, WeightSnapshot};

use crate::ExternalObjects;

// ── CongestionStats ───────────────────────────────────────────────────────────

/// Work counters for the final statistics.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CongestionStats {
    /// Footprint × edge overlaps evaluated.
    pub computed_decreases: u64,
    /// Edges whose weight actually changed from one tick to the next.
    pub real_decreases:     u64,
    pub refreshes:          u64,
    pub elapsed:            Duration,
}

// ── WeightManager ─────────────────────────────────────────────────────────────

pub struct WeightManager {
    static_costs:   Vec<f64>,
    capacities:     Vec<f64>,
    density_weight: f64,
    enabled:        bool,
    current:        WeightSnapshot,
    stats:          CongestionStats,
}

impl WeightManager {
    /// Manager whose first snapshot (tick 0) holds the static costs.
    ///
    /// `externals_enabled` is the run's "any external objects exist" flag;
    /// when `false`, [`refresh`](Self::refresh) is a no-op.
    pub fn new(
        network: &NetworkGraph,
        classes: &EdgeClasses,
        density_weight: f64,
        externals_enabled: bool,
    ) -> Self {
        let edges = (0..network.edge_count()).map(|i| EdgeId(i as u32));
        let static_costs: Vec<f64> = edges
            .clone()
            .map(|e| network.length(e) * classes.cost_factor(network.class_of(e)))
            .collect();
        let capacities = edges.map(|e| classes.capacity(network.class_of(e))).collect();
        let current = WeightSnapshot::new(Tick::ZERO, static_costs.clone());
        Self {
            static_costs,
            capacities,
            density_weight: density_weight.max(0.0),
            enabled: externals_enabled,
            current,
            stats: CongestionStats::default(),
        }
    }

    /// Static cost of `edge`, before flooring.
    #[inline]
    pub fn static_cost(&self, edge: EdgeId) -> f64 {
        self.static_costs[edge.index()]
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// The snapshot of the most recent refresh.
    #[inline]
    pub fn snapshot(&self) -> &WeightSnapshot {
        &self.current
    }

    pub fn stats(&self) -> &CongestionStats {
        &self.stats
    }

    /// Compute the snapshot for `tick` and swap it in.
    ///
    /// `occupancy[e]` is the number of moving objects on edge `e`; an empty
    /// slice counts as no traffic.
    pub fn refresh(
        &mut self,
        network: &NetworkGraph,
        tick: Tick,
        externals: &ExternalObjects,
        occupancy: &[u32],
    ) -> &WeightSnapshot {
        if !self.enabled {
            return &self.current;
        }
        let started = Instant::now();

        let mut factor = vec![1.0_f64; self.static_costs.len()];
        for x in externals.iter().filter(|x| x.is_effective()) {
            for e in network.edges_intersecting(x.footprint()) {
                factor[e.index()] *= x.slowdown;
                self.stats.computed_decreases += 1;
            }
        }

        let weights: Vec<f64> = self
            .static_costs
            .iter()
            .zip(&self.capacities)
            .zip(&factor)
            .enumerate()
            .map(|(i, ((&base, &capacity), &f))| {
                let load = occupancy.get(i).copied().unwrap_or(0) as f64;
                base * f * (1.0 + self.density_weight * load / capacity)
            })
            .collect();

        let (next, changed) = self.current.successor(tick, weights);
        self.current = next;

        self.stats.real_decreases += changed as u64;
        self.stats.refreshes += 1;
        self.stats.elapsed += started.elapsed();
        trace!("{tick}: {changed} edge weights changed");
        &self.current
    }
}
