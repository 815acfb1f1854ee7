//! Re-routing policy.
//!
//! Two triggers, evaluated once per live object per tick before it moves:
//!
//! - **By event**: an edge on the remaining route changed weight after the
//!   route was computed.  The route is recomputed at once.
//! - **By comparison**: the route is at least `interval` ticks old and a
//!   `probability / 1000` draw succeeds.  A fresh route replaces the current
//!   one only if `fresh < current × (1 − margin)`.  Skipped for an object
//!   already rerouted by event in the same tick.
//!
//! An object part-way along an edge stays committed to it; recomputation
//! starts from the far end of that edge and keeps it in front.

use log::trace;

use ng_core::{RerouteConfig, SimRng, Tick};
use ng_spatial::{NetworkGraph, RouteResult, Router, RouterStats, WeightSnapshot};

use crate::{MobilityResult, MovingObject};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RerouteKind {
    ByEvent,
    ByComparison,
}

/// Run totals.  Both only ever increase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RerouteCounters {
    pub by_event:      u64,
    pub by_comparison: u64,
    /// Comparisons performed, switched or not.
    pub comparisons:   u64,
}

pub struct ReroutePolicy {
    config:   RerouteConfig,
    rng:      SimRng,
    counters: RerouteCounters,
}

impl ReroutePolicy {
    pub fn new(config: RerouteConfig, rng: SimRng) -> Self {
        Self { config, rng, counters: RerouteCounters::default() }
    }

    pub fn counters(&self) -> &RerouteCounters {
        &self.counters
    }

    pub fn config(&self) -> &RerouteConfig {
        &self.config
    }

    /// Apply both triggers to `object` for tick `now`.
    ///
    /// Returns which trigger replaced the route, if any.
    pub fn apply<R: Router + ?Sized>(
        &mut self,
        object: &mut MovingObject,
        network: &NetworkGraph,
        weights: &WeightSnapshot,
        router: &R,
        stats: &mut RouterStats,
        now: Tick,
    ) -> MobilityResult<Option<RerouteKind>> {
        let anchor = object.anchor();
        if anchor == object.destination {
            return Ok(None);
        }

        // ── By event ──────────────────────────────────────────────────────
        if self.config.by_event
            && weights.any_changed_after(object.remaining_edges(), object.route_computed_at)
        {
            match router.route(network, weights, anchor, object.destination, stats) {
                RouteResult::Found(fresh) => {
                    object.splice(fresh, now)?;
                    self.counters.by_event += 1;
                    trace!("{now}: {} rerouted by event", object.id);
                    return Ok(Some(RerouteKind::ByEvent));
                }
                RouteResult::Unreachable => {
                    // Keep the old route; the changes are now accounted for.
                    object.route_computed_at = now;
                }
            }
        }

        // ── By comparison ─────────────────────────────────────────────────
        if self.config.interval == 0 || now.since(object.compared_at) < self.config.interval {
            return Ok(None);
        }
        if !self.rng.per_mille(self.config.probability) {
            return Ok(None);
        }
        object.compared_at = now;
        self.counters.comparisons += 1;

        let current = weights.path_cost(object.replaceable_edges());
        let fresh = match router.route(network, weights, anchor, object.destination, stats) {
            RouteResult::Found(fresh) => fresh,
            RouteResult::Unreachable => return Ok(None),
        };
        if fresh.cost < current * (1.0 - self.config.margin) {
            object.splice(fresh, now)?;
            self.counters.by_comparison += 1;
            trace!("{now}: {} rerouted by comparison", object.id);
            return Ok(Some(RerouteKind::ByComparison));
        }
        Ok(None)
    }
}
