//! High-level mobility engine: one tick of reroute, move, and arrival.

use ng_classes::ObjectClasses;
use ng_core::{ClassId, ObjectId, Point, Tick};
use ng_spatial::{NetworkGraph, Router, RouterStats, WeightSnapshot};

use crate::{MobilityResult, MovingObject, MovingObjects, ReroutePolicy};

/// Position of one object after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectUpdate {
    pub id:       ObjectId,
    pub class:    ClassId,
    pub position: Point,
    /// The object reached its destination this tick.
    pub arrived:  bool,
}

/// Result of [`MobilityEngine::step`].
#[derive(Debug, Default)]
pub struct StepOutcome {
    /// One entry per object live at the start of the tick, in id order.
    pub updates:  Vec<ObjectUpdate>,
    /// Objects removed because they arrived.
    pub finished: Vec<MovingObject>,
}

/// Owns the live objects, the routing algorithm, and the reroute policy.
///
/// # Type parameter
///
/// `R` must implement [`Router`] (e.g. [`ng_spatial::DijkstraRouter`]).
pub struct MobilityEngine<R: Router> {
    pub router:       R,
    pub objects:      MovingObjects,
    pub policy:       ReroutePolicy,
    /// Work of every routing call made through this engine, including the
    /// initial routes computed by spawners.
    pub router_stats: RouterStats,
}

impl<R: Router> MobilityEngine<R> {
    pub fn new(router: R, policy: ReroutePolicy) -> Self {
        Self {
            router,
            objects: MovingObjects::new(),
            policy,
            router_stats: RouterStats::default(),
        }
    }

    /// Advance every live object by one tick under `weights`.
    ///
    /// For each object in id order: consult the reroute policy, then spend
    /// the class speed along the route.  Arrived objects are removed and
    /// returned in [`StepOutcome::finished`].
    pub fn step(
        &mut self,
        now: Tick,
        network: &NetworkGraph,
        weights: &WeightSnapshot,
        classes: &ObjectClasses,
    ) -> MobilityResult<StepOutcome> {
        let mut updates = Vec::with_capacity(self.objects.len());

        // Split borrow: router, policy, stats and store are separate fields.
        let router = &self.router;
        let stats = &mut self.router_stats;
        for object in self.objects.live.iter_mut() {
            self.policy.apply(object, network, weights, router, stats, now)?;
            let arrived = object.advance(network, weights, classes.speed(object.class));
            updates.push(ObjectUpdate {
                id:       object.id,
                class:    object.class,
                position: object.position(network),
                arrived,
            });
        }

        let finished = self.objects.take_arrived();
        Ok(StepOutcome { updates, finished })
    }
}
