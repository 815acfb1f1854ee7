//! External-object spawner.
//!
//! A new disturbance gets a uniformly random class and center inside the
//! data space, a random drift direction, and the size, growth, slowdown and
//! lifetime of its class scaled by the data-space extent.

use std::f64::consts::TAU;

use log::trace;

use ng_classes::ExternalClasses;
use ng_congestion::{ExternalObject, ExternalObjects};
use ng_core::{ClassId, ExternalId, Point, SimRng, Tick};
use ng_spatial::NetworkGraph;

use crate::spawn_count;

pub struct ExternalObjectGenerator {
    rng:           SimRng,
    per_time:      u32,
    at_begin:      u32,
    probabilistic: bool,
    next_id:       ExternalId,
}

impl ExternalObjectGenerator {
    pub fn new(rng: SimRng, per_time: u32, at_begin: u32, probabilistic: bool) -> Self {
        Self { rng, per_time, at_begin, probabilistic, next_id: ExternalId(0) }
    }

    /// Reserve the next external id.  Also used for objects placed by hand
    /// before the run starts so the two never collide.
    pub fn allocate_id(&mut self) -> ExternalId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    /// Create this tick's disturbances and insert them into `store`.
    ///
    /// Returns copies of the new objects for reporting.
    pub fn spawn(
        &mut self,
        now: Tick,
        network: &NetworkGraph,
        classes: &ExternalClasses,
        store: &mut ExternalObjects,
    ) -> Vec<ExternalObject> {
        let count = spawn_count(&mut self.rng, now, self.per_time, self.at_begin, self.probabilistic);
        let mut created = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let object = self.create(now, network, classes);
            store.insert(object.clone());
            created.push(object);
        }
        if !created.is_empty() {
            trace!("{now}: spawned {} external objects", created.len());
        }
        created
    }

    fn create(&mut self, now: Tick, network: &NetworkGraph, classes: &ExternalClasses) -> ExternalObject {
        let extent = network.extent();
        let bounds = network.bounds();

        let class_index = self.rng.gen_range(0..classes.len().max(1));
        let class = classes.get(ClassId(class_index as u16));
        let center = Point::new(
            self.rng.gen_range(bounds.min.x..=bounds.max.x),
            self.rng.gen_range(bounds.min.y..=bounds.max.y),
        );
        let heading = self.rng.gen_range(0.0..TAU);
        let speed = class.speed * extent;

        ExternalObject {
            id:          self.allocate_id(),
            class:       class.id,
            center,
            half_extent: class.initial_extent * extent,
            velocity:    (speed * heading.cos(), speed * heading.sin()),
            growth:      class.growth * extent,
            slowdown:    class.slowdown,
            created:     now,
            removal:     now + class.lifetime,
        }
    }
}
