//! Moving-object spawner.
//!
//! Per tick: draw the count, then for each new object draw a class and an
//! endpoint pair, compute the initial routes, and resample the pairs that
//! came back unreachable.  A pair that is still unreachable after
//! `max_route_retries` resamples aborts the run.

use log::{debug, trace};
use rand::distributions::{Distribution, WeightedIndex};

use ng_classes::ObjectClasses;
use ng_core::{ClassId, NodeId, SimRng, Tick};
use ng_mobility::{MobilityEngine, MovingObject, ObjectUpdate};
use ng_spatial::{NetworkGraph, Route, RouteResult, Router, RouterStats, WeightSnapshot};

use crate::{EndpointPolicy, SpawnError, SpawnResult, spawn_count};

pub struct ObjectGenerator<E: EndpointPolicy> {
    rng:           SimRng,
    endpoints:     E,
    per_time:      u32,
    at_begin:      u32,
    probabilistic: bool,
    max_retries:   u32,
    class_dist:    Option<WeightedIndex<f64>>,
    retries:       u64,
}

impl<E: EndpointPolicy> ObjectGenerator<E> {
    pub fn new(
        rng: SimRng,
        endpoints: E,
        classes: &ObjectClasses,
        per_time: u32,
        at_begin: u32,
        probabilistic: bool,
        max_retries: u32,
    ) -> Self {
        // All-zero weights leave no distribution; every object is class 0.
        let class_dist = WeightedIndex::new(classes.spawn_weights()).ok();
        Self {
            rng,
            endpoints,
            per_time,
            at_begin,
            probabilistic,
            max_retries: max_retries.max(1),
            class_dist,
            retries: 0,
        }
    }

    /// Resamples performed over the whole run.
    pub fn retries(&self) -> u64 {
        self.retries
    }

    pub fn endpoints(&self) -> &E {
        &self.endpoints
    }

    /// Create this tick's new objects and insert them into `engine`.
    ///
    /// Returns one update per new object (its start position) in id order.
    pub fn spawn<R: Router>(
        &mut self,
        now: Tick,
        network: &NetworkGraph,
        weights: &WeightSnapshot,
        engine: &mut MobilityEngine<R>,
    ) -> SpawnResult<Vec<ObjectUpdate>> {
        let count = spawn_count(&mut self.rng, now, self.per_time, self.at_begin, self.probabilistic);
        if count == 0 {
            return Ok(Vec::new());
        }

        // ── Draw classes and endpoints on this thread ─────────────────────
        let mut draws: Vec<(ClassId, NodeId, NodeId)> = Vec::with_capacity(count as usize);
        for _ in 0..count {
            let class = self.draw_class();
            let (from, to) = self.draw_pair(network)?;
            draws.push((class, from, to));
        }

        // ── Initial routes ────────────────────────────────────────────────
        let pairs: Vec<(NodeId, NodeId)> = draws.iter().map(|&(_, f, t)| (f, t)).collect();
        let results = route_all(&engine.router, network, weights, &pairs, &mut engine.router_stats);

        // ── Resample unreachable pairs, in object order ───────────────────
        let mut updates = Vec::with_capacity(draws.len());
        for ((class, from, to), result) in draws.into_iter().zip(results) {
            let route = match result {
                RouteResult::Found(route) => route,
                RouteResult::Unreachable => self.retry(network, weights, engine, from, to)?,
            };
            let id = engine.objects.allocate_id();
            let object = MovingObject::new(id, class, route, now, network)?;
            updates.push(ObjectUpdate {
                id,
                class,
                position: object.position(network),
                arrived:  false,
            });
            engine.objects.insert(object);
        }
        trace!("{now}: spawned {} moving objects", updates.len());
        Ok(updates)
    }

    fn draw_class(&mut self) -> ClassId {
        match &self.class_dist {
            Some(dist) => ClassId(dist.sample(self.rng.inner()) as u16),
            None => ClassId(0),
        }
    }

    fn draw_pair(&mut self, network: &NetworkGraph) -> SpawnResult<(NodeId, NodeId)> {
        self.endpoints
            .choose(network, &mut self.rng)
            .ok_or(SpawnError::NoStartNodes)
    }

    fn retry<R: Router>(
        &mut self,
        network: &NetworkGraph,
        weights: &WeightSnapshot,
        engine: &mut MobilityEngine<R>,
        mut from: NodeId,
        mut to: NodeId,
    ) -> SpawnResult<Route> {
        for attempt in 1..=self.max_retries {
            self.retries += 1;
            (from, to) = self.draw_pair(network)?;
            let result = engine.router.route(network, weights, from, to, &mut engine.router_stats);
            if let RouteResult::Found(route) = result {
                debug!("found a reachable pair after {attempt} resamples");
                return Ok(route);
            }
        }
        Err(SpawnError::RetriesExhausted { attempts: self.max_retries, from, to })
    }
}

// ── Route computation ─────────────────────────────────────────────────────────

#[cfg(not(feature = "parallel"))]
fn route_all<R: Router>(
    router: &R,
    network: &NetworkGraph,
    weights: &WeightSnapshot,
    pairs: &[(NodeId, NodeId)],
    stats: &mut RouterStats,
) -> Vec<RouteResult> {
    pairs
        .iter()
        .map(|&(from, to)| router.route(network, weights, from, to, stats))
        .collect()
}

/// Each worker accumulates its own stats; they are merged afterwards.
#[cfg(feature = "parallel")]
fn route_all<R: Router>(
    router: &R,
    network: &NetworkGraph,
    weights: &WeightSnapshot,
    pairs: &[(NodeId, NodeId)],
    stats: &mut RouterStats,
) -> Vec<RouteResult> {
    use rayon::prelude::*;

    let routed: Vec<(RouteResult, RouterStats)> = pairs
        .par_iter()
        .map(|&(from, to)| {
            let mut local = RouterStats::default();
            let result = router.route(network, weights, from, to, &mut local);
            (result, local)
        })
        .collect();

    routed
        .into_iter()
        .map(|(result, local)| {
            stats.merge(&local);
            result
        })
        .collect()
}
