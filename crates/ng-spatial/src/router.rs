//! Routing trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The generator calls routing through the [`Router`] trait, so a caller can
//! swap in A*, a bidirectional search or a precomputed oracle without
//! touching the engine.  The default [`DijkstraRouter`] searches from the
//! start and stops as soon as the destination is settled.
//!
//! # Costs
//!
//! Edge costs come from the tick's [`WeightSnapshot`]; the router never
//! computes weights itself.  An unreachable destination is an ordinary
//! [`RouteResult::Unreachable`], not an error.
//!
//! # Statistics
//!
//! Every call accumulates into a caller-owned [`RouterStats`].  Parallel
//! callers keep one per worker and [`merge`](RouterStats::merge) afterwards.

use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

use ordered_float::OrderedFloat;

use ng_core::{EdgeId, NodeId};

use crate::{NetworkGraph, WeightSnapshot};

// ── Route ─────────────────────────────────────────────────────────────────────

/// A path through the network.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    /// Nodes in travel order, starting at the source.  Never empty.
    pub nodes: Vec<NodeId>,
    /// Edges in travel order; `edges.len() == nodes.len() - 1`.
    pub edges: Vec<EdgeId>,
    /// Sum of the snapshot weights of `edges`.
    pub cost: f64,
}

impl Route {
    /// One-node route of cost 0.
    pub fn trivial(at: NodeId) -> Self {
        Route { nodes: vec![at], edges: Vec::new(), cost: 0.0 }
    }

    /// `true` if source and destination coincide.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn source(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn destination(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }
}

/// Outcome of a routing query.
#[derive(Debug, Clone, PartialEq)]
pub enum RouteResult {
    Found(Route),
    /// No path connects the two nodes.
    Unreachable,
}

impl RouteResult {
    pub fn is_found(&self) -> bool {
        matches!(self, RouteResult::Found(_))
    }

    pub fn into_route(self) -> Option<Route> {
        match self {
            RouteResult::Found(r) => Some(r),
            RouteResult::Unreachable => None,
        }
    }
}

// ── RouterStats ───────────────────────────────────────────────────────────────

/// Work counters accumulated over many routing calls.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouterStats {
    pub calls:        u64,
    pub unreachable:  u64,
    pub heap_inserts: u64,
    pub heap_fetches: u64,
    /// Relaxations that lowered an already finite tentative cost.
    pub decreases:    u64,
    /// Nodes popped with a current (non-stale) cost.
    pub settled:      u64,
    pub elapsed:      Duration,
}

impl RouterStats {
    pub fn merge(&mut self, other: &RouterStats) {
        self.calls        += other.calls;
        self.unreachable  += other.unreachable;
        self.heap_inserts += other.heap_inserts;
        self.heap_fetches += other.heap_fetches;
        self.decreases    += other.decreases;
        self.settled      += other.settled;
        self.elapsed      += other.elapsed;
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so one router can serve Rayon
/// workers computing initial routes in parallel.
pub trait Router: Send + Sync {
    /// Cheapest route from `from` to `to` under `weights`.
    ///
    /// Must be deterministic: identical inputs give an identical node
    /// sequence and cost.
    fn route(
        &self,
        network: &NetworkGraph,
        weights: &WeightSnapshot,
        from: NodeId,
        to: NodeId,
        stats: &mut RouterStats,
    ) -> RouteResult;
}

// ── DijkstraRouter ────────────────────────────────────────────────────────────

/// Single-source Dijkstra over the CSR graph with early exit.
///
/// Decrease-key is done by re-insertion; stale heap entries are skipped on
/// fetch.  Heap keys are `(cost, node)`, so among equal costs the lowest
/// node id is settled first, and a tentative predecessor is only replaced by
/// a strictly cheaper one.  Together with id-sorted adjacency rows this makes
/// ties resolve the same way on every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct DijkstraRouter;

impl Router for DijkstraRouter {
    fn route(
        &self,
        network: &NetworkGraph,
        weights: &WeightSnapshot,
        from: NodeId,
        to: NodeId,
        stats: &mut RouterStats,
    ) -> RouteResult {
        let started = Instant::now();
        let result = dijkstra(network, weights, from, to, stats);
        stats.calls += 1;
        if !result.is_found() {
            stats.unreachable += 1;
        }
        stats.elapsed += started.elapsed();
        result
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

fn dijkstra(
    network: &NetworkGraph,
    weights: &WeightSnapshot,
    from: NodeId,
    to: NodeId,
    stats: &mut RouterStats,
) -> RouteResult {
    if !network.contains_node(from) || !network.contains_node(to) {
        return RouteResult::Unreachable;
    }
    if from == to {
        return RouteResult::Found(Route::trivial(from));
    }

    let n = network.node_count();
    let mut dist      = vec![f64::INFINITY; n];
    // (predecessor node, edge used to reach it); INVALID for unreached nodes.
    let mut prev      = vec![(NodeId::INVALID, EdgeId::INVALID); n];

    dist[from.index()] = 0.0;

    let mut heap: BinaryHeap<Reverse<(OrderedFloat<f64>, NodeId)>> = BinaryHeap::new();
    heap.push(Reverse((OrderedFloat(0.0), from)));
    stats.heap_inserts += 1;

    while let Some(Reverse((OrderedFloat(cost), node))) = heap.pop() {
        stats.heap_fetches += 1;

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }
        stats.settled += 1;

        if node == to {
            return RouteResult::Found(reconstruct(&prev, from, to, cost));
        }

        for (neighbor, edge) in network.neighbors(node) {
            let new_cost = cost + weights.weight(edge);
            let current = dist[neighbor.index()];
            if new_cost < current {
                if current.is_finite() {
                    stats.decreases += 1;
                }
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = (node, edge);
                heap.push(Reverse((OrderedFloat(new_cost), neighbor)));
                stats.heap_inserts += 1;
            }
        }
    }

    RouteResult::Unreachable
}

fn reconstruct(prev: &[(NodeId, EdgeId)], from: NodeId, to: NodeId, cost: f64) -> Route {
    let mut nodes = vec![to];
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let (p, e) = prev[cur.index()];
        nodes.push(p);
        edges.push(e);
        cur = p;
    }
    nodes.reverse();
    edges.reverse();
    Route { nodes, edges, cost }
}
