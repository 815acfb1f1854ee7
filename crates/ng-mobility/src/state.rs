//! Per-object route state and movement.

use std::collections::VecDeque;

use ng_core::{ClassId, EdgeId, NodeId, ObjectId, Point, Tick};
use ng_spatial::{NetworkGraph, Route, WeightSnapshot};

use crate::{MobilityError, MobilityResult};

/// One object travelling over the network.
///
/// `route_nodes[0]` is the node the object is at or has most recently
/// passed; when `offset > 0` it is part-way along `route_edges[0]`, which
/// leads to `route_nodes[1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct MovingObject {
    pub id:          ObjectId,
    pub class:       ClassId,
    pub created:     Tick,
    pub destination: NodeId,

    route_nodes: VecDeque<NodeId>,
    route_edges: VecDeque<EdgeId>,

    /// Distance travelled along `route_edges[0]`, within `[0, length]`.
    pub offset:            f64,
    /// Tick the current route suffix was computed at.
    pub route_computed_at: Tick,
    /// Tick of the last comparison (or route computation).
    pub compared_at:       Tick,

    /// Nodes visited, including the start.  Always ≥ 1.
    pub traversed_nodes:  u64,
    /// Sum of the degrees of the visited nodes.
    pub traversed_degree: u64,
}

impl MovingObject {
    /// Place a new object at the start of `route`.
    pub fn new(
        id: ObjectId,
        class: ClassId,
        route: Route,
        now: Tick,
        network: &NetworkGraph,
    ) -> MobilityResult<Self> {
        check_route(id, &route)?;
        let start = route.nodes[0];
        let destination = route.nodes[route.nodes.len() - 1];
        Ok(Self {
            id,
            class,
            created: now,
            destination,
            route_nodes: route.nodes.into(),
            route_edges: route.edges.into(),
            offset: 0.0,
            route_computed_at: now,
            compared_at: now,
            traversed_nodes: 1,
            traversed_degree: network.degree(start) as u64,
        })
    }

    // ── Route queries ─────────────────────────────────────────────────────

    /// The node at the front of the route.
    #[inline]
    pub fn current_node(&self) -> NodeId {
        self.route_nodes[0]
    }

    /// `true` once no edge remains.
    #[inline]
    pub fn has_arrived(&self) -> bool {
        self.route_edges.is_empty()
    }

    /// `true` while the object is part-way along its first edge.
    #[inline]
    pub fn is_committed(&self) -> bool {
        self.offset > 0.0 && !self.route_edges.is_empty()
    }

    pub fn route_nodes(&self) -> impl ExactSizeIterator<Item = NodeId> + '_ {
        self.route_nodes.iter().copied()
    }

    pub fn remaining_edges(&self) -> impl ExactSizeIterator<Item = EdgeId> + '_ {
        self.route_edges.iter().copied()
    }

    /// Node from which a recomputed route continues: the far end of a
    /// committed edge, otherwise the current node.
    pub fn anchor(&self) -> NodeId {
        if self.is_committed() { self.route_nodes[1] } else { self.route_nodes[0] }
    }

    /// Edges after the anchor; the part a reroute may replace.
    pub fn replaceable_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        let skip = usize::from(self.is_committed());
        self.route_edges.iter().copied().skip(skip)
    }

    /// Current planar position.
    pub fn position(&self, network: &NetworkGraph) -> Point {
        let here = network.position(self.route_nodes[0]);
        match self.route_edges.front() {
            Some(&edge) if self.offset > 0.0 => {
                let len = network.length(edge);
                let next = network.position(self.route_nodes[1]);
                if len > 0.0 { here.lerp(next, self.offset / len) } else { here }
            }
            _ => here,
        }
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Replace everything after the anchor with `suffix`, which must start
    /// at [`anchor`](Self::anchor).
    pub fn splice(&mut self, suffix: Route, now: Tick) -> MobilityResult<()> {
        check_route(self.id, &suffix)?;
        debug_assert_eq!(suffix.nodes[0], self.anchor());
        let keep = usize::from(self.is_committed());
        self.route_nodes.truncate(keep);
        self.route_edges.truncate(keep);
        self.route_nodes.extend(suffix.nodes);
        self.route_edges.extend(suffix.edges);
        self.route_computed_at = now;
        self.compared_at = now;
        Ok(())
    }

    /// Spend one tick's `budget` along the route under `weights`.
    ///
    /// Returns `true` if the object reached its destination.
    pub fn advance(&mut self, network: &NetworkGraph, weights: &WeightSnapshot, budget: f64) -> bool {
        let mut budget = budget.max(0.0);
        while let Some(&edge) = self.route_edges.front() {
            let len = network.length(edge);
            let w = weights.weight(edge);
            let cost = if len > 0.0 { (len - self.offset) * w / len } else { 0.0 };

            if cost <= budget {
                budget -= cost;
                self.route_edges.pop_front();
                self.route_nodes.pop_front();
                self.offset = 0.0;
                self.traversed_nodes += 1;
                self.traversed_degree += network.degree(self.route_nodes[0]) as u64;
            } else {
                self.offset = (self.offset + budget * len / w).min(len);
                break;
            }
        }
        self.has_arrived()
    }
}

fn check_route(object: ObjectId, route: &Route) -> MobilityResult<()> {
    if route.nodes.is_empty() {
        return Err(MobilityError::EmptyRoute(object));
    }
    if route.edges.len() + 1 != route.nodes.len() {
        return Err(MobilityError::MalformedRoute {
            object,
            nodes: route.nodes.len(),
            edges: route.edges.len(),
        });
    }
    Ok(())
}
