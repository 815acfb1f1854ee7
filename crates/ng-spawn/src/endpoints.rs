//! Start/destination choice for new moving objects.
//!
//! # Pluggability
//!
//! [`ObjectGenerator`](crate::ObjectGenerator) asks an [`EndpointPolicy`]
//! for every pair, so the route-length distribution can be swapped without
//! touching the generator.  The default [`RandomEndpoints`] draws a target
//! length and direction from a random start and snaps the end point to the
//! nearest node.

use std::f64::consts::TAU;

use ng_core::{NodeId, SimRng};
use ng_spatial::NetworkGraph;

/// Chooses `(start, destination)` pairs.
pub trait EndpointPolicy: Send {
    /// Next pair, or `None` if the network offers no valid start.
    fn choose(&mut self, network: &NetworkGraph, rng: &mut SimRng) -> Option<(NodeId, NodeId)>;

    /// Mean target route length over all draws, if the policy has one.
    fn average_target_length(&self) -> Option<f64> {
        None
    }
}

// ── RandomEndpoints ───────────────────────────────────────────────────────────

/// Uniform start among nodes with at least one edge; destination at a
/// random distance in `[0, route_length_factor × extent]` and random
/// direction, snapped to the nearest node other than the start.
pub struct RandomEndpoints {
    starts:         Vec<NodeId>,
    max_length:     f64,
    total_length:   f64,
    draws:          u64,
}

impl RandomEndpoints {
    pub fn new(network: &NetworkGraph, route_length_factor: f64) -> Self {
        let starts = (0..network.node_count())
            .map(|i| NodeId(i as u32))
            .filter(|&n| network.degree(n) > 0)
            .collect();
        Self {
            starts,
            max_length: route_length_factor.max(0.0) * network.extent(),
            total_length: 0.0,
            draws: 0,
        }
    }
}

impl EndpointPolicy for RandomEndpoints {
    fn choose(&mut self, network: &NetworkGraph, rng: &mut SimRng) -> Option<(NodeId, NodeId)> {
        let start = *rng.choose(&self.starts)?;
        let length = rng.gen_range(0.0..=self.max_length);
        let angle = rng.gen_range(0.0..TAU);
        self.total_length += length;
        self.draws += 1;

        let target = network
            .position(start)
            .offset(length * angle.cos(), length * angle.sin());
        // The nearest node other than the start; a start with an edge
        // guarantees a second node exists.
        let dest = network
            .k_nearest_nodes(target, 2)
            .into_iter()
            .find(|&n| n != start)?;
        Some((start, dest))
    }

    fn average_target_length(&self) -> Option<f64> {
        (self.draws > 0).then(|| self.total_length / self.draws as f64)
    }
}

// ── FixedEndpoints ────────────────────────────────────────────────────────────

/// Always the same pair.  Used for reproducible scenarios.
#[derive(Debug, Clone, Copy)]
pub struct FixedEndpoints {
    pub from: NodeId,
    pub to:   NodeId,
}

impl EndpointPolicy for FixedEndpoints {
    fn choose(&mut self, network: &NetworkGraph, _rng: &mut SimRng) -> Option<(NodeId, NodeId)> {
        (network.contains_node(self.from) && network.contains_node(self.to)).then_some((self.from, self.to))
    }
}
