//! Frozen per-tick edge weights.
//!
//! A [`WeightSnapshot`] is computed once at the start of a tick and then only
//! read: every routing and comparison decision in that tick sees the same
//! values.  The next tick's snapshot is built into a fresh buffer and swapped
//! in whole, so no reader can observe a partially updated tick.
//!
//! Alongside each weight the snapshot records the tick at which that value
//! last changed.  Re-routing by event compares these stamps against the tick
//! a route was computed at.

use ng_core::{EdgeId, Tick};

use crate::NetworkGraph;

/// Floor applied to every weight so zero-length edges still cost something.
pub const MIN_EDGE_COST: f64 = 1e-6;

/// Edge weights valid for exactly one tick.
#[derive(Clone, Debug)]
pub struct WeightSnapshot {
    tick:       Tick,
    weights:    Vec<f64>,
    changed_at: Vec<Tick>,
}

impl WeightSnapshot {
    /// Initial snapshot: every edge is stamped as changed at `tick`.
    ///
    /// NaN or too-small weights are raised to [`MIN_EDGE_COST`].
    pub fn new(tick: Tick, mut weights: Vec<f64>) -> Self {
        weights.iter_mut().for_each(|w| *w = floor(*w));
        let changed_at = vec![tick; weights.len()];
        Self { tick, weights, changed_at }
    }

    /// Snapshot whose weights are the raw edge lengths.  Handy for tests and
    /// for callers without edge classes.
    pub fn from_lengths(network: &NetworkGraph, tick: Tick) -> Self {
        Self::new(tick, network.edge_length.clone())
    }

    /// Build the snapshot for `tick` from freshly computed weights.
    ///
    /// Edges whose value differs from `self` get `tick` as their change
    /// stamp; the others keep their previous stamp.  Returns the new snapshot
    /// and the number of edges that changed.
    pub fn successor(&self, tick: Tick, mut weights: Vec<f64>) -> (WeightSnapshot, usize) {
        debug_assert_eq!(weights.len(), self.weights.len());
        let mut changed_at = self.changed_at.clone();
        let mut changed = 0;
        for (i, w) in weights.iter_mut().enumerate() {
            *w = floor(*w);
            if *w != self.weights[i] {
                changed_at[i] = tick;
                changed += 1;
            }
        }
        (WeightSnapshot { tick, weights, changed_at }, changed)
    }

    /// The tick this snapshot is valid for.
    #[inline]
    pub fn tick(&self) -> Tick {
        self.tick
    }

    #[inline]
    pub fn weight(&self, edge: EdgeId) -> f64 {
        self.weights[edge.index()]
    }

    /// Tick at which the weight of `edge` last changed.
    #[inline]
    pub fn changed_at(&self, edge: EdgeId) -> Tick {
        self.changed_at[edge.index()]
    }

    /// `true` if any of `edges` changed weight after `since`.
    pub fn any_changed_after<I>(&self, edges: I, since: Tick) -> bool
    where
        I: IntoIterator<Item = EdgeId>,
    {
        edges.into_iter().any(|e| self.changed_at(e) > since)
    }

    /// Sum of the weights of `edges`.
    pub fn path_cost<I>(&self, edges: I) -> f64
    where
        I: IntoIterator<Item = EdgeId>,
    {
        edges.into_iter().map(|e| self.weight(e)).sum()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.weights
    }
}

#[inline]
fn floor(w: f64) -> f64 {
    // NaN fails the comparison and is floored too.
    if w >= MIN_EDGE_COST { w } else { MIN_EDGE_COST }
}
