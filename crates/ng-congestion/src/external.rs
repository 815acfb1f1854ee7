//! External objects: transient rectangular disturbances.
//!
//! An external object lives `lifetime` ticks.  Each tick it drifts by a
//! fixed velocity, grows during the first half of its life and shrinks
//! during the second, never below zero.  It slows the edges it overlaps only
//! while its footprint has positive size.

use ng_core::{ClassId, ExternalId, Point, Rect, Tick};

// ── ExternalObject ────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
pub struct ExternalObject {
    pub id:          ExternalId,
    pub class:       ClassId,
    pub center:      Point,
    /// Current half-extent of the square footprint.  Never negative.
    pub half_extent: f64,
    /// Drift per tick.
    pub velocity:    (f64, f64),
    /// Half-extent change per tick (absolute map units).
    pub growth:      f64,
    pub slowdown:    f64,
    pub created:     Tick,
    /// First tick at which the object no longer exists.
    pub removal:     Tick,
}

impl ExternalObject {
    #[inline]
    pub fn footprint(&self) -> Rect {
        Rect::around(self.center, self.half_extent)
    }

    /// `true` while the footprint has positive size.
    #[inline]
    pub fn is_effective(&self) -> bool {
        self.half_extent > 0.0
    }

    #[inline]
    pub fn is_expired(&self, now: Tick) -> bool {
        now >= self.removal
    }

    /// Apply one tick of drift and growth for tick `now`.
    pub fn advance(&mut self, now: Tick) {
        let lifetime = self.removal.since(self.created);
        let age = now.since(self.created);
        self.center = self.center.offset(self.velocity.0, self.velocity.1);
        let delta = if age * 2 <= lifetime { self.growth } else { -self.growth };
        self.half_extent = (self.half_extent + delta).max(0.0);
    }
}

// ── ExternalObjects ───────────────────────────────────────────────────────────

/// The live external objects of a run, in creation (= id) order.
#[derive(Debug, Default)]
pub struct ExternalObjects {
    live:    Vec<ExternalObject>,
    created: u64,
    peak:    usize,
}

impl ExternalObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, object: ExternalObject) {
        debug_assert!(self.live.last().is_none_or(|l| l.id < object.id));
        self.live.push(object);
        self.created += 1;
        self.peak = self.peak.max(self.live.len());
    }

    /// Advance every object to `now` and remove the expired ones.
    ///
    /// Returns the removed objects (in id order) so they can be reported.
    pub fn advance(&mut self, now: Tick) -> Vec<ExternalObject> {
        let mut removed = Vec::new();
        let mut kept = Vec::with_capacity(self.live.len());
        for mut x in self.live.drain(..) {
            if x.is_expired(now) {
                removed.push(x);
            } else {
                x.advance(now);
                kept.push(x);
            }
        }
        self.live = kept;
        removed
    }

    /// Remove everything, returning what was live.
    pub fn drain(&mut self) -> Vec<ExternalObject> {
        std::mem::take(&mut self.live)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalObject> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Objects ever inserted.
    pub fn created(&self) -> u64 {
        self.created
    }

    /// Largest number simultaneously live.
    pub fn peak(&self) -> usize {
        self.peak
    }
}
