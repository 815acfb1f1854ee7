//! The `MovingObjects` store — live objects plus run-wide counters.

use ng_core::ObjectId;

use crate::MovingObject;

/// Live moving objects in ascending id order.
///
/// Ids are assigned by the store from a monotonically increasing counter,
/// so the vector stays sorted without ever re-sorting.
#[derive(Debug)]
pub struct MovingObjects {
    pub live: Vec<MovingObject>,
    next_id:  ObjectId,
    peak:     usize,
}

impl MovingObjects {
    pub fn new() -> Self {
        Self { live: Vec::new(), next_id: ObjectId(0), peak: 0 }
    }

    /// Reserve the next object id.
    pub fn allocate_id(&mut self) -> ObjectId {
        let id = self.next_id;
        self.next_id = id.next();
        id
    }

    pub fn insert(&mut self, object: MovingObject) {
        debug_assert!(self.live.last().is_none_or(|l| l.id < object.id));
        self.live.push(object);
        self.peak = self.peak.max(self.live.len());
    }

    /// Remove and return every object that has arrived, preserving order.
    pub fn take_arrived(&mut self) -> Vec<MovingObject> {
        let (arrived, live): (Vec<_>, Vec<_>) =
            self.live.drain(..).partition(MovingObject::has_arrived);
        self.live = live;
        arrived
    }

    /// Remove everything, returning what was live.
    pub fn drain(&mut self) -> Vec<MovingObject> {
        std::mem::take(&mut self.live)
    }

    /// Number of objects currently on (or about to enter) each edge.
    pub fn occupancy(&self, edge_count: usize) -> Vec<u32> {
        let mut counts = vec![0u32; edge_count];
        for o in &self.live {
            if let Some(e) = o.remaining_edges().next() {
                counts[e.index()] += 1;
            }
        }
        counts
    }

    pub fn iter(&self) -> impl Iterator<Item = &MovingObject> {
        self.live.iter()
    }

    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Ids handed out so far.
    pub fn created(&self) -> u64 {
        u64::from(self.next_id.0)
    }

    /// Largest number simultaneously live.
    pub fn peak(&self) -> usize {
        self.peak
    }
}

impl Default for MovingObjects {
    fn default() -> Self {
        Self::new()
    }
}
