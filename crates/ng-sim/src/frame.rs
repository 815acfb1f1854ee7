//! Committed inter-tick snapshots handed to observers.

use ng_core::{ClassId, ExternalId, ObjectId, Point, Rect, Tick};

/// Position of one live moving object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectMarker {
    pub id:       ObjectId,
    pub class:    ClassId,
    pub position: Point,
}

/// Footprint of one live external object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExternalMarker {
    pub id:        ExternalId,
    pub class:     ClassId,
    pub footprint: Rect,
}

/// Everything live at the end of one tick.
///
/// Built after all of the tick's mutations, so a viewer on another thread
/// never sees a half-updated tick.  Objects that arrived or expired during
/// the tick are absent.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    pub tick:      Tick,
    pub moving:    Vec<ObjectMarker>,
    pub externals: Vec<ExternalMarker>,
}

impl Frame {
    /// Moving objects of `class` in this frame.
    pub fn moving_of_class(&self, class: ClassId) -> impl Iterator<Item = &ObjectMarker> {
        self.moving.iter().filter(move |m| m.class == class)
    }

    pub fn is_empty(&self) -> bool {
        self.moving.is_empty() && self.externals.is_empty()
    }
}
