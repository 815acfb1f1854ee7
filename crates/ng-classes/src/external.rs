//! External-object classes.
//!
//! Sizes, growth and speed are fractions of the data-space extent so the
//! same class table works for any network scale.  The spawner multiplies
//! them by `extent` when it creates an object.

use ng_core::ClassId;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalClass {
    pub id:                 ClassId,
    /// Weight multiplier for overlapped edges.  Always ≥ 1.
    pub slowdown:           f64,
    /// Initial half-extent of the footprint, relative to the extent.
    pub initial_extent:     f64,
    /// Half-extent change per tick, relative to the extent.
    pub growth:             f64,
    /// Drift distance per tick, relative to the extent.
    pub speed:              f64,
    /// Ticks from creation to removal.
    pub lifetime:           u64,
    pub report_probability: u32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ExternalClasses {
    classes: Vec<ExternalClass>,
}

impl ExternalClasses {
    /// `n` classes; class `c` slows by `2 + c`, starts at half-extent
    /// `0.02 × (c + 1)` and lives `20 + 10c` ticks.
    pub fn standard(n: usize, report_probability: u32) -> Self {
        let classes = (0..n.max(1))
            .map(|c| ExternalClass {
                id:                 ClassId(c as u16),
                slowdown:           2.0 + c as f64,
                initial_extent:     0.02 * (c + 1) as f64,
                growth:             0.002,
                speed:              0.005,
                lifetime:           20 + 10 * c as u64,
                report_probability: report_probability.min(1_000),
            })
            .collect();
        Self { classes }
    }

    /// Replace one class definition; ids past the end are ignored.
    pub fn with_class(mut self, class: ExternalClass) -> Self {
        let slowdown = class.slowdown.max(1.0);
        if let Some(slot) = self.classes.get_mut(class.id.index()) {
            *slot = ExternalClass { slowdown, ..class };
        }
        self
    }

    #[inline]
    pub fn get(&self, class: ClassId) -> &ExternalClass {
        crate::lookup(&self.classes, class)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ExternalClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
