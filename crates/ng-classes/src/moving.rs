//! Moving-object classes.
//!
//! Class `c` travels at `base / (c + 1)` per tick where
//! `base = extent / max_speed_divisor`, so class 0 is the fastest.  Every
//! class starts with the run's report probability and spawn weight 1.

use ng_core::ClassId;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectClass {
    pub id:                 ClassId,
    /// Weighted distance budget per tick.
    pub speed:              f64,
    /// Per-mille probability that a position sample is reported.
    pub report_probability: u32,
    /// Relative frequency of this class among new objects.
    pub spawn_weight:       f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ObjectClasses {
    classes: Vec<ObjectClass>,
}

impl ObjectClasses {
    pub fn new(n: usize, report_probability: u32, max_speed_divisor: u32, extent: f64) -> Self {
        let base = extent / f64::from(max_speed_divisor.max(1));
        let classes = (0..n.max(1))
            .map(|c| ObjectClass {
                id:                 ClassId(c as u16),
                speed:              base / (c + 1) as f64,
                report_probability: report_probability.min(1_000),
                spawn_weight:       1.0,
            })
            .collect();
        Self { classes }
    }

    /// Override the report probability of one class.
    pub fn with_report_probability(mut self, class: ClassId, per_mille: u32) -> Self {
        if let Some(c) = self.classes.get_mut(class.index()) {
            c.report_probability = per_mille.min(1_000);
        }
        self
    }

    /// Override the spawn weight of one class.  Negative weights become 0.
    pub fn with_spawn_weight(mut self, class: ClassId, weight: f64) -> Self {
        if let Some(c) = self.classes.get_mut(class.index()) {
            c.spawn_weight = weight.max(0.0);
        }
        self
    }

    #[inline]
    pub fn get(&self, class: ClassId) -> &ObjectClass {
        crate::lookup(&self.classes, class)
    }

    #[inline]
    pub fn speed(&self, class: ClassId) -> f64 {
        self.get(class).speed
    }

    #[inline]
    pub fn report_probability(&self, class: ClassId) -> u32 {
        self.get(class).report_probability
    }

    pub fn spawn_weights(&self) -> Vec<f64> {
        self.classes.iter().map(|c| c.spawn_weight).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ObjectClass> {
        self.classes.iter()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
