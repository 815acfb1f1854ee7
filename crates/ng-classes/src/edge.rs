//! Edge classes: static cost factor and congestion capacity.
//!
//! Lower class ids are faster roads.  The static cost of an edge is its
//! length times the cost factor of its class; the capacity divides the
//! number of moving objects on an edge when density feeds into congestion.

use ng_core::ClassId;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeClass {
    /// Multiplier applied to the edge length.  Always ≥ 1.
    pub cost_factor: f64,
    /// Objects the edge carries before density doubles its weight
    /// (at `density_weight = 1`).  Always > 0.
    pub capacity:    f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EdgeClasses {
    classes: Vec<EdgeClass>,
}

impl EdgeClasses {
    /// `n` classes where class `c` has cost factor `c + 1` and capacity
    /// `10 × (n − c)`.
    pub fn standard(n: usize) -> Self {
        let n = n.max(1);
        let classes = (0..n)
            .map(|c| EdgeClass {
                cost_factor: (c + 1) as f64,
                capacity:    (10 * (n - c)) as f64,
            })
            .collect();
        Self { classes }
    }

    /// Explicit class table.  An empty table becomes one neutral class.
    ///
    /// Cost factors below 1 are raised to 1; a capacity that is not
    /// positive becomes 1.
    pub fn from_classes(classes: Vec<EdgeClass>) -> Self {
        if classes.is_empty() {
            return Self::standard(1);
        }
        let classes = classes
            .into_iter()
            .map(|c| EdgeClass {
                cost_factor: c.cost_factor.max(1.0),
                capacity:    if c.capacity > 0.0 { c.capacity } else { 1.0 },
            })
            .collect();
        Self { classes }
    }

    #[inline]
    pub fn get(&self, class: ClassId) -> &EdgeClass {
        crate::lookup(&self.classes, class)
    }

    #[inline]
    pub fn cost_factor(&self, class: ClassId) -> f64 {
        self.get(class).cost_factor
    }

    #[inline]
    pub fn capacity(&self, class: ClassId) -> f64 {
        self.get(class).capacity
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}
