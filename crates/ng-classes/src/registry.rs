//! The three class tables of a run.

use log::debug;

use ng_core::GeneratorConfig;

use crate::{EdgeClasses, ExternalClasses, ObjectClasses};

/// Edge, moving and external classes, built together once per run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClassRegistry {
    pub edges:     EdgeClasses,
    pub objects:   ObjectClasses,
    pub externals: ExternalClasses,
}

impl ClassRegistry {
    /// Standard tables for `config` on a network with `edge_classes` classes
    /// and data-space extent `extent`.
    pub fn from_config(config: &GeneratorConfig, edge_classes: usize, extent: f64) -> Self {
        let registry = Self {
            edges:     EdgeClasses::standard(edge_classes),
            objects:   ObjectClasses::new(
                config.num_object_classes,
                config.report_probability,
                config.max_speed_divisor,
                extent,
            ),
            externals: ExternalClasses::standard(
                config.num_external_classes,
                config.report_probability,
            ),
        };
        debug!(
            "class registry: {} edge, {} moving, {} external classes (extent {extent})",
            registry.edges.len(),
            registry.objects.len(),
            registry.externals.len()
        );
        registry
    }
}
