//! `ng-classes` — per-class parameters for edges, moving objects, and
//! external objects.
//!
//! Classes are built once per run from the configuration and the network's
//! data space and are read-only afterwards.  Building them twice from the
//! same inputs yields identical values.
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`edge`]     | `EdgeClass`, `EdgeClasses` (cost factor, capacity)    |
//! | [`moving`]   | `ObjectClass`, `ObjectClasses` (speed, reporting)     |
//! | [`external`] | `ExternalClass`, `ExternalClasses` (disturbances)     |
//! | [`registry`] | `ClassRegistry` bundling the three                    |

pub mod edge;
pub mod external;
pub mod moving;
pub mod registry;


pub use edge::{EdgeClass, EdgeClasses};
pub use external::{ExternalClass, ExternalClasses};
pub use moving::{ObjectClass, ObjectClasses};
pub use registry::ClassRegistry;

/// Resolve `class` against a non-empty table, falling back to the last entry
/// for ids past the end.
#[inline]
pub(crate) fn lookup<T>(table: &[T], class: ng_core::ClassId) -> &T {
    &table[class.index().min(table.len() - 1)]
}
