//! `ng-core` — foundational types for the `netgen` moving-object generator.
//!
//! This crate is a dependency of every other `ng-*` crate.  It intentionally
//! has no `ng-*` dependencies and minimal external ones (`rand`, `thiserror`,
//! `log`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module     | Contents                                                 |
//! |------------|----------------------------------------------------------|
//! | [`ids`]    | `NodeId`, `EdgeId`, `ObjectId`, `ExternalId`, `ClassId`  |
//! | [`geo`]    | `Point`, `Rect`, segment/rectangle clipping              |
//! | [`time`]   | `Tick`, `SimClock`                                       |
//! | [`rng`]    | `SimRng` (seeded, splittable)                            |
//! | [`config`] | `GeneratorConfig`, `Limits`, key/value loading           |
//! | [`error`]  | `CoreError`, `CoreResult`                                |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to ids, geometry and time.  |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{GeneratorConfig, Limits, RerouteConfig};
pub use error::{CoreError, CoreResult};
pub use geo::{Point, Rect};
pub use ids::{ClassId, EdgeId, ExternalId, NodeId, ObjectId};
pub use rng::SimRng;
pub use time::{SimClock, Tick};
