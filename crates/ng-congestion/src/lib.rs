//! `ng-congestion` — external disturbances and dynamic edge weights.
//!
//! | Module       | Contents                                                 |
//! |--------------|----------------------------------------------------------|
//! | [`external`] | `ExternalObject`, `ExternalObjects` (live disturbances)  |
//! | [`manager`]  | `WeightManager`, `CongestionStats`                       |
//!
//! The manager turns static class costs plus the live disturbances of a
//! tick into one frozen [`WeightSnapshot`](ng_spatial::WeightSnapshot).

pub mod external;
pub mod manager;

#[cfg(test)]
mod tests;

pub use external::{ExternalObject, ExternalObjects};
pub use manager::{CongestionStats, WeightManager};
