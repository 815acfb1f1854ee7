//! `ng-spatial` — road network, spatial indexing, edge weights, and routing.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                     |
//! |-------------|--------------------------------------------------------------|
//! | [`network`] | `NetworkGraph` (CSR + two R-trees), `NetworkBuilder`         |
//! | [`loader`]  | `load_network` from node/edge CSV files                      |
//! | [`weights`] | `WeightSnapshot`, the frozen per-tick edge weights           |
//! | [`router`]  | `Router` trait, `DijkstraRouter`, `RouteResult`, stats       |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on `ng-core` types.        |

pub mod error;
pub mod loader;
pub mod network;
pub mod router;
pub mod weights;


pub use error::{SpatialError, SpatialResult};
pub use loader::{load_network, load_network_readers};
pub use network::{NetworkBuilder, NetworkGraph};
pub use router::{DijkstraRouter, Route, RouteResult, Router, RouterStats};
pub use weights::{MIN_EDGE_COST, WeightSnapshot};
