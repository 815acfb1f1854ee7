//! `ng-spawn` — creation of moving and external objects.
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`count`]     | per-tick spawn counts (fixed mean or Poisson draw)        |
//! | [`endpoints`] | `EndpointPolicy` trait, `RandomEndpoints`, `FixedEndpoints` |
//! | [`moving`]    | `ObjectGenerator` — classes, endpoints, initial routes    |
//! | [`external`]  | `ExternalObjectGenerator` — disturbance footprints        |
//! | [`error`]     | `SpawnError`, `SpawnResult<T>`                            |
//!
//! # Determinism
//!
//! Each generator owns its own RNG stream and draws everything it needs on
//! the calling thread, in object order.  With the `parallel` feature only the
//! initial route computations run on the Rayon pool; they draw nothing, so
//! the output is identical with and without the feature.

pub mod count;
pub mod endpoints;
pub mod error;
pub mod external;
pub mod moving;


pub use count::spawn_count;
pub use endpoints::{EndpointPolicy, FixedEndpoints, RandomEndpoints};
pub use error::{SpawnError, SpawnResult};
pub use external::ExternalObjectGenerator;
pub use moving::ObjectGenerator;
