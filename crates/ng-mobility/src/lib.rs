//! `ng-mobility` — moving objects and their routes.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                      |
//! |-------------|---------------------------------------------------------------|
//! | [`state`]   | `MovingObject` — route, edge offset, traversal counters       |
//! | [`store`]   | `MovingObjects` — the live set plus run counters              |
//! | [`reroute`] | `ReroutePolicy` — by-event and by-comparison re-routing       |
//! | [`engine`]  | `MobilityEngine<R>` — one tick of reroute + move + arrival    |
//! | [`error`]   | `MobilityError`, `MobilityResult<T>`                          |
//!
//! # Movement model
//!
//! Each tick an object gets a budget equal to its class speed and spends it
//! along its route.  Crossing the rest of an edge costs
//! `(length − offset) × weight / length`, so an edge at twice its static
//! weight takes twice as long.  What is left of the budget at the end is
//! turned back into distance along the next edge.  Crossing a node bumps the
//! traversed-node count and adds the node's degree to the degree sum.
//!
//! The route always starts at the node the object is at (or has just left);
//! an object is finished when no edge remains.

pub mod engine;
pub mod error;
pub mod reroute;
pub mod state;
pub mod store;


pub use engine::{MobilityEngine, ObjectUpdate, StepOutcome};
pub use error::{MobilityError, MobilityResult};
pub use reroute::{RerouteCounters, RerouteKind, ReroutePolicy};
pub use state::MovingObject;
pub use store::MovingObjects;
