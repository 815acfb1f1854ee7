//! `ng-sim` — the tick loop of the netgen moving-object generator.
//!
//! # Phases
//!
//! ```text
//! Initializing ──build()──▶ Running ──max time / abort──▶ Draining ──▶ Done
//! ```
//!
//! [`GeneratorBuilder::build`] performs *Initializing*.  Each *Running* tick:
//!
//! ```text
//!   ① Weights   — refresh the edge-weight snapshot from external objects
//!                 and edge occupancy; frozen for the rest of the tick.
//!   ② External  — advance, report, and expire external objects.
//!   ③ Moving    — reroute, advance, report, and expire moving objects.
//!   ④ Spawn     — new external objects, then new moving objects.
//!   ⑤ Frame     — hand the committed positions to the observer.
//!   ⑥ Clock     — advance by one; optional cancellable pause.
//! ```
//!
//! *Draining* force-reports every still-live object; *Done* emits the final
//! statistics and closes the reporter.
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Initial routes of new objects are computed on Rayon.    |
//! | `sqlite`   | Enables `ng_output::SqliteSink`.                        |
//! | `parquet`  | Enables `ng_output::ParquetSink`.                       |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use ng_output::CsvSink;
//! use ng_sim::{GeneratorBuilder, NoopObserver};
//!
//! let sink = CsvSink::new(Path::new("./output"))?;
//! let mut generator = GeneratorBuilder::new(config, network, sink).build()?;
//! let summary = generator.run(&mut NoopObserver)?;
//! ```

pub mod builder;
pub mod control;
pub mod error;
pub mod frame;
pub mod generator;
pub mod observer;
pub mod stats;

#[cfg(test)]
mod tests;

pub use builder::GeneratorBuilder;
pub use control::{AbortHandle, RunControl};
pub use error::{SimError, SimResult};
pub use frame::{ExternalMarker, Frame, ObjectMarker};
pub use generator::{Generator, Phase, RunSummary};
pub use observer::{ChannelViewer, NoopObserver, SimObserver};
pub use stats::RunStatistics;
