//! `ng-output` — point samples and run statistics for the netgen generator.
//!
//! The [`Reporter`] decides which position samples are kept (per-class
//! probability, own seeded RNG) and forwards rows to a [`ReportSink`].
//! Sinks are provided behind Cargo features:
//!
//! | Feature   | Sink          | Files created                               |
//! |-----------|---------------|---------------------------------------------|
//! | *(none)*  | `CsvSink`     | `points.csv`, `statistics.csv`              |
//! | *(none)*  | `MemorySink`  | none, rows kept in memory                   |
//! | `sqlite`  | `SqliteSink`  | `output.db`                                 |
//! | `parquet` | `ParquetSink` | `points.parquet`, `statistics.parquet`      |
//!
//! # Usage
//!
//! ```rust,ignore
//! use ng_output::{CsvSink, Reporter};
//!
//! let sink = CsvSink::new(Path::new("./output"))?;
//! let mut reporter = Reporter::new(sink, seed);
//! reporter.report_int("number of nodes", 4);
//! reporter.close();
//! if let Some(e) = reporter.take_error() { eprintln!("output error: {e}"); }
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod reporter;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvSink;
pub use error::{OutputError, OutputResult};
pub use memory::MemorySink;
pub use reporter::Reporter;
pub use row::{PointEvent, PointKind, PointRow, StatRow, StatValue};
pub use writer::ReportSink;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteSink;

#[cfg(feature = "parquet")]
pub use parquet::ParquetSink;
