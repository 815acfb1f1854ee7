//! The `ReportSink` trait implemented by all output backends.

use crate::{OutputResult, PointRow, StatRow};

/// Trait implemented by the CSV, memory, SQLite, and Parquet sinks.
///
/// Errors are returned to the [`Reporter`](crate::Reporter), which logs and
/// retains them; reporting itself never aborts a run.
pub trait ReportSink {
    /// Append a batch of point samples.
    fn write_points(&mut self, rows: &[PointRow]) -> OutputResult<()>;

    /// Append one labeled statistic.
    fn write_stat(&mut self, row: &StatRow) -> OutputResult<()>;

    /// Flush and close all underlying handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<S: ReportSink + ?Sized> ReportSink for Box<S> {
    fn write_points(&mut self, rows: &[PointRow]) -> OutputResult<()> {
        (**self).write_points(rows)
    }

    fn write_stat(&mut self, row: &StatRow) -> OutputResult<()> {
        (**self).write_stat(row)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
