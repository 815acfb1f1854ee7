//! In-memory sink for tests and embedding.

use crate::writer::ReportSink;
use crate::{OutputResult, PointRow, StatRow, StatValue};

/// Keeps every row it receives.
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    pub points:   Vec<PointRow>,
    pub stats:    Vec<StatRow>,
    pub finished: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// First statistic with `label`, if any.
    pub fn stat(&self, label: &str) -> Option<&StatValue> {
        self.stats.iter().find(|r| r.label == label).map(|r| &r.value)
    }
}

impl ReportSink for MemorySink {
    fn write_points(&mut self, rows: &[PointRow]) -> OutputResult<()> {
        self.points.extend_from_slice(rows);
        Ok(())
    }

    fn write_stat(&mut self, row: &StatRow) -> OutputResult<()> {
        self.stats.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
