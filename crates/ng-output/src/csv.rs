//! CSV output sink.
//!
//! Creates two files in the configured output directory:
//! - `points.csv`
//! - `statistics.csv`

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::ReportSink;
use crate::{OutputResult, PointRow, StatRow};

/// Writes point samples and statistics to two CSV files.
pub struct CsvSink {
    points:   Writer<File>,
    stats:    Writer<File>,
    finished: bool,
}

impl CsvSink {
    /// Create (truncating) the two CSV files in `dir` and write the header rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut points = Writer::from_path(dir.join("points.csv"))?;
        points.write_record(["kind", "event", "id", "class", "time", "x", "y"])?;

        let mut stats = Writer::from_path(dir.join("statistics.csv"))?;
        stats.write_record(["label", "value"])?;

        Ok(Self {
            points,
            stats,
            finished: false,
        })
    }
}

impl ReportSink for CsvSink {
    fn write_points(&mut self, rows: &[PointRow]) -> OutputResult<()> {
        for row in rows {
            self.points.write_record(&[
                row.kind.as_str().to_owned(),
                row.event.as_str().to_owned(),
                row.object.to_string(),
                row.class.to_string(),
                row.tick.to_string(),
                row.x.to_string(),
                row.y.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_stat(&mut self, row: &StatRow) -> OutputResult<()> {
        self.stats.write_record(&[row.label.clone(), row.value.to_string()])?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.points.flush()?;
        self.stats.flush()?;
        Ok(())
    }
}
