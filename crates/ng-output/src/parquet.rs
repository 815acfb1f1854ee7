//! Parquet output sink (feature `parquet`).
//!
//! Creates two files in the configured output directory:
//! - `points.parquet`
//! - `statistics.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{Float64Builder, StringBuilder, UInt16Builder, UInt32Builder, UInt64Builder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::ReportSink;
use crate::{OutputResult, PointRow, StatRow};

fn point_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("kind",  DataType::Utf8,    false),
        Field::new("event", DataType::Utf8,    false),
        Field::new("id",    DataType::UInt32,  false),
        Field::new("class", DataType::UInt16,  false),
        Field::new("time",  DataType::UInt64,  false),
        Field::new("x",     DataType::Float64, false),
        Field::new("y",     DataType::Float64, false),
    ]))
}

fn stat_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("label", DataType::Utf8, false),
        Field::new("value", DataType::Utf8, false),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

/// Writes point samples and statistics to two Parquet files.
///
/// Statistics are buffered and written as one batch by `finish()`, which
/// **must** be called to write the file footers.
pub struct ParquetSink {
    points:       Option<ArrowWriter<File>>,
    stats:        Option<ArrowWriter<File>>,
    point_schema: Arc<Schema>,
    stat_schema:  Arc<Schema>,
    stat_rows:    Vec<StatRow>,
}

impl ParquetSink {
    /// Create both Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let point_schema = point_schema();
        let stat_schema = stat_schema();

        let points = ArrowWriter::try_new(
            File::create(dir.join("points.parquet"))?,
            Arc::clone(&point_schema),
            Some(snappy_props()),
        )?;
        let stats = ArrowWriter::try_new(
            File::create(dir.join("statistics.parquet"))?,
            Arc::clone(&stat_schema),
            Some(snappy_props()),
        )?;

        Ok(Self {
            points:    Some(points),
            stats:     Some(stats),
            point_schema,
            stat_schema,
            stat_rows: Vec::new(),
        })
    }
}

impl ReportSink for ParquetSink {
    fn write_points(&mut self, rows: &[PointRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.points.as_mut() else {
            return Ok(());
        };

        let mut kinds   = StringBuilder::new();
        let mut events  = StringBuilder::new();
        let mut ids     = UInt32Builder::new();
        let mut classes = UInt16Builder::new();
        let mut times   = UInt64Builder::new();
        let mut xs      = Float64Builder::new();
        let mut ys      = Float64Builder::new();

        for row in rows {
            kinds.append_value(row.kind.as_str());
            events.append_value(row.event.as_str());
            ids.append_value(row.object);
            classes.append_value(row.class);
            times.append_value(row.tick);
            xs.append_value(row.x);
            ys.append_value(row.y);
        }

        let batch = RecordBatch::try_new(
            Arc::clone(&self.point_schema),
            vec![
                Arc::new(kinds.finish()),
                Arc::new(events.finish()),
                Arc::new(ids.finish()),
                Arc::new(classes.finish()),
                Arc::new(times.finish()),
                Arc::new(xs.finish()),
                Arc::new(ys.finish()),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_stat(&mut self, row: &StatRow) -> OutputResult<()> {
        self.stat_rows.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if let Some(w) = self.points.take() {
            w.close()?;
        }
        if let Some(mut w) = self.stats.take() {
            let mut labels = StringBuilder::new();
            let mut values = StringBuilder::new();
            for row in self.stat_rows.drain(..) {
                labels.append_value(&row.label);
                values.append_value(row.value.to_string());
            }
            let batch = RecordBatch::try_new(
                Arc::clone(&self.stat_schema),
                vec![Arc::new(labels.finish()), Arc::new(values.finish())],
            )?;
            w.write(&batch)?;
            w.close()?;
        }
        Ok(())
    }
}
