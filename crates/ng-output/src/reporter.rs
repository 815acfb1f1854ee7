//! `Reporter<S>` — sample gating and best-effort forwarding to a sink.

use log::warn;

use ng_core::rng::stream;
use ng_core::SimRng;

use crate::row::{PointRow, StatRow, StatValue};
use crate::writer::ReportSink;
use crate::OutputError;

/// Pending samples are handed to the sink once this many accumulate.
const BATCH: usize = 4096;

/// Decides which point samples are kept and forwards rows to a [`ReportSink`].
///
/// A sample is kept with probability `report_probability / 1000`, drawn
/// from the reporter's own RNG stream so the kept set depends only on the
/// seed and the order of calls.
///
/// Sink failures never interrupt reporting: each one is logged, the first
/// is retained for [`take_error`][Self::take_error], and later rows are
/// still offered to the sink.
pub struct Reporter<S: ReportSink> {
    sink:        S,
    rng:         SimRng,
    pending:     Vec<PointRow>,
    points:      u64,
    closed:      bool,
    first_error: Option<OutputError>,
}

impl<S: ReportSink> Reporter<S> {
    pub fn new(sink: S, seed: u64) -> Self {
        Self {
            sink,
            rng:         SimRng::stream(seed, stream::REPORTER),
            pending:     Vec::new(),
            points:      0,
            closed:      false,
            first_error: None,
        }
    }

    /// Offer one sample; returns whether it was kept.
    pub fn report_point(&mut self, row: PointRow, report_probability: u32) -> bool {
        if self.closed || !self.rng.per_mille(report_probability) {
            return false;
        }
        self.points += 1;
        self.pending.push(row);
        if self.pending.len() >= BATCH {
            self.flush_points();
        }
        true
    }

    /// Hand pending samples to the sink.  Called at every tick boundary.
    pub fn flush_points(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let result = self.sink.write_points(&self.pending);
        self.pending.clear();
        self.store_err(result);
    }

    pub fn report_int(&mut self, label: &str, value: i64) {
        self.report_stat(label, StatValue::Int(value));
    }

    pub fn report_double(&mut self, label: &str, value: f64) {
        self.report_stat(label, StatValue::from(Some(value)));
    }

    pub fn report_string(&mut self, label: &str, value: &str) {
        self.report_stat(label, StatValue::Text(value.to_owned()));
    }

    pub fn report_stat(&mut self, label: &str, value: StatValue) {
        if self.closed {
            return;
        }
        let row = StatRow { label: label.to_owned(), value };
        let result = self.sink.write_stat(&row);
        self.store_err(result);
    }

    /// Flush pending samples and finish the sink.  Idempotent.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.flush_points();
        let result = self.sink.finish();
        self.store_err(result);
        self.closed = true;
    }

    /// Samples kept so far.
    pub fn points(&self) -> u64 {
        self.points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Take the first sink error, if any occurred.
    pub fn take_error(&mut self) -> Option<OutputError> {
        self.first_error.take()
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Unwrap the sink (e.g. to inspect rows after the run).
    pub fn into_sink(self) -> S {
        self.sink
    }

    fn store_err(&mut self, result: crate::OutputResult<()>) {
        if let Err(e) = result {
            warn!("report sink error: {e}");
            if self.first_error.is_none() {
                self.first_error = Some(e);
            }
        }
    }
}
