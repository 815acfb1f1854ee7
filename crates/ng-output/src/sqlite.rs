//! SQLite output sink (feature `sqlite`).
//!
//! Creates a single `output.db` file in the configured output directory with
//! two tables: `points` and `statistics`.

use std::path::Path;

use rusqlite::Connection;

use crate::writer::ReportSink;
use crate::{OutputResult, PointRow, StatRow};

/// Writes point samples and statistics to an SQLite database.
pub struct SqliteSink {
    conn:     Connection,
    finished: bool,
}

impl SqliteSink {
    /// Open (or create) `output.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("output.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS points (
                 kind   TEXT    NOT NULL,
                 event  TEXT    NOT NULL,
                 id     INTEGER NOT NULL,
                 class  INTEGER NOT NULL,
                 time   INTEGER NOT NULL,
                 x      REAL    NOT NULL,
                 y      REAL    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS statistics (
                 label  TEXT NOT NULL,
                 value  TEXT NOT NULL
             );",
        )?;

        Ok(Self { conn, finished: false })
    }
}

impl ReportSink for SqliteSink {
    fn write_points(&mut self, rows: &[PointRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO points (kind, event, id, class, time, x, y) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.kind.as_str(),
                    row.event.as_str(),
                    row.object,
                    row.class,
                    row.tick as i64,
                    row.x,
                    row.y,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_stat(&mut self, row: &StatRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO statistics (label, value) VALUES (?1, ?2)",
            rusqlite::params![row.label, row.value.to_string()],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
