//! netgen — generates moving objects on a road network.
//!
//! Reads a node file and an edge file, runs the generator, and writes
//! `points.csv` and `statistics.csv` (or `output.db` / `*.parquet` with the
//! `sqlite` / `parquet` features) into the output directory.
//!
//! ```text
//! netgen --nodes nodes.csv --edges edges.csv --out ./run \
//!        -D maxTime=200 -D objPerTime=20 -D extObjPerTime=1 --seed 7
//! ```
//!
//! Exit status: 0 success, 2 configuration error, 3 network load error,
//! 4 generation error, 1 anything else.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{error, info, warn};

use ng_core::{CoreError, GeneratorConfig, Tick};
use ng_output::{CsvSink, ReportSink};
use ng_sim::{GeneratorBuilder, RunSummary, SimError, SimObserver};
use ng_spatial::{SpatialError, load_network};

// ── Command line ──────────────────────────────────────────────────────────────

#[derive(Parser)]
#[command(name = "netgen")]
#[command(about = "Network-based generator of moving objects")]
struct Cli {
    /// Node file: `id,x,y[,class]`
    #[arg(long)]
    nodes: PathBuf,

    /// Edge file: `id,from,to[,length][,class]`
    #[arg(long)]
    edges: PathBuf,

    /// Output directory (created if missing)
    #[arg(long, default_value = "output")]
    out: PathBuf,

    /// Output format: csv, sqlite, parquet
    #[arg(long, default_value = "csv")]
    format: String,

    /// Configuration entry, e.g. `-D objPerTime=20`; repeatable
    #[arg(short = 'D', value_name = "KEY=VALUE", value_parser = parse_define)]
    define: Vec<(String, String)>,

    /// Seed; overrides `-D seed=…`
    #[arg(long)]
    seed: Option<u64>,

    /// Last simulated tick; overrides `-D maxTime=…`
    #[arg(long)]
    max_time: Option<u64>,

    /// Log progress every this many ticks (0 = never)
    #[arg(long, default_value = "100")]
    progress: u64,
}

fn parse_define(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((k, v)) if !k.trim().is_empty() => Ok((k.trim().to_owned(), v.trim().to_owned())),
        _ => Err(format!("expected KEY=VALUE, got {s:?}")),
    }
}

// ── Exit status ───────────────────────────────────────────────────────────────

const EXIT_OTHER:      u8 = 1;
const EXIT_CONFIG:     u8 = 2;
const EXIT_LOAD:       u8 = 3;
const EXIT_GENERATION: u8 = 4;

/// Marks errors raised while interpreting the command line itself.
#[derive(Debug)]
struct UsageError(String);

impl std::fmt::Display for UsageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for UsageError {}

fn exit_status(err: &anyhow::Error) -> u8 {
    if let Some(e) = err.downcast_ref::<SimError>() {
        return match e {
            SimError::Config(_) | SimError::Core(_) => EXIT_CONFIG,
            SimError::Spatial(_) => EXIT_LOAD,
            SimError::Spawn(_) | SimError::Mobility(_) | SimError::InvalidPhase { .. } => EXIT_GENERATION,
        };
    }
    if err.downcast_ref::<CoreError>().is_some() || err.downcast_ref::<UsageError>().is_some() {
        return EXIT_CONFIG;
    }
    if err.downcast_ref::<SpatialError>().is_some() {
        return EXIT_LOAD;
    }
    EXIT_OTHER
}

// ── Progress ──────────────────────────────────────────────────────────────────

struct Progress {
    every: u64,
}

impl SimObserver for Progress {
    fn on_tick_start(&mut self, tick: Tick) {
        if self.every > 0 && tick.0 > 0 && tick.0.is_multiple_of(self.every) {
            info!("reached {tick}");
        }
    }

    fn on_run_end(&mut self, summary: &RunSummary) {
        let s = &summary.statistics;
        info!(
            "{} moving objects, {} external objects, {} points, {} routes ({} by event, {} by comparison)",
            s.moving_objects,
            s.external_objects,
            s.points,
            s.router.calls,
            s.reroutes_by_event,
            s.reroutes_by_comparison,
        );
    }
}

// ── Main ──────────────────────────────────────────────────────────────────────

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::from(exit_status(&e))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut pairs = cli.define;
    if let Some(seed) = cli.seed {
        pairs.push(("seed".into(), seed.to_string()));
    }
    if let Some(max_time) = cli.max_time {
        pairs.push(("maxTime".into(), max_time.to_string()));
    }
    let config = GeneratorConfig::from_pairs(pairs)?;

    let network = load_network(&cli.nodes, &cli.edges)?;

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating output directory {}", cli.out.display()))?;
    let sink = open_sink(&cli.format, &cli.out)?;

    let mut generator = GeneratorBuilder::new(config, network, sink).build()?;
    let summary = generator.run(&mut Progress { every: cli.progress })?;

    if let Some(e) = generator.take_output_error() {
        warn!("output in {} is incomplete: {e}", cli.out.display());
    }
    info!(
        "wrote {} points over {} ticks to {}{}",
        summary.statistics.points,
        summary.ticks,
        cli.out.display(),
        if summary.aborted { " (aborted)" } else { "" },
    );
    Ok(())
}

fn open_sink(format: &str, dir: &Path) -> Result<Box<dyn ReportSink>> {
    let sink: Box<dyn ReportSink> = match format {
        "csv" => Box::new(CsvSink::new(dir)?),
        #[cfg(feature = "sqlite")]
        "sqlite" => Box::new(ng_output::SqliteSink::new(dir)?),
        #[cfg(feature = "parquet")]
        "parquet" => Box::new(ng_output::ParquetSink::new(dir)?),
        other => bail!(UsageError(format!("unsupported output format {other:?} in this build"))),
    };
    Ok(sink)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defines_split_on_first_equals() {
        assert_eq!(parse_define("a=b=c"), Ok(("a".into(), "b=c".into())));
        assert_eq!(parse_define(" maxTime = 50 "), Ok(("maxTime".into(), "50".into())));
        assert!(parse_define("novalue").is_err());
        assert!(parse_define("=5").is_err());
    }

    #[test]
    fn errors_map_to_distinct_statuses() {
        let load = anyhow::Error::from(SpatialError::EmptyNetwork);
        assert_eq!(exit_status(&load), EXIT_LOAD);

        let config = anyhow::Error::from(CoreError::Config("bad".into()));
        assert_eq!(exit_status(&config), EXIT_CONFIG);

        let usage = anyhow::Error::from(UsageError("bad format".into()));
        assert_eq!(exit_status(&usage), EXIT_CONFIG);

        let generation = anyhow::Error::from(SimError::InvalidPhase { op: "step", phase: ng_sim::Phase::Done });
        assert_eq!(exit_status(&generation), EXIT_GENERATION);

        let sim_load = anyhow::Error::from(SimError::Spatial(SpatialError::EmptyNetwork));
        assert_eq!(exit_status(&sim_load), EXIT_LOAD);

        let other = anyhow::anyhow!("something else");
        assert_eq!(exit_status(&other), EXIT_OTHER);
    }
}
