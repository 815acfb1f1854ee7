//! The `Generator` struct and its tick loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use ng_classes::ClassRegistry;
use ng_congestion::{ExternalObject, ExternalObjects, WeightManager};
use ng_core::{EdgeId, GeneratorConfig, Point, SimClock, Tick};
use ng_mobility::{MobilityEngine, MovingObject};
use ng_output::{OutputError, PointEvent, PointKind, PointRow, ReportSink, Reporter};
use ng_spatial::{DijkstraRouter, NetworkGraph, Router};
use ng_spawn::{EndpointPolicy, ExternalObjectGenerator, ObjectGenerator, RandomEndpoints};

use crate::frame::{ExternalMarker, Frame, ObjectMarker};
use crate::{AbortHandle, RunControl, RunStatistics, SimError, SimObserver, SimResult};

// ── Phase ─────────────────────────────────────────────────────────────────────

/// Lifecycle of one generator run.  Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Built, no tick simulated yet.
    Initializing,
    /// Ticks are being simulated.
    Running,
    /// Max time reached or abort requested; live objects get a final report.
    Draining,
    /// Statistics emitted and the reporter closed.
    Done,
}

/// Outcome of a completed run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Ticks actually simulated.
    pub ticks:      u64,
    /// The run was stopped by an [`AbortHandle`] before max time.
    pub aborted:    bool,
    pub statistics: RunStatistics,
}

// ── Generator ─────────────────────────────────────────────────────────────────

/// The moving-object generator.
///
/// Holds the immutable network and configuration, the dynamic object
/// populations, and the reporter.  Create via
/// [`GeneratorBuilder`][crate::GeneratorBuilder].
pub struct Generator<S, R = DijkstraRouter, E = RandomEndpoints>
where
    S: ReportSink,
    R: Router,
    E: EndpointPolicy,
{
    /// Frozen run parameters.
    pub config: GeneratorConfig,

    pub clock: SimClock,

    /// Immutable topology.
    pub network: NetworkGraph,

    pub classes: ClassRegistry,

    /// Produces the per-tick weight snapshot.
    pub weights: WeightManager,

    pub externals: ExternalObjects,

    /// Live moving objects, router, and reroute policy.
    pub mobility: MobilityEngine<R>,

    pub object_spawner: ObjectGenerator<E>,

    pub external_spawner: ExternalObjectGenerator,

    pub(crate) reporter:         Reporter<S>,
    pub(crate) control:          RunControl,
    pub(crate) phase:            Phase,
    pub(crate) ticks:            u64,
    pub(crate) traversed_nodes:  u64,
    pub(crate) traversed_degree: u64,
    pub(crate) started:          Option<Instant>,
}

impl<S, R, E> Generator<S, R, E>
where
    S: ReportSink,
    R: Router,
    E: EndpointPolicy,
{
    // ── Public API ────────────────────────────────────────────────────────

    /// Run from the current tick through max time (or an abort), then drain
    /// and emit statistics.
    pub fn run<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        while matches!(self.phase, Phase::Initializing | Phase::Running) {
            self.step(observer)?;
        }
        self.finish(observer)
    }

    /// Simulate exactly one tick.  Returns the phase afterwards.
    ///
    /// Fails once the generator is draining or done.
    pub fn step<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<Phase> {
        match self.phase {
            Phase::Initializing => {
                self.started = Some(Instant::now());
                self.phase = Phase::Running;
            }
            Phase::Running => {}
            phase => return Err(SimError::InvalidPhase { op: "step", phase }),
        }

        let now = self.clock.current_tick;
        observer.on_tick_start(now);
        self.process_tick(now)?;

        let frame = Arc::new(self.frame(now));
        observer.on_frame(&frame);
        self.reporter.flush_points();

        self.ticks += 1;
        self.clock.advance();

        if self.clock.is_exceeded() {
            self.phase = Phase::Draining;
        } else if self.control.pause(Duration::from_millis(self.config.waiting_period_ms)) {
            info!("abort requested, stopping after {now}");
            self.phase = Phase::Draining;
        }
        Ok(self.phase)
    }

    /// Force-report every live object, emit the statistics, and close the
    /// reporter.
    ///
    /// Called by [`run`](Self::run); call it directly after manual
    /// [`step`](Self::step)s.  Finishing before max time ends the run early.
    pub fn finish<O: SimObserver>(&mut self, observer: &mut O) -> SimResult<RunSummary> {
        if self.phase == Phase::Done {
            return Err(SimError::InvalidPhase { op: "finish", phase: self.phase });
        }
        self.phase = Phase::Draining;
        self.drain();

        let statistics = self.statistics();
        statistics.emit(&mut self.reporter);
        self.reporter.close();
        self.phase = Phase::Done;

        let summary = RunSummary {
            ticks:   self.ticks,
            aborted: self.control.is_aborted(),
            statistics,
        };
        info!(
            "run done: {} ticks, {} moving and {} external objects, {} points in {:?}",
            summary.ticks,
            summary.statistics.moving_objects,
            summary.statistics.external_objects,
            summary.statistics.points,
            summary.statistics.total_time,
        );
        observer.on_run_end(&summary);
        Ok(summary)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// A handle that stops the run at the next tick boundary.
    pub fn abort_handle(&self) -> AbortHandle {
        self.control.handle()
    }

    pub fn reporter(&self) -> &Reporter<S> {
        &self.reporter
    }

    /// First report-sink failure of the run, if any.  Sink failures never
    /// stop a run.
    pub fn take_output_error(&mut self) -> Option<OutputError> {
        self.reporter.take_error()
    }

    /// Unwrap the sink (e.g. to inspect rows after the run).
    pub fn into_sink(self) -> S {
        self.reporter.into_sink()
    }

    // ── Core tick processing ──────────────────────────────────────────────

    fn process_tick(&mut self, now: Tick) -> SimResult<()> {
        // ── ① Weight snapshot, frozen for the rest of the tick ────────────
        if self.weights.is_enabled() {
            let occupancy = self.mobility.objects.occupancy(self.network.edge_count());
            self.weights.refresh(&self.network, now, &self.externals, &occupancy);
        }
        let weights = self.weights.snapshot();

        // ── ② External objects ────────────────────────────────────────────
        let removed = self.externals.advance(now);
        for x in &removed {
            let p = self.classes.externals.get(x.class).report_probability;
            self.reporter.report_point(external_row(x, now, PointEvent::Disappear), p);
        }
        for x in self.externals.iter() {
            let p = self.classes.externals.get(x.class).report_probability;
            self.reporter.report_point(external_row(x, now, PointEvent::Move), p);
        }

        // ── ③ Moving objects ──────────────────────────────────────────────
        let outcome = self.mobility.step(now, &self.network, weights, &self.classes.objects)?;
        for u in &outcome.updates {
            let event = if u.arrived { PointEvent::Disappear } else { PointEvent::Move };
            let row = moving_row(u.id.0, u.class.0, now, u.position, event);
            self.reporter.report_point(row, self.classes.objects.report_probability(u.class));
        }
        for object in &outcome.finished {
            self.traversed_nodes += object.traversed_nodes;
            self.traversed_degree += object.traversed_degree;
        }

        // ── ④ Spawn: external objects, then moving objects ────────────────
        let created = self.external_spawner.spawn(
            now,
            &self.network,
            &self.classes.externals,
            &mut self.externals,
        );
        for x in &created {
            let p = self.classes.externals.get(x.class).report_probability;
            self.reporter.report_point(external_row(x, now, PointEvent::New), p);
        }

        let spawned = self.object_spawner.spawn(now, &self.network, weights, &mut self.mobility)?;
        for u in &spawned {
            let row = moving_row(u.id.0, u.class.0, now, u.position, PointEvent::New);
            self.reporter.report_point(row, self.classes.objects.report_probability(u.class));
        }

        debug!(
            "{now}: {} moving (+{} -{}), {} external (+{} -{})",
            self.mobility.objects.len(),
            spawned.len(),
            outcome.finished.len(),
            self.externals.len(),
            created.len(),
            removed.len(),
        );
        Ok(())
    }

    /// Report every still-live object as disappearing at the first tick past
    /// the run and release the populations.
    ///
    /// The last simulated tick already holds a sample for each of them, so
    /// every (object, tick) pair stays unique.
    fn drain(&mut self) {
        let at = self.clock.current_tick;
        let objects: Vec<MovingObject> = self.mobility.objects.drain();
        let externals: Vec<ExternalObject> = self.externals.drain();
        if !objects.is_empty() || !externals.is_empty() {
            debug!("draining {} moving and {} external objects", objects.len(), externals.len());
        }

        for object in &objects {
            self.traversed_nodes += object.traversed_nodes;
            self.traversed_degree += object.traversed_degree;
            let row = moving_row(
                object.id.0,
                object.class.0,
                at,
                object.position(&self.network),
                PointEvent::Disappear,
            );
            self.reporter.report_point(row, self.classes.objects.report_probability(object.class));
        }
        for x in &externals {
            let p = self.classes.externals.get(x.class).report_probability;
            self.reporter.report_point(external_row(x, at, PointEvent::Disappear), p);
        }
        self.reporter.flush_points();
    }

    fn frame(&self, now: Tick) -> Frame {
        Frame {
            tick:      now,
            moving:    self
                .mobility
                .objects
                .iter()
                .map(|o| ObjectMarker { id: o.id, class: o.class, position: o.position(&self.network) })
                .collect(),
            externals: self
                .externals
                .iter()
                .map(|x| ExternalMarker { id: x.id, class: x.class, footprint: x.footprint() })
                .collect(),
        }
    }

    fn statistics(&self) -> RunStatistics {
        let bounds = self.network.bounds();
        let edge_count = self.network.edge_count();
        let total_length: f64 = (0..edge_count).map(|i| self.network.length(EdgeId(i as u32))).sum();
        let counters = self.mobility.policy.counters();

        if self.reporter.points() == 0 && self.mobility.objects.created() > 0 {
            warn!("no points were reported; check the report probabilities");
        }

        RunStatistics {
            width:                  bounds.width(),
            height:                 bounds.height(),
            nodes:                  self.network.node_count(),
            edges:                  edge_count,
            max_time:               self.config.max_time,
            moving_objects:         self.mobility.objects.created(),
            external_objects:       self.externals.created(),
            points:                 self.reporter.points(),
            traversed_nodes:        self.traversed_nodes,
            traversed_degree:       self.traversed_degree,
            reroutes_by_event:      counters.by_event,
            reroutes_by_comparison: counters.by_comparison,
            route_retries:          self.object_spawner.retries(),
            peak_live:              self.mobility.objects.peak(),
            total_time:             self.started.map(|s| s.elapsed()).unwrap_or_default(),
            router:                 self.mobility.router_stats.clone(),
            congestion:             self.weights.is_enabled().then(|| self.weights.stats().clone()),
            average_edge_length:    (edge_count > 0).then(|| total_length / edge_count as f64),
            average_route_length:   self.object_spawner.endpoints().average_target_length(),
        }
    }
}

// ── Row helpers ───────────────────────────────────────────────────────────────

fn moving_row(id: u32, class: u16, tick: Tick, position: Point, event: PointEvent) -> PointRow {
    PointRow {
        object: id,
        class,
        tick:   tick.0,
        x:      position.x,
        y:      position.y,
        kind:   PointKind::Moving,
        event,
    }
}

fn external_row(x: &ExternalObject, tick: Tick, event: PointEvent) -> PointRow {
    PointRow {
        object: x.id.0,
        class:  x.class.0,
        tick:   tick.0,
        x:      x.center.x,
        y:      x.center.y,
        kind:   PointKind::External,
        event,
    }
}
