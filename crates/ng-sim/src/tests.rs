//! Integration tests for ng-sim.

use ng_classes::ObjectClasses;
use ng_congestion::ExternalObject;
use ng_core::{ClassId, ExternalId, GeneratorConfig, NodeId, Point, Tick};
use ng_output::MemorySink;
use ng_spatial::{NetworkBuilder, NetworkGraph};
use ng_spawn::FixedEndpoints;

use crate::{Generator, GeneratorBuilder};

// ── Helpers ───────────────────────────────────────────────────────────────────

const A: NodeId = NodeId(0);
const B: NodeId = NodeId(1);
const C: NodeId = NodeId(2);
const D: NodeId = NodeId(3);

/// Square A(0,0) B(100,0) C(100,100) D(0,100), edges AB BC CD DA.
fn square() -> NetworkGraph {
    let mut b = NetworkBuilder::new();
    for (x, y) in [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)] {
        b.add_node(Point::new(x, y), ClassId(0)).unwrap();
    }
    for (p, q) in [(A, B), (B, C), (C, D), (D, A)] {
        b.add_edge_auto(p, q, ClassId(0)).unwrap();
    }
    b.build()
}

/// `n × n` grid with spacing 10.
fn grid(n: u32) -> NetworkGraph {
    let mut b = NetworkBuilder::new();
    for r in 0..n {
        for c in 0..n {
            b.add_node(Point::new(f64::from(c) * 10.0, f64::from(r) * 10.0), ClassId(0)).unwrap();
        }
    }
    for r in 0..n {
        for c in 0..n {
            let here = NodeId(r * n + c);
            if c + 1 < n {
                b.add_edge_auto(here, NodeId(r * n + c + 1), ClassId(0)).unwrap();
            }
            if r + 1 < n {
                b.add_edge_auto(here, NodeId((r + 1) * n + c), ClassId(0)).unwrap();
            }
        }
    }
    b.build()
}

/// One object at tick 0, nothing afterwards, no external objects.
fn single_object_config(max_speed_divisor: u32) -> GeneratorConfig {
    GeneratorConfig {
        max_time:           10,
        num_object_classes: 1,
        objects_per_time:   0,
        objects_at_begin:   1,
        externals_per_time: 0,
        externals_at_begin: 0,
        report_probability: 1_000,
        max_speed_divisor,
        seed:               7,
        ..GeneratorConfig::default()
    }
}

fn square_generator(max_speed_divisor: u32) -> Generator<MemorySink, ng_spatial::DijkstraRouter, FixedEndpoints> {
    GeneratorBuilder::new(single_object_config(max_speed_divisor), square(), MemorySink::new())
        .with_endpoints(FixedEndpoints { from: A, to: C })
        .build()
        .unwrap()
}

/// A static disturbance centred at `center`.
fn blocker(center: Point, half_extent: f64, slowdown: f64) -> ExternalObject {
    ExternalObject {
        id:          ExternalId(0),
        class:       ClassId(0),
        center,
        half_extent,
        velocity:    (0.0, 0.0),
        growth:      0.0,
        slowdown,
        created:     Tick(0),
        removal:     Tick(1_000),
    }
}

// ── Builder ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod builder_tests {
    use ng_output::MemorySink;
    use ng_spatial::{NetworkBuilder, SpatialError};

    use crate::{GeneratorBuilder, Phase, SimError};
    use super::*;

    #[test]
    fn empty_network_is_rejected() {
        let result = GeneratorBuilder::new(GeneratorConfig::default(), NetworkBuilder::new().build(), MemorySink::new())
            .build();
        assert!(matches!(result, Err(SimError::Spatial(SpatialError::EmptyNetwork))));
    }

    #[test]
    fn edgeless_network_is_rejected_when_objects_spawn() {
        let mut b = NetworkBuilder::new();
        b.add_node(Point::new(0.0, 0.0), ClassId(0)).unwrap();
        b.add_node(Point::new(1.0, 0.0), ClassId(0)).unwrap();
        let result = GeneratorBuilder::new(GeneratorConfig::default(), b.build(), MemorySink::new()).build();
        assert!(matches!(result, Err(SimError::Config(_))));
    }

    #[test]
    fn config_is_clamped() {
        let config = GeneratorConfig { max_time: 1, report_probability: 5_000, ..single_object_config(1) };
        let generator = GeneratorBuilder::new(config, square(), MemorySink::new()).build().unwrap();
        assert_eq!(generator.config.max_time, 5);
        assert_eq!(generator.config.report_probability, 1_000);
        assert_eq!(generator.clock.max_time, Tick(5));
    }

    #[test]
    fn starts_initializing_with_no_objects() {
        let generator = square_generator(1);
        assert_eq!(generator.phase(), Phase::Initializing);
        assert!(generator.mobility.objects.is_empty());
        assert!(!generator.weights.is_enabled());
    }

    #[test]
    fn initial_externals_get_fresh_ids_and_enable_congestion() {
        let generator = GeneratorBuilder::new(single_object_config(1), square(), MemorySink::new())
            .with_initial_external(blocker(Point::new(50.0, 0.0), 10.0, 10.0))
            .with_initial_external(blocker(Point::new(50.0, 100.0), 10.0, 10.0))
            .build()
            .unwrap();
        let ids: Vec<ExternalId> = generator.externals.iter().map(|x| x.id).collect();
        assert_eq!(ids, vec![ExternalId(0), ExternalId(1)]);
        assert!(generator.weights.is_enabled());
    }

    #[test]
    fn same_config_same_classes() {
        let a = square_generator(5);
        let b = square_generator(5);
        assert_eq!(a.classes, b.classes);
    }
}

// ── Scenarios on the square ───────────────────────────────────────────────────

#[cfg(test)]
mod scenario_tests {
    use ng_output::{PointEvent, PointKind, StatValue};
    use ng_spatial::{DijkstraRouter, RouteResult, Router, RouterStats};

    use crate::{GeneratorBuilder, NoopObserver};
    use super::*;

    #[test]
    fn shortest_route_breaks_ties_through_b_and_arrives_on_time() {
        let mut generator = square_generator(1);
        generator.step(&mut NoopObserver).unwrap();

        let object = generator.mobility.objects.iter().next().unwrap();
        assert_eq!(object.route_nodes().collect::<Vec<_>>(), vec![A, B, C]);
        assert_eq!(generator.classes.objects.speed(ClassId(0)), 100.0);

        let route = DijkstraRouter
            .route(&generator.network, generator.weights.snapshot(), A, C, &mut RouterStats::default())
            .into_route()
            .unwrap();
        assert_eq!(route.cost, 200.0);
        assert_eq!(route.edges.len(), 2);

        let summary = generator.run(&mut NoopObserver).unwrap();
        let sink = generator.into_sink();

        let trail: Vec<(u64, PointEvent, f64, f64)> = sink
            .points
            .iter()
            .filter(|p| p.kind == PointKind::Moving && p.object == 0)
            .map(|p| (p.tick, p.event, p.x, p.y))
            .collect();
        assert_eq!(
            trail,
            vec![
                (0, PointEvent::New, 0.0, 0.0),
                (1, PointEvent::Move, 100.0, 0.0),
                (2, PointEvent::Disappear, 100.0, 100.0),
            ]
        );

        // Arrival within ceil(cost / speed) ticks.
        let arrival = trail.last().unwrap().0;
        assert!(arrival <= (200.0_f64 / 100.0).ceil() as u64);

        assert_eq!(summary.ticks, 11);
        assert!(!summary.aborted);
        assert_eq!(summary.statistics.traversed_nodes, 3);
        assert_eq!(summary.statistics.traversed_degree, 6);
        assert_eq!(summary.statistics.moving_objects, 1);
        assert_eq!(sink.stat("# traversed nodes"), Some(&StatValue::Int(3)));
        assert_eq!(sink.stat("# node degree"), Some(&StatValue::Double(1.0)));
        assert_eq!(sink.stat("# all routes"), Some(&StatValue::Int(1)));
        assert!(sink.finished);
    }

    #[test]
    fn disturbance_on_ab_routes_through_d() {
        let mut generator = GeneratorBuilder::new(single_object_config(1), square(), MemorySink::new())
            .with_endpoints(FixedEndpoints { from: A, to: C })
            .with_initial_external(blocker(Point::new(50.0, 0.0), 10.0, 10.0))
            .build()
            .unwrap();
        generator.step(&mut NoopObserver).unwrap();

        let ab = generator.network.edge_between(A, B).unwrap();
        assert_eq!(generator.weights.snapshot().weight(ab), 1_000.0);

        let object = generator.mobility.objects.iter().next().unwrap();
        assert_eq!(object.route_nodes().collect::<Vec<_>>(), vec![A, D, C]);

        let summary = generator.run(&mut NoopObserver).unwrap();
        assert_eq!(summary.statistics.reroutes_by_event, 0);
        let sink = generator.into_sink();
        let via_d = sink
            .points
            .iter()
            .any(|p| p.kind == PointKind::Moving && p.tick == 1 && (p.x, p.y) == (0.0, 100.0));
        assert!(via_d, "object should pass D at tick 1");
        assert!(sink.stat("# computed decreases").is_some());
    }

    #[test]
    fn committed_route_is_replaced_by_event() {
        // Slow object (speed 25); a far-away disturbance switches congestion on.
        let mut generator = GeneratorBuilder::new(single_object_config(4), square(), MemorySink::new())
            .with_endpoints(FixedEndpoints { from: A, to: C })
            .with_initial_external(blocker(Point::new(-500.0, -500.0), 1.0, 10.0))
            .build()
            .unwrap();
        generator.step(&mut NoopObserver).unwrap();
        let route: Vec<NodeId> = generator.mobility.objects.iter().next().unwrap().route_nodes().collect();
        assert_eq!(route, vec![A, B, C]);

        let mut x = blocker(Point::new(50.0, 0.0), 10.0, 10.0);
        x.id = generator.external_spawner.allocate_id();
        generator.externals.insert(x);

        generator.step(&mut NoopObserver).unwrap();
        let object = generator.mobility.objects.iter().next().unwrap();
        assert_eq!(object.route_nodes().collect::<Vec<_>>(), vec![A, D, C]);
        assert_eq!(generator.mobility.policy.counters().by_event, 1);
    }

    #[test]
    fn zero_report_probability_records_no_points() {
        let classes = ObjectClasses::new(1, 1_000, 1, 100.0).with_report_probability(ClassId(0), 0);
        let mut generator = GeneratorBuilder::new(single_object_config(1), square(), MemorySink::new())
            .with_endpoints(FixedEndpoints { from: A, to: C })
            .with_object_classes(classes)
            .build()
            .unwrap();
        let summary = generator.run(&mut NoopObserver).unwrap();
        let sink = generator.into_sink();

        assert!(sink.points.iter().all(|p| p.kind != PointKind::Moving));
        assert_eq!(summary.statistics.points, 0);
        assert_eq!(summary.statistics.traversed_nodes, 3);
        assert_eq!(summary.statistics.router.calls, 1);
        assert_eq!(sink.stat("# points"), Some(&StatValue::Int(0)));
        assert_eq!(sink.stat("total time/point"), Some(&StatValue::NotAvailable));
    }

    #[test]
    fn live_objects_are_flushed_at_max_time() {
        // Speed 2: 100 ticks for the route, max time 10.
        let mut generator = square_generator(50);
        let summary = generator.run(&mut NoopObserver).unwrap();
        let sink = generator.into_sink();

        let trail: Vec<_> = sink.points.iter().filter(|p| p.kind == PointKind::Moving).collect();
        let last = trail[trail.len() - 1];
        let before = trail[trail.len() - 2];
        assert_eq!((before.tick, before.event), (10, PointEvent::Move));
        assert_eq!((last.tick, last.event), (11, PointEvent::Disappear));
        assert_eq!((last.x, last.y), (before.x, before.y));
        assert!(summary.statistics.traversed_nodes >= 1);
        assert_eq!(summary.statistics.peak_live, 1);
    }

    #[test]
    fn unreachable_destination_exhausts_retries() {
        let mut b = NetworkBuilder::new();
        for (x, y) in [(0.0, 0.0), (100.0, 0.0), (50.0, 50.0)] {
            b.add_node(Point::new(x, y), ClassId(0)).unwrap();
        }
        b.add_edge_auto(NodeId(0), NodeId(1), ClassId(0)).unwrap();
        let config = GeneratorConfig { max_route_retries: 3, ..single_object_config(1) };
        let mut generator = GeneratorBuilder::new(config, b.build(), MemorySink::new())
            .with_endpoints(FixedEndpoints { from: NodeId(0), to: NodeId(2) })
            .build()
            .unwrap();
        let err = generator.run(&mut NoopObserver).unwrap_err();
        assert!(matches!(err, crate::SimError::Spawn(_)));
        assert_eq!(generator.mobility.router_stats.unreachable, 4);
    }

    #[test]
    fn router_reports_unreachable_not_error() {
        let generator = square_generator(1);
        let result = DijkstraRouter.route(
            &generator.network,
            generator.weights.snapshot(),
            A,
            NodeId(99),
            &mut RouterStats::default(),
        );
        assert!(matches!(result, RouteResult::Unreachable));
    }
}

// ── Phases and control ────────────────────────────────────────────────────────

#[cfg(test)]
mod phase_tests {
    use std::time::Duration;

    use crate::{NoopObserver, Phase, SimError};
    use super::*;

    #[test]
    fn phases_move_forward_only() {
        let mut generator = square_generator(1);
        assert_eq!(generator.step(&mut NoopObserver).unwrap(), Phase::Running);
        generator.run(&mut NoopObserver).unwrap();
        assert_eq!(generator.phase(), Phase::Done);

        assert!(matches!(
            generator.step(&mut NoopObserver),
            Err(SimError::InvalidPhase { op: "step", phase: Phase::Done })
        ));
        assert!(generator.run(&mut NoopObserver).is_err());
        assert!(generator.finish(&mut NoopObserver).is_err());
    }

    #[test]
    fn last_tick_enters_draining() {
        let mut generator = square_generator(1);
        let mut phase = Phase::Initializing;
        for _ in 0..11 {
            phase = generator.step(&mut NoopObserver).unwrap();
        }
        assert_eq!(phase, Phase::Draining);
        assert!(matches!(generator.step(&mut NoopObserver), Err(SimError::InvalidPhase { .. })));
        let summary = generator.finish(&mut NoopObserver).unwrap();
        assert_eq!(summary.ticks, 11);
    }

    #[test]
    fn abort_stops_at_next_tick_boundary() {
        let mut generator = square_generator(50);
        generator.abort_handle().abort();
        let summary = generator.run(&mut NoopObserver).unwrap();
        assert!(summary.aborted);
        assert_eq!(summary.ticks, 1);
        // The live object still gets its final report.
        let sink = generator.into_sink();
        let gone = sink.points.iter().find(|p| p.event == ng_output::PointEvent::Disappear).unwrap();
        assert_eq!(gone.tick, 1);
    }

    #[test]
    fn abort_wakes_the_inter_tick_pause() {
        let config = GeneratorConfig { max_time: 1_000, waiting_period_ms: 60_000, ..single_object_config(50) };
        let mut generator = GeneratorBuilder::new(config, square(), MemorySink::new())
            .with_endpoints(FixedEndpoints { from: A, to: C })
            .build()
            .unwrap();
        let handle = generator.abort_handle();
        let stopper = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            handle.abort();
        });
        let summary = generator.run(&mut NoopObserver).unwrap();
        stopper.join().unwrap();
        assert!(summary.aborted);
        assert!(summary.ticks < 1_001);
    }
}

// ── Observers ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod observer_tests {
    use std::sync::Arc;

    use crate::{ChannelViewer, Frame, RunSummary, SimObserver};
    use super::*;

    #[derive(Default)]
    struct Recorder {
        starts: Vec<Tick>,
        frames: Vec<Arc<Frame>>,
        ended:  bool,
    }

    impl SimObserver for Recorder {
        fn on_tick_start(&mut self, tick: Tick) {
            self.starts.push(tick);
        }

        fn on_frame(&mut self, frame: &Arc<Frame>) {
            self.frames.push(Arc::clone(frame));
        }

        fn on_run_end(&mut self, _summary: &RunSummary) {
            self.ended = true;
        }
    }

    #[test]
    fn hooks_fire_once_per_tick() {
        let mut generator = square_generator(1);
        let mut rec = Recorder::default();
        generator.run(&mut rec).unwrap();

        assert_eq!(rec.starts, (0..=10).map(Tick).collect::<Vec<_>>());
        assert_eq!(rec.frames.len(), 11);
        assert!(rec.ended);

        // Spawned at 0, at B after 1, gone after arriving at 2.
        assert_eq!(rec.frames[0].moving.len(), 1);
        assert_eq!(rec.frames[1].moving[0].position, Point::new(100.0, 0.0));
        assert!(rec.frames[2].is_empty());
        assert_eq!(rec.frames[0].moving_of_class(ClassId(0)).count(), 1);
    }

    #[test]
    fn frames_carry_external_footprints() {
        let mut generator = GeneratorBuilder::new(single_object_config(1), square(), MemorySink::new())
            .with_endpoints(FixedEndpoints { from: A, to: C })
            .with_initial_external(blocker(Point::new(50.0, 0.0), 10.0, 10.0))
            .build()
            .unwrap();
        let mut rec = Recorder::default();
        generator.step(&mut rec).unwrap();
        let x = &rec.frames[0].externals[0];
        assert_eq!(x.footprint.center(), Point::new(50.0, 0.0));
        assert_eq!(x.footprint.width(), 20.0);
    }

    #[test]
    fn full_viewer_channel_drops_frames() {
        let mut generator = square_generator(1);
        let (mut viewer, rx) = ChannelViewer::new(2);
        generator.run(&mut viewer).unwrap();

        let received: Vec<Arc<Frame>> = rx.try_iter().collect();
        assert_eq!(received.len(), 2);
        assert_eq!(received[0].tick, Tick(0));
        assert_eq!(viewer.dropped(), 9);
    }

    #[test]
    fn closed_viewer_channel_does_not_stop_the_run() {
        let mut generator = square_generator(1);
        let (mut viewer, rx) = ChannelViewer::new(1);
        drop(rx);
        let summary = generator.run(&mut viewer).unwrap();
        assert_eq!(summary.ticks, 11);
        assert_eq!(viewer.dropped(), 11);
    }
}

// ── Random runs ───────────────────────────────────────────────────────────────

#[cfg(test)]
mod random_run_tests {
    use ng_core::RerouteConfig;
    use ng_output::StatValue;

    use crate::{NoopObserver, Phase};
    use super::*;

    fn busy_config(seed: u64) -> GeneratorConfig {
        GeneratorConfig {
            max_time:             30,
            num_object_classes:   3,
            num_external_classes: 2,
            objects_per_time:     3,
            objects_at_begin:     10,
            externals_per_time:   1,
            externals_at_begin:   3,
            report_probability:   500,
            max_speed_divisor:    20,
            seed,
            probabilistic_counts: true,
            density_weight:       1.0,
            reroute:              RerouteConfig { by_event: true, interval: 2, probability: 1_000, margin: 0.05 },
            ..GeneratorConfig::default()
        }
    }

    fn busy_generator(seed: u64) -> Generator<MemorySink> {
        GeneratorBuilder::new(busy_config(seed), grid(6), MemorySink::new()).build().unwrap()
    }

    #[test]
    fn traversal_counters_hold_every_tick() {
        let mut generator = busy_generator(3);
        while generator.step(&mut NoopObserver).unwrap() == Phase::Running {
            for object in generator.mobility.objects.iter() {
                assert!(object.traversed_nodes >= 1);
                assert!(object.traversed_degree >= object.traversed_nodes);
                assert_eq!(object.route_nodes().next(), Some(object.current_node()));
            }
        }
    }

    #[test]
    fn reroute_counters_are_bounded_and_monotone() {
        let mut generator = busy_generator(11);
        let mut last = (0, 0);
        while generator.step(&mut NoopObserver).unwrap() == Phase::Running {
            let c = generator.mobility.policy.counters();
            assert!(c.by_event >= last.0 && c.by_comparison >= last.1);
            last = (c.by_event, c.by_comparison);
        }
        let summary = generator.finish(&mut NoopObserver).unwrap();
        let s = &summary.statistics;
        assert!(s.reroutes_by_event + s.reroutes_by_comparison <= summary.ticks * s.peak_live as u64);
        assert!(s.external_objects > 0);
        assert!(s.congestion.is_some());
    }

    #[test]
    fn same_seed_same_output() {
        let run = |seed| {
            let mut generator = busy_generator(seed);
            generator.run(&mut NoopObserver).unwrap();
            generator.into_sink().points
        };
        let first = run(5);
        assert!(!first.is_empty());
        assert_eq!(first, run(5));
    }

    #[test]
    fn one_sample_per_object_and_tick() {
        let mut config = busy_config(6);
        config.report_probability = 1_000;
        let mut generator = GeneratorBuilder::new(config, grid(6), MemorySink::new()).build().unwrap();
        generator.run(&mut NoopObserver).unwrap();
        let sink = generator.into_sink();

        let mut seen = std::collections::HashSet::new();
        for p in &sink.points {
            assert!(seen.insert((p.kind, p.object, p.tick)), "duplicate sample {p:?}");
        }
        assert!(sink.points.iter().any(|p| p.tick == 31 && p.event == ng_output::PointEvent::Disappear));
    }

    #[test]
    fn object_ids_are_unique_and_ascending() {
        let mut generator = busy_generator(8);
        generator.run(&mut NoopObserver).unwrap();
        let sink = generator.into_sink();
        let new_ids: Vec<u32> = sink
            .points
            .iter()
            .filter(|p| p.kind == ng_output::PointKind::Moving && p.event == ng_output::PointEvent::New)
            .map(|p| p.object)
            .collect();
        assert!(new_ids.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn full_catalogue_is_emitted() {
        let mut generator = busy_generator(2);
        generator.run(&mut NoopObserver).unwrap();
        let sink = generator.into_sink();
        for label in [
            "data space width",
            "number of nodes",
            "# moving objects",
            "# routes by event",
            "# routes by comparison",
            "heap inserts",
            "routing time/routing",
            "# computed decreases",
            "# real decreases",
            "time for external objects in ms",
            "average edge length",
            "average route length",
        ] {
            assert!(sink.stat(label).is_some(), "missing {label}");
        }
        assert_eq!(sink.stat("average edge length").and_then(|v| v.as_f64()), Some(10.0));
    }

    #[test]
    fn all_routes_counts_initial_routes_and_accepted_reroutes() {
        let mut generator = busy_generator(4);
        let summary = generator.run(&mut NoopObserver).unwrap();
        let s = &summary.statistics;
        let expected = s.moving_objects + s.reroutes_by_event + s.reroutes_by_comparison;
        let sink = generator.into_sink();
        assert_eq!(sink.stat("# all routes"), Some(&StatValue::Int(expected as i64)));
        // Retries, failed lookups and rejected comparisons only show up as router calls.
        assert!(s.router.calls >= expected);
        assert_eq!(sink.stat("# router calls"), Some(&StatValue::Int(s.router.calls as i64)));
    }
}

// ── Statistics ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod stats_tests {
    use ng_output::StatValue;

    use crate::RunStatistics;

    #[test]
    fn empty_run_guards_every_ratio() {
        let rows = RunStatistics::default().rows();
        let get = |label: &str| rows.iter().find(|(l, _)| *l == label).map(|(_, v)| v.clone());
        assert_eq!(get("# nodes/obj"), Some(StatValue::NotAvailable));
        assert_eq!(get("total time/point"), Some(StatValue::NotAvailable));
        assert_eq!(get("routing time/routing"), Some(StatValue::NotAvailable));
        assert_eq!(get("average route length"), Some(StatValue::NotAvailable));
        assert_eq!(get("# computed decreases"), None);
    }

    #[test]
    fn node_degree_excludes_the_entry_edge() {
        let stats = RunStatistics {
            moving_objects:         4,
            reroutes_by_event:      2,
            reroutes_by_comparison: 1,
            traversed_nodes:        10,
            traversed_degree:       35,
            router:                 ng_spatial::RouterStats {
                calls:   50,
                elapsed: std::time::Duration::from_millis(140),
                ..Default::default()
            },
            ..RunStatistics::default()
        };
        let rows = stats.rows();
        let get = |label: &str| rows.iter().find(|(l, _)| *l == label).and_then(|(_, v)| v.as_f64());
        assert_eq!(get("# node degree"), Some(2.5));
        assert_eq!(get("# all routes"), Some(7.0));
        assert_eq!(get("# router calls"), Some(50.0));
        let per_node_degree = get("routing time/node/nodedegr").unwrap();
        assert!((per_node_degree - 140.0 / 10.0 / 2.5).abs() < 1e-9);
        let per_route = get("routing time/routing").unwrap();
        assert!((per_route - 20.0).abs() < 1e-9);
    }

    #[test]
    fn leaf_only_traversal_has_no_degree_ratio() {
        let stats = RunStatistics { traversed_nodes: 2, traversed_degree: 2, ..RunStatistics::default() };
        let rows = stats.rows();
        let get = |label: &str| rows.iter().find(|(l, _)| *l == label).map(|(_, v)| v.clone());
        assert_eq!(get("# node degree"), Some(StatValue::Double(0.0)));
        assert_eq!(get("routing time/node/nodedegr"), Some(StatValue::NotAvailable));
    }
}

// ── CSV end to end ────────────────────────────────────────────────────────────

#[cfg(test)]
mod csv_tests {
    use ng_output::CsvSink;

    use crate::{GeneratorBuilder, NoopObserver};
    use super::*;

    #[test]
    fn run_writes_points_and_statistics() {
        let dir = tempfile::tempdir().expect("create temp dir");
        let sink = CsvSink::new(dir.path()).unwrap();
        let mut generator = GeneratorBuilder::new(single_object_config(1), square(), sink)
            .with_endpoints(FixedEndpoints { from: A, to: C })
            .build()
            .unwrap();
        generator.run(&mut NoopObserver).unwrap();
        assert!(generator.take_output_error().is_none());

        let mut rdr = csv::Reader::from_path(dir.path().join("points.csv")).unwrap();
        assert_eq!(rdr.records().count(), 3);

        let mut rdr = csv::Reader::from_path(dir.path().join("statistics.csv")).unwrap();
        let stats: Vec<(String, String)> = rdr
            .records()
            .map(|r| {
                let r = r.unwrap();
                (r[0].to_owned(), r[1].to_owned())
            })
            .collect();
        assert!(stats.contains(&("# moving objects".to_owned(), "1".to_owned())));
        assert!(stats.contains(&("average route length".to_owned(), "n/a".to_owned())));
    }
}
