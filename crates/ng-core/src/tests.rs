//! Unit tests for ng-core primitives.

#[cfg(test)]
mod ids {
    use crate::{ClassId, EdgeId, NodeId, ObjectId};

    #[test]
    fn index_roundtrip() {
        let id = ObjectId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(ObjectId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn ordering() {
        assert!(ObjectId(0) < ObjectId(1));
        assert!(NodeId(100) > NodeId(99));
    }

    #[test]
    fn invalid_sentinels_are_max() {
        assert_eq!(NodeId::INVALID.0, u32::MAX);
        assert_eq!(EdgeId::INVALID.0, u32::MAX);
        assert_eq!(ClassId::INVALID.0, u16::MAX);
    }

    #[test]
    fn next_is_monotonic() {
        assert_eq!(ObjectId(0).next(), ObjectId(1));
        assert!(ObjectId(7).next() > ObjectId(7));
    }

    #[test]
    fn display() {
        assert_eq!(NodeId(7).to_string(), "NodeId(7)");
    }
}

#[cfg(test)]
mod geo {
    use crate::{Point, Rect};

    #[test]
    fn distance_and_lerp() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(1.5, 2.0));
        // t is clamped
        assert_eq!(a.lerp(b, 2.0), b);
    }

    #[test]
    fn rect_around_never_negative() {
        let r = Rect::around(Point::new(10.0, 10.0), -5.0);
        assert_eq!(r.width(), 0.0);
        assert!(r.is_degenerate());
    }

    #[test]
    fn bounding_box() {
        let r = Rect::bounding([
            Point::new(0.0, 5.0),
            Point::new(10.0, -1.0),
            Point::new(3.0, 2.0),
        ])
        .unwrap();
        assert_eq!(r.min, Point::new(0.0, -1.0));
        assert_eq!(r.max, Point::new(10.0, 5.0));
        assert!(Rect::bounding(std::iter::empty::<Point>()).is_none());
    }

    #[test]
    fn segment_crossing_rect() {
        let r = Rect::around(Point::new(50.0, 0.0), 10.0);
        // Horizontal edge through the footprint.
        assert!(r.intersects_segment(Point::new(0.0, 0.0), Point::new(100.0, 0.0)));
        // Vertical edge at x = 100 misses it.
        assert!(!r.intersects_segment(Point::new(100.0, 0.0), Point::new(100.0, 100.0)));
        // Diagonal entering through the bottom side.
        assert!(r.intersects_segment(Point::new(45.0, -20.0), Point::new(65.0, -5.0)));
    }

    #[test]
    fn segment_fully_inside_and_outside() {
        let r = Rect::from_corners(Point::new(0.0, 0.0), Point::new(10.0, 10.0));
        assert!(r.intersects_segment(Point::new(2.0, 2.0), Point::new(3.0, 3.0)));
        assert!(!r.intersects_segment(Point::new(20.0, 20.0), Point::new(30.0, 25.0)));
        // Degenerate segment (a point) inside.
        assert!(r.intersects_segment(Point::new(5.0, 5.0), Point::new(5.0, 5.0)));
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, Tick};

    #[test]
    fn tick_arithmetic() {
        let t = Tick(10);
        assert_eq!(t + 5, Tick(15));
        assert_eq!(t.offset(3), Tick(13));
        assert_eq!(Tick(15) - Tick(10), 5u64);
        assert_eq!(Tick(3).since(Tick(5)), 0);
    }

    #[test]
    fn clock_runs_through_max_inclusive() {
        let mut clock = SimClock::new(3);
        let mut visited = Vec::new();
        while !clock.is_exceeded() {
            visited.push(clock.current_tick.0);
            clock.advance();
        }
        assert_eq!(visited, vec![0, 1, 2, 3]);
        assert_eq!(clock.total_ticks(), 4);
    }

    #[test]
    fn reset_rewinds() {
        let mut clock = SimClock::new(5);
        clock.advance();
        clock.reset();
        assert_eq!(clock.current_tick, Tick::ZERO);
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;
    use crate::rng::stream;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: f64 = r1.random();
            let b: f64 = r2.random();
            assert_eq!(a, b);
        }
    }

    #[test]
    fn streams_differ() {
        let mut a = SimRng::stream(1, stream::MOVING_SPAWN);
        let mut b = SimRng::stream(1, stream::REPORTER);
        let x: u64 = a.random();
        let y: u64 = b.random();
        assert_ne!(x, y);
    }

    #[test]
    fn per_mille_extremes() {
        let mut rng = SimRng::new(0);
        for _ in 0..100 {
            assert!(!rng.per_mille(0));
            assert!(rng.per_mille(1000));
        }
    }

    #[test]
    fn gen_range_in_bounds() {
        let mut rng = SimRng::new(0);
        for _ in 0..1000 {
            let v = rng.gen_range(0.0f64..1.0);
            assert!((0.0..1.0).contains(&v));
        }
    }
}

#[cfg(test)]
mod config {
    use crate::{CoreError, GeneratorConfig};

    #[test]
    fn defaults_are_within_bounds() {
        let cfg = GeneratorConfig::default();
        assert_eq!(cfg.clone().clamped(), cfg);
    }

    #[test]
    fn pairs_override_defaults() {
        let cfg = GeneratorConfig::from_pairs([
            ("maxTime", "100"),
            ("objBegin", "12"),
            ("reportProbability", "250"),
            ("rerouteByEvent", "false"),
        ])
        .unwrap();
        assert_eq!(cfg.max_time, 100);
        assert_eq!(cfg.objects_at_begin, 12);
        assert_eq!(cfg.report_probability, 250);
        assert!(!cfg.reroute.by_event);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let cfg = GeneratorConfig::from_pairs([
            ("maxTime", "1"),
            ("reportProbability", "5000"),
            ("objPerTime", "100000"),
            ("maxSpeedDivisor", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.max_time, 5);
        assert_eq!(cfg.report_probability, 1000);
        assert_eq!(cfg.objects_per_time, 800);
        assert_eq!(cfg.max_speed_divisor, 1);
    }

    #[test]
    fn negative_values_are_clamped_not_rejected() {
        let cfg = GeneratorConfig::from_pairs([
            ("objPerTime", "-3"),
            ("maxTime", "-1"),
            ("numObjClasses", "-7"),
            ("waitingPeriod", "-250"),
        ])
        .unwrap();
        assert_eq!(cfg.objects_per_time, 0);
        assert_eq!(cfg.max_time, cfg.limits.min_max_time);
        assert_eq!(cfg.num_object_classes, 1);
        assert_eq!(cfg.waiting_period_ms, 0);
    }

    #[test]
    fn huge_counts_saturate_then_clamp() {
        let cfg = GeneratorConfig::from_pairs([("objBegin", "99999999999999")]).unwrap();
        assert_eq!(cfg.objects_at_begin, cfg.limits.max_objects_at_begin);
    }

    #[test]
    fn limit_keys_apply_regardless_of_order() {
        let cfg = GeneratorConfig::from_pairs([("maxTime", "3"), ("MIN_MAXTIME", "2")]).unwrap();
        assert_eq!(cfg.limits.min_max_time, 2);
        assert_eq!(cfg.max_time, 3);
    }

    #[test]
    fn unparsable_value_is_an_error() {
        let err = GeneratorConfig::from_pairs([("maxTime", "soon")]).unwrap_err();
        assert!(matches!(err, CoreError::InvalidValue { .. }));
    }

    #[test]
    fn inverted_limits_are_an_error() {
        let err = GeneratorConfig::from_pairs([("MIN_MAXTIME", "100"), ("MAX_MAXTIME", "10")])
            .unwrap_err();
        assert!(matches!(err, CoreError::Config(_)));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let cfg = GeneratorConfig::from_pairs([("viewWidth", "800")]).unwrap();
        assert_eq!(cfg, GeneratorConfig::default());
    }

    #[test]
    fn external_flag() {
        let mut cfg = GeneratorConfig::default();
        assert!(!cfg.external_objects_exist());
        cfg.externals_at_begin = 1;
        assert!(cfg.external_objects_exist());
    }
}
