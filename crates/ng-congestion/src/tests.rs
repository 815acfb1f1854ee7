//! Unit tests for ng-congestion.

#[cfg(test)]
mod helpers {
    use ng_core::{ClassId, ExternalId, NodeId, Point, Tick};
    use ng_spatial::{NetworkBuilder, NetworkGraph};

    use crate::ExternalObject;

    /// Square A(0,0) B(100,0) C(100,100) D(0,100), all class 0.
    pub fn square() -> (NetworkGraph, [NodeId; 4]) {
        let mut b = NetworkBuilder::new();
        let ids: Vec<NodeId> = [(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0)]
            .iter()
            .map(|&(x, y)| b.add_node(Point::new(x, y), ClassId(0)).unwrap())
            .collect();
        for (i, j) in [(0, 1), (1, 2), (2, 3), (3, 0)] {
            b.add_edge_auto(ids[i], ids[j], ClassId(0)).unwrap();
        }
        (b.build(), [ids[0], ids[1], ids[2], ids[3]])
    }

    pub fn blocker(id: u32, center: Point, half_extent: f64, slowdown: f64) -> ExternalObject {
        ExternalObject {
            id: ExternalId(id),
            class: ClassId(0),
            center,
            half_extent,
            velocity: (0.0, 0.0),
            growth: 0.0,
            slowdown,
            created: Tick(0),
            removal: Tick(100),
        }
    }
}

// ── External objects ──────────────────────────────────────────────────────────

#[cfg(test)]
mod external {
    use ng_core::{Point, Tick};

    use crate::ExternalObjects;
    use super::helpers::blocker;

    #[test]
    fn grows_then_shrinks_never_negative() {
        let mut x = blocker(0, Point::new(0.0, 0.0), 1.0, 2.0);
        x.growth = 1.0;
        x.removal = Tick(4);
        let mut sizes = Vec::new();
        for t in 1..=4 {
            x.advance(Tick(t));
            sizes.push(x.half_extent);
        }
        // Ages 1, 2 grow (2·age ≤ 4); ages 3, 4 shrink.
        assert_eq!(sizes, vec![2.0, 3.0, 2.0, 1.0]);

        x.half_extent = 0.5;
        x.advance(Tick(4));
        assert_eq!(x.half_extent, 0.0);
        assert!(!x.is_effective());
    }

    #[test]
    fn drifts_by_velocity() {
        let mut x = blocker(0, Point::new(10.0, 10.0), 1.0, 2.0);
        x.velocity = (1.5, -2.0);
        x.advance(Tick(1));
        x.advance(Tick(2));
        assert_eq!(x.center, Point::new(13.0, 6.0));
    }

    #[test]
    fn store_expires_at_removal_tick() {
        let mut store = ExternalObjects::new();
        let mut a = blocker(0, Point::new(0.0, 0.0), 1.0, 2.0);
        a.removal = Tick(2);
        store.insert(a);
        store.insert(blocker(1, Point::new(5.0, 5.0), 1.0, 2.0));

        assert!(store.advance(Tick(1)).is_empty());
        let removed = store.advance(Tick(2));
        assert_eq!(removed.len(), 1);
        assert_eq!(removed[0].id.0, 0);
        assert_eq!(store.len(), 1);
        assert_eq!(store.created(), 2);
        assert_eq!(store.peak(), 2);
    }
}

// ── Weight manager ────────────────────────────────────────────────────────────

#[cfg(test)]
mod manager {
    use ng_classes::{EdgeClass, EdgeClasses};
    use ng_core::{Point, Tick};

    use crate::{ExternalObjects, WeightManager};
    use super::helpers::{blocker, square};

    #[test]
    fn no_externals_means_static_cost() {
        let (net, [a, b, ..]) = square();
        let classes = EdgeClasses::standard(1);
        let mut wm = WeightManager::new(&net, &classes, 5.0, false);
        let mut store = ExternalObjects::new();
        store.insert(blocker(0, Point::new(50.0, 0.0), 10.0, 10.0));

        let snap = wm.refresh(&net, Tick(1), &store, &[9, 9, 9, 9]);
        let ab = net.edge_between(a, b).unwrap();
        assert_eq!(snap.weight(ab), 100.0, "disabled congestion ignores all inputs");
        assert_eq!(wm.stats().refreshes, 0);
    }

    #[test]
    fn footprint_multiplies_overlapped_edges() {
        let (net, [a, b, c, d]) = square();
        let classes = EdgeClasses::standard(1);
        let mut wm = WeightManager::new(&net, &classes, 0.0, true);
        let mut store = ExternalObjects::new();
        store.insert(blocker(0, Point::new(50.0, 0.0), 10.0, 10.0));

        let snap = wm.refresh(&net, Tick(0), &store, &[]);
        assert_eq!(snap.weight(net.edge_between(a, b).unwrap()), 1_000.0);
        assert_eq!(snap.weight(net.edge_between(c, d).unwrap()), 100.0);
        assert_eq!(wm.stats().computed_decreases, 1);
        assert_eq!(wm.stats().real_decreases, 1);
    }

    #[test]
    fn overlapping_footprints_compound() {
        let (net, [a, b, ..]) = square();
        let classes = EdgeClasses::standard(1);
        let mut wm = WeightManager::new(&net, &classes, 0.0, true);
        let mut store = ExternalObjects::new();
        store.insert(blocker(0, Point::new(40.0, 0.0), 5.0, 2.0));
        store.insert(blocker(1, Point::new(60.0, 0.0), 5.0, 3.0));

        let snap = wm.refresh(&net, Tick(0), &store, &[]);
        assert_eq!(snap.weight(net.edge_between(a, b).unwrap()), 600.0);
    }

    #[test]
    fn degenerate_footprint_has_no_effect() {
        let (net, [a, b, ..]) = square();
        let classes = EdgeClasses::standard(1);
        let mut wm = WeightManager::new(&net, &classes, 0.0, true);
        let mut store = ExternalObjects::new();
        store.insert(blocker(0, Point::new(50.0, 0.0), 0.0, 10.0));

        let snap = wm.refresh(&net, Tick(0), &store, &[]);
        assert_eq!(snap.weight(net.edge_between(a, b).unwrap()), 100.0);
    }

    #[test]
    fn density_raises_weight_by_capacity() {
        let (net, [a, b, ..]) = square();
        let classes = EdgeClasses::standard(1); // capacity 10
        let mut wm = WeightManager::new(&net, &classes, 1.0, true);
        let ab = net.edge_between(a, b).unwrap();
        let mut occupancy = vec![0u32; net.edge_count()];
        occupancy[ab.index()] = 5;

        let snap = wm.refresh(&net, Tick(3), &ExternalObjects::new(), &occupancy);
        assert_eq!(snap.weight(ab), 150.0);
        assert_eq!(snap.changed_at(ab), Tick(3));
    }

    #[test]
    fn invalid_class_parameters_keep_weight_at_static_cost() {
        let (net, [a, b, ..]) = square();
        let classes = EdgeClasses::from_classes(vec![EdgeClass { cost_factor: 0.5, capacity: 0.0 }]);
        let mut wm = WeightManager::new(&net, &classes, 1.0, true);
        let ab = net.edge_between(a, b).unwrap();
        assert_eq!(wm.static_cost(ab), 100.0);

        let empty = vec![0u32; net.edge_count()];
        let snap = wm.refresh(&net, Tick(1), &ExternalObjects::new(), &empty);
        assert_eq!(snap.weight(ab), 100.0);

        let mut occupancy = empty;
        occupancy[ab.index()] = 5;
        let snap = wm.refresh(&net, Tick(2), &ExternalObjects::new(), &occupancy);
        assert_eq!(snap.weight(ab), 600.0);
    }

    #[test]
    fn class_cost_factor_applies() {
        let (net, [a, b, ..]) = square();
        let classes = EdgeClasses::standard(1);
        let wm = WeightManager::new(&net, &classes, 0.0, true);
        assert_eq!(wm.static_cost(net.edge_between(a, b).unwrap()), 100.0);
        assert_eq!(wm.snapshot().tick(), Tick(0));
    }

    #[test]
    fn removal_restores_static_and_stamps_change() {
        let (net, [a, b, ..]) = square();
        let classes = EdgeClasses::standard(1);
        let mut wm = WeightManager::new(&net, &classes, 0.0, true);
        let mut store = ExternalObjects::new();
        let mut x = blocker(0, Point::new(50.0, 0.0), 10.0, 10.0);
        x.removal = Tick(2);
        store.insert(x);
        let ab = net.edge_between(a, b).unwrap();

        wm.refresh(&net, Tick(1), &store, &[]);
        store.advance(Tick(2));
        let snap = wm.refresh(&net, Tick(2), &store, &[]);
        assert_eq!(snap.weight(ab), 100.0);
        assert_eq!(snap.changed_at(ab), Tick(2));
        assert_eq!(wm.stats().real_decreases, 2);
    }
}
