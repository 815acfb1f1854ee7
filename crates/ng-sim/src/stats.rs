//! Final run statistics.
//!
//! Every ratio goes through [`StatValue::ratio`], so an empty run yields
//! `n/a` entries instead of dividing by zero.

use std::time::Duration;

use ng_congestion::CongestionStats;
use ng_output::{ReportSink, Reporter, StatValue};
use ng_spatial::RouterStats;

/// Totals collected over one run, turned into labeled rows by
/// [`rows`](Self::rows).
#[derive(Debug, Clone, Default)]
pub struct RunStatistics {
    pub width:                  f64,
    pub height:                 f64,
    pub nodes:                  usize,
    pub edges:                  usize,
    pub max_time:               u64,
    pub moving_objects:         u64,
    pub external_objects:       u64,
    pub points:                 u64,
    pub traversed_nodes:        u64,
    pub traversed_degree:       u64,
    pub reroutes_by_event:      u64,
    pub reroutes_by_comparison: u64,
    pub route_retries:          u64,
    pub peak_live:              usize,
    pub total_time:             Duration,
    pub router:                 RouterStats,
    /// `None` when the run had no external objects configured.
    pub congestion:             Option<CongestionStats>,
    pub average_edge_length:    Option<f64>,
    pub average_route_length:   Option<f64>,
}

fn ms(d: Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}

fn int(v: u64) -> StatValue {
    StatValue::Int(i64::try_from(v).unwrap_or(i64::MAX))
}

impl RunStatistics {
    /// The catalogue in emission order.
    pub fn rows(&self) -> Vec<(&'static str, StatValue)> {
        let objects = self.moving_objects as f64;
        let points = self.points as f64;
        let nodes = self.traversed_nodes as f64;
        let degree = self.traversed_degree as f64;
        let total_ms = ms(self.total_time);
        let routing_ms = ms(self.router.elapsed);
        let routes = self.all_routes();
        // Mean degree of a traversed node, not counting the edge it was entered by.
        let node_degree = StatValue::ratio(degree - nodes, nodes);

        let mut rows = vec![
            ("data space width",        StatValue::Double(self.width)),
            ("data space height",       StatValue::Double(self.height)),
            ("number of nodes",         int(self.nodes as u64)),
            ("number of edges",         int(self.edges as u64)),
            ("maximum time",            int(self.max_time)),
            ("# moving objects",        int(self.moving_objects)),
            ("# external objects",      int(self.external_objects)),
            ("# points",                int(self.points)),
            ("# traversed nodes",       int(self.traversed_nodes)),
            ("# nodes/obj",             StatValue::ratio(nodes, objects)),
            ("# traversed degree",      int(self.traversed_degree)),
            ("# node degree",           node_degree.clone()),
            ("# all routes",            int(routes)),
            ("# routes by event",       int(self.reroutes_by_event)),
            ("# routes by comparison",  int(self.reroutes_by_comparison)),
            ("# route retries",         int(self.route_retries)),
            ("peak live objects",       int(self.peak_live as u64)),
            ("total time in ms",        StatValue::Double(total_ms)),
            ("total time/obj",          StatValue::ratio(total_ms, objects)),
            ("total time/point",        StatValue::ratio(total_ms, points)),
            ("routing time in ms",      StatValue::Double(routing_ms)),
            ("heap inserts",            int(self.router.heap_inserts)),
            ("heap fetches",            int(self.router.heap_fetches)),
            ("heap decreases",          int(self.router.decreases)),
            ("routing time/obj",        StatValue::ratio(routing_ms, objects)),
            ("routing time/point",      StatValue::ratio(routing_ms, points)),
            ("routing time/node",       StatValue::ratio(routing_ms, nodes)),
            ("routing time/node/nodedegr", match node_degree.as_f64() {
                Some(d) => StatValue::ratio(routing_ms / nodes, d),
                None => StatValue::NotAvailable,
            }),
            ("routing time/routing",    StatValue::ratio(routing_ms, routes as f64)),
            ("# router calls",          int(self.router.calls)),
        ];

        if let Some(c) = &self.congestion {
            rows.push(("# computed decreases", int(c.computed_decreases)));
            rows.push(("# real decreases", int(c.real_decreases)));
            rows.push(("time for external objects in ms", StatValue::Double(ms(c.elapsed))));
        }

        rows.push(("average edge length", StatValue::from(self.average_edge_length)));
        rows.push(("average route length", StatValue::from(self.average_route_length)));
        rows
    }

    /// Initial routes plus every accepted reroute.
    pub fn all_routes(&self) -> u64 {
        self.moving_objects + self.reroutes_by_event + self.reroutes_by_comparison
    }

    /// Write every row through `reporter`.
    pub fn emit<S: ReportSink>(&self, reporter: &mut Reporter<S>) {
        for (label, value) in self.rows() {
            reporter.report_stat(label, value);
        }
    }
}
