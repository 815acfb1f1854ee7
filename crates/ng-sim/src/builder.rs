//! Fluent builder for constructing a [`Generator`].

use log::info;

use ng_classes::{ClassRegistry, ExternalClasses, ObjectClasses};
use ng_congestion::{ExternalObject, ExternalObjects, WeightManager};
use ng_core::rng::stream;
use ng_core::{GeneratorConfig, SimClock, SimRng};
use ng_mobility::{MobilityEngine, ReroutePolicy};
use ng_output::{ReportSink, Reporter};
use ng_spatial::{DijkstraRouter, NetworkGraph, Router, SpatialError};
use ng_spawn::{EndpointPolicy, ExternalObjectGenerator, ObjectGenerator, RandomEndpoints};

use crate::{Generator, Phase, RunControl, SimError, SimResult};

/// Fluent builder for [`Generator<S, R, E>`].
///
/// # Required inputs
///
/// - [`GeneratorConfig`], clamped on entry
/// - [`NetworkGraph`], e.g. from [`ng_spatial::load_network`]
/// - `S: ReportSink`, where point samples and statistics go
///
/// # Optional inputs (have defaults)
///
/// | Method                        | Default                                   |
/// |-------------------------------|-------------------------------------------|
/// | `.with_router(r)`             | [`DijkstraRouter`]                        |
/// | `.with_endpoints(e)`          | [`RandomEndpoints`] from the config       |
/// | `.with_object_classes(c)`     | `ObjectClasses::new` from the config      |
/// | `.with_external_classes(c)`   | `ExternalClasses::standard` from config   |
/// | `.with_initial_external(x)`   | none                                      |
///
/// # Example
///
/// ```rust,ignore
/// let mut generator = GeneratorBuilder::new(config, network, MemorySink::new())
///     .with_endpoints(FixedEndpoints { from, to })
///     .build()?;
/// generator.run(&mut NoopObserver)?;
/// ```
pub struct GeneratorBuilder<S, R = DijkstraRouter, E = RandomEndpoints>
where
    S: ReportSink,
    R: Router,
    E: EndpointPolicy,
{
    config:            GeneratorConfig,
    network:           NetworkGraph,
    sink:              S,
    router:            R,
    endpoints:         E,
    object_classes:    Option<ObjectClasses>,
    external_classes:  Option<ExternalClasses>,
    initial_externals: Vec<ExternalObject>,
}

impl<S: ReportSink> GeneratorBuilder<S> {
    /// Create a builder with all required inputs.
    pub fn new(config: GeneratorConfig, network: NetworkGraph, sink: S) -> Self {
        let config = config.clamped();
        let endpoints = RandomEndpoints::new(&network, config.route_length_factor);
        Self {
            config,
            network,
            sink,
            router:            DijkstraRouter,
            endpoints,
            object_classes:    None,
            external_classes:  None,
            initial_externals: Vec::new(),
        }
    }
}

impl<S, R, E> GeneratorBuilder<S, R, E>
where
    S: ReportSink,
    R: Router,
    E: EndpointPolicy,
{
    /// Replace the routing algorithm.
    pub fn with_router<R2: Router>(self, router: R2) -> GeneratorBuilder<S, R2, E> {
        GeneratorBuilder {
            config:            self.config,
            network:           self.network,
            sink:              self.sink,
            router,
            endpoints:         self.endpoints,
            object_classes:    self.object_classes,
            external_classes:  self.external_classes,
            initial_externals: self.initial_externals,
        }
    }

    /// Replace how start and destination of new objects are chosen.
    pub fn with_endpoints<E2: EndpointPolicy>(self, endpoints: E2) -> GeneratorBuilder<S, R, E2> {
        GeneratorBuilder {
            config:            self.config,
            network:           self.network,
            sink:              self.sink,
            router:            self.router,
            endpoints,
            object_classes:    self.object_classes,
            external_classes:  self.external_classes,
            initial_externals: self.initial_externals,
        }
    }

    /// Use `classes` instead of the standard moving classes.
    pub fn with_object_classes(mut self, classes: ObjectClasses) -> Self {
        self.object_classes = Some(classes);
        self
    }

    /// Use `classes` instead of the standard external classes.
    pub fn with_external_classes(mut self, classes: ExternalClasses) -> Self {
        self.external_classes = Some(classes);
        self
    }

    /// Place an external object before the first tick.
    ///
    /// Its `id` is replaced by a fresh one at build time.  It affects the
    /// weights from tick 0 on and enables congestion even when the config
    /// spawns no external objects.
    pub fn with_initial_external(mut self, object: ExternalObject) -> Self {
        self.initial_externals.push(object);
        self
    }

    /// Validate inputs, build class tables, spawners and weight manager, and
    /// return a ready-to-run [`Generator`].
    pub fn build(self) -> SimResult<Generator<S, R, E>> {
        let config = self.config;
        let network = self.network;

        // ── Validate ──────────────────────────────────────────────────────
        if network.is_empty() {
            return Err(SpatialError::EmptyNetwork.into());
        }
        let spawns_objects = config.objects_at_begin > 0 || config.objects_per_time > 0;
        if spawns_objects && network.edge_count() == 0 {
            return Err(SimError::Config("network has no edges for objects to move on".into()));
        }

        // ── Class tables ──────────────────────────────────────────────────
        let mut classes = ClassRegistry::from_config(&config, network.edge_class_count(), network.extent());
        if let Some(objects) = self.object_classes {
            if objects.is_empty() {
                return Err(SimError::Config("at least one moving-object class is required".into()));
            }
            classes.objects = objects;
        }
        if let Some(externals) = self.external_classes {
            if externals.is_empty() {
                return Err(SimError::Config("at least one external-object class is required".into()));
            }
            classes.externals = externals;
        }

        // ── External objects placed before tick 0 ─────────────────────────
        let mut external_spawner = ExternalObjectGenerator::new(
            SimRng::stream(config.seed, stream::EXTERNAL_SPAWN),
            config.externals_per_time,
            config.externals_at_begin,
            config.probabilistic_counts,
        );
        let mut externals = ExternalObjects::new();
        let congestion = config.external_objects_exist() || !self.initial_externals.is_empty();
        for mut object in self.initial_externals {
            object.id = external_spawner.allocate_id();
            externals.insert(object);
        }

        // ── Engines ───────────────────────────────────────────────────────
        let weights = WeightManager::new(&network, &classes.edges, config.density_weight, congestion);
        let policy = ReroutePolicy::new(
            config.reroute.clone(),
            SimRng::stream(config.seed, stream::REROUTE),
        );
        let mobility = MobilityEngine::new(self.router, policy);
        let object_spawner = ObjectGenerator::new(
            SimRng::stream(config.seed, stream::MOVING_SPAWN),
            self.endpoints,
            &classes.objects,
            config.objects_per_time,
            config.objects_at_begin,
            config.probabilistic_counts,
            config.max_route_retries,
        );

        info!(
            "generator ready: {} nodes, {} edges, max time {}, seed {}, congestion {}",
            network.node_count(),
            network.edge_count(),
            config.max_time,
            config.seed,
            if congestion { "on" } else { "off" },
        );

        Ok(Generator {
            clock:            SimClock::new(config.max_time),
            reporter:         Reporter::new(self.sink, config.seed),
            config,
            network,
            classes,
            weights,
            externals,
            mobility,
            object_spawner,
            external_spawner,
            control:          RunControl::new(),
            phase:            Phase::Initializing,
            ticks:            0,
            traversed_nodes:  0,
            traversed_degree: 0,
            started:          None,
        })
    }
}
