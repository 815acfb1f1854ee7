//! Run configuration.
//!
//! A [`GeneratorConfig`] is built once before a run and never changes while
//! the run is in progress.  It can be assembled in code (start from
//! `GeneratorConfig::default()` and edit fields) or from a flat key/value set
//! with [`GeneratorConfig::from_pairs`].  Either way [`GeneratorConfig::clamped`]
//! pulls every numeric field into its documented bounds: out-of-range values
//! are clamped, not rejected.  Only unparsable values are errors.
//!
//! The bounds themselves live in [`Limits`] and can be overridden by the
//! upper-case keys (`MAX_MAXTIME`, `MAX_OBJPERTIME`, …).

use std::str::FromStr;

use log::{debug, info};

use crate::{CoreError, CoreResult};

// ── Limits ────────────────────────────────────────────────────────────────────

/// Bounds applied when clamping a [`GeneratorConfig`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    pub min_max_time:           u64,
    pub max_max_time:           u64,
    pub max_object_classes:     usize,
    pub max_objects_per_time:   u32,
    pub max_objects_at_begin:   u32,
    pub max_external_classes:   usize,
    pub max_externals_per_time: u32,
    pub max_externals_at_begin: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            min_max_time:           5,
            max_max_time:           64_000,
            max_object_classes:     20,
            max_objects_per_time:   800,
            max_objects_at_begin:   1_000,
            max_external_classes:   10,
            max_externals_per_time: 10,
            max_externals_at_begin: 100,
        }
    }
}

/// Upper bound of a per-mille probability.
pub const PER_MILLE_MAX: u32 = 1_000;
/// Bounds of the maximum speed divisor.
pub const MAX_SPEED_DIVISOR_RANGE: (u32, u32) = (1, 1_000);
/// Upper bound of the inter-tick delay in milliseconds.
pub const MAX_WAITING_PERIOD_MS: u64 = 60_000;
/// Bounds of the bounded-retry count for unreachable spawn routes.
pub const ROUTE_RETRIES_RANGE: (u32, u32) = (1, 10_000);

// ── RerouteConfig ─────────────────────────────────────────────────────────────

/// Parameters of the re-routing policy.
#[derive(Clone, Debug, PartialEq)]
pub struct RerouteConfig {
    /// Recompute a route when an edge on it changed weight.
    pub by_event: bool,
    /// Minimum route age in ticks before a comparison is attempted.
    /// `0` disables re-routing by comparison.
    pub interval: u64,
    /// Probability (per mille) that an eligible object is compared.
    pub probability: u32,
    /// Relative margin: switch only if `alternative < current × (1 − margin)`.
    pub margin: f64,
}

impl Default for RerouteConfig {
    fn default() -> Self {
        Self {
            by_event:    true,
            interval:    10,
            probability: 100,
            margin:      0.1,
        }
    }
}

// ── GeneratorConfig ───────────────────────────────────────────────────────────

/// Immutable parameters of one generator run.
#[derive(Clone, Debug, PartialEq)]
pub struct GeneratorConfig {
    /// Last simulated tick (inclusive).
    pub max_time: u64,
    pub num_object_classes: usize,
    pub num_external_classes: usize,
    /// Mean number of new moving objects per tick (ticks ≥ 1).
    pub objects_per_time: u32,
    /// Mean number of moving objects created at tick 0.
    pub objects_at_begin: u32,
    pub externals_per_time: u32,
    pub externals_at_begin: u32,
    /// Per-mille probability that a position is reported.
    pub report_probability: u32,
    /// Base speed is `data space extent / max_speed_divisor` per tick.
    /// 10 = fast, 50 = middle, 250 = slow.
    pub max_speed_divisor: u32,
    /// Pause between ticks for animated display.
    pub waiting_period_ms: u64,
    pub seed: u64,
    /// Draw spawn counts from a Poisson distribution instead of using the
    /// means directly.
    pub probabilistic_counts: bool,
    /// Target route lengths are drawn from `[0, factor × extent]`.
    pub route_length_factor: f64,
    /// Weight increase per unit of moving-object density on an edge.
    pub density_weight: f64,
    pub reroute: RerouteConfig,
    /// Resampling attempts before an unreachable spawn becomes fatal.
    pub max_route_retries: u32,
    pub limits: Limits,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_time:             20,
            num_object_classes:   6,
            num_external_classes: 3,
            objects_per_time:     5,
            objects_at_begin:     5,
            externals_per_time:   0,
            externals_at_begin:   0,
            report_probability:   1_000,
            max_speed_divisor:    50,
            waiting_period_ms:    0,
            seed:                 1,
            probabilistic_counts: false,
            route_length_factor:  0.5,
            density_weight:       0.0,
            reroute:              RerouteConfig::default(),
            max_route_retries:    100,
            limits:               Limits::default(),
        }
    }
}

impl GeneratorConfig {
    /// Build a configuration from a flat key/value set.
    ///
    /// Limit keys are applied first so they bound the run keys regardless of
    /// their order.  Unknown keys are ignored (logged at `debug`).  The
    /// result is already [`clamped`](Self::clamped).
    pub fn from_pairs<I, K, V>(pairs: I) -> CoreResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let pairs: Vec<(String, String)> = pairs
            .into_iter()
            .map(|(k, v)| (k.as_ref().trim().to_owned(), v.as_ref().trim().to_owned()))
            .collect();

        let mut cfg = GeneratorConfig::default();

        for (key, value) in &pairs {
            let limits = &mut cfg.limits;
            match key.as_str() {
                "MIN_MAXTIME"       => limits.min_max_time = parse_count(key, value)?,
                "MAX_MAXTIME"       => limits.max_max_time = parse_count(key, value)?,
                "MAX_OBJCLASSES"    => limits.max_object_classes = parse_count(key, value)?,
                "MAX_OBJPERTIME"    => limits.max_objects_per_time = parse_count(key, value)?,
                "MAX_OBJBEGIN"      => limits.max_objects_at_begin = parse_count(key, value)?,
                "MAX_EXTOBJCLASSES" => limits.max_external_classes = parse_count(key, value)?,
                "MAX_EXTOBJPERTIME" => limits.max_externals_per_time = parse_count(key, value)?,
                "MAX_EXTOBJBEGIN"   => limits.max_externals_at_begin = parse_count(key, value)?,
                _ => {}
            }
        }
        if cfg.limits.min_max_time > cfg.limits.max_max_time {
            return Err(CoreError::Config(format!(
                "MIN_MAXTIME ({}) exceeds MAX_MAXTIME ({})",
                cfg.limits.min_max_time, cfg.limits.max_max_time
            )));
        }

        for (key, value) in &pairs {
            match key.as_str() {
                "maxTime"             => cfg.max_time = parse_count(key, value)?,
                "numObjClasses"       => cfg.num_object_classes = parse_count(key, value)?,
                "numExtObjClasses"    => cfg.num_external_classes = parse_count(key, value)?,
                "objPerTime"          => cfg.objects_per_time = parse_count(key, value)?,
                "objBegin"            => cfg.objects_at_begin = parse_count(key, value)?,
                "extObjPerTime"       => cfg.externals_per_time = parse_count(key, value)?,
                "extObjBegin"         => cfg.externals_at_begin = parse_count(key, value)?,
                "reportProbability"   => cfg.report_probability = parse_count(key, value)?,
                "maxSpeedDivisor"     => cfg.max_speed_divisor = parse_count(key, value)?,
                "waitingPeriod"       => cfg.waiting_period_ms = parse_count(key, value)?,
                "seed"                => cfg.seed = parse(key, value)?,
                "probabilisticCounts" => cfg.probabilistic_counts = parse_bool(key, value)?,
                "routeLengthFactor"   => cfg.route_length_factor = parse(key, value)?,
                "densityWeight"       => cfg.density_weight = parse(key, value)?,
                "rerouteByEvent"      => cfg.reroute.by_event = parse_bool(key, value)?,
                "rerouteInterval"     => cfg.reroute.interval = parse_count(key, value)?,
                "rerouteProbability"  => cfg.reroute.probability = parse_count(key, value)?,
                "rerouteMargin"       => cfg.reroute.margin = parse(key, value)?,
                "maxRouteRetries"     => cfg.max_route_retries = parse_count(key, value)?,
                k if is_limit_key(k) => {}
                other => debug!("ignoring unknown configuration key {other:?}"),
            }
        }

        Ok(cfg.clamped())
    }

    /// Return a copy with every field pulled into its documented bounds.
    pub fn clamped(mut self) -> Self {
        let l = self.limits.clone();

        self.max_time = clamp_logged("maxTime", self.max_time, l.min_max_time, l.max_max_time);
        self.num_object_classes =
            clamp_logged("numObjClasses", self.num_object_classes, 1, l.max_object_classes);
        self.num_external_classes =
            clamp_logged("numExtObjClasses", self.num_external_classes, 1, l.max_external_classes);
        self.objects_per_time =
            clamp_logged("objPerTime", self.objects_per_time, 0, l.max_objects_per_time);
        self.objects_at_begin =
            clamp_logged("objBegin", self.objects_at_begin, 0, l.max_objects_at_begin);
        self.externals_per_time =
            clamp_logged("extObjPerTime", self.externals_per_time, 0, l.max_externals_per_time);
        self.externals_at_begin =
            clamp_logged("extObjBegin", self.externals_at_begin, 0, l.max_externals_at_begin);
        self.report_probability =
            clamp_logged("reportProbability", self.report_probability, 0, PER_MILLE_MAX);
        self.max_speed_divisor = clamp_logged(
            "maxSpeedDivisor",
            self.max_speed_divisor,
            MAX_SPEED_DIVISOR_RANGE.0,
            MAX_SPEED_DIVISOR_RANGE.1,
        );
        self.waiting_period_ms =
            clamp_logged("waitingPeriod", self.waiting_period_ms, 0, MAX_WAITING_PERIOD_MS);
        self.route_length_factor = clamp_f64("routeLengthFactor", self.route_length_factor, 0.0, 2.0);
        self.density_weight = clamp_f64("densityWeight", self.density_weight, 0.0, 100.0);
        self.reroute.interval = clamp_logged("rerouteInterval", self.reroute.interval, 0, l.max_max_time);
        self.reroute.probability =
            clamp_logged("rerouteProbability", self.reroute.probability, 0, PER_MILLE_MAX);
        self.reroute.margin = clamp_f64("rerouteMargin", self.reroute.margin, 0.0, 1.0);
        self.max_route_retries = clamp_logged(
            "maxRouteRetries",
            self.max_route_retries,
            ROUTE_RETRIES_RANGE.0,
            ROUTE_RETRIES_RANGE.1,
        );
        self
    }

    /// `true` when the run will create external objects at some tick.
    ///
    /// When `false` the weight manager skips congestion entirely.
    #[inline]
    pub fn external_objects_exist(&self) -> bool {
        self.externals_per_time > 0 || self.externals_at_begin > 0
    }
}

// ── Parsing helpers ───────────────────────────────────────────────────────────

fn is_limit_key(key: &str) -> bool {
    matches!(
        key,
        "MIN_MAXTIME"
            | "MAX_MAXTIME"
            | "MAX_OBJCLASSES"
            | "MAX_OBJPERTIME"
            | "MAX_OBJBEGIN"
            | "MAX_EXTOBJCLASSES"
            | "MAX_EXTOBJPERTIME"
            | "MAX_EXTOBJBEGIN"
    )
}

fn parse<T>(key: &str, value: &str) -> CoreResult<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| CoreError::InvalidValue {
        key:    key.to_owned(),
        value:  value.to_owned(),
        reason: e.to_string(),
    })
}

/// Parse an unsigned count or bound.  Any integer is accepted: negative
/// values become 0 and huge ones saturate, so [`GeneratorConfig::clamped`]
/// can pull them into range.  Only non-numeric text is an error.
fn parse_count<T: TryFrom<u32>>(key: &str, value: &str) -> CoreResult<T> {
    let raw: i128 = parse(key, value)?;
    let saturated = raw.clamp(0, i128::from(u32::MAX));
    if saturated != raw {
        debug!("{key} = {raw} saturated to {saturated}");
    }
    let narrowed = u32::try_from(saturated).unwrap_or(u32::MAX);
    T::try_from(narrowed).map_err(|_| CoreError::InvalidValue {
        key:    key.to_owned(),
        value:  value.to_owned(),
        reason: "does not fit the target type".to_owned(),
    })
}

fn parse_bool(key: &str, value: &str) -> CoreResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(CoreError::InvalidValue {
            key:    key.to_owned(),
            value:  value.to_owned(),
            reason: "expected a boolean".to_owned(),
        }),
    }
}

fn clamp_logged<T>(key: &str, value: T, min: T, max: T) -> T
where
    T: PartialOrd + Copy + std::fmt::Display,
{
    let clamped = if value < min {
        min
    } else if value > max {
        max
    } else {
        value
    };
    if clamped != value {
        info!("{key} = {value} is out of range [{min}, {max}]; using {clamped}");
    }
    clamped
}

fn clamp_f64(key: &str, value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        info!("{key} is NaN; using {min}");
        return min;
    }
    clamp_logged(key, value, min, max)
}
