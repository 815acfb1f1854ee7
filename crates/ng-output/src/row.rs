//! Plain data row types written by report sinks.

use std::fmt;

/// Which population a point sample belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointKind {
    Moving,
    External,
}

impl PointKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PointKind::Moving   => "moving",
            PointKind::External => "external",
        }
    }
}

/// Lifecycle moment a point sample was taken at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointEvent {
    /// First position, in the tick the object was created.
    New,
    /// Regular per-tick position.
    Move,
    /// Last position, on arrival, removal, or the final flush.
    Disappear,
}

impl PointEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            PointEvent::New       => "new",
            PointEvent::Move      => "move",
            PointEvent::Disappear => "disappear",
        }
    }
}

/// One position sample of a moving or external object.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointRow {
    /// Raw `ObjectId` or `ExternalId`, depending on `kind`.
    pub object: u32,
    pub class:  u16,
    pub tick:   u64,
    pub x:      f64,
    pub y:      f64,
    pub kind:   PointKind,
    pub event:  PointEvent,
}

/// Value of a labeled statistic.
///
/// Ratios whose denominator is zero are [`StatValue::NotAvailable`] and
/// render as `n/a`.
#[derive(Debug, Clone, PartialEq)]
pub enum StatValue {
    Int(i64),
    Double(f64),
    Text(String),
    NotAvailable,
}

impl StatValue {
    /// `num / den`, or `NotAvailable` when `den` is zero or the quotient is
    /// not finite.
    pub fn ratio(num: f64, den: f64) -> StatValue {
        if den == 0.0 {
            return StatValue::NotAvailable;
        }
        let q = num / den;
        if q.is_finite() { StatValue::Double(q) } else { StatValue::NotAvailable }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, StatValue::NotAvailable)
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            StatValue::Int(v)    => Some(v as f64),
            StatValue::Double(v) => Some(v),
            _ => None,
        }
    }
}

impl From<Option<f64>> for StatValue {
    fn from(v: Option<f64>) -> Self {
        match v {
            Some(v) if v.is_finite() => StatValue::Double(v),
            _ => StatValue::NotAvailable,
        }
    }
}

impl fmt::Display for StatValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatValue::Int(v)       => write!(f, "{v}"),
            StatValue::Double(v)    => write!(f, "{v:.6}"),
            StatValue::Text(s)      => f.write_str(s),
            StatValue::NotAvailable => f.write_str("n/a"),
        }
    }
}

/// One labeled entry of the final statistics.
#[derive(Debug, Clone, PartialEq)]
pub struct StatRow {
    pub label: String,
    pub value: StatValue,
}
