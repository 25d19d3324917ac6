//! Attribute values for structured log events
//!
//! This module provides:
//! - `Value`: the closed set of value kinds the formatter knows how to render
//! - `Attr`: a key paired with a value, or a named group of attributes
//! - `LogValuer`: values computed lazily, only when an event is formatted

use chrono::{DateTime, FixedOffset, TimeZone};
use std::any::Any;
use std::fmt::{self, Write as _};
use std::sync::Arc;
use std::time::Duration;

/// Upper bound on chained lazy values before resolution gives up
const MAX_RESOLVE_DEPTH: usize = 100;

/// Arbitrary value rendered through its `Display` implementation.
///
/// Blanket-implemented for every displayable, thread-safe type, so any such
/// value can be attached with [`Value::any`].
pub trait AnyValue: fmt::Display + fmt::Debug + Send + Sync + 'static {
    fn as_any(&self) -> &dyn Any;
}

impl<T> AnyValue for T
where
    T: fmt::Display + fmt::Debug + Send + Sync + 'static,
{
    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A value produced on demand when the event carrying it is formatted
pub trait LogValuer: Send + Sync {
    fn log_value(&self) -> Value;
}

impl<F> LogValuer for F
where
    F: Fn() -> Value + Send + Sync,
{
    fn log_value(&self) -> Value {
        self()
    }
}

/// Value type for structured logging attributes
#[derive(Clone, Default)]
pub enum Value {
    /// No value at all; combined with an empty key this is the skip sentinel
    #[default]
    Empty,
    Bool(bool),
    Duration(Duration),
    Float64(f64),
    Int64(i64),
    String(String),
    Time(DateTime<FixedOffset>),
    Uint64(u64),
    Group(Vec<Attr>),
    /// Anything else, rendered with `Display`
    Any(Arc<dyn AnyValue>),
    /// Deferred value, resolved once at formatting time
    Lazy(Arc<dyn LogValuer>),
}

impl Value {
    pub fn any<T: AnyValue>(value: T) -> Self {
        Value::Any(Arc::new(value))
    }

    pub fn lazy<L: LogValuer + 'static>(valuer: L) -> Self {
        Value::Lazy(Arc::new(valuer))
    }

    pub fn group(attrs: impl IntoIterator<Item = Attr>) -> Self {
        Value::Group(attrs.into_iter().collect())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Empty)
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Value::Group(_))
    }

    /// Evaluate deferred values until a concrete one is produced
    #[must_use]
    pub fn resolve(self) -> Value {
        let mut value = self;
        for _ in 0..MAX_RESOLVE_DEPTH {
            match value {
                Value::Lazy(valuer) => value = valuer.log_value(),
                resolved => return resolved,
            }
        }
        Value::String(format!(
            "lazy value not resolved after {} evaluations",
            MAX_RESOLVE_DEPTH
        ))
    }

    /// Downcast an `Any` value to a concrete type
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        match self {
            Value::Any(value) => (**value).as_any().downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Append the text form of this value.
    ///
    /// Times are rendered by the caller, which knows the configured format.
    /// Groups and lazy values never reach this point in normal formatting;
    /// they fall back to a generic rendering.
    pub(crate) fn append_text(&self, buf: &mut String) {
        match self {
            Value::Empty => {}
            Value::Bool(b) => buf.push_str(if *b { "true" } else { "false" }),
            Value::Duration(d) => append_duration(buf, *d),
            Value::Float64(f) => append_float(buf, *f),
            Value::Int64(i) => {
                let _ = write!(buf, "{}", i);
            }
            Value::String(s) => buf.push_str(s),
            Value::Time(t) => {
                let _ = write!(buf, "{}", t.to_rfc3339());
            }
            Value::Uint64(u) => {
                let _ = write!(buf, "{}", u);
            }
            Value::Group(_) | Value::Any(_) | Value::Lazy(_) => {
                let _ = write!(buf, "{}", self);
            }
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Group(attrs) => {
                f.write_str("[")?;
                for (i, attr) in attrs.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{}={}", attr.key, attr.value)?;
                }
                f.write_str("]")
            }
            Value::Any(value) => write!(f, "{}", value),
            Value::Lazy(valuer) => write!(f, "{}", valuer.log_value().resolve()),
            other => {
                let mut text = String::new();
                other.append_text(&mut text);
                f.write_str(&text)
            }
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Empty => f.write_str("Empty"),
            Value::Bool(b) => f.debug_tuple("Bool").field(b).finish(),
            Value::Duration(d) => f.debug_tuple("Duration").field(d).finish(),
            Value::Float64(v) => f.debug_tuple("Float64").field(v).finish(),
            Value::Int64(v) => f.debug_tuple("Int64").field(v).finish(),
            Value::String(s) => f.debug_tuple("String").field(s).finish(),
            Value::Time(t) => f.debug_tuple("Time").field(t).finish(),
            Value::Uint64(v) => f.debug_tuple("Uint64").field(v).finish(),
            Value::Group(attrs) => f.debug_tuple("Group").field(attrs).finish(),
            Value::Any(v) => f.debug_tuple("Any").field(v).finish(),
            Value::Lazy(_) => f.write_str("Lazy(..)"),
        }
    }
}

macro_rules! value_from_int {
    ($variant:ident, $target:ty: $($source:ty),+) => {
        $(
            impl From<$source> for Value {
                fn from(v: $source) -> Self {
                    Value::$variant(<$target>::from(v))
                }
            }
        )+
    };
}

value_from_int!(Int64, i64: i8, i16, i32, i64);
value_from_int!(Uint64, u64: u8, u16, u32, u64);

impl From<isize> for Value {
    fn from(v: isize) -> Self {
        Value::Int64(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Uint64(v as u64)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Value::Float64(f64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float64(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Duration> for Value {
    fn from(v: Duration) -> Self {
        Value::Duration(v)
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Value {
    fn from(v: DateTime<Tz>) -> Self {
        Value::Time(v.fixed_offset())
    }
}

impl From<Vec<Attr>> for Value {
    fn from(attrs: Vec<Attr>) -> Self {
        Value::Group(attrs)
    }
}

/// A key/value pair attached to a log event.
///
/// `Attr::default()` has an empty key and no value; the formatter skips it.
#[derive(Debug, Clone, Default)]
pub struct Attr {
    pub key: String,
    pub value: Value,
}

impl Attr {
    pub fn new(key: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }

    /// A named group of attributes
    pub fn group(key: impl Into<String>, attrs: impl IntoIterator<Item = Attr>) -> Self {
        Self {
            key: key.into(),
            value: Value::group(attrs),
        }
    }

    /// An attribute rendered through `Display`
    pub fn any<T: AnyValue>(key: impl Into<String>, value: T) -> Self {
        Self {
            key: key.into(),
            value: Value::any(value),
        }
    }

    /// An attribute whose value is computed only if the event is formatted
    pub fn lazy<L: LogValuer + 'static>(key: impl Into<String>, valuer: L) -> Self {
        Self {
            key: key.into(),
            value: Value::lazy(valuer),
        }
    }

    /// An `error` attribute holding the error's display text
    pub fn error(err: &dyn std::error::Error) -> Self {
        Self::new("error", err.to_string())
    }

    /// The skip sentinel
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.key.is_empty() && self.value.is_empty()
    }
}

impl<K: Into<String>, V: Into<Value>> From<(K, V)> for Attr {
    fn from((key, value): (K, V)) -> Self {
        Attr::new(key, value)
    }
}

/// Append a duration in compact clock notation: `1.5s`, `1m30s`, `250ms`.
pub(crate) fn append_duration(buf: &mut String, d: Duration) {
    const MICRO: u128 = 1_000;
    const MILLI: u128 = 1_000_000;
    const SECOND: u128 = 1_000_000_000;

    let nanos = d.as_nanos();
    if nanos == 0 {
        buf.push_str("0s");
        return;
    }

    if nanos < SECOND {
        let (scale, unit) = if nanos < MICRO {
            (1, "ns")
        } else if nanos < MILLI {
            (MICRO, "µs")
        } else {
            (MILLI, "ms")
        };
        append_fraction(buf, nanos, scale);
        buf.push_str(unit);
        return;
    }

    let total_secs = nanos / SECOND;
    let hours = total_secs / 3600;
    let minutes = (total_secs / 60) % 60;
    if hours > 0 {
        let _ = write!(buf, "{}h", hours);
    }
    if hours > 0 || minutes > 0 {
        let _ = write!(buf, "{}m", minutes);
    }
    append_fraction(buf, (total_secs % 60) * SECOND + nanos % SECOND, SECOND);
    buf.push('s');
}

/// Write `value / scale` with the remainder as trimmed decimal digits
fn append_fraction(buf: &mut String, value: u128, scale: u128) {
    let whole = value / scale;
    let rem = value % scale;
    let _ = write!(buf, "{}", whole);
    if rem == 0 {
        return;
    }

    let width = scale.ilog10() as usize;
    let digits = format!("{:0width$}", rem, width = width);
    buf.push('.');
    buf.push_str(digits.trim_end_matches('0'));
}

/// Append the shortest decimal that round-trips to `f`.
///
/// Decimal exponents below -4 or from 6 up use exponent notation with a
/// signed, two-digit exponent (`1e+06`, `1e-07`).
pub(crate) fn append_float(buf: &mut String, f: f64) {
    if f.is_nan() {
        buf.push_str("NaN");
        return;
    }
    if f.is_infinite() {
        buf.push_str(if f > 0.0 { "+Inf" } else { "-Inf" });
        return;
    }

    let text = format!("{:e}", f);
    if let Some((mantissa, exp)) = text.split_once('e') {
        if let Ok(exp) = exp.parse::<i32>() {
            if f != 0.0 && !(-4..6).contains(&exp) {
                let sign = if exp < 0 { '-' } else { '+' };
                let _ = write!(buf, "{}e{}{:02}", mantissa, sign, exp.unsigned_abs());
                return;
            }
        }
    }

    let _ = write!(buf, "{}", f);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn text(value: Value) -> String {
        let mut buf = String::new();
        value.append_text(&mut buf);
        buf
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(text(true.into()), "true");
        assert_eq!(text(42i32.into()), "42");
        assert_eq!(text((-7i64).into()), "-7");
        assert_eq!(text(42u64.into()), "42");
        assert_eq!(text("foo".into()), "foo");
        assert_eq!(text(Value::Empty), "");
    }

    #[test]
    fn test_float_text() {
        assert_eq!(text(3.14f64.into()), "3.14");
        assert_eq!(text(3.0f64.into()), "3");
        assert_eq!(text(0.1f64.into()), "0.1");
        assert_eq!(text(1e21f64.into()), "1e+21");
        assert_eq!(text(1e6f64.into()), "1e+06");
        assert_eq!(text(1234567.0f64.into()), "1.234567e+06");
        assert_eq!(text(123456.0f64.into()), "123456");
        assert_eq!(text((-2.5e8f64).into()), "-2.5e+08");
        assert_eq!(text(0.0001f64.into()), "0.0001");
        assert_eq!(text(0.00001f64.into()), "1e-05");
        assert_eq!(text(1.5e-7f64.into()), "1.5e-07");
        assert_eq!(text(1e300f64.into()), "1e+300");
        assert_eq!(text(0.0f64.into()), "0");
        assert_eq!(text(f64::NAN.into()), "NaN");
        assert_eq!(text(f64::NEG_INFINITY.into()), "-Inf");
    }

    #[test]
    fn test_duration_text() {
        let cases = [
            (Duration::ZERO, "0s"),
            (Duration::from_nanos(750), "750ns"),
            (Duration::from_nanos(1_500), "1.5µs"),
            (Duration::from_millis(12), "12ms"),
            (Duration::from_micros(1_250), "1.25ms"),
            (Duration::from_secs(1), "1s"),
            (Duration::from_millis(1_500), "1.5s"),
            (Duration::from_secs(90), "1m30s"),
            (Duration::from_secs(3600), "1h0m0s"),
            (Duration::from_secs(3723), "1h2m3s"),
        ];
        for (duration, want) in cases {
            assert_eq!(text(duration.into()), want, "{:?}", duration);
        }
    }

    #[test]
    fn test_any_falls_back_to_display() {
        #[derive(Debug)]
        struct Endpoint(&'static str, u16);
        impl fmt::Display for Endpoint {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}:{}", self.0, self.1)
            }
        }

        let value = Value::any(Endpoint("localhost", 8080));
        assert_eq!(text(value.clone()), "localhost:8080");
        assert!(value.downcast_ref::<Endpoint>().is_some());
        assert!(value.downcast_ref::<String>().is_none());
    }

    #[test]
    fn test_lazy_resolves_once_per_call() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let value = Value::lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            Value::from("computed")
        });

        let resolved = value.resolve();
        assert!(matches!(resolved, Value::String(ref s) if s == "computed"));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_lazy_chain_is_bounded() {
        struct Forever;
        impl LogValuer for Forever {
            fn log_value(&self) -> Value {
                Value::lazy(Forever)
            }
        }

        let resolved = Value::lazy(Forever).resolve();
        assert!(matches!(resolved, Value::String(_)));
    }

    #[test]
    fn test_empty_sentinel() {
        assert!(Attr::default().is_empty());
        assert!(Attr::empty().is_empty());
        assert!(!Attr::new("", "x").is_empty());
        assert!(!Attr::new("k", Value::Empty).is_empty());
    }

    #[test]
    fn test_group_display() {
        let group = Value::group([Attr::new("a", 1), Attr::new("b", "two")]);
        assert_eq!(group.to_string(), "[a=1 b=two]");
    }
}
