//! Log level definitions
//!
//! Levels are plain integers so that applications can define their own
//! severities between and around the built-in ones. One severity step is 4,
//! which leaves room for custom levels in between.

use super::error::LoggerError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Level(i32);

impl Level {
    pub const TRACE: Level = Level(-8);
    pub const DEBUG: Level = Level(-4);
    pub const INFO: Level = Level(0);
    pub const WARN: Level = Level(4);
    pub const ERROR: Level = Level(8);

    /// Distance between two adjacent built-in levels
    pub const STEP: i32 = 4;

    pub const fn new(value: i32) -> Self {
        Level(value)
    }

    pub const fn as_i32(self) -> i32 {
        self.0
    }

    /// Shift this level by `n`, saturating at the integer bounds
    #[must_use]
    pub const fn offset(self, n: i32) -> Level {
        Level(self.0.saturating_add(n))
    }

    /// Nearest built-in level at or below this one, and its name
    fn base(self) -> (&'static str, i32) {
        match self.0 {
            v if v < Level::DEBUG.0 => ("TRACE", Level::TRACE.0),
            v if v < Level::INFO.0 => ("DEBUG", Level::DEBUG.0),
            v if v < Level::WARN.0 => ("INFO", Level::INFO.0),
            v if v < Level::ERROR.0 => ("WARN", Level::WARN.0),
            _ => ("ERROR", Level::ERROR.0),
        }
    }

    fn from_name(name: &str) -> Option<Level> {
        match name.to_uppercase().as_str() {
            "TRACE" | "TRC" => Some(Level::TRACE),
            "DEBUG" | "DBG" => Some(Level::DEBUG),
            "INFO" | "INF" => Some(Level::INFO),
            "WARN" | "WARNING" | "WRN" => Some(Level::WARN),
            "ERROR" | "ERR" => Some(Level::ERROR),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (name, base) = self.base();
        let delta = i64::from(self.0) - i64::from(base);
        if delta == 0 {
            f.write_str(name)
        } else {
            write!(f, "{}{:+}", name, delta)
        }
    }
}

impl FromStr for Level {
    type Err = LoggerError;

    /// Accepts `info`, `INF`, `WARN+2`, `debug-4` or a bare integer.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(value) = s.parse::<i32>() {
            return Ok(Level(value));
        }

        let (name, delta) = match s.find(['+', '-']) {
            Some(idx) => {
                let delta = s[idx..]
                    .parse::<i32>()
                    .map_err(|_| LoggerError::invalid_level(s))?;
                (&s[..idx], delta)
            }
            None => (s, 0),
        };

        Level::from_name(name)
            .map(|level| level.offset(delta))
            .ok_or_else(|| LoggerError::invalid_level(s))
    }
}

impl TryFrom<String> for Level {
    type Error = LoggerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Level> for String {
    fn from(level: Level) -> Self {
        level.to_string()
    }
}

impl From<i32> for Level {
    fn from(value: i32) -> Self {
        Level(value)
    }
}

#[cfg(feature = "log-facade")]
impl From<log::Level> for Level {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Trace => Level::TRACE,
            log::Level::Debug => Level::DEBUG,
            log::Level::Info => Level::INFO,
            log::Level::Warn => Level::WARN,
            log::Level::Error => Level::ERROR,
        }
    }
}

/// Source of a minimum level.
///
/// Implemented by [`Level`] for fixed thresholds and by [`LevelVar`]
/// for thresholds that change at runtime.
pub trait Leveler: Send + Sync {
    fn level(&self) -> Level;
}

impl Leveler for Level {
    fn level(&self) -> Level {
        *self
    }
}

impl<T: Leveler + ?Sized> Leveler for Arc<T> {
    fn level(&self) -> Level {
        (**self).level()
    }
}

/// A level that can be changed while handlers are using it.
///
/// Share it with `Arc` between the handler configuration and whatever
/// adjusts verbosity at runtime.
#[derive(Debug, Default)]
pub struct LevelVar(AtomicI32);

impl LevelVar {
    pub fn new(level: Level) -> Self {
        LevelVar(AtomicI32::new(level.as_i32()))
    }

    pub fn set(&self, level: Level) {
        self.0.store(level.as_i32(), Ordering::Relaxed);
    }
}

impl Leveler for LevelVar {
    fn level(&self) -> Level {
        Level(self.0.load(Ordering::Relaxed))
    }
}
