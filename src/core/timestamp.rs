//! Timestamp formatting utilities
//!
//! Provides the clock formats used for the leading time column and for
//! time-valued attributes. The default is a short wall-clock form meant for
//! people watching a terminal.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use rust_logfmt_handler::TimestampFormat;
/// use chrono::{FixedOffset, TimeZone};
///
/// let time = FixedOffset::east_opt(0)
///     .unwrap()
///     .with_ymd_and_hms(2025, 6, 15, 9, 45, 0)
///     .unwrap();
/// assert_eq!(TimestampFormat::Kitchen.format(&time), "9:45AM");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampFormat {
    /// 12-hour clock without seconds: `9:45AM`
    #[default]
    Kitchen,

    /// 24-hour clock with seconds: `09:45:00`
    TimeOnly,

    /// Date and 24-hour clock: `2025-06-15 09:45:00`
    DateTime,

    /// RFC 3339 with the time's own offset: `2025-06-15T09:45:00+02:00`
    Rfc3339,

    /// ISO 8601 in UTC with milliseconds: `2025-06-15T07:45:00.000Z`
    Iso8601,

    /// Unix timestamp in milliseconds: `1749973500000`
    UnixMillis,

    /// Custom strftime format
    ///
    /// ```
    /// use rust_logfmt_handler::TimestampFormat;
    ///
    /// let format = TimestampFormat::Custom("%H:%M:%S%.3f".to_string());
    /// assert!(format.validate().is_ok());
    /// ```
    Custom(String),
}

impl TimestampFormat {
    /// Format a time according to this format
    #[must_use]
    pub fn format(&self, time: &DateTime<FixedOffset>) -> String {
        let mut out = String::new();
        self.append(&mut out, time);
        out
    }

    /// Append the formatted time to `buf`
    pub fn append(&self, buf: &mut String, time: &DateTime<FixedOffset>) {
        let result = match self {
            TimestampFormat::Kitchen => write!(buf, "{}", time.format("%-I:%M%p")),
            TimestampFormat::TimeOnly => write!(buf, "{}", time.format("%H:%M:%S")),
            TimestampFormat::DateTime => write!(buf, "{}", time.format("%Y-%m-%d %H:%M:%S")),
            TimestampFormat::Rfc3339 => write!(buf, "{}", time.to_rfc3339()),
            TimestampFormat::Iso8601 => write!(
                buf,
                "{}",
                time.with_timezone(&Utc).format("%Y-%m-%dT%H:%M:%S%.3fZ")
            ),
            TimestampFormat::UnixMillis => write!(buf, "{}", time.timestamp_millis()),
            TimestampFormat::Custom(format_str) => write!(buf, "{}", time.format(format_str)),
        };

        // Only reachable with an unvalidated custom format.
        if result.is_err() {
            buf.push_str(&time.to_rfc3339());
        }
    }

    /// Reject custom format strings chrono cannot render
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("invalid strftime string '{}'", format_str),
                ));
            }
        }
        Ok(())
    }
}
