//! Log record structure

use super::level::Level;
use super::value::Attr;
use chrono::{DateTime, FixedOffset, Local, TimeZone};

/// One structured log event.
///
/// The message is kept verbatim: a message spanning several lines is
/// rendered as several header-prefixed lines, not escaped.
#[derive(Debug, Clone)]
pub struct Record {
    /// `None` means the event has no time and none is rendered
    pub time: Option<DateTime<FixedOffset>>,
    pub level: Level,
    pub message: String,
    attrs: Vec<Attr>,
}

impl Record {
    /// Create a record stamped with the current local time
    pub fn new(level: Level, message: impl Into<String>) -> Self {
        Self {
            time: Some(Local::now().fixed_offset()),
            level,
            message: message.into(),
            attrs: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_time<Tz: TimeZone>(mut self, time: DateTime<Tz>) -> Self {
        self.time = Some(time.fixed_offset());
        self
    }

    #[must_use]
    pub fn without_time(mut self) -> Self {
        self.time = None;
        self
    }

    #[must_use]
    pub fn with_attr(mut self, attr: Attr) -> Self {
        self.attrs.push(attr);
        self
    }

    #[must_use]
    pub fn with_attrs(mut self, attrs: impl IntoIterator<Item = Attr>) -> Self {
        self.attrs.extend(attrs);
        self
    }

    pub fn add_attr(&mut self, attr: Attr) {
        self.attrs.push(attr);
    }

    /// Attributes in insertion order, duplicates included
    pub fn attrs(&self) -> &[Attr] {
        &self.attrs
    }

    pub fn num_attrs(&self) -> usize {
        self.attrs.len()
    }

    /// Move the attributes out, leaving the record without any
    pub fn take_attrs(&mut self) -> Vec<Attr> {
        std::mem::take(&mut self.attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_attrs_keep_order_and_duplicates() {
        let record = Record::new(Level::INFO, "msg")
            .with_attr(Attr::new("k", 1))
            .with_attrs([Attr::new("j", 2), Attr::new("k", 3)]);

        let keys: Vec<&str> = record.attrs().iter().map(|a| a.key.as_str()).collect();
        assert_eq!(keys, ["k", "j", "k"]);
        assert_eq!(record.num_attrs(), 3);
    }

    #[test]
    fn test_time_is_optional() {
        let record = Record::new(Level::INFO, "msg");
        assert!(record.time.is_some());

        let record = record.without_time();
        assert!(record.time.is_none());

        let fixed = Utc.with_ymd_and_hms(2025, 6, 15, 9, 45, 0).unwrap();
        let record = record.with_time(fixed);
        assert_eq!(record.time.unwrap(), fixed);
    }
}
