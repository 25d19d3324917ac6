//! Serializable handler configuration
//!
//! Lets applications keep handler settings in a JSON config file:
//!
//! ```json
//! { "level": "DEBUG", "time_format": "rfc3339", "style": "plain", "prefix": "api" }
//! ```

use super::{
    error::Result,
    handler::HandlerBuilder,
    level::Level,
    style::Style,
    timestamp::TimestampFormat,
};
use serde::{Deserialize, Serialize};

/// Which [`Style`] a configured handler uses
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleChoice {
    /// Colored on terminals, plain elsewhere
    #[default]
    Auto,
    Colored,
    Plain,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HandlerConfig {
    /// Minimum level, by name (`"WARN"`, `"INFO+2"`) or number
    pub level: Level,
    pub time_format: TimestampFormat,
    pub style: StyleChoice,
    pub prefix: Option<String>,
    pub show_time: bool,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            time_format: TimestampFormat::default(),
            style: StyleChoice::Auto,
            prefix: None,
            show_time: true,
        }
    }
}

impl HandlerConfig {
    /// Parse a configuration from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A builder carrying these settings.
    ///
    /// With [`StyleChoice::Auto`] no style is set, so the builder's `build`
    /// picks plain and `build_for_terminal` detects the terminal.
    pub fn into_builder(self) -> HandlerBuilder {
        let mut builder = HandlerBuilder::new()
            .level(self.level)
            .time_format(self.time_format)
            .show_time(self.show_time);

        match self.style {
            StyleChoice::Auto => {}
            StyleChoice::Colored => builder = builder.style(Style::colored()),
            StyleChoice::Plain => builder = builder.style(Style::plain()),
        }
        if let Some(prefix) = self.prefix {
            builder = builder.prefix(prefix);
        }
        builder
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::LoggerError;
    use crate::core::record::Record;
    use crate::sink::MemorySink;

    #[test]
    fn test_defaults_from_empty_object() {
        let config = HandlerConfig::from_json("{}").unwrap();
        assert_eq!(config, HandlerConfig::default());
    }

    #[test]
    fn test_full_config() {
        let config = HandlerConfig::from_json(
            r#"{
                "level": "DEBUG",
                "time_format": "time_only",
                "style": "plain",
                "prefix": "api",
                "show_time": false
            }"#,
        )
        .unwrap();

        assert_eq!(config.level, Level::DEBUG);
        assert_eq!(config.time_format, TimestampFormat::TimeOnly);
        assert_eq!(config.style, StyleChoice::Plain);

        let sink = MemorySink::new();
        let handler = config.into_builder().build(sink.clone()).unwrap();
        assert!(handler.enabled(Level::DEBUG));

        handler.handle(Record::new(Level::DEBUG, "ready")).unwrap();
        assert_eq!(sink.contents(), "DBG api: ready\n");
    }

    #[test]
    fn test_offset_level_names() {
        let config = HandlerConfig::from_json(r#"{ "level": "WARN-2" }"#).unwrap();
        assert_eq!(config.level, Level::new(2));
    }

    #[test]
    fn test_invalid_level_rejected() {
        let err = HandlerConfig::from_json(r#"{ "level": "LOUD" }"#).unwrap_err();
        assert!(matches!(err, LoggerError::JsonError(_)));
        assert!(err.to_string().contains("LOUD"));
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(HandlerConfig::from_json(r#"{ "colour": true }"#).is_err());
    }

    #[test]
    fn test_json_roundtrip() {
        let config = HandlerConfig {
            level: Level::WARN,
            time_format: TimestampFormat::Custom("%H:%M".into()),
            style: StyleChoice::Colored,
            prefix: Some("db".into()),
            show_time: true,
        };
        let json = config.to_json().unwrap();
        assert_eq!(HandlerConfig::from_json(&json).unwrap(), config);
    }
}
