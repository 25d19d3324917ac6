//! # Rust Logfmt Handler
//!
//! A structured log handler that renders records as human-friendly,
//! optionally colorized `key=value` text.
//!
//! ```text
//! 9:45AM INF request served  method=GET status=200 latency=1.5ms
//! ```
//!
//! ## Features
//!
//! - **Readable**: level labels, faint keys and colored values on terminals
//! - **Structured**: nested groups, lazily resolved values, a replace hook
//! - **Thread Safe**: one locked write per event, shared by derived handlers
//! - **`log` facade**: install a [`Logger`] as the global `log` backend
//!
//! ## Example
//!
//! ```
//! use rust_logfmt_handler::prelude::*;
//!
//! let sink = MemorySink::new();
//! let handler = Handler::builder()
//!     .level(Level::DEBUG)
//!     .style(Style::plain())
//!     .show_time(false)
//!     .build(sink.clone())?;
//! let logger = Logger::new(handler).with_group("req");
//!
//! logger.log(Level::INFO, "served", [Attr::new("status", 200)]);
//! assert_eq!(sink.contents(), "INF served  req.status=200\n");
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sink;

pub mod prelude {
    pub use crate::core::{
        Attr, Handler, HandlerBuilder, HandlerConfig, Level, LevelVar, Leveler, Logger,
        LoggerError, Record, Result, Style, TextStyle, TimestampFormat, Value,
    };
    pub use crate::sink::MemorySink;
}

pub use colored::Color;
pub use self::core::{
    AnyValue, Attr, BufferPool, Handler, HandlerBuilder, HandlerConfig, HandlerMetrics, Level,
    LevelVar, Leveler, LogValuer, Logger, LoggerError, PooledBuffer, Record, ReplaceAttr, Result,
    Style, StyleChoice, TextStyle, TimestampFormat, Value, LEVEL_KEY, TIME_KEY,
};
pub use sink::MemorySink;
