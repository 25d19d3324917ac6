//! Core handler types and traits

pub mod buffer_pool;
pub mod config;
pub mod error;
pub mod formatter;
pub mod handler;
pub mod level;
pub mod logger;
pub mod metrics;
pub mod record;
pub mod style;
pub mod timestamp;
pub mod value;

pub use buffer_pool::{BufferPool, PooledBuffer};
pub use config::{HandlerConfig, StyleChoice};
pub use error::{LoggerError, Result};
pub use formatter::ReplaceAttr;
pub use handler::{Handler, HandlerBuilder, LEVEL_KEY, TIME_KEY};
pub use level::{Level, LevelVar, Leveler};
pub use logger::Logger;
pub use metrics::HandlerMetrics;
pub use record::Record;
pub use style::{Style, TextStyle};
pub use timestamp::TimestampFormat;
pub use value::{AnyValue, Attr, LogValuer, Value};
