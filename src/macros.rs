//! Logging macros for ergonomic log message formatting.
//!
//! The message takes `format!` arguments. Attributes follow a `;` as
//! `key => value` pairs:
//!
//! ```
//! use rust_logfmt_handler::prelude::*;
//! use rust_logfmt_handler::info;
//!
//! let logger = Logger::new(Handler::new(MemorySink::new()));
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, "Listening on port {}", port);
//!
//! info!(logger, "Request served"; "method" => "GET", "status" => 200);
//! ```
//!
//! Nothing is formatted when the level is disabled.

/// Log at an explicit level.
///
/// ```
/// # use rust_logfmt_handler::prelude::*;
/// # let logger = Logger::new(Handler::new(MemorySink::new()));
/// use rust_logfmt_handler::log;
/// log!(logger, Level::WARN, "Simple message");
/// log!(logger, Level::new(2), "Code: {}", 500; "retry" => true);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $fmt:literal $(, $arg:expr)* ; $($key:expr => $value:expr),+ $(,)?) => {{
        let logger = &$logger;
        let level: $crate::Level = $level;
        if logger.enabled(level) {
            logger.log(
                level,
                ::std::format!($fmt $(, $arg)*),
                [$($crate::Attr::new($key, $value)),+],
            );
        }
    }};
    ($logger:expr, $level:expr, $($arg:tt)+) => {{
        let logger = &$logger;
        let level: $crate::Level = $level;
        if logger.enabled(level) {
            logger.log(level, ::std::format!($($arg)+), ::std::iter::empty());
        }
    }};
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::TRACE, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_logfmt_handler::prelude::*;
/// # let logger = Logger::new(Handler::new(MemorySink::new()));
/// use rust_logfmt_handler::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::DEBUG, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::INFO, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// ```
/// # use rust_logfmt_handler::prelude::*;
/// # let logger = Logger::new(Handler::new(MemorySink::new()));
/// use rust_logfmt_handler::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5; "backoff_ms" => 250);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::WARN, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::Level::ERROR, $($arg)+)
    };
}
