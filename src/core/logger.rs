//! Logger front-end
//!
//! [`Logger`] is the call-site API over a [`Handler`]: it checks the level,
//! builds the [`Record`] and reports write failures instead of returning
//! them, so logging calls never need error handling of their own.

use super::{
    handler::Handler,
    level::Level,
    record::Record,
    value::Attr,
};
use std::iter;
use std::panic::{self, AssertUnwindSafe};

/// Failures are reported on the first occurrence and every this many after
const FAILURE_ALERT_INTERVAL: u64 = 1000;

#[derive(Debug, Clone)]
pub struct Logger {
    handler: Handler,
}

impl Logger {
    pub fn new(handler: Handler) -> Self {
        Self { handler }
    }

    /// A logger writing to stderr with the default configuration
    pub fn stderr() -> Self {
        Self::new(Handler::stderr())
    }

    pub fn handler(&self) -> &Handler {
        &self.handler
    }

    pub fn enabled(&self, level: Level) -> bool {
        self.handler.enabled(level)
    }

    /// Log `message` with `attrs` at `level`.
    ///
    /// Nothing is built when the level is disabled.
    pub fn log(
        &self,
        level: Level,
        message: impl Into<String>,
        attrs: impl IntoIterator<Item = Attr>,
    ) {
        if !self.handler.enabled(level) {
            return;
        }
        self.dispatch(Record::new(level, message).with_attrs(attrs));
    }

    /// Hand an already-built record to the handler, bypassing the level check
    pub fn log_record(&self, record: Record) {
        self.dispatch(record);
    }

    fn dispatch(&self, record: Record) {
        // A panicking replace hook must not take the caller down with it.
        let result = panic::catch_unwind(AssertUnwindSafe(|| self.handler.handle(record)));

        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let failures = self.handler.metrics().write_failures();
                if failures <= 1 || failures % FAILURE_ALERT_INTERVAL == 0 {
                    eprintln!(
                        "[LOGGER ERROR] Failed to write log event ({} failures so far): {}",
                        failures, e
                    );
                }
            }
            Err(panic_info) => {
                let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                    s.to_string()
                } else if let Some(s) = panic_info.downcast_ref::<String>() {
                    s.clone()
                } else {
                    "Unknown panic".to_string()
                };
                eprintln!(
                    "[LOGGER CRITICAL] Handler panicked: {}. The event was dropped.",
                    panic_msg
                );
            }
        }
    }

    pub fn trace(&self, message: impl Into<String>) {
        self.log(Level::TRACE, message, iter::empty());
    }

    pub fn debug(&self, message: impl Into<String>) {
        self.log(Level::DEBUG, message, iter::empty());
    }

    pub fn info(&self, message: impl Into<String>) {
        self.log(Level::INFO, message, iter::empty());
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.log(Level::WARN, message, iter::empty());
    }

    pub fn error(&self, message: impl Into<String>) {
        self.log(Level::ERROR, message, iter::empty());
    }

    /// A logger that adds `attrs` to every event
    #[must_use]
    pub fn with(&self, attrs: impl IntoIterator<Item = Attr>) -> Logger {
        Self::new(self.handler.with_attrs(attrs))
    }

    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Logger {
        Self::new(self.handler.with_group(name))
    }

    #[must_use]
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Logger {
        Self::new(self.handler.with_prefix(prefix))
    }

    #[must_use]
    pub fn with_level_offset(&self, offset: i32) -> Logger {
        Self::new(self.handler.with_level_offset(offset))
    }

    /// Flush the sink, reporting failures to stderr
    pub fn flush(&self) {
        if let Err(e) = self.handler.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush: {}", e);
        }
    }
}

impl From<Handler> for Logger {
    fn from(handler: Handler) -> Self {
        Self::new(handler)
    }
}

#[cfg(feature = "log-facade")]
mod facade {
    use super::*;
    use crate::core::error::{LoggerError, Result};

    impl log::Log for Logger {
        fn enabled(&self, metadata: &log::Metadata<'_>) -> bool {
            self.handler.enabled(metadata.level().into())
        }

        fn log(&self, record: &log::Record<'_>) {
            let level = Level::from(record.level());
            if !self.handler.enabled(level) {
                return;
            }

            let message = match record.args().as_str() {
                Some(s) => s.to_string(),
                None => record.args().to_string(),
            };
            self.dispatch(Record::new(level, message));
        }

        fn flush(&self) {
            Logger::flush(self);
        }
    }

    impl Logger {
        /// Register this logger as the global backend of the `log` crate.
        ///
        /// Fails if a global logger is already installed.
        pub fn install(self) -> Result<()> {
            log::set_boxed_logger(Box::new(self))
                .map_err(|e| LoggerError::other(format!("failed to install logger: {}", e)))?;
            log::set_max_level(log::LevelFilter::Trace);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::Style;
    use crate::sink::MemorySink;
    use std::io::{self, Write};

    fn logger(sink: &MemorySink) -> Logger {
        let handler = Handler::builder()
            .style(Style::plain())
            .show_time(false)
            .build(sink.clone())
            .unwrap();
        Logger::new(handler)
    }

    #[test]
    fn test_level_methods() {
        let sink = MemorySink::new();
        let logger = logger(&sink);

        logger.trace("hidden");
        logger.debug("hidden");
        logger.info("shown");
        logger.warn("careful");
        logger.error("broken");

        assert_eq!(sink.contents(), "INF shown\nWRN careful\nERR broken\n");
    }

    #[test]
    fn test_disabled_level_builds_nothing() {
        let sink = MemorySink::new();
        let logger = logger(&sink);

        logger.log(
            Level::DEBUG,
            "hidden",
            [Attr::lazy("k", || -> crate::Value { panic!("must not be resolved") })],
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn test_derived_loggers() {
        let sink = MemorySink::new();
        let logger = logger(&sink)
            .with([Attr::new("app", "demo")])
            .with_group("req")
            .with_prefix("api");

        logger.log(Level::INFO, "done", [Attr::new("id", 7)]);
        assert_eq!(sink.contents(), "INF api: done  app=demo req.id=7\n");
    }

    #[test]
    fn test_level_offset_relabels() {
        let sink = MemorySink::new();
        let logger = logger(&sink).with_level_offset(4);

        logger.info("promoted");
        assert_eq!(sink.contents(), "WRN promoted\n");
    }

    #[test]
    fn test_write_failure_is_counted_not_raised() {
        struct Broken;
        impl Write for Broken {
            fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
                Err(io::Error::other("disk gone"))
            }
            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let logger = Logger::new(Handler::new(Broken));
        logger.info("lost");
        logger.info("lost again");
        assert_eq!(logger.handler().metrics().write_failures(), 2);
    }

    #[test]
    fn test_panicking_hook_is_isolated() {
        let sink = MemorySink::new();
        let handler = Handler::builder()
            .style(Style::plain())
            .show_time(false)
            .replace_attr(|_groups, attr| {
                if attr.key == "boom" {
                    panic!("hook failure");
                }
                attr
            })
            .build(sink.clone())
            .unwrap();
        let logger = Logger::new(handler);

        logger.log(Level::INFO, "dropped", [Attr::new("boom", 1)]);
        logger.info("kept");
        assert_eq!(sink.contents(), "INF kept\n");
    }

    #[cfg(feature = "log-facade")]
    #[test]
    fn test_log_facade_records() {
        use log::Log;

        let sink = MemorySink::new();
        let logger = logger(&sink);

        let metadata = log::Metadata::builder().level(log::Level::Debug).build();
        assert!(!Log::enabled(&logger, &metadata));

        Log::log(
            &logger,
            &log::Record::builder()
                .level(log::Level::Warn)
                .args(format_args!("disk at {}%", 91))
                .build(),
        );
        assert_eq!(sink.contents(), "WRN disk at 91%\n");
    }
}
