//! Log handler implementation
//!
//! A [`Handler`] renders one [`Record`] into a single block of text and
//! writes that block to its sink in one locked call:
//!
//! ```text
//! [time ][LVL ][prefix: ]message  [attached attrs ]key=value key2=value2
//! ```
//!
//! Handlers are immutable. Every `with_*` method returns a new handler that
//! copies the parent's state and changes one thing; the sink, its lock and
//! the metrics stay shared by reference across the whole family.

use super::{
    buffer_pool::BufferPool,
    error::Result,
    formatter::{AttrFormatter, ReplaceAttr},
    level::{Level, Leveler},
    metrics::HandlerMetrics,
    record::Record,
    style::{Style, TextStyle},
    timestamp::TimestampFormat,
    value::{Attr, Value},
};
use chrono::{DateTime, FixedOffset};
use parking_lot::Mutex;
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

/// Key of the synthetic attribute passed to the replace hook for the time
pub const TIME_KEY: &str = "time";

/// Key of the synthetic attribute passed to the replace hook for the level
pub const LEVEL_KEY: &str = "level";

/// Separator after the time and after the level label
const LEVEL_DELIM: &str = " ";

/// Separator between the message and the first attribute
const MSG_ATTR_DELIM: &str = "  ";

/// The sink and everything serialized with it
struct Output {
    sink: Mutex<Box<dyn Write + Send>>,
    metrics: HandlerMetrics,
}

impl Output {
    fn new(sink: Box<dyn Write + Send>) -> Self {
        Self {
            sink: Mutex::new(sink),
            metrics: HandlerMetrics::new(),
        }
    }

    /// Write one complete block while holding the lock
    fn write_block(&self, block: &[u8]) -> io::Result<()> {
        let mut sink = self.sink.lock();
        match sink.write_all(block) {
            Ok(()) => {
                self.metrics.record_written(block.len());
                Ok(())
            }
            Err(err) => {
                self.metrics.record_write_failure();
                Err(err)
            }
        }
    }
}

/// Renders log records as colorized logfmt-style text.
///
/// # Example
///
/// ```
/// use rust_logfmt_handler::{Attr, Handler, Level, MemorySink, Record, Style};
///
/// let sink = MemorySink::new();
/// let handler = Handler::builder()
///     .style(Style::plain())
///     .build(sink.clone())
///     .unwrap()
///     .with_attrs([Attr::new("service", "api")]);
///
/// handler
///     .handle(Record::new(Level::INFO, "started").without_time())
///     .unwrap();
/// assert_eq!(sink.contents(), "INF started  service=api\n");
/// ```
#[derive(Clone)]
pub struct Handler {
    leveler: Arc<dyn Leveler>,
    style: Arc<Style>,
    time_format: Arc<TimestampFormat>,
    replace_attr: Option<ReplaceAttr>,
    show_time: bool,
    output: Arc<Output>,

    /// Attributes serialized by `with_attrs`, written once and never changed
    attrs: Arc<str>,
    groups: Vec<String>,
    level_offset: i32,
    prefix: String,
}

impl Handler {
    /// Create a handler writing to `sink` with the default configuration:
    /// INFO level, plain style, kitchen-clock time.
    ///
    /// A bare `Write` cannot report whether it is a terminal, so this never
    /// colors. Use [`Handler::for_terminal`] for sinks that implement
    /// [`IsTerminal`].
    pub fn new<W: Write + Send + 'static>(sink: W) -> Self {
        Self::from_parts(
            Box::new(sink),
            Arc::new(Level::INFO),
            Style::plain(),
            TimestampFormat::default(),
            None,
            true,
            String::new(),
        )
    }

    /// Create a handler writing to `sink` with the default configuration,
    /// colored when `sink` is a terminal
    pub fn for_terminal<W>(sink: W) -> Self
    where
        W: Write + IsTerminal + Send + 'static,
    {
        let style = Style::detect(sink.is_terminal());
        Self::from_parts(
            Box::new(sink),
            Arc::new(Level::INFO),
            style,
            TimestampFormat::default(),
            None,
            true,
            String::new(),
        )
    }

    /// Create a handler writing to stderr, colored when stderr is a terminal
    pub fn stderr() -> Self {
        Self::for_terminal(io::stderr())
    }

    #[must_use]
    pub fn builder() -> HandlerBuilder {
        HandlerBuilder::new()
    }

    fn from_parts(
        sink: Box<dyn Write + Send>,
        leveler: Arc<dyn Leveler>,
        style: Style,
        time_format: TimestampFormat,
        replace_attr: Option<ReplaceAttr>,
        show_time: bool,
        prefix: String,
    ) -> Self {
        Self {
            leveler,
            style: Arc::new(style),
            time_format: Arc::new(time_format),
            replace_attr,
            show_time,
            output: Arc::new(Output::new(sink)),
            attrs: Arc::from(""),
            groups: Vec::new(),
            level_offset: 0,
            prefix,
        }
    }

    /// Whether a record at `level` would be logged
    pub fn enabled(&self, level: Level) -> bool {
        level.offset(self.level_offset) >= self.leveler.level()
    }

    /// Render `record` and write it to the sink in a single call.
    ///
    /// Enablement is not checked here; callers check [`Handler::enabled`]
    /// before building the record. A sink error is returned unchanged inside
    /// [`LoggerError::IoError`](crate::LoggerError::IoError).
    pub fn handle(&self, mut record: Record) -> Result<()> {
        let pool = BufferPool::global();
        let mut buf = pool.take();
        let mut header = pool.take();

        let level = record.level.offset(self.level_offset);
        self.append_time(&mut header, record.time);
        let level = self.append_level(&mut header, level);
        let message_style = self.style.message(level);

        if record.message.is_empty() {
            self.append_message_line(&mut buf, &header, message_style, "");
        } else {
            for line in record.message.split_inclusive('\n') {
                self.append_message_line(&mut buf, &header, message_style, line);
            }
        }

        buf.push_str(MSG_ATTR_DELIM);
        buf.push_str(&self.attrs);

        AttrFormatter::new(
            &mut buf,
            &self.style,
            &self.time_format,
            self.replace_attr.as_ref(),
            &self.groups,
        )
        .format_attrs(record.take_attrs());

        // Always exactly one trailing newline.
        let trimmed = buf.trim_end_matches([' ', '\n', '\r']).len();
        buf.truncate(trimmed);
        buf.push('\n');

        self.output.write_block(buf.as_bytes())?;
        Ok(())
    }

    fn append_message_line(
        &self,
        buf: &mut String,
        header: &str,
        message_style: Option<&TextStyle>,
        line: &str,
    ) {
        buf.push_str(header);
        if !self.prefix.is_empty() {
            buf.push_str(&self.prefix);
            let delim = &self.style.prefix_delimiter;
            delim.append_rendered(buf, delim.value());
        }

        // The line terminator stays out of the styled text.
        let (text, terminated) = match line.strip_suffix('\n') {
            Some(text) => (text.strip_suffix('\r').unwrap_or(text), true),
            None => (line, false),
        };
        match message_style {
            Some(style) => style.append_rendered(buf, text),
            None => buf.push_str(text),
        }
        if terminated {
            buf.push('\n');
        }
    }

    fn append_time(&self, buf: &mut String, time: Option<DateTime<FixedOffset>>) {
        let Some(time) = time.filter(|_| self.show_time) else {
            return;
        };

        let value = match &self.replace_attr {
            Some(replace) => {
                let attr = replace(&[], Attr::new(TIME_KEY, time));
                if attr.is_empty() {
                    return;
                }
                attr.value.resolve()
            }
            None => Value::Time(time),
        };

        let mut text = BufferPool::global().take();
        match &value {
            Value::Time(time) => self.time_format.append(&mut text, time),
            other => other.append_text(&mut text),
        }
        if text.is_empty() {
            return;
        }

        self.style.time.append_rendered(buf, &text);
        buf.push_str(LEVEL_DELIM);
    }

    /// Append the level label and return the level whose message style applies
    fn append_level(&self, buf: &mut String, level: Level) -> Level {
        let label = self.style.level_label(level);
        let Some(replace) = &self.replace_attr else {
            if let Some(label) = label {
                append_label(buf, label, label.value());
            }
            return level;
        };

        let attr = replace(&[], Attr::any(LEVEL_KEY, level));
        if attr.is_empty() {
            return level;
        }

        let value = attr.value.resolve();
        if let Some(&replaced) = value.downcast_ref::<Level>() {
            if let Some(label) = self.style.level_label(replaced) {
                append_label(buf, label, label.value());
            }
            return replaced;
        }

        let mut text = BufferPool::global().take();
        value.append_text(&mut text);
        let plain = TextStyle::new();
        append_label(buf, label.unwrap_or(&plain), &text);
        level
    }

    /// Attach attributes to every record logged through the returned handler.
    ///
    /// The attributes are rendered once, here, inside the current groups.
    #[must_use]
    pub fn with_attrs(&self, attrs: impl IntoIterator<Item = Attr>) -> Handler {
        let mut buf = String::from(&*self.attrs);
        AttrFormatter::new(
            &mut buf,
            &self.style,
            &self.time_format,
            self.replace_attr.as_ref(),
            &self.groups,
        )
        .format_attrs(attrs);

        let mut handler = self.clone();
        handler.attrs = Arc::from(buf);
        handler
    }

    /// Nest the keys of later attributes under `name`.
    ///
    /// An empty name is kept but adds no key prefix.
    #[must_use]
    pub fn with_group(&self, name: impl Into<String>) -> Handler {
        let mut handler = self.clone();
        handler.groups.push(name.into());
        handler
    }

    /// Replace the prefix written before each message line
    #[must_use]
    pub fn with_prefix(&self, prefix: impl Into<String>) -> Handler {
        let mut handler = self.clone();
        handler.prefix = prefix.into();
        handler
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Shift record levels by `offset` before gating and labeling.
    ///
    /// Offsets add up across calls, so `with_level_offset(-4)` followed by
    /// `with_level_offset(4)` restores the original levels.
    #[must_use]
    pub fn with_level_offset(&self, offset: i32) -> Handler {
        let mut handler = self.clone();
        handler.level_offset = self.level_offset.saturating_add(offset);
        handler
    }

    pub fn level_offset(&self) -> i32 {
        self.level_offset
    }

    /// Replace the minimum level; the level offset still applies on top
    #[must_use]
    pub fn with_level<L: Leveler + 'static>(&self, leveler: L) -> Handler {
        let mut handler = self.clone();
        handler.leveler = Arc::new(leveler);
        handler
    }

    /// Current minimum level, before the offset
    pub fn level(&self) -> Level {
        self.leveler.level()
    }

    pub fn groups(&self) -> &[String] {
        &self.groups
    }

    pub fn style(&self) -> &Style {
        &self.style
    }

    /// Counters shared by this handler and every handler derived from the
    /// same root
    pub fn metrics(&self) -> &HandlerMetrics {
        &self.output.metrics
    }

    /// Flush the sink
    pub fn flush(&self) -> Result<()> {
        self.output.sink.lock().flush()?;
        Ok(())
    }
}

fn append_label(buf: &mut String, style: &TextStyle, text: &str) {
    if text.is_empty() {
        return;
    }
    style.append_rendered(buf, text);
    buf.push_str(LEVEL_DELIM);
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handler")
            .field("level", &self.leveler.level())
            .field("level_offset", &self.level_offset)
            .field("time_format", &self.time_format)
            .field("show_time", &self.show_time)
            .field("groups", &self.groups)
            .field("prefix", &self.prefix)
            .field("attrs", &self.attrs)
            .field("replace_attr", &self.replace_attr.is_some())
            .finish()
    }
}

/// Builder for [`Handler`]
pub struct HandlerBuilder {
    leveler: Arc<dyn Leveler>,
    style: Option<Style>,
    time_format: TimestampFormat,
    replace_attr: Option<ReplaceAttr>,
    show_time: bool,
    prefix: String,
}

impl HandlerBuilder {
    pub fn new() -> Self {
        Self {
            leveler: Arc::new(Level::INFO),
            style: None,
            time_format: TimestampFormat::default(),
            replace_attr: None,
            show_time: true,
            prefix: String::new(),
        }
    }

    /// Set a fixed minimum level
    #[must_use = "builder methods return a new value"]
    pub fn level(mut self, level: Level) -> Self {
        self.leveler = Arc::new(level);
        self
    }

    /// Set a minimum level source, such as a shared [`LevelVar`](crate::LevelVar)
    #[must_use = "builder methods return a new value"]
    pub fn leveler<L: Leveler + 'static>(mut self, leveler: L) -> Self {
        self.leveler = Arc::new(leveler);
        self
    }

    /// Set the style; without one, the style depends on the sink
    #[must_use = "builder methods return a new value"]
    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn time_format(mut self, format: TimestampFormat) -> Self {
        self.time_format = format;
        self
    }

    /// Omit the time column entirely
    #[must_use = "builder methods return a new value"]
    pub fn show_time(mut self, show: bool) -> Self {
        self.show_time = show;
        self
    }

    /// Set the attribute replacement hook
    ///
    /// # Example
    ///
    /// ```
    /// use rust_logfmt_handler::{Attr, Handler, MemorySink, TIME_KEY};
    ///
    /// let handler = Handler::builder()
    ///     .replace_attr(|groups, attr| {
    ///         if groups.is_empty() && attr.key == TIME_KEY {
    ///             return Attr::empty();
    ///         }
    ///         attr
    ///     })
    ///     .build(MemorySink::new())
    ///     .unwrap();
    /// ```
    #[must_use = "builder methods return a new value"]
    pub fn replace_attr<F>(mut self, hook: F) -> Self
    where
        F: Fn(&[String], Attr) -> Attr + Send + Sync + 'static,
    {
        self.replace_attr = Some(Arc::new(hook));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Build a handler writing to `sink`, using the plain style unless one
    /// was set
    pub fn build<W: Write + Send + 'static>(self, sink: W) -> Result<Handler> {
        self.finish(Box::new(sink), Style::plain)
    }

    /// Build a handler writing to `sink`, using the colored style when the
    /// sink is a terminal unless a style was set
    pub fn build_for_terminal<W>(self, sink: W) -> Result<Handler>
    where
        W: Write + IsTerminal + Send + 'static,
    {
        let is_terminal = sink.is_terminal();
        self.finish(Box::new(sink), || Style::detect(is_terminal))
    }

    fn finish(
        self,
        sink: Box<dyn Write + Send>,
        default_style: impl FnOnce() -> Style,
    ) -> Result<Handler> {
        self.time_format.validate()?;
        let style = self.style.unwrap_or_else(default_style);
        Ok(Handler::from_parts(
            sink,
            self.leveler,
            style,
            self.time_format,
            self.replace_attr,
            self.show_time,
            self.prefix,
        ))
    }
}

impl Default for HandlerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
