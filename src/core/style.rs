//! Output styling
//!
//! A [`Style`] is the registry the handler consults while rendering: labels
//! and colors per level, value colors per attribute key, and the delimiter
//! strings. Every lookup may come back empty, in which case the text is
//! written without styling. The one exception is level labels: a level with
//! no entry gets no label segment at all.

use super::level::Level;
use colored::Color;
use std::collections::HashMap;
use std::env;

const SGR_RESET: &str = "\x1b[0m";

/// Styling for one segment of output.
///
/// A style may carry fixed text of its own (delimiters and level labels do),
/// which [`TextStyle::render_value`] renders.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    value: Option<String>,
    foreground: Option<Color>,
    bold: bool,
    faint: bool,
    italic: bool,
    underline: bool,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the fixed text of this style
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    #[must_use]
    pub fn foreground(mut self, color: Color) -> Self {
        self.foreground = Some(color);
        self
    }

    #[must_use]
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = bold;
        self
    }

    #[must_use]
    pub fn faint(mut self, faint: bool) -> Self {
        self.faint = faint;
        self
    }

    #[must_use]
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = italic;
        self
    }

    #[must_use]
    pub fn underline(mut self, underline: bool) -> Self {
        self.underline = underline;
        self
    }

    pub fn get_foreground(&self) -> Option<Color> {
        self.foreground
    }

    /// The fixed text, or `""` if none is set
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Whether rendering leaves text untouched
    pub fn is_plain(&self) -> bool {
        self.foreground.is_none() && !self.bold && !self.faint && !self.italic && !self.underline
    }

    fn sgr_codes(&self) -> String {
        let mut codes: Vec<String> = Vec::with_capacity(5);
        if self.bold {
            codes.push("1".into());
        }
        if self.faint {
            codes.push("2".into());
        }
        if self.italic {
            codes.push("3".into());
        }
        if self.underline {
            codes.push("4".into());
        }
        if let Some(color) = self.foreground {
            codes.push(color.to_fg_str().to_string());
        }
        codes.join(";")
    }

    /// Append `text` to `buf` with this style applied
    pub fn append_rendered(&self, buf: &mut String, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.is_plain() {
            buf.push_str(text);
            return;
        }
        buf.push_str("\x1b[");
        buf.push_str(&self.sgr_codes());
        buf.push('m');
        buf.push_str(text);
        buf.push_str(SGR_RESET);
    }

    pub fn render(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len() + 16);
        self.append_rendered(&mut out, text);
        out
    }

    /// Render this style's own fixed text
    pub fn render_value(&self) -> String {
        self.render(self.value())
    }
}

/// Output styling for the handler.
///
/// Start from [`Style::colored`] or [`Style::plain`] and change the fields
/// you need:
///
/// ```
/// use rust_logfmt_handler::{Level, Style, TextStyle};
///
/// let mut style = Style::plain();
/// style.key_value_delimiter = TextStyle::new().with_value(": ");
/// style.level_labels.insert(Level::new(-8), TextStyle::new().with_value("TRC"));
/// ```
#[derive(Debug, Clone)]
pub struct Style {
    /// Style for attribute keys and group names
    pub key: TextStyle,

    /// Separator between key and value; its fixed text should be non-empty
    pub key_value_delimiter: TextStyle,

    /// Label per level. Levels missing here are logged without a label.
    pub level_labels: HashMap<Level, TextStyle>,

    /// Prefix for each line of a multi-line attribute value
    pub multiline_value_prefix: TextStyle,

    /// Separator between a handler prefix and the message
    pub prefix_delimiter: TextStyle,

    /// Style for the time column
    pub time: TextStyle,

    /// Message style per level; missing levels use plain text
    pub messages: HashMap<Level, TextStyle>,

    /// Value style per attribute key; missing keys use plain text
    pub values: HashMap<String, TextStyle>,
}

impl Style {
    /// Colored output for terminals: faint keys and debug messages,
    /// colored labels, and `error` values in red.
    pub fn colored() -> Self {
        let faint = TextStyle::new().faint(true);
        Self {
            key: faint.clone(),
            key_value_delimiter: faint.clone().with_value("="),
            multiline_value_prefix: faint.clone().with_value("| "),
            prefix_delimiter: TextStyle::new().with_value(": "),
            time: faint.clone(),
            level_labels: HashMap::from([
                (Level::TRACE, TextStyle::new().with_value("TRC").faint(true)),
                (Level::DEBUG, TextStyle::new().with_value("DBG")),
                (
                    Level::INFO,
                    TextStyle::new().with_value("INF").foreground(Color::BrightGreen),
                ),
                (
                    Level::WARN,
                    TextStyle::new().with_value("WRN").foreground(Color::BrightYellow),
                ),
                (
                    Level::ERROR,
                    TextStyle::new().with_value("ERR").foreground(Color::BrightRed),
                ),
            ]),
            messages: HashMap::from([(Level::TRACE, faint.clone()), (Level::DEBUG, faint)]),
            values: HashMap::from([(
                "error".to_string(),
                TextStyle::new().foreground(Color::BrightRed),
            )]),
        }
    }

    /// Uncolored output for files, pipes and tests
    pub fn plain() -> Self {
        let label = |text: &str| TextStyle::new().with_value(text);
        Self {
            key: TextStyle::new(),
            key_value_delimiter: label("="),
            multiline_value_prefix: label("  | "),
            prefix_delimiter: label(": "),
            time: TextStyle::new(),
            level_labels: HashMap::from([
                (Level::TRACE, label("TRC")),
                (Level::DEBUG, label("DBG")),
                (Level::INFO, label("INF")),
                (Level::WARN, label("WRN")),
                (Level::ERROR, label("ERR")),
            ]),
            messages: HashMap::new(),
            values: HashMap::new(),
        }
    }

    /// Pick a style for a destination.
    ///
    /// A non-empty `NO_COLOR` always selects [`Style::plain`];
    /// `CLICOLOR_FORCE` other than `0` selects [`Style::colored`]
    /// even when the destination is not a terminal.
    ///
    /// `colored::control` is not consulted: its global switch tracks stdout,
    /// not the handler's sink, and escapes are written per handler style.
    pub fn detect(is_terminal: bool) -> Self {
        let no_color = env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
        let force = env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0");

        if !no_color && (force || is_terminal) {
            Self::colored()
        } else {
            Self::plain()
        }
    }

    pub fn level_label(&self, level: Level) -> Option<&TextStyle> {
        self.level_labels.get(&level)
    }

    pub fn message(&self, level: Level) -> Option<&TextStyle> {
        self.messages.get(&level)
    }

    pub fn value(&self, key: &str) -> Option<&TextStyle> {
        self.values.get(key)
    }
}

impl Default for Style {
    fn default() -> Self {
        Self::plain()
    }
}
