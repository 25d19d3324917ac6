//! Attribute formatting
//!
//! Flattens attributes, nested groups included, into styled `key=value`
//! text appended to a buffer. Single-line values render inline:
//!
//! ```text
//! key=value
//! ```
//!
//! Values spanning several lines move to their own indented block:
//!
//! ```text
//!   key=
//!     | line 1
//!     | line 2
//! ```

use super::buffer_pool::BufferPool;
use super::style::Style;
use super::timestamp::TimestampFormat;
use super::value::{Attr, Value};
use std::sync::Arc;

/// Hook rewriting attributes before they are rendered.
///
/// Called with the current group path and the attribute. Returning
/// [`Attr::empty`] drops the attribute. The handler also calls it for the
/// built-in `time` and `level` attributes with an empty group path.
pub type ReplaceAttr = Arc<dyn Fn(&[String], Attr) -> Attr + Send + Sync>;

/// Separator between a group name and the names nested in it
pub(crate) const GROUP_DELIM: char = '.';

/// Separator between two single-line attributes
pub(crate) const ATTR_DELIM: char = ' ';

/// Indentation of multi-line attributes and of attributes following them
pub(crate) const INDENT: &str = "  ";

/// Appends rendered attributes to one destination buffer.
///
/// The group stack starts as a copy of the handler's, so nested groups can be
/// pushed and popped without touching the handler.
pub(crate) struct AttrFormatter<'a> {
    buf: &'a mut String,
    style: &'a Style,
    time_format: &'a TimestampFormat,
    replace_attr: Option<&'a ReplaceAttr>,
    groups: Vec<String>,
}

impl<'a> AttrFormatter<'a> {
    pub(crate) fn new(
        buf: &'a mut String,
        style: &'a Style,
        time_format: &'a TimestampFormat,
        replace_attr: Option<&'a ReplaceAttr>,
        groups: &[String],
    ) -> Self {
        Self {
            buf,
            style,
            time_format,
            replace_attr,
            groups: groups.to_vec(),
        }
    }

    pub(crate) fn format_attrs(&mut self, attrs: impl IntoIterator<Item = Attr>) {
        for attr in attrs {
            self.format_attr(attr);
        }
    }

    pub(crate) fn format_attr(&mut self, attr: Attr) {
        let mut attr = Attr {
            key: attr.key,
            value: attr.value.resolve(),
        };

        if let Some(replace) = self.replace_attr {
            attr = replace(&self.groups, attr);
            attr.value = attr.value.resolve();
        }

        if attr.is_empty() {
            return;
        }

        let Attr { key, value } = attr;
        if let Value::Group(members) = value {
            // Groups only prefix the keys of their members.
            self.groups.push(key);
            for member in members {
                self.format_attr(member);
            }
            self.groups.pop();
            return;
        }

        let mut text = BufferPool::global().take();
        match &value {
            Value::Time(time) => self.time_format.append(&mut text, time),
            other => other.append_text(&mut text),
        }

        match self.buf.as_bytes().last() {
            // Continue after a multi-line value.
            Some(b'\n') => self.buf.push_str(INDENT),
            Some(b' ') | None => {}
            Some(_) => self.buf.push(ATTR_DELIM),
        }

        let multiline = text.contains(['\r', '\n']);
        if multiline {
            self.buf.push('\n');
            self.buf.push_str(INDENT);
        }

        self.append_key(&key);
        let delimiter = &self.style.key_value_delimiter;
        delimiter.append_rendered(self.buf, delimiter.value());

        let value_style = self.style.value(&key);
        if !multiline {
            match value_style {
                Some(style) => style.append_rendered(self.buf, &text),
                None => self.buf.push_str(&text),
            }
            return;
        }

        let mut prefix = String::from(INDENT);
        let prefix_style = &self.style.multiline_value_prefix;
        match value_style.and_then(|style| style.get_foreground()) {
            Some(color) => prefix_style
                .clone()
                .foreground(color)
                .append_rendered(&mut prefix, prefix_style.value()),
            None => prefix_style.append_rendered(&mut prefix, prefix_style.value()),
        }

        self.buf.push('\n');
        for line in text.split_inclusive('\n') {
            let line = line.trim_end_matches(['\r', '\n']);
            self.buf.push_str(&prefix);
            match value_style {
                Some(style) => style.append_rendered(self.buf, line),
                None => self.buf.push_str(line),
            }
            self.buf.push('\n');
        }

        if !self.buf.ends_with('\n') {
            self.buf.push('\n');
        }
    }

    /// Write `key` prefixed by every non-empty group name
    fn append_key(&mut self, key: &str) {
        for group in &self.groups {
            if !group.is_empty() {
                self.style.key.append_rendered(self.buf, group);
                self.buf.push(GROUP_DELIM);
            }
        }
        self.style.key.append_rendered(self.buf, key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::style::TextStyle;
    use chrono::{FixedOffset, TimeZone};
    use colored::Color;
    use std::time::Duration;

    fn render_with(style: &Style, groups: &[&str], attrs: Vec<Attr>) -> String {
        let groups: Vec<String> = groups.iter().map(|g| g.to_string()).collect();
        let mut buf = String::new();
        AttrFormatter::new(&mut buf, style, &TimestampFormat::Kitchen, None, &groups)
            .format_attrs(attrs);
        buf
    }

    fn render(attrs: Vec<Attr>) -> String {
        render_with(&Style::plain(), &[], attrs)
    }

    #[test]
    fn test_value_kinds() {
        let time = FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2025, 5, 20, 21, 0, 0)
            .unwrap();
        let cases = vec![
            (Attr::new("k1", true), "k1=true"),
            (Attr::new("k1", Duration::from_secs(1)), "k1=1s"),
            (Attr::new("k1", 3.14), "k1=3.14"),
            (Attr::new("k1", 42i64), "k1=42"),
            (Attr::new("k1", "foo"), "k1=foo"),
            (Attr::new("k1", time), "k1=9:00PM"),
            (Attr::new("k1", 42u64), "k1=42"),
            (Attr::any("k1", std::net::Ipv4Addr::LOCALHOST), "k1=127.0.0.1"),
        ];
        for (attr, want) in cases {
            assert_eq!(render(vec![attr]), want);
        }
    }

    #[test]
    fn test_attrs_are_space_delimited_in_order() {
        let out = render(vec![
            Attr::new("a", 1),
            Attr::new("b", 2),
            Attr::new("a", 3),
        ]);
        assert_eq!(out, "a=1 b=2 a=3");
    }

    #[test]
    fn test_empty_sentinel_is_skipped() {
        let out = render(vec![Attr::empty(), Attr::new("foo", "bar"), Attr::empty()]);
        assert_eq!(out, "foo=bar");
    }

    #[test]
    fn test_empty_key_and_empty_value() {
        assert_eq!(render(vec![Attr::new("", "value")]), "=value");
        assert_eq!(render(vec![Attr::new("k", "")]), "k=");
    }

    #[test]
    fn test_groups_prefix_keys() {
        let out = render_with(
            &Style::plain(),
            &["a", "b"],
            vec![Attr::group("c", [Attr::new("d", 1), Attr::new("e", 2)])],
        );
        assert_eq!(out, "a.b.c.d=1 a.b.c.e=2");
    }

    #[test]
    fn test_empty_group_names_add_no_delimiter() {
        let out = render_with(
            &Style::plain(),
            &["", "a"],
            vec![Attr::group("", [Attr::new("k", true)])],
        );
        assert_eq!(out, "a.k=true");
    }

    #[test]
    fn test_group_with_only_empty_members_renders_nothing() {
        let out = render(vec![Attr::group("g", [Attr::empty()])]);
        assert_eq!(out, "");
    }

    #[test]
    fn test_multiline_value() {
        let out = render(vec![
            Attr::new("k1", "bar\nbaz\nqux"),
            Attr::new("k2", "quux"),
        ]);
        assert_eq!(
            out,
            "\n  k1=\n    | bar\n    | baz\n    | qux\n  k2=quux"
        );
    }

    #[test]
    fn test_multiline_value_with_trailing_newline() {
        let out = render(vec![Attr::new("k", "a\r\nb\n")]);
        assert_eq!(out, "\n  k=\n    | a\n    | b\n");
    }

    #[test]
    fn test_lazy_value_resolved_before_hook() {
        let hook: ReplaceAttr = Arc::new(|_groups: &[String], attr: Attr| {
            assert!(!matches!(attr.value, Value::Lazy(_)));
            attr
        });
        let mut buf = String::new();
        AttrFormatter::new(
            &mut buf,
            &Style::plain(),
            &TimestampFormat::Kitchen,
            Some(&hook),
            &[],
        )
        .format_attr(Attr::lazy("k", || Value::from(7)));
        assert_eq!(buf, "k=7");
    }

    #[test]
    fn test_hook_sees_group_path_and_can_drop() {
        let hook: ReplaceAttr = Arc::new(|groups: &[String], attr: Attr| {
            if attr.key == "secret" {
                return Attr::empty();
            }
            if groups.last().map(String::as_str) == Some("req") {
                return Attr::new(attr.key.to_uppercase(), attr.value);
            }
            attr
        });
        let mut buf = String::new();
        AttrFormatter::new(
            &mut buf,
            &Style::plain(),
            &TimestampFormat::Kitchen,
            Some(&hook),
            &[],
        )
        .format_attrs(vec![
            Attr::new("secret", "hunter2"),
            Attr::group("req", [Attr::new("id", 7), Attr::new("secret", "x")]),
        ]);
        assert_eq!(buf, "req.ID=7");
    }

    #[test]
    fn test_value_style_applies_to_each_line() {
        let mut style = Style::plain();
        style
            .values
            .insert("error".into(), TextStyle::new().foreground(Color::Red));

        assert_eq!(
            render_with(&style, &[], vec![Attr::new("error", "boom")]),
            "error=\x1b[31mboom\x1b[0m"
        );
        assert_eq!(
            render_with(&style, &[], vec![Attr::new("error", "a\nb")]),
            "\n  error=\n  \x1b[31m  | \x1b[0m\x1b[31ma\x1b[0m\n  \x1b[31m  | \x1b[0m\x1b[31mb\x1b[0m\n"
        );
    }
}
