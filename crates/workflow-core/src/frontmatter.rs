//! Frontmatter accessor.
//!
//! A frontmatter block is the `---` delimited header at the very start of a
//! document. Only flat `key: value` lines are understood; anything else in
//! the block (lists, nested maps, comments) is passed through untouched.
//!
//! Keys are matched case-insensitively. When a key appears more than once,
//! the last line governs for both reading and writing.

use std::ops::Range;

use log::{debug, error};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};

use crate::model::{Field, FrontmatterValue};
use crate::vfs::DocumentStore;

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\A\x{FEFF}?---[ \t]*\r?\n(?:(.*?)\r?\n)??(---)[ \t]*(?:\r?\n|\z)")
        .expect("frontmatter block pattern")
});

static KEY_LINE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^\s:#\-][^:]*?)[ \t]*:(.*)$").expect("key line pattern"));

/// Byte layout of a frontmatter block inside a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Lines between the delimiters, `None` for `---\n---`.
    pub body: Option<Range<usize>>,
    /// Offset of the closing `---`.
    pub close_start: usize,
    /// Offset just past the closing delimiter line.
    pub end: usize,
}

impl Block {
    pub fn body_text<'a>(&self, text: &'a str) -> &'a str {
        self.body.clone().map(|range| &text[range]).unwrap_or("")
    }
}

/// Locate the frontmatter block at the start of `text`.
pub fn locate(text: &str) -> Option<Block> {
    let caps = BLOCK_RE.captures(text)?;
    let whole = caps.get(0)?;
    let close = caps.get(2)?;
    Some(Block {
        body: caps.get(1).map(|m| m.range()),
        close_start: close.start(),
        end: whole.end(),
    })
}

/// Read the value of `key`, or `None` when there is no block, the block is
/// empty, or the key is absent.
///
/// Quoted values are unquoted, so this returns exactly what [`set`] stored.
pub fn get(text: &str, key: &str) -> Option<String> {
    let key_re = key_regex(key)?;
    let block = locate(text)?;
    let body = block.body?;
    let (span, value_start) = find_key_line(text, body, &key_re)?;
    Some(unquote(text[value_start..span.end].trim()))
}

/// Return `text` with `key` set to `value`.
///
/// Existing keys keep their line and position; new keys are appended to the
/// end of the block; documents without a block get a fresh one followed by a
/// blank line. Invalid keys leave the text unchanged.
pub fn set(text: &str, key: &str, value: &FrontmatterValue) -> String {
    let Some(key_re) = key_regex(key) else {
        debug!("Refusing to write invalid frontmatter key {:?}", key);
        return text.to_string();
    };

    let formatted = format_value(value);

    let Some(block) = locate(text) else {
        return format!("---\n{}: {}\n---\n\n{}", key, formatted, text);
    };

    let newline = if text[..block.end].contains("\r\n") {
        "\r\n"
    } else {
        "\n"
    };

    match block.body.clone() {
        Some(body) => {
            if let Some((span, value_start)) = find_key_line(text, body.clone(), &key_re) {
                // Keep "key   :" as written, normalize what follows.
                let prefix_end = value_start;
                let mut out = String::with_capacity(text.len() + formatted.len());
                out.push_str(&text[..prefix_end]);
                out.push(' ');
                out.push_str(&formatted);
                out.push_str(&text[span.end..]);
                out
            } else if body.is_empty() {
                splice(text, body.end, &format!("{}: {}", key, formatted))
            } else {
                splice(
                    text,
                    body.end,
                    &format!("{}{}: {}", newline, key, formatted),
                )
            }
        }
        None => splice(
            text,
            block.close_start,
            &format!("{}: {}{}", key, formatted, newline),
        ),
    }
}

/// Serialize a value the way it is written after `key: `.
///
/// ```
/// use workflow_core::frontmatter::format_value;
/// use workflow_core::FrontmatterValue;
///
/// assert_eq!(format_value(&FrontmatterValue::Null), "null");
/// assert_eq!(format_value(&FrontmatterValue::Bool(true)), "true");
/// assert_eq!(format_value(&FrontmatterValue::Float(1.5)), "1.5");
/// assert_eq!(format_value(&"plain".into()), "plain");
/// assert_eq!(format_value(&"a: b".into()), "\"a: b\"");
/// ```
pub fn format_value(value: &FrontmatterValue) -> String {
    match value {
        FrontmatterValue::Null => "null".to_string(),
        FrontmatterValue::Bool(b) => b.to_string(),
        FrontmatterValue::Integer(n) => n.to_string(),
        FrontmatterValue::Float(f) if f.is_nan() => ".nan".to_string(),
        FrontmatterValue::Float(f) if f.is_infinite() => {
            let text = if *f > 0.0 { ".inf" } else { "-.inf" };
            text.to_string()
        }
        FrontmatterValue::Float(f) => f.to_string(),
        FrontmatterValue::String(s) if needs_quotes(s) => quote(s),
        FrontmatterValue::String(s) => s.clone(),
    }
}

fn needs_quotes(s: &str) -> bool {
    s.trim() != s
        || s.chars().any(|c| {
            matches!(
                c,
                ':' | '#' | '[' | ']' | '{' | '}' | '"' | '\'' | '\n' | '\r'
            )
        })
}

fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    for c in s.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

fn unquote(raw: &str) -> String {
    if raw.len() >= 2 && raw.starts_with('"') && raw.ends_with('"') {
        let inner = &raw[1..raw.len() - 1];
        let mut out = String::with_capacity(inner.len());
        let mut chars = inner.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                out.push(c);
                continue;
            }
            match chars.next() {
                Some('"') => out.push('"'),
                Some('\\') => out.push('\\'),
                Some('n') => out.push('\n'),
                Some('r') => out.push('\r'),
                Some('t') => out.push('\t'),
                Some(other) => {
                    out.push('\\');
                    out.push(other);
                }
                None => out.push('\\'),
            }
        }
        out
    } else if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        raw[1..raw.len() - 1].replace("''", "'")
    } else {
        raw.to_string()
    }
}

fn key_regex(key: &str) -> Option<Regex> {
    if key.is_empty()
        || key.trim() != key
        || key.contains(|c: char| matches!(c, ':' | '\n' | '\r'))
    {
        return None;
    }
    RegexBuilder::new(&format!(r"^{}[ \t]*:", regex::escape(key)))
        .case_insensitive(true)
        .build()
        .ok()
}

/// Last line in `body` whose key matches. Returns the line span and the
/// offset just past its colon.
fn find_key_line(text: &str, body: Range<usize>, key_re: &Regex) -> Option<(Range<usize>, usize)> {
    line_spans(text, body).into_iter().rev().find_map(|span| {
        let m = key_re.find(&text[span.clone()])?;
        Some((span.clone(), span.start + m.end()))
    })
}

/// Line spans inside `range`, excluding line terminators.
fn line_spans(text: &str, range: Range<usize>) -> Vec<Range<usize>> {
    let mut spans = Vec::new();
    let mut start = range.start;
    while start <= range.end {
        let rest = &text[start..range.end];
        let (line_end, next) = match rest.find('\n') {
            Some(pos) => (start + pos, start + pos + 1),
            None => (range.end, range.end + 1),
        };
        let line_end = if line_end > start && text.as_bytes()[line_end - 1] == b'\r' {
            line_end - 1
        } else {
            line_end
        };
        spans.push(start..line_end);
        start = next;
    }
    spans
}

fn splice(text: &str, at: usize, insert: &str) -> String {
    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..at]);
    out.push_str(insert);
    out.push_str(&text[at..]);
    out
}

/// Typed view over a frontmatter block.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frontmatter {
    entries: Vec<(String, FrontmatterValue)>,
}

impl Frontmatter {
    /// Parse the block of `text`, `None` when the document has no block.
    pub fn parse(text: &str) -> Option<Self> {
        let block = locate(text)?;
        let mut frontmatter = Frontmatter::default();
        let Some(body) = block.body else {
            return Some(frontmatter);
        };

        for span in line_spans(text, body) {
            let line = &text[span];
            if let Some(caps) = KEY_LINE_RE.captures(line) {
                let key = &caps[1];
                let value = interpret_scalar(caps[2].trim());
                frontmatter.insert(key, value);
            }
        }

        Some(frontmatter)
    }

    fn insert(&mut self, key: &str, value: FrontmatterValue) {
        match self
            .entries
            .iter_mut()
            .find(|(existing, _)| same_key(existing, key))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
    }

    pub fn field(&self, key: &str) -> Field<'_> {
        self.entries
            .iter()
            .find(|(existing, _)| same_key(existing, key))
            .map(|(_, value)| Field::Present(value))
            .unwrap_or(Field::Missing)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FrontmatterValue)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// Unicode case folding, matching the case-insensitive lookup of `get`.
fn same_key(a: &str, b: &str) -> bool {
    a == b || a.to_lowercase() == b.to_lowercase()
}

fn interpret_scalar(raw: &str) -> FrontmatterValue {
    if raw.is_empty() {
        return FrontmatterValue::Null;
    }

    match serde_yaml::from_str::<serde_yaml::Value>(raw) {
        Ok(serde_yaml::Value::Null) => FrontmatterValue::Null,
        Ok(serde_yaml::Value::Bool(b)) => FrontmatterValue::Bool(b),
        Ok(serde_yaml::Value::Number(n)) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => FrontmatterValue::Integer(i),
            (None, Some(f)) => FrontmatterValue::Float(f),
            (None, None) => FrontmatterValue::String(raw.to_string()),
        },
        Ok(serde_yaml::Value::String(s)) => FrontmatterValue::String(s),
        // Lists, maps and tagged values stay opaque.
        Ok(_) => FrontmatterValue::String(raw.to_string()),
        Err(_) => FrontmatterValue::String(unquote(raw)),
    }
}

/// Read a property from a document in the store.
pub fn read_property(store: &dyn DocumentStore, path: &str, key: &str) -> Option<String> {
    let doc = store.resolve(path)?;
    match store.read(&doc) {
        Ok(text) => get(&text, key),
        Err(e) => {
            error!("Error getting frontmatter property from {}: {}", doc, e);
            None
        }
    }
}

/// Set a property on a document in the store with a full read-modify-write.
///
/// Returns `false` when the document is missing or any I/O step fails.
pub fn update_property(
    store: &dyn DocumentStore,
    path: &str,
    key: &str,
    value: &FrontmatterValue,
) -> bool {
    let Some(doc) = store.resolve(path) else {
        error!("File not found: {}", path);
        return false;
    };

    let text = match store.read(&doc) {
        Ok(text) => text,
        Err(e) => {
            error!("Error updating frontmatter in {}: {}", doc, e);
            return false;
        }
    };

    let updated = set(&text, key, value);
    if updated == text {
        return true;
    }

    match store.write(&doc, &updated) {
        Ok(()) => true,
        Err(e) => {
            error!("Error updating frontmatter in {}: {}", doc, e);
            false
        }
    }
}
