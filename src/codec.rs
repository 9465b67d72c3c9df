//! Markdown checkbox codec.
//!
//! Converts between the on-disk list format and an ordered `Vec<TodoItem>`:
//!
//! ```text
//! # Todo List for <name>
//!
//! - [ ] <text>
//! - [x] <text> (completed: <YYYY-MM-DD HH:MM>)
//! ```
//!
//! Parsing is permissive and lossy: any line that is not a checkbox item is
//! dropped, so unrecognized content does not survive a read-modify-write cycle.

use std::fmt::Write as _;
use std::sync::LazyLock;

use chrono::NaiveDateTime;
use regex::Regex;

use crate::models::{TIMESTAMP_FORMAT, TodoItem};

static ITEM_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^- \[([ x])\] (.+?)(?:\s+\(completed:\s+(.+?)\))?$").expect("Invalid regex")
});

/// Classification of a single (trimmed) line of a list file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
    /// A markdown heading, e.g. `# Todo List for demo`
    Header(String),
    /// A checkbox line
    Item {
        completed: bool,
        text: String,
        /// Raw completion annotation value, not yet validated
        timestamp: Option<String>,
    },
    /// Anything else (blank lines, prose, nested markdown)
    Ignored,
}

/// Classify one line. Surrounding whitespace is ignored.
pub fn classify_line(line: &str) -> LineKind {
    let line = line.trim();

    if let Some(caps) = ITEM_LINE.captures(line) {
        return LineKind::Item {
            completed: &caps[1] == "x",
            text: caps[2].to_string(),
            timestamp: caps.get(3).map(|m| m.as_str().to_string()),
        };
    }

    if let Some(title) = line.strip_prefix("# ") {
        return LineKind::Header(title.trim().to_string());
    }

    LineKind::Ignored
}

/// Parse a completion annotation value. Returns `None` when it is malformed.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw.trim(), TIMESTAMP_FORMAT).ok()
}

/// Parse list file contents into items with IDs 1..N in file order.
///
/// Never fails. A malformed timestamp leaves a completed item without a
/// completion time; an annotation on an open item is discarded.
pub fn parse(text: &str) -> Vec<TodoItem> {
    let mut items = Vec::new();

    for line in text.lines() {
        if let LineKind::Item {
            completed,
            text,
            timestamp,
        } = classify_line(line)
        {
            let id = items.len() + 1;
            let item = if completed {
                let at = timestamp.as_deref().and_then(parse_timestamp);
                TodoItem::completed(id, text, at)
            } else {
                TodoItem::new(id, text)
            };
            items.push(item);
        }
    }

    items
}

/// The heading line written at the top of every list file (without newline).
pub fn header_line(list_name: &str) -> String {
    format!("# Todo List for {}", list_name)
}

/// Render items as a complete list file.
pub fn serialize(list_name: &str, items: &[TodoItem]) -> String {
    let mut out = format!("{}\n\n", header_line(list_name));

    for item in items {
        let marker = if item.completed { "x" } else { " " };
        let _ = write!(out, "- [{}] {}", marker, item.text);
        if item.completed {
            if let Some(at) = item.completed_at_display() {
                let _ = write!(out, " (completed: {})", at);
            }
        }
        out.push('\n');
    }

    out
}
