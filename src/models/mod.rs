//! Data models for todo lists.
//!
//! This module defines the core data structures:
//! - `TodoItem` - A single checklist entry with completion state
//! - `TodoList` - An ordered sequence of items backing one markdown file
//! - `ListSummary` - Completion counts used by the list overview

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Format of the completion annotation, e.g. `2024-01-15 10:30`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

/// A single checklist entry.
///
/// The `id` is the 1-based position within the list at read time. It is not
/// persisted and changes when the file is reordered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoItem {
    /// Position within the list (1-based)
    pub id: usize,

    /// Item text with any completion annotation stripped
    pub text: String,

    /// Whether the checkbox is ticked
    pub completed: bool,

    /// When the item was completed (minute precision)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<NaiveDateTime>,
}

impl TodoItem {
    /// Create a new, open item.
    pub fn new(id: usize, text: impl Into<String>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: false,
            completed_at: None,
        }
    }

    /// Create a completed item with an optional completion time.
    pub fn completed(id: usize, text: impl Into<String>, at: Option<NaiveDateTime>) -> Self {
        Self {
            id,
            text: text.into(),
            completed: true,
            completed_at: at.map(truncate_to_minute),
        }
    }

    /// Mark the item completed at `now`, or reopen it.
    ///
    /// Reopening always clears the timestamp.
    pub fn set_completed(&mut self, value: bool, now: NaiveDateTime) {
        self.completed = value;
        self.completed_at = if value {
            Some(truncate_to_minute(now))
        } else {
            None
        };
    }

    /// Completion time rendered in the file format.
    pub fn completed_at_display(&self) -> Option<String> {
        self.completed_at
            .map(|at| at.format(TIMESTAMP_FORMAT).to_string())
    }
}

/// Drop seconds and sub-second precision, matching what the file can hold.
pub fn truncate_to_minute(at: NaiveDateTime) -> NaiveDateTime {
    at.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(at)
}

/// An ordered sequence of todo items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TodoList {
    pub items: Vec<TodoItem>,
}

impl TodoList {
    /// Create an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from items, renumbering IDs densely from 1.
    pub fn from_items(items: Vec<TodoItem>) -> Self {
        let mut list = Self { items };
        list.renumber();
        list
    }

    /// Reassign IDs 1..N in sequence order.
    pub fn renumber(&mut self) {
        for (index, item) in self.items.iter_mut().enumerate() {
            item.id = index + 1;
        }
    }

    /// Append an open item and return a reference to it.
    pub fn push(&mut self, text: impl Into<String>) -> &TodoItem {
        let id = self.items.len() + 1;
        self.items.push(TodoItem::new(id, text));
        &self.items[id - 1]
    }

    /// Look up an item by its 1-based ID.
    pub fn get_mut(&mut self, id: usize) -> Option<&mut TodoItem> {
        if id == 0 {
            return None;
        }
        self.items.get_mut(id - 1)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of ticked items.
    pub fn completed_count(&self) -> usize {
        self.items.iter().filter(|item| item.completed).count()
    }

    /// Completion percentage, rounded down. An empty list is 0%.
    pub fn percent_complete(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            self.completed_count() * 100 / self.items.len()
        }
    }
}

/// Completion counts for one list, as shown by `todo list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListSummary {
    pub name: String,
    pub completed: usize,
    pub total: usize,
    pub percent: usize,
}

impl ListSummary {
    pub fn from_list(name: impl Into<String>, list: &TodoList) -> Self {
        Self {
            name: name.into(),
            completed: list.completed_count(),
            total: list.len(),
            percent: list.percent_complete(),
        }
    }
}
