//! Visit log contract
//!
//! The visit log is owned by an external collaborator; the ranking engine
//! only ever reads it as "N entries, oldest first", plus one delegated
//! mutation: removing a contiguous range. This module defines that
//! contract ([`HistoryLog`]), the entry type ([`VisitEntry`]), the change
//! events the log emits ([`ChangeEvent`]), and an in-memory reference
//! implementation ([`MemoryLog`]) used by the CLI and tests.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single visit in the chronological log
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VisitEntry {
    /// Full address as visited (scheme, host, path)
    pub url: String,
    /// When the visit happened
    pub visited_at: DateTime<Utc>,
    /// Page title at visit time
    #[serde(default)]
    pub title: String,
}

impl VisitEntry {
    /// Create an entry visited right now
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            visited_at: Utc::now(),
            title: String::new(),
        }
    }

    /// Builder method: set the visit time
    pub fn visited_at(mut self, at: DateTime<Utc>) -> Self {
        self.visited_at = at;
        self
    }

    /// Builder method: set the title
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}

/// What changed in the underlying log.
///
/// Only the single-entry `Appended` shape is handled incrementally by the
/// index; a multi-entry append is treated as a full reset, and any removal
/// invalidates the index wholesale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeEvent {
    /// The log was replaced or changed beyond recognition
    Reset,
    /// `count` entries were appended at the most-recent end
    Appended { count: usize },
    /// A contiguous range was removed (positions from the oldest end)
    Removed { start: usize, count: usize },
}

/// Read access to the chronological visit log.
///
/// Position 0 is the oldest entry; `len() - 1` is the most recent.
/// `remove_range` is the single delegated mutation: the caller (the index,
/// on behalf of a row-removal request) treats it as ordinary mutation with
/// no rollback, and rebuilds against whatever the log ends up containing.
pub trait HistoryLog {
    /// Number of entries in the log
    fn len(&self) -> usize;

    /// Entry at a chronological position (0 = oldest), if in bounds
    fn entry(&self, pos: usize) -> Option<&VisitEntry>;

    /// Remove `count` entries starting at `start`; false if out of range
    fn remove_range(&mut self, start: usize, count: usize) -> bool;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory visit log.
///
/// Reference implementation of the external history collaborator: the CLI
/// loads one from a JSON file, tests build them inline.
#[derive(Debug, Clone, Default)]
pub struct MemoryLog {
    entries: Vec<VisitEntry>,
}

impl MemoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from entries already in chronological order
    pub fn from_entries(entries: Vec<VisitEntry>) -> Self {
        Self { entries }
    }

    /// Append a visit at the most-recent end, returning the event to
    /// dispatch to any derived index
    pub fn record(&mut self, entry: VisitEntry) -> ChangeEvent {
        self.entries.push(entry);
        ChangeEvent::Appended { count: 1 }
    }

    /// Drop every entry, returning the reset event to dispatch
    pub fn clear(&mut self) -> ChangeEvent {
        self.entries.clear();
        ChangeEvent::Reset
    }

    pub fn entries(&self) -> &[VisitEntry] {
        &self.entries
    }
}

impl HistoryLog for MemoryLog {
    fn len(&self) -> usize {
        self.entries.len()
    }

    fn entry(&self, pos: usize) -> Option<&VisitEntry> {
        self.entries.get(pos)
    }

    fn remove_range(&mut self, start: usize, count: usize) -> bool {
        if count == 0 || start >= self.entries.len() || count > self.entries.len() - start {
            return false;
        }
        self.entries.drain(start..start + count);
        true
    }
}
