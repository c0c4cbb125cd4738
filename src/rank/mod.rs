//! Top-N selection over the site index
//!
//! Reads the first k records in the index's natural (recency) order,
//! decorates them into [`RankedEntry`] values, and sorts that bounded
//! slice by descending frecency. When k is smaller than the number of
//! distinct hosts this is deliberately not the global top-k by score: the
//! candidate set is the k most recently seen hosts, which biases the
//! ranking toward sites seen lately. That bounded-sort behavior is part of
//! the contract.

use crate::history::HistoryLog;
use crate::index::{SiteIndex, SiteKey};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::HashMap;

/// Default number of entries a panel asks for
pub const DEFAULT_MAX_ENTRIES: i64 = 8;

/// Supplies an optional icon (PNG bytes) for a site.
///
/// Icon retrieval and encoding belong to an external collaborator; the
/// selector only carries the opaque bytes through to the formatter.
pub trait IconProvider {
    fn icon_for(&self, site: &str) -> Option<Vec<u8>>;
}

/// Icon provider that has no icons
#[derive(Debug, Clone, Copy, Default)]
pub struct NoIcons;

impl IconProvider for NoIcons {
    fn icon_for(&self, _site: &str) -> Option<Vec<u8>> {
        None
    }
}

/// One ranked site, created fresh on every query and never mutated
#[derive(Debug, Clone, PartialEq)]
pub struct RankedEntry {
    /// Displayed site URL, `scheme://host`
    pub site: String,
    /// Time of the site's most recent visit
    pub last_visited: DateTime<Utc>,
    /// Host-only display label
    pub label: String,
    /// Summed frecency over every visit to this host
    pub frecency: u32,
    /// Opaque icon bytes (PNG), if the provider has one
    pub icon: Option<Vec<u8>>,
}

/// Explicit comparator for the ranking sort: descending frecency, equal
/// scores are each other's equals (ties carry no ordering guarantee).
pub fn by_descending_frecency(a: &RankedEntry, b: &RankedEntry) -> Ordering {
    b.frecency.cmp(&a.frecency)
}

/// The top `count` distinct sites by frecency.
///
/// `count == 0` returns an empty list without touching the index (the
/// don't-compute-for-nothing fast path); a negative `count` means the
/// complete ranked set; otherwise the result holds
/// `min(count, distinct-host-count)` entries, sorted descending by score.
pub fn top_entries(
    index: &mut SiteIndex,
    log: &impl HistoryLog,
    icons: &impl IconProvider,
    count: i64,
) -> Vec<RankedEntry> {
    if count == 0 {
        return Vec::new();
    }

    let available = index.len(log);
    let take = if count < 0 {
        available
    } else {
        available.min(count as usize)
    };

    let mut entries = Vec::with_capacity(take);
    for row in 0..take {
        let Some((visit, frecency)) = index.entry_at_row(log, row) else {
            break;
        };
        // rows only ever hold entries that passed the validity gate
        let Some(key) = SiteKey::parse(&visit.url) else {
            continue;
        };

        let site = key.site();
        let icon = icons.icon_for(&site);
        entries.push(RankedEntry {
            label: key.into_host(),
            site,
            last_visited: visit.visited_at,
            frecency,
            icon,
        });
    }

    entries.sort_by(by_descending_frecency);
    entries
}

/// Site -> frecency map over the first `count` rows, for diagnostics and
/// tests; same count semantics as [`top_entries`], no sort involved.
pub fn frecencies(
    index: &mut SiteIndex,
    log: &impl HistoryLog,
    count: i64,
) -> HashMap<String, u32> {
    if count == 0 {
        return HashMap::new();
    }

    let available = index.len(log);
    let take = if count < 0 {
        available
    } else {
        available.min(count as usize)
    };

    let mut map = HashMap::with_capacity(take);
    for row in 0..take {
        let Some((visit, frecency)) = index.entry_at_row(log, row) else {
            break;
        };
        if let Some(key) = SiteKey::parse(&visit.url) {
            map.insert(key.site(), frecency);
        }
    }
    map
}
