//! Site Index - deduplicated, scored aggregate over the visit log
//!
//! Collapses the chronological log into one record per host, each carrying
//! the position of the host's most recent visit and the summed frecency of
//! every visit to that host. The index is a lazy cache over the log: a
//! stale/fresh flag gates every read, a single append is folded in
//! incrementally, and any removal invalidates the whole index (partial
//! removal has no bounded-cost incremental repair, so the next read
//! rebuilds from scratch).
//!
//! # Performance
//! - Rebuild: O(n) over log length
//! - Append: O(log n) lookup + O(k) row shift
//! - Row access / host lookup: O(log n) or better

use crate::history::{ChangeEvent, HistoryLog, VisitEntry};
use crate::index::address::SiteKey;
use crate::index::frecency::frecency_score;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Index lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum IndexState {
    /// Derived state may not match the log; next read rebuilds
    Stale,
    /// Derived state matches the log as of the last build or append
    Fresh,
}

/// One aggregate record per distinct host.
///
/// `last_pos` is the 1-based chronological position of the host's most
/// recent visit. Storing the absolute position means appends never
/// renumber existing records; the distance from the most-recent end is
/// recomputed against the log's current length on demand.
#[derive(Debug, Clone, Copy)]
struct SiteRecord {
    last_pos: usize,
    frecency: u32,
}

/// Deduplicating frecency index over a [`HistoryLog`].
///
/// Rows are kept in natural order: descending `last_pos`, i.e. the most
/// recently seen host first. Sorting by score is the selector's concern,
/// not the index's. The index holds no reference to the log; every
/// operation takes the log explicitly.
pub struct SiteIndex {
    /// Natural-order records, strictly descending in `last_pos`
    rows: Vec<SiteRecord>,
    /// Host -> `last_pos` of that host's record
    hosts: HashMap<String, usize>,
    state: IndexState,
    /// Instant all visits of the current build are scored against
    scale_time: DateTime<Utc>,
}

impl Default for SiteIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl SiteIndex {
    /// Create an empty index, marked stale so the first read builds it
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            hosts: HashMap::new(),
            state: IndexState::Stale,
            scale_time: Utc::now(),
        }
    }

    /// Rebuild from the log if the index is stale.
    ///
    /// Called at the top of every read operation; callers never observe
    /// partially built state.
    pub fn ensure_fresh(&mut self, log: &impl HistoryLog) {
        if self.state == IndexState::Stale {
            self.rebuild(log);
        }
    }

    /// Full O(n) rebuild, walking the log from most recent to oldest.
    ///
    /// The first occurrence of a host on this walk is necessarily its most
    /// recent visit and fixes the record's position; every later (older)
    /// occurrence only adds to the score.
    pub fn rebuild(&mut self, log: &impl HistoryLog) {
        self.rows.clear();
        self.hosts.clear();
        self.scale_time = Utc::now();

        let len = log.len();
        self.hosts.reserve(len.min(1024));

        for pos in (1..=len).rev() {
            let Some(entry) = log.entry(pos - 1) else {
                continue;
            };
            let Some(key) = SiteKey::parse(&entry.url) else {
                continue;
            };

            let score = frecency_score(entry.visited_at, self.scale_time);
            match self.hosts.get(key.host()).copied() {
                None => {
                    // walking newest-first, so rows come out in natural order
                    self.rows.push(SiteRecord {
                        last_pos: pos,
                        frecency: score,
                    });
                    self.hosts.insert(key.into_host(), pos);
                }
                Some(last_pos) => match self.position_of(last_pos) {
                    Some(row) => self.rows[row].frecency += score,
                    None => self.report_out_of_sync(key.host()),
                },
            }
        }

        self.state = IndexState::Fresh;
        tracing::debug!(visits = len, hosts = self.rows.len(), "rebuilt site index");
    }

    /// Fold in a single entry just appended at the most-recent end.
    ///
    /// A stale index is left stale: the next read's full rebuild subsumes
    /// this update. Entries failing the validity gate are skipped, so
    /// excluded addresses never gain a record on any path.
    pub fn note_append(&mut self, log: &impl HistoryLog) {
        if self.state == IndexState::Stale {
            return;
        }

        let len = log.len();
        let Some(entry) = (len > 0).then(|| log.entry(len - 1)).flatten() else {
            return;
        };
        let Some(key) = SiteKey::parse(&entry.url) else {
            return;
        };

        let mut carried = 0;
        if let Some(old_pos) = self.hosts.get(key.host()).copied() {
            match self.position_of(old_pos) {
                Some(row) => {
                    carried = self.rows[row].frecency;
                    self.rows.remove(row);
                    self.hosts.remove(key.host());
                }
                None => {
                    self.report_out_of_sync(key.host());
                    self.invalidate();
                    return;
                }
            }
        }

        let score = frecency_score(entry.visited_at, self.scale_time);
        self.rows.insert(
            0,
            SiteRecord {
                last_pos: len,
                frecency: carried + score,
            },
        );
        self.hosts.insert(key.into_host(), len);
    }

    /// Mark the index stale; the next read triggers a full rebuild
    pub fn invalidate(&mut self) {
        self.state = IndexState::Stale;
    }

    /// Map a log change event onto the matching lifecycle operation
    pub fn apply(&mut self, log: &impl HistoryLog, event: ChangeEvent) {
        match event {
            ChangeEvent::Appended { count: 1 } => self.note_append(log),
            // any other insertion shape, and every removal, is a reset
            ChangeEvent::Appended { .. } | ChangeEvent::Reset => self.invalidate(),
            ChangeEvent::Removed { .. } => self.invalidate(),
        }
    }

    /// Number of distinct ranked hosts
    pub fn len(&mut self, log: &impl HistoryLog) -> usize {
        self.ensure_fresh(log);
        self.rows.len()
    }

    pub fn is_empty(&mut self, log: &impl HistoryLog) -> bool {
        self.len(log) == 0
    }

    /// Row-style random access in natural (recency) order: the underlying
    /// most recent visit of the row's host, plus the host's total score
    pub fn entry_at_row<'a>(
        &mut self,
        log: &'a impl HistoryLog,
        row: usize,
    ) -> Option<(&'a VisitEntry, u32)> {
        self.ensure_fresh(log);
        let record = *self.rows.get(row)?;
        match log.entry(record.last_pos - 1) {
            Some(entry) => Some((entry, record.frecency)),
            None => {
                self.report_out_of_sync("row access");
                None
            }
        }
    }

    /// Map an aggregated row to its underlying log position (0 = oldest)
    pub fn row_to_log_pos(&mut self, log: &impl HistoryLog, row: usize) -> Option<usize> {
        self.ensure_fresh(log);
        self.rows.get(row).map(|r| r.last_pos - 1)
    }

    /// Map a log position back to an aggregated row, if that position is
    /// some host's most recent visit
    pub fn log_pos_to_row(&mut self, log: &impl HistoryLog, pos: usize) -> Option<usize> {
        self.ensure_fresh(log);
        self.position_of(pos + 1)
    }

    /// 1-based distance of an address's host from the most-recent end:
    /// 1 means the most recently seen host, 0 means not ranked at all
    pub fn host_rank(&mut self, log: &impl HistoryLog, address: &str) -> usize {
        self.ensure_fresh(log);
        let Some(key) = SiteKey::parse(address) else {
            return 0;
        };
        match self.hosts.get(key.host()) {
            Some(&last_pos) => log.len() - last_pos + 1,
            None => 0,
        }
    }

    /// Whether the address's host currently has a ranked record
    pub fn contains(&mut self, log: &impl HistoryLog, address: &str) -> bool {
        self.host_rank(log, address) > 0
    }

    /// Remove a contiguous range of aggregated rows.
    ///
    /// The request is translated into the contiguous underlying log range
    /// spanning the selected rows' most recent visits and forwarded to the
    /// log as a single removal; everything in between goes with it, which
    /// is the intent of a contiguous selection. The index is invalidated
    /// regardless of how the log's removal fares. Returns false without
    /// touching the log if the row range is empty or out of bounds.
    pub fn remove_rows(
        &mut self,
        log: &mut impl HistoryLog,
        row: usize,
        count: usize,
    ) -> bool {
        self.ensure_fresh(log);
        if count == 0 || row >= self.rows.len() || count > self.rows.len() - row {
            return false;
        }

        // natural order is descending, so the first row is the newest
        let newest = self.rows[row].last_pos;
        let oldest = self.rows[row + count - 1].last_pos;

        self.invalidate();
        log.remove_range(oldest - 1, newest - oldest + 1)
    }

    /// Binary search the natural-order rows for a record by position.
    /// Rows are sorted descending, hence the reversed comparator.
    fn position_of(&self, last_pos: usize) -> Option<usize> {
        self.rows
            .binary_search_by(|record| last_pos.cmp(&record.last_pos))
            .ok()
    }

    /// A hosts-map hit with no matching row means the index corrupted its
    /// own bookkeeping. Fail fast in debug builds; degrade in release.
    fn report_out_of_sync(&self, context: &str) {
        debug_assert!(false, "site index out of sync: {context}");
        tracing::error!(context, "site index out of sync, forcing rebuild");
    }
}
