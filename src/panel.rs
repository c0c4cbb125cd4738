//! Most-visited panel facade
//!
//! Ties the index, selector, and formatter together behind the surface a
//! consumer (a new-tab page, a menu) actually uses. The panel additionally
//! keeps the last computed ranking as a snapshot: `recompute()` re-runs
//! the selector and replaces the snapshot atomically, so readers between
//! recomputes always see a complete previous result, never a partial one.
//! A periodic external tick is expected to drive `recompute()`; nothing
//! here spawns background work.
//!
//! Collaborators (the log, icons, the template) are passed in per call:
//! the panel owns only its derived state.

use crate::history::{ChangeEvent, HistoryLog};
use crate::index::SiteIndex;
use crate::rank::{self, IconProvider, RankedEntry, DEFAULT_MAX_ENTRIES};
use crate::render::{self, TemplateSource};
use std::collections::HashMap;

/// Ranked most-visited sites over an external visit log
pub struct MostVisited {
    index: SiteIndex,
    max_entries: i64,
    cached: Vec<RankedEntry>,
}

impl Default for MostVisited {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl MostVisited {
    /// Create a panel that ranks up to `max_entries` sites; a negative
    /// value means unbounded
    pub fn new(max_entries: i64) -> Self {
        Self {
            index: SiteIndex::new(),
            max_entries,
            cached: Vec::new(),
        }
    }

    pub fn max_entries(&self) -> i64 {
        self.max_entries
    }

    /// Top sites at the panel's configured count
    pub fn top_entries(
        &mut self,
        log: &impl HistoryLog,
        icons: &impl IconProvider,
    ) -> Vec<RankedEntry> {
        rank::top_entries(&mut self.index, log, icons, self.max_entries)
    }

    /// Top sites at an explicit count (0 = none, negative = all)
    pub fn top_n(
        &mut self,
        log: &impl HistoryLog,
        icons: &impl IconProvider,
        count: i64,
    ) -> Vec<RankedEntry> {
        rank::top_entries(&mut self.index, log, icons, count)
    }

    /// Site -> score map at the panel's configured count
    pub fn frecencies(&mut self, log: &impl HistoryLog) -> HashMap<String, u32> {
        rank::frecencies(&mut self.index, log, self.max_entries)
    }

    /// Full page payload at the panel's configured count
    pub fn render(
        &mut self,
        log: &impl HistoryLog,
        icons: &impl IconProvider,
        template: &impl TemplateSource,
    ) -> Vec<u8> {
        render::render(&mut self.index, log, icons, template, self.max_entries)
    }

    /// 1-based recency distance of an address's host, 0 if not ranked
    pub fn host_rank(&mut self, log: &impl HistoryLog, address: &str) -> usize {
        self.index.host_rank(log, address)
    }

    /// Whether an address's host is currently ranked
    pub fn contains(&mut self, log: &impl HistoryLog, address: &str) -> bool {
        self.index.contains(log, address)
    }

    /// Number of distinct ranked hosts
    pub fn distinct_hosts(&mut self, log: &impl HistoryLog) -> usize {
        self.index.len(log)
    }

    /// Remove a contiguous range of ranked rows, delegating the matching
    /// log range to the log; false on an invalid range
    pub fn request_removal(
        &mut self,
        log: &mut impl HistoryLog,
        row: usize,
        count: usize,
    ) -> bool {
        self.index.remove_rows(log, row, count)
    }

    /// Force the index stale; the next read rebuilds and rescores
    pub fn recalculate(&mut self) {
        self.index.invalidate();
    }

    /// Dispatch a log change notification to the index
    pub fn apply(&mut self, log: &impl HistoryLog, event: ChangeEvent) {
        self.index.apply(log, event);
    }

    /// Re-run the selector and replace the cached snapshot.
    ///
    /// Intended to be invoked on a periodic external tick or on demand
    /// after the log changed.
    pub fn recompute(&mut self, log: &impl HistoryLog, icons: &impl IconProvider) {
        self.cached = rank::top_entries(&mut self.index, log, icons, self.max_entries);
    }

    /// The snapshot produced by the last `recompute()`
    pub fn cached(&self) -> &[RankedEntry] {
        &self.cached
    }

    /// Markup fragment for the cached snapshot
    pub fn cached_markup(&self) -> String {
        render::entries_markup(&self.cached)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{MemoryLog, VisitEntry};
    use crate::rank::NoIcons;
    use crate::render::{StaticTemplate, EMPTY_PLACEHOLDER};

    fn scenario_log() -> MemoryLog {
        MemoryLog::from_entries(vec![
            VisitEntry::new("http://twitter.com/xyz"),
            VisitEntry::new("http://facebook.com/asd"),
            VisitEntry::new("http://facebook.com/poi"),
            VisitEntry::new("http://twitter.com/xyz"),
            VisitEntry::new("http://twitter.com/oki"),
        ])
    }

    #[test]
    fn test_counts_around_default() {
        let log = scenario_log();

        for max in [
            DEFAULT_MAX_ENTRIES - 1,
            DEFAULT_MAX_ENTRIES,
            DEFAULT_MAX_ENTRIES + 1,
            -1,
        ] {
            let mut panel = MostVisited::new(max);
            assert_eq!(panel.top_entries(&log, &NoIcons).len(), 2, "max {max}");
        }

        let mut panel = MostVisited::new(0);
        assert!(panel.top_entries(&log, &NoIcons).is_empty());
    }

    #[test]
    fn test_counts_empty_history() {
        let log = MemoryLog::new();

        for max in [-1, 0, DEFAULT_MAX_ENTRIES, DEFAULT_MAX_ENTRIES + 1] {
            let mut panel = MostVisited::new(max);
            assert!(panel.top_entries(&log, &NoIcons).is_empty());
        }
    }

    #[test]
    fn test_cached_snapshot_lags_until_recompute() {
        let mut log = scenario_log();
        let mut panel = MostVisited::default();

        panel.recompute(&log, &NoIcons);
        assert_eq!(panel.cached().len(), 2);

        let event = log.record(VisitEntry::new("http://google.com"));
        panel.apply(&log, event);

        // live query sees three hosts, the snapshot still two
        assert_eq!(panel.top_entries(&log, &NoIcons).len(), 3);
        assert_eq!(panel.cached().len(), 2);

        panel.recompute(&log, &NoIcons);
        assert_eq!(panel.cached().len(), 3);
    }

    #[test]
    fn test_cached_markup_placeholder_then_entries() {
        let log = scenario_log();
        let mut panel = MostVisited::default();

        assert_eq!(panel.cached_markup(), EMPTY_PLACEHOLDER);

        panel.recompute(&log, &NoIcons);
        let markup = panel.cached_markup();
        assert!(markup.contains("twitter.com"));
        assert!(markup.contains("facebook.com"));
        assert_ne!(markup, EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_render_never_empty_with_template() {
        let log = scenario_log();
        let template = StaticTemplate("<body>%ENTRIES%</body>");

        for max in [0, 5, 15, -1] {
            let mut panel = MostVisited::new(max);
            let payload = panel.render(&log, &NoIcons, &template);
            assert!(!payload.is_empty(), "max {max}");
        }
    }

    #[test]
    fn test_removal_then_rebuild() {
        let mut log = scenario_log();
        let mut panel = MostVisited::default();
        assert_eq!(panel.distinct_hosts(&log), 2);

        assert!(panel.request_removal(&mut log, 0, 2));
        assert!(!panel.request_removal(&mut log, 9, 1));

        // next read rebuilds against the shrunken log
        assert_eq!(log.len(), 2);
        assert_eq!(panel.distinct_hosts(&log), 2);
        assert_eq!(panel.host_rank(&log, "http://facebook.com"), 1);
    }

    #[test]
    fn test_recalculate_forces_rescore() {
        let mut log = scenario_log();
        let mut panel = MostVisited::default();
        assert_eq!(panel.distinct_hosts(&log), 2);

        // mutate the log behind the index's back, then force a rebuild
        log.record(VisitEntry::new("http://google.com"));
        panel.recalculate();
        assert_eq!(panel.distinct_hosts(&log), 3);
    }

    #[test]
    fn test_contains_and_rank_surface() {
        let log = scenario_log();
        let mut panel = MostVisited::default();

        assert!(panel.contains(&log, "http://twitter.com/anything"));
        assert_eq!(panel.host_rank(&log, "http://twitter.com"), 1);
        assert_eq!(panel.host_rank(&log, "http://nowhere.example"), 0);
        assert!(!panel.contains(&log, "about:home"));
    }
}
