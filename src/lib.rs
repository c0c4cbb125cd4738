//! # Retrace
//!
//! Recency-weighted ("frecency") most-visited site ranking over a
//! chronological visit log.
//!
//! The visit log itself belongs to an external collaborator; this crate
//! owns the derived aggregation index, the scoring function, the bounded
//! top-N selection, and the HTML presentation of the result.
//!
//! ## Features
//!
//! - **Deduplicating index**: one scored record per host, rebuilt lazily
//!   and updated incrementally on appends
//! - **Frecency scoring**: age-bucketed points summed per host
//! - **Bounded ranking**: top-N by score over the N most recently seen
//!   hosts, with deterministic descending order
//! - **Panel rendering**: markup fragment plus template substitution,
//!   with a cached snapshot refreshed on demand
//!
//! ## Modules
//!
//! - [`history`]: visit log contract and in-memory reference log
//! - [`index`]: the deduplicated frecency index
//! - [`rank`]: top-N selection
//! - [`render`]: presentation formatting
//! - [`panel`]: the consumer-facing facade
//!
//! ## Quick Start
//!
//! ```rust
//! use retrace::history::{MemoryLog, VisitEntry};
//! use retrace::panel::MostVisited;
//! use retrace::rank::NoIcons;
//!
//! let mut log = MemoryLog::new();
//! let mut panel = MostVisited::default();
//!
//! let event = log.record(VisitEntry::new("http://example.com/docs"));
//! panel.apply(&log, event);
//!
//! let top = panel.top_entries(&log, &NoIcons);
//! assert_eq!(top[0].site, "http://example.com");
//! ```

pub mod config;
pub mod history;
pub mod index;
pub mod panel;
pub mod rank;
pub mod render;

// Re-export top-level types for convenience
pub use config::{Config, ConfigError, LoggingConfig, RankingConfig, TemplateConfig};

pub use history::{ChangeEvent, HistoryLog, MemoryLog, VisitEntry};

pub use index::{frecency_score, SiteIndex, SiteKey};

pub use rank::{
    by_descending_frecency, frecencies, top_entries, IconProvider, NoIcons, RankedEntry,
    DEFAULT_MAX_ENTRIES,
};

pub use render::{
    entries_markup, page, render, FileTemplate, StaticTemplate, TemplateSource,
    DEFAULT_TEMPLATE, EMPTY_PLACEHOLDER, TEMPLATE_SLOT,
};

pub use panel::MostVisited;
