//! Retrace Index Structures
//!
//! The derived aggregation state between the raw visit log and the ranked
//! queries:
//!
//! - **address**: site-key extraction and the validity gate
//! - **frecency**: per-visit age-bucket scoring
//! - **site_index**: the deduplicated, scored aggregate with its
//!   stale/fresh lifecycle
//!
//! # Architecture
//!
//! ```text
//! Visit log (external, chronological)
//!        |
//! SiteIndex: one record per host, natural order = most recent first
//!        |
//! Selector: take first k rows, sort by score  (rank module)
//! ```

mod address;
mod frecency;
mod site_index;

pub use address::SiteKey;
pub use frecency::frecency_score;
pub use site_index::SiteIndex;
