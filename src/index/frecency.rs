//! Visit scoring
//!
//! Maps a visit's age to an integer point value. The score of a site is
//! the sum over all of its visits, so a site visited often and recently
//! outranks one visited rarely or long ago.

use chrono::{DateTime, Utc};

/// Score one visit by its age relative to `scale_time`.
///
/// `scale_time` is captured once per index rebuild so that every visit in
/// a build is scored against the same instant. Visits newer than
/// `scale_time` (clock skew, insertions after the build) land in the
/// newest bucket.
pub fn frecency_score(visited_at: DateTime<Utc>, scale_time: DateTime<Utc>) -> u32 {
    let days = (scale_time - visited_at).num_days();

    if days <= 1 {
        100
    } else if days < 5 {
        // within the last 4 days
        90
    } else if days < 15 {
        // within the last two weeks
        70
    } else if days < 31 {
        // within the last month
        50
    } else if days < 91 {
        // within the last 3 months
        30
    } else {
        10
    }
}
