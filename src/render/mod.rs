//! Presentation formatting
//!
//! Folds a ranked entry list into an HTML fragment and substitutes that
//! fragment into an externally supplied page template. Template loading is
//! the only I/O in the whole engine; a failed load soft-fails to an empty
//! payload rather than an error, since the surrounding UI treats a blank
//! panel as acceptable degradation.

use crate::history::HistoryLog;
use crate::index::SiteIndex;
use crate::rank::{top_entries, IconProvider, RankedEntry};
use base64::prelude::*;
use std::io;
use std::path::PathBuf;

/// Fixed fragment rendered when there is nothing to rank
pub const EMPTY_PLACEHOLDER: &str = "<p>No recent websites</p>";

/// Marker in the page template replaced by the entries fragment
pub const TEMPLATE_SLOT: &str = "%ENTRIES%";

/// Supplies the static page template the fragment is substituted into
pub trait TemplateSource {
    fn load(&self) -> io::Result<String>;
}

/// Template read from a file on every materialization
#[derive(Debug, Clone)]
pub struct FileTemplate {
    path: PathBuf,
}

impl FileTemplate {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl TemplateSource for FileTemplate {
    fn load(&self) -> io::Result<String> {
        std::fs::read_to_string(&self.path)
    }
}

/// Template held in memory; the crate's bundled default page
#[derive(Debug, Clone)]
pub struct StaticTemplate(pub &'static str);

/// The page template shipped with the crate
pub const DEFAULT_TEMPLATE: StaticTemplate =
    StaticTemplate(include_str!("../../assets/mostvisited.html"));

impl TemplateSource for StaticTemplate {
    fn load(&self) -> io::Result<String> {
        Ok(self.0.to_string())
    }
}

/// Fold ranked entries into one markup fragment.
///
/// Empty input produces exactly [`EMPTY_PLACEHOLDER`]; otherwise one
/// `<p><a>` fragment per entry, with the icon inlined as a base64 PNG
/// data URI when present.
pub fn entries_markup(entries: &[RankedEntry]) -> String {
    if entries.is_empty() {
        return EMPTY_PLACEHOLDER.to_string();
    }

    let mut markup = String::new();
    for entry in entries {
        match &entry.icon {
            Some(bytes) => {
                let encoded = BASE64_STANDARD.encode(bytes);
                markup.push_str(&format!(
                    "<p><a href=\"{}\"><img src=\"data:image/png;base64,{}\"/>{}</a></p>",
                    entry.site, encoded, entry.label
                ));
            }
            None => {
                markup.push_str(&format!(
                    "<p><a href=\"{}\">{}</a></p>",
                    entry.site, entry.label
                ));
            }
        }
    }
    markup
}

/// Materialize the full page: substitute the fragment into the template.
///
/// Returns an empty payload if the template cannot be loaded.
pub fn page(template: &impl TemplateSource, fragment: &str) -> Vec<u8> {
    let html = match template.load() {
        Ok(html) => html,
        Err(err) => {
            tracing::warn!(error = %err, "page template unavailable, rendering empty payload");
            return Vec::new();
        }
    };

    html.replace(TEMPLATE_SLOT, fragment).into_bytes()
}

/// Select, format, and materialize in one pass
pub fn render(
    index: &mut SiteIndex,
    log: &impl HistoryLog,
    icons: &impl IconProvider,
    template: &impl TemplateSource,
    count: i64,
) -> Vec<u8> {
    let entries = top_entries(index, log, icons, count);
    let fragment = entries_markup(&entries);
    page(template, &fragment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::{MemoryLog, VisitEntry};
    use crate::rank::NoIcons;
    use chrono::Utc;
    use std::io::Write;

    fn ranked(site: &str, label: &str, frecency: u32, icon: Option<Vec<u8>>) -> RankedEntry {
        RankedEntry {
            site: site.to_string(),
            last_visited: Utc::now(),
            label: label.to_string(),
            frecency,
            icon,
        }
    }

    #[test]
    fn test_empty_entries_give_placeholder() {
        assert_eq!(entries_markup(&[]), EMPTY_PLACEHOLDER);
    }

    #[test]
    fn test_fragment_per_entry() {
        let entries = vec![
            ranked("http://twitter.com", "twitter.com", 300, None),
            ranked("http://facebook.com", "facebook.com", 200, Some(vec![1, 2, 3])),
        ];

        let markup = entries_markup(&entries);

        assert!(markup.starts_with("<p><a href=\"http://twitter.com\">twitter.com</a></p>"));
        assert!(markup.contains("data:image/png;base64,AQID"));
        assert!(markup.contains(">facebook.com</a>"));
        assert_eq!(markup.matches("<p>").count(), 2);
    }

    #[test]
    fn test_page_substitutes_slot() {
        let template = StaticTemplate("<html><body>%ENTRIES%</body></html>");
        let payload = page(&template, "<p>hi</p>");

        assert_eq!(payload, b"<html><body><p>hi</p></body></html>");
    }

    #[test]
    fn test_missing_template_soft_fails_empty() {
        let template = FileTemplate::new("/definitely/not/there.html");
        assert!(page(&template, "<p>hi</p>").is_empty());
    }

    #[test]
    fn test_file_template_round_trip() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "<main>%ENTRIES%</main>").unwrap();

        let template = FileTemplate::new(file.path());
        let payload = page(&template, EMPTY_PLACEHOLDER);

        assert_eq!(
            String::from_utf8(payload).unwrap(),
            "<main><p>No recent websites</p></main>"
        );
    }

    #[test]
    fn test_render_empty_log_embeds_placeholder() {
        let log = MemoryLog::new();
        let mut index = SiteIndex::new();
        let template = StaticTemplate("<body>%ENTRIES%</body>");

        for count in [0, 5, 15, -1] {
            let payload = render(&mut index, &log, &NoIcons, &template, count);
            assert_eq!(payload, b"<body><p>No recent websites</p></body>");
        }
    }

    #[test]
    fn test_render_full_pipeline() {
        let mut log = MemoryLog::new();
        log.record(VisitEntry::new("http://twitter.com/xyz"));
        let mut index = SiteIndex::new();

        let payload = render(&mut index, &log, &NoIcons, &DEFAULT_TEMPLATE, 8);
        let html = String::from_utf8(payload).unwrap();

        assert!(html.contains("<a href=\"http://twitter.com\">twitter.com</a>"));
        assert!(!html.contains(TEMPLATE_SLOT));
    }
}
