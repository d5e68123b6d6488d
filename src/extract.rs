//! Record extraction from the fetched document.
//!
//! The watched page is a release table; the record is the first table row
//! whose text contains the search token. The substring scan is kept behind
//! a trait so a structured parser could replace it without touching callers.

use scraper::{ElementRef, Html, Selector};

/// Extracts the watched record from a raw document.
pub trait RecordExtractor {
    /// Text of the first matching record, or an empty string when nothing
    /// matches or the document is empty/malformed.
    fn extract(&self, document: &str, search_token: &str) -> String;
}

/// Scans `<tr>` elements in document order and matches on a case-sensitive
/// substring of the row text.
#[derive(Debug, Clone, Default)]
pub struct TableRowExtractor;

impl RecordExtractor for TableRowExtractor {
    fn extract(&self, document: &str, search_token: &str) -> String {
        if document.is_empty() {
            return String::new();
        }

        let html = Html::parse_document(document);
        let (Ok(rows), Ok(cells)) = (Selector::parse("tr"), Selector::parse("th, td")) else {
            return String::new();
        };

        for row in html.select(&rows) {
            let text = row_text(&row, &cells);
            if text.contains(search_token) {
                return text;
            }
        }
        String::new()
    }
}

/// Row text with one line per cell. On the watched release table line 0 is
/// the version label and line 2 the release date; that layout is an assumed
/// convention of the source page, not a verified schema.
fn row_text(row: &ElementRef<'_>, cells: &Selector) -> String {
    let mut lines = Vec::new();
    for cell in row.select(cells) {
        let text = cell.text().collect::<Vec<_>>().join(" ");
        lines.push(text.split_whitespace().collect::<Vec<_>>().join(" "));
    }
    lines.join("\n")
}
