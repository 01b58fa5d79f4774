pub mod links;
pub mod query;
pub mod table;

use scraper::ElementRef;

/// Text of an element with every text node trimmed and blank nodes dropped.
pub(crate) fn stripped_text(el: &ElementRef) -> String {
    el.text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect()
}
