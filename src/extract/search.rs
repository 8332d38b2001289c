//! Character search results

use scraper::Html;

use crate::locate::{attr, locate, locate_all};
use crate::normalize::{first_digits, text};

mod layout {
    pub const ENTRY_LINK: &str = "a.entry__link";
    pub const ENTRY_NAME: &str = "p.entry__name";
}

/// Finds the Lodestone ID of `character_name` in a search results page
///
/// Names are compared case-insensitively and must match exactly. The first
/// matching entry wins. Returns `None` when no entry matches; turning that
/// into an error is up to the caller.
pub fn search_character(html: &str, character_name: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let wanted = character_name.to_lowercase();

    let entry = locate_all(document.root_element(), selector!(layout::ENTRY_LINK))
        .into_iter()
        .find(|entry| {
            text(locate(*entry, selector!(layout::ENTRY_NAME)))
                .is_some_and(|name| name.to_lowercase() == wanted)
        })?;

    attr(entry, "href").and_then(first_digits)
}
