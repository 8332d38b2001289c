//! Record extractors
//!
//! One module per Lodestone page type. Each extractor is a pure function from
//! HTML text to a record and keeps its page layout (class names, block order)
//! in a local `layout` table, so a site redesign is a table edit.
//!
//! Failure policy:
//! - a missing required block fails the whole page with [`ExtractError`]
//! - a missing optional section becomes `None`
//! - a malformed row in a repeated list is logged and skipped
//!
//! [`ExtractError`]: crate::ExtractError

mod character;
mod free_company;
mod roster;
mod search;

pub use character::parse_character;
pub use free_company::parse_free_company;
pub use roster::parse_free_company_members;
pub use search::search_character;

use scraper::{ElementRef, Selector};

use crate::locate::locate;
use crate::ExtractError;

/// Locates a block every page of this kind must have
fn require<'a>(
    scope: ElementRef<'a>,
    selector: &Selector,
    page: &'static str,
    what: &'static str,
) -> Result<ElementRef<'a>, ExtractError> {
    locate(scope, selector).ok_or(ExtractError::MissingElement { page, what })
}

/// Trimmed text of a required element
fn require_text(
    scope: ElementRef<'_>,
    selector: &Selector,
    page: &'static str,
    what: &'static str,
) -> Result<String, ExtractError> {
    require(scope, selector, page, what).map(|el| el.text().collect::<String>().trim().to_string())
}
