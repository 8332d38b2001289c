//! Free company member lists
//!
//! Only the page handed in is read. The Lodestone splits large rosters over
//! several pages and this extractor does not follow the pager, so companies
//! with more members than fit on one page come back truncated.

use scraper::{ElementRef, Html};

use crate::extract::require;
use crate::locate::{attr, locate, locate_all, parent_element};
use crate::model::RosterMember;
use crate::normalize::{first_digits, text};
use crate::ExtractResult;

const PAGE: &str = "member list";

mod layout {
    pub const WINDOW: &str = "div.ldst__window";
    pub const MEMBER_LINK: &str = "ul:not([class]) > li > a";
    pub const MEMBER_NAME: &str = "p.entry__name";
    pub const MEMBER_RANK: &str = "ul.entry__freecompany__info span";
}

/// Extracts the members listed on one page of a free company roster
///
/// Members keep document order. Entries without a name or ID are skipped
/// with a warning; the first member returned is the company leader. On any
/// page but the first this flag is meaningless.
pub fn parse_free_company_members(html: &str) -> ExtractResult<Vec<RosterMember>> {
    let document = Html::parse_document(html);
    let window = require(
        document.root_element(),
        selector!(layout::WINDOW),
        PAGE,
        "main window",
    )?;

    let members = member_links(window)
        .into_iter()
        .filter_map(parse_member)
        .enumerate()
        .map(|(index, member)| RosterMember {
            leader: index == 0,
            ..member
        })
        .collect();

    Ok(members)
}

/// Entry links from the unclassed lists sitting directly in the window
fn member_links(window: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    locate_all(window, selector!(layout::MEMBER_LINK))
        .into_iter()
        .filter(|link| {
            parent_element(*link)
                .and_then(parent_element)
                .and_then(parent_element)
                .is_some_and(|list_parent| list_parent.id() == window.id())
        })
        .collect()
}

fn parse_member(link: ElementRef<'_>) -> Option<RosterMember> {
    let name = text(locate(link, selector!(layout::MEMBER_NAME)));
    let lodestone_id = attr(link, "href").and_then(first_digits);

    let (Some(name), Some(lodestone_id)) = (name, lodestone_id) else {
        tracing::warn!("Skipping roster entry: {}", link.html());
        return None;
    };

    Some(RosterMember {
        name,
        lodestone_id,
        rank: text(locate(link, selector!(layout::MEMBER_RANK))).unwrap_or_default(),
        leader: false,
    })
}
