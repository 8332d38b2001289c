//! Free company profile pages

use scraper::{ElementRef, Html};

use crate::extract::{require, require_text};
use crate::locate::{attr, locate, locate_all, multiline_text, nth_child_element, value_after_label};
use crate::model::{Estate, FreeCompanyRecord, Ranking};
use crate::normalize::{first_digits, text};
use crate::{ExtractError, ExtractResult};

const PAGE: &str = "free company";

mod layout {
    pub const WINDOW: &str = "div.ldst__window";

    pub const ENTRY: &str = "a.entry__freecompany";
    pub const ENTRY_NAME: &str = "p.entry__freecompany__name";
    /// Grand company first, then server
    pub const ENTRY_GC: &str = "p.entry__freecompany__gc";
    pub const ENTRY_CREST_IMG: &str = "div.entry__freecompany__crest__image > img";

    pub const TAG: &str = "p.freecompany__text.freecompany__text__tag";
    pub const SLOGAN: &str = "p.freecompany__text.freecompany__text__message";

    pub const HEADING: &str = "h3.heading--lead";
    pub const FORMED: &str = "Formed";
    pub const ACTIVE_MEMBERS: &str = "Active Members";
    pub const RANK: &str = "Rank";
    /// Index of the script holding the timestamp inside the "Formed" value
    pub const FORMED_SCRIPT_INDEX: usize = 1;
    pub const FORMED_TIMESTAMP: &str = r"ldst_strftime\((\d+),";

    pub const ESTATE_NAME: &str = "p.freecompany__estate__name";
    pub const ESTATE_ADDRESS: &str = "p.freecompany__estate__text";
    pub const ESTATE_GREETING: &str = "p.freecompany__estate__greeting";
    pub const NO_GREETING: &str = "No greeting available.";

    pub const RANKING_CELL: &str = "table.character__ranking__data.parts__space--reset th";
}

/// Extracts a free company record from a free company profile page
///
/// The estate is `None` when the company has none. The ranking is best
/// effort: if its table is missing or does not hold exactly a weekly and a
/// monthly position, the ranking is left out and the rest of the record is
/// still returned.
pub fn parse_free_company(html: &str) -> ExtractResult<FreeCompanyRecord> {
    let document = Html::parse_document(html);
    let window = require(
        document.root_element(),
        selector!(layout::WINDOW),
        PAGE,
        "main window",
    )?;

    let entry = require(window, selector!(layout::ENTRY), PAGE, "company header")?;
    let name = require_text(entry, selector!(layout::ENTRY_NAME), PAGE, "name")?;

    let gc_and_server: Vec<String> = locate_all(entry, selector!(layout::ENTRY_GC))
        .into_iter()
        .map(|p| p.text().collect::<String>().trim().to_string())
        .collect();
    let [grand_company, server] = <[String; 2]>::try_from(gc_and_server).map_err(|found| {
        ExtractError::Malformed {
            page: PAGE,
            what: "grand company and server",
            value: found.join(" | "),
        }
    })?;

    let crest = locate_all(entry, selector!(layout::ENTRY_CREST_IMG))
        .into_iter()
        .filter_map(|img| attr(img, "src").map(str::to_string))
        .collect();

    let tag = require_text(window, selector!(layout::TAG), PAGE, "tag")?;
    let slogan = require(window, selector!(layout::SLOGAN), PAGE, "slogan")
        .map(|p| multiline_text(p).trim().to_string())?;

    let formed = parse_formed(window);

    let active_members = text(value_after_label(
        window,
        selector!(layout::HEADING),
        layout::ACTIVE_MEMBERS,
    ))
    .ok_or(ExtractError::MissingElement {
        page: PAGE,
        what: "active members",
    })?;
    let rank = text(value_after_label(window, selector!(layout::HEADING), layout::RANK)).ok_or(
        ExtractError::MissingElement {
            page: PAGE,
            what: "rank",
        },
    )?;

    let estate = parse_estate(window);

    let ranking = match parse_ranking(window) {
        Ok(ranking) => Some(ranking),
        Err(reason) => {
            tracing::debug!("Leaving out ranking for {}: {}", name, reason);
            None
        }
    };

    Ok(FreeCompanyRecord {
        name,
        server,
        grand_company,
        slogan,
        tag,
        formed,
        crest,
        active_members,
        rank,
        estate,
        ranking,
    })
}

/// Reads the formation timestamp out of the `ldst_strftime(...)` call in the "Formed" value
fn parse_formed(window: ElementRef<'_>) -> Option<String> {
    let value = value_after_label(window, selector!(layout::HEADING), layout::FORMED)?;
    let formed = text(nth_child_element(value, layout::FORMED_SCRIPT_INDEX))?;
    if formed.is_empty() {
        return None;
    }

    match regex!(layout::FORMED_TIMESTAMP).captures(&formed) {
        Some(captures) => Some(captures[1].to_string()),
        None => Some(formed),
    }
}

fn parse_estate(window: ElementRef<'_>) -> Option<Estate> {
    let Some(name) = text(locate(window, selector!(layout::ESTATE_NAME))) else {
        tracing::debug!("No estate block");
        return None;
    };

    let greeting = locate(window, selector!(layout::ESTATE_GREETING))
        .map(|p| multiline_text(p).trim().to_string())
        .unwrap_or_default();

    Some(Estate {
        name,
        address: text(locate(window, selector!(layout::ESTATE_ADDRESS))).unwrap_or_default(),
        greeting: if greeting == layout::NO_GREETING {
            String::new()
        } else {
            greeting
        },
    })
}

/// Anything short of exactly two numeric ranking cells is reported as an error string
fn parse_ranking(window: ElementRef<'_>) -> Result<Ranking, String> {
    let cells = locate_all(window, selector!(layout::RANKING_CELL));
    let [week, month] = cells.as_slice() else {
        return Err(format!("expected 2 ranking cells, found {}", cells.len()));
    };

    let position = |cell: &ElementRef<'_>| {
        let value = cell.text().collect::<String>();
        first_digits(&value).ok_or_else(|| format!("no position in {:?}", value.trim()))
    };

    Ok(Ranking {
        week: position(week)?,
        month: position(month)?,
    })
}
