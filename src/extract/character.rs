//! Character profile pages

use std::collections::BTreeMap;

use scraper::{ElementRef, Html};

use crate::extract::{require, require_text};
use crate::locate::{
    attr, child_elements, locate, locate_all, locate_labeled, nth_child_element, own_text,
    parent_element, tail_text,
};
use crate::model::{CharacterRecord, ClassLevel, FreeCompanyLink, Gender};
use crate::normalize::{
    decode_gender, decode_nameday, first_digits, first_int, soul_crystal_job, strip_query, text,
    weapon_category,
};
use crate::{ExtractError, ExtractResult};

const PAGE: &str = "character";

mod layout {
    pub const FRAME_LINK: &str = "a.frame__chara__link";
    pub const FRAME_NAME: &str = "p.frame__chara__name";
    pub const FRAME_WORLD: &str = "p.frame__chara__world";
    pub const FRAME_TITLE: &str = "p.frame__chara__title";
    pub const FRAME_FACE_IMG: &str = "div.frame__chara__face > img";

    pub const PROFILE_BLOCK: &str = "div.character__profile__data__detail > div.character-block";
    pub const BLOCK_NAME: &str = "p.character-block__name";
    pub const BLOCK_BIRTH: &str = "p.character-block__birth";

    /// Position of each section among the profile blocks
    pub const RACE_BLOCK: usize = 0;
    pub const NAMEDAY_BLOCK: usize = 1;
    pub const CITYSTATE_BLOCK: usize = 2;
    pub const GRAND_COMPANY_BLOCK: usize = 3;
    pub const FREE_COMPANY_BLOCK: usize = 4;

    pub const FC_LINK: &str = "div.character__freecompany__name a";
    pub const FC_CREST_IMG: &str = "div.character__freecompany__crest__image > img";

    pub const JOB_ROLE: &str = "div.character__job__role";
    pub const JOB_ENTRY: &str = "ul.character__job.clearfix > li";
    pub const JOB_NAME: &str = "div[class*='character__job__name']";
    pub const JOB_LEVEL: &str = "div.character__job__level";
    pub const NOT_LEVELED: &str = "-";

    pub const BASE_STATS: [&str; 4] = ["hp", "mp", "cp", "tp"];
    pub const MAIN_PARAMS: &str = "div.character__param";
    pub const MAIN_PARAM_ROW: &str = "div";
    pub const PARAM_LIST_ROW: &str = "div.character__profile__data table.character__param__list tr";

    pub const AVATAR_LINK: &str = "div.character__detail__image > a";

    pub const ARMS_CATEGORY: &str = "div.character__class__arms p.db-tooltip__item__category";
    pub const GEAR_CATEGORY: &str = "div.character__detail__icon p.db-tooltip__item__category";
    pub const SOUL_CRYSTAL: &str = "Soul Crystal";
    /// Index of the item name among the children of a gear tooltip
    pub const GEAR_NAME_INDEX: usize = 1;
}

/// Extracts a full character record from a character profile page
///
/// Title, grand company, free company and current job are optional and come
/// back as `None` when the page does not show them. Class rows and stat rows
/// that cannot be read are skipped with a warning. Anything else missing means
/// this is not a character page, and an [`ExtractError`] is returned.
///
/// # Example
///
/// ```no_run
/// use lodestone_scrape::parse_character;
///
/// let html = std::fs::read_to_string("character.html").unwrap();
/// let character = parse_character(&html).unwrap();
/// println!("{} @ {}", character.name, character.server);
/// ```
pub fn parse_character(html: &str) -> ExtractResult<CharacterRecord> {
    let document = Html::parse_document(html);
    let root = document.root_element();

    // Name, server, title
    let frame = require(root, selector!(layout::FRAME_LINK), PAGE, "character frame")?;
    let name = require_text(frame, selector!(layout::FRAME_NAME), PAGE, "name")?;
    let server = require_text(frame, selector!(layout::FRAME_WORLD), PAGE, "server")?;
    let title = text(locate(frame, selector!(layout::FRAME_TITLE)));
    let portrait_url = require(frame, selector!(layout::FRAME_FACE_IMG), PAGE, "portrait")
        .and_then(|img| required_attr(img, "src", "portrait"))
        .map(|url| strip_query(&url))?;

    let blocks = locate_all(root, selector!(layout::PROFILE_BLOCK));
    let block = |index: usize| blocks.get(index).copied();

    // Race, clan, gender
    let race_element = block(layout::RACE_BLOCK)
        .and_then(|b| locate(b, selector!(layout::BLOCK_NAME)))
        .ok_or(ExtractError::MissingElement {
            page: PAGE,
            what: "race",
        })?;
    let (race, clan, gender) = decode_race(race_element)?;

    // Nameday, guardian
    let nameday_block = block(layout::NAMEDAY_BLOCK).ok_or(ExtractError::MissingElement {
        page: PAGE,
        what: "nameday block",
    })?;
    let nameday_text = require_text(nameday_block, selector!(layout::BLOCK_BIRTH), PAGE, "nameday")?;
    let nameday = decode_nameday(&nameday_text).ok_or_else(|| ExtractError::Malformed {
        page: PAGE,
        what: "nameday",
        value: nameday_text.clone(),
    })?;
    let guardian = require_text(nameday_block, selector!(layout::BLOCK_NAME), PAGE, "guardian")?;

    // City-state
    let citystate = text(
        block(layout::CITYSTATE_BLOCK).and_then(|b| locate(b, selector!(layout::BLOCK_NAME))),
    )
    .ok_or(ExtractError::MissingElement {
        page: PAGE,
        what: "city-state",
    })?;

    let grand_company = block(layout::GRAND_COMPANY_BLOCK).and_then(parse_grand_company);
    let free_company = block(layout::FREE_COMPANY_BLOCK).and_then(parse_free_company_link);

    let classes = parse_classes(root);
    let stats = parse_stats(root);

    let avatar_url = require(root, selector!(layout::AVATAR_LINK), PAGE, "avatar")
        .and_then(|a| required_attr(a, "href", "avatar"))
        .map(|url| strip_query(&url))?;

    // Equipment
    let current_class = require_text(root, selector!(layout::ARMS_CATEGORY), PAGE, "weapon")
        .map(|category| weapon_category(&category))?;
    let current_job = parse_current_job(root);

    Ok(CharacterRecord {
        name,
        server,
        title,
        race,
        clan,
        gender,
        avatar_url,
        portrait_url,
        nameday,
        guardian,
        citystate,
        grand_company,
        free_company,
        classes,
        stats,
        current_class,
        current_job,
    })
}

fn required_attr(element: ElementRef<'_>, name: &str, what: &'static str) -> ExtractResult<String> {
    attr(element, name)
        .map(str::to_string)
        .ok_or(ExtractError::MissingElement { page: PAGE, what })
}

/// `<p>Hyur<br>Midlander / ♂</p>` reads as race, then clan and gender after the break
fn decode_race(element: ElementRef<'_>) -> ExtractResult<(String, String, Gender)> {
    let race = own_text(element).trim().to_string();
    let tail = nth_child_element(element, 0)
        .map(tail_text)
        .unwrap_or_default();

    let (clan, gender) = tail.split_once('/').ok_or_else(|| ExtractError::Malformed {
        page: PAGE,
        what: "clan and gender",
        value: tail.clone(),
    })?;

    Ok((race, clan.trim().to_string(), decode_gender(gender)))
}

fn parse_grand_company(block: ElementRef<'_>) -> Option<(String, String)> {
    let value = text(locate(block, selector!(layout::BLOCK_NAME)))?;
    let Some((company, rank)) = value.split_once('/') else {
        tracing::debug!("Grand company block without rank: {:?}", value);
        return None;
    };
    Some((company.trim().to_string(), rank.trim().to_string()))
}

fn parse_free_company_link(block: ElementRef<'_>) -> Option<FreeCompanyLink> {
    let link = locate(block, selector!(layout::FC_LINK))?;
    let id = attr(link, "href").and_then(first_digits)?;
    let crest = locate_all(block, selector!(layout::FC_CREST_IMG))
        .into_iter()
        .filter_map(|img| attr(img, "src").map(str::to_string))
        .collect();

    Some(FreeCompanyLink {
        id,
        name: link.text().collect::<String>().trim().to_string(),
        crest,
    })
}

fn parse_classes(root: ElementRef<'_>) -> BTreeMap<String, ClassLevel> {
    let mut classes = BTreeMap::new();

    let entries = locate_all(root, selector!(layout::JOB_ROLE))
        .into_iter()
        .flat_map(|role| locate_all(role, selector!(layout::JOB_ENTRY)));

    for entry in entries {
        let Some(name) = text(locate(entry, selector!(layout::JOB_NAME))) else {
            tracing::warn!("Skipping class entry without a name: {}", entry.html());
            continue;
        };
        if name.is_empty() {
            continue;
        }

        match parse_level(text(locate(entry, selector!(layout::JOB_LEVEL))).as_deref()) {
            Some(level) => {
                classes.insert(name, ClassLevel { level });
            }
            None => tracing::warn!("Skipping class entry for {}: {}", name, entry.html()),
        }
    }

    classes
}

fn parse_level(level: Option<&str>) -> Option<u32> {
    match level? {
        layout::NOT_LEVELED => Some(0),
        level => level.parse().ok(),
    }
}

fn parse_stats(root: ElementRef<'_>) -> BTreeMap<String, u64> {
    let mut stats: BTreeMap<String, u64> = layout::BASE_STATS
        .iter()
        .map(|stat| (stat.to_string(), 0))
        .collect();

    match locate(root, selector!(layout::MAIN_PARAMS)) {
        Some(main_params) => {
            for row in locate_all(main_params, selector!(layout::MAIN_PARAM_ROW)) {
                let cells: Vec<_> = child_elements(row).collect();
                match cells.as_slice() {
                    [label, value] => insert_stat(&mut stats, Some(*label), *value),
                    _ => tracing::warn!("Skipping main parameter row: {}", row.html()),
                }
            }
        }
        None => tracing::debug!("No main parameter block"),
    }

    for row in locate_all(root, selector!(layout::PARAM_LIST_ROW)) {
        let cells: Vec<_> = child_elements(row).collect();
        match cells.as_slice() {
            [label_cell, value, ..] => {
                insert_stat(&mut stats, nth_child_element(*label_cell, 0), *value)
            }
            _ => tracing::warn!("Skipping parameter row: {}", row.html()),
        }
    }

    stats
}

fn insert_stat(stats: &mut BTreeMap<String, u64>, label: Option<ElementRef<'_>>, value: ElementRef<'_>) {
    let label = text(label).filter(|label| !label.is_empty());
    let value = text(Some(value)).as_deref().and_then(first_int);

    match (label, value) {
        (Some(label), Some(value)) => {
            stats.insert(label.to_lowercase(), value);
        }
        (label, _) => tracing::warn!("Skipping unreadable stat {:?}", label),
    }
}

fn parse_current_job(root: ElementRef<'_>) -> Option<String> {
    let category = locate_labeled(root, selector!(layout::GEAR_CATEGORY), layout::SOUL_CRYSTAL)?;
    let item_name = parent_element(category)
        .and_then(|tooltip| nth_child_element(tooltip, layout::GEAR_NAME_INDEX));
    text(item_name).map(|name| soul_crystal_job(&name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::Nameday;

    const CHARACTER_HTML: &str = include_str!("../../tests/fixtures/character.html");

    #[test]
    fn test_frame_fields() {
        let character = parse_character(CHARACTER_HTML).unwrap();
        assert_eq!(character.name, "Alice Example");
        assert_eq!(character.server, "Cerberus (Chaos)");
        assert_eq!(character.title.as_deref(), Some("Warrior of Light"));
        assert_eq!(
            character.portrait_url,
            "https://img2.finalfantasyxiv.com/f/0123abcd_96x96.jpg"
        );
        assert_eq!(
            character.avatar_url,
            "https://img2.finalfantasyxiv.com/f/0123abcd_fl0.jpg"
        );
    }

    #[test]
    fn test_profile_blocks() {
        let character = parse_character(CHARACTER_HTML).unwrap();
        assert_eq!(character.race, "Hyur");
        assert_eq!(character.clan, "Midlander");
        assert_eq!(character.gender, Gender::Male);
        assert_eq!(character.nameday, Nameday { sun: 5, moon: 6 });
        assert_eq!(character.guardian, "Halone, the Fury");
        assert_eq!(character.citystate, "Limsa Lominsa");
        assert_eq!(
            character.grand_company,
            Some(("Maelstrom".to_string(), "Second Storm Lieutenant".to_string()))
        );

        let free_company = character.free_company.unwrap();
        assert_eq!(free_company.id, "9233645873504776755");
        assert_eq!(free_company.name, "Test Company");
        assert_eq!(free_company.crest.len(), 3);
        assert_eq!(free_company.crest[0], "https://img.finalfantasyxiv.com/crest/base.png");
    }

    #[test]
    fn test_classes() {
        let character = parse_character(CHARACTER_HTML).unwrap();
        assert_eq!(character.classes["Paladin"], ClassLevel { level: 80 });
        assert_eq!(character.classes["Warrior"], ClassLevel { level: 0 });
        assert_eq!(character.classes["White Mage"], ClassLevel { level: 72 });
        // Malformed level row is dropped, the empty placeholder slot is ignored.
        assert!(!character.classes.contains_key("Dark Knight"));
        assert!(!character.classes.contains_key(""));
        assert_eq!(character.classes.len(), 3);
    }

    #[test]
    fn test_stats() {
        let character = parse_character(CHARACTER_HTML).unwrap();
        assert_eq!(character.stats["hp"], 45678);
        assert_eq!(character.stats["mp"], 10000);
        assert_eq!(character.stats["cp"], 0);
        assert_eq!(character.stats["tp"], 0);
        assert_eq!(character.stats["strength"], 3012);
        assert_eq!(character.stats["critical hit"], 2100);
    }

    #[test]
    fn test_equipment() {
        let character = parse_character(CHARACTER_HTML).unwrap();
        assert_eq!(character.current_class, "Gladiator");
        assert_eq!(character.current_job.as_deref(), Some("Paladin"));
    }

    #[test]
    fn test_optional_sections_absent() {
        let html = CHARACTER_HTML
            .replace(r#"<p class="frame__chara__title">Warrior of Light</p>"#, "")
            .replace("Soul Crystal", "Ring");
        let html = strip_between(&html, "<!-- grand company -->", "<!-- end free company -->");

        let character = parse_character(&html).unwrap();
        assert_eq!(character.title, None);
        assert_eq!(character.grand_company, None);
        assert_eq!(character.free_company, None);
        assert_eq!(character.current_job, None);
        assert_eq!(character.name, "Alice Example");
    }

    #[test]
    fn test_every_field_serialized() {
        let html = CHARACTER_HTML.replace(r#"<p class="frame__chara__title">Warrior of Light</p>"#, "");
        let character = parse_character(&html).unwrap();
        let json = serde_json::to_value(&character).unwrap();
        let object = json.as_object().unwrap();

        for key in [
            "name", "server", "title", "race", "clan", "gender", "avatar_url", "portrait_url",
            "nameday", "guardian", "citystate", "grand_company", "free_company", "classes",
            "stats", "current_class", "current_job",
        ] {
            assert!(object.contains_key(key), "missing key {}", key);
        }
        assert!(object["title"].is_null());
        assert_eq!(object["gender"], "male");
        assert_eq!(object["grand_company"][0], "Maelstrom");
    }

    #[test]
    fn test_idempotent() {
        let first = serde_json::to_string(&parse_character(CHARACTER_HTML).unwrap()).unwrap();
        let second = serde_json::to_string(&parse_character(CHARACTER_HTML).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_not_a_character_page() {
        let err = parse_character("<html><body><p>Maintenance</p></body></html>").unwrap_err();
        assert!(matches!(
            err,
            ExtractError::MissingElement {
                what: "character frame",
                ..
            }
        ));
    }

    #[test]
    fn test_parse_level() {
        assert_eq!(parse_level(Some("-")), Some(0));
        assert_eq!(parse_level(Some("90")), Some(90));
        assert_eq!(parse_level(Some("??")), None);
        assert_eq!(parse_level(None), None);
    }

    fn strip_between(html: &str, start: &str, end: &str) -> String {
        let from = html.find(start).unwrap();
        let to = html.find(end).unwrap() + end.len();
        format!("{}{}", &html[..from], &html[to..])
    }
}
