//! Field normalizer
//!
//! Turns located elements and raw page text into typed values. None of these
//! functions know which page they are reading; the extractors supply that.

use scraper::ElementRef;
use serde::{Deserialize, Serialize};

/// Category text fragments removed to get a weapon category's display name
pub const ARM_AFFIXES: [&str; 5] = [
    "Two-handed ",
    "One-handed ",
    "'s Arm",
    "'s Primary Tool",
    "'s Grimoire",
];

/// Width of the "Soul of the " label in front of a soul crystal's job name
pub const SOUL_CRYSTAL_LABEL_WIDTH: usize = 12;

const MALE_SYMBOL: char = '\u{2642}';

/// Character gender as displayed on the profile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
}

/// A character's nameday on the Eorzean calendar
///
/// `moon` indexes the twelve half-moons: Astral halves are odd, Umbral halves even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Nameday {
    pub sun: u32,
    pub moon: u32,
}

/// Trimmed text content of an element, `None` if there is no element
pub fn text(element: Option<ElementRef<'_>>) -> Option<String> {
    element.map(|el| el.text().collect::<String>().trim().to_string())
}

/// Parses the first run of ASCII digits in `s`
pub fn first_int(s: &str) -> Option<u64> {
    regex!(r"\d+")
        .find(s)
        .and_then(|m| m.as_str().parse().ok())
}

/// The first run of ASCII digits in `s`, kept as text
///
/// Lodestone IDs are handed around as strings; some are wider than `u64`.
pub fn first_digits(s: &str) -> Option<String> {
    regex!(r"\d+").find(s).map(|m| m.as_str().to_string())
}

/// Parses every run of ASCII digits in `s`, in order
///
/// Runs too large for a `u64` are skipped.
pub fn all_ints(s: &str) -> Vec<u64> {
    regex!(r"\d+")
        .find_iter(s)
        .filter_map(|m| m.as_str().parse().ok())
        .collect()
}

/// Decodes gender from the text following the race name
///
/// The last non-whitespace character is compared against the male symbol;
/// anything else reads as female.
pub fn decode_gender(s: &str) -> Gender {
    match s.trim_end().chars().last() {
        Some(MALE_SYMBOL) => Gender::Male,
        _ => Gender::Female,
    }
}

/// Decodes a nameday line such as `"5th Sun of the 3rd Umbral Moon"`
///
/// The site names six moons, each with an Astral and an Umbral half. The
/// Astral half of moon `n` is index `2n - 1`, the Umbral half is `2n`.
/// Returns `None` when the text does not hold two numbers.
pub fn decode_nameday(s: &str) -> Option<Nameday> {
    let ints = all_ints(s);
    let (sun, moon) = match ints.as_slice() {
        [sun, moon, ..] => (*sun, *moon),
        _ => return None,
    };

    let offset = if s.contains("Umbral") { 0 } else { 1 };
    let moon = moon.checked_mul(2)?.checked_sub(offset)?;

    Some(Nameday {
        sun: u32::try_from(sun).ok()?,
        moon: u32::try_from(moon).ok()?,
    })
}

/// Strips the fixed category affixes from an equipped weapon's category text
///
/// `"Two-handed Sword"` becomes `"Sword"`, `"Paladin's Arm"` becomes `"Paladin"`.
pub fn weapon_category(s: &str) -> String {
    let mut name = s.to_string();
    for affix in ARM_AFFIXES {
        name = name.replace(affix, "");
    }
    name.trim().to_string()
}

/// Extracts the job name from a soul crystal's item name
pub fn soul_crystal_job(s: &str) -> String {
    s.trim().chars().skip(SOUL_CRYSTAL_LABEL_WIDTH).collect()
}

/// Drops the query string from an image URL
pub fn strip_query(url: &str) -> String {
    match url.rsplit_once('?') {
        Some((base, _)) => base.to_string(),
        None => url.to_string(),
    }
}

/// Title-cases every whitespace-separated word: `"cerberus"` becomes `"Cerberus"`
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
