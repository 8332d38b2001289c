//! Records produced by the extractors
//!
//! Records are built fresh from one document and handed to the caller; they
//! carry no references back into the page. Optional sections are `Option`s,
//! so every field is always present when serialized (as `null` if absent),
//! with the single exception of [`FreeCompanyRecord::ranking`].

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use crate::normalize::{Gender, Nameday};

/// A character profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharacterRecord {
    pub name: String,
    pub server: String,
    pub title: Option<String>,

    pub race: String,
    pub clan: String,
    pub gender: Gender,

    pub avatar_url: String,
    pub portrait_url: String,

    pub nameday: Nameday,
    pub guardian: String,

    pub citystate: String,

    /// `[company, rank]`
    pub grand_company: Option<(String, String)>,
    pub free_company: Option<FreeCompanyLink>,

    /// Class or job name to level; level 0 means not yet leveled
    pub classes: BTreeMap<String, ClassLevel>,

    /// Lowercase stat label to value; always holds `hp`, `mp`, `cp` and `tp`
    pub stats: BTreeMap<String, u64>,

    /// Class inferred from the equipped weapon's category
    pub current_class: String,

    /// Job granted by an equipped soul crystal
    pub current_job: Option<String>,
}

/// The free company a character belongs to, as shown on the character page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeCompanyLink {
    pub id: String,
    pub name: String,
    pub crest: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassLevel {
    pub level: u32,
}

/// A free company profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeCompanyRecord {
    pub name: String,
    pub server: String,
    pub grand_company: String,
    pub slogan: String,
    pub tag: String,

    /// Unix timestamp of the formation date, as displayed
    pub formed: Option<String>,

    pub crest: Vec<String>,
    pub active_members: String,
    pub rank: String,
    pub estate: Option<Estate>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ranking: Option<Ranking>,
}

impl FreeCompanyRecord {
    /// The formation date, when `formed` holds a Unix timestamp
    pub fn formed_at(&self) -> Option<DateTime<Utc>> {
        let seconds = self.formed.as_deref()?.parse::<i64>().ok()?;
        DateTime::from_timestamp(seconds, 0)
    }
}

/// A free company's private estate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Estate {
    pub name: String,
    pub address: String,
    /// Empty when the estate shows no greeting
    pub greeting: String,
}

/// Weekly and monthly ranking positions, as displayed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ranking {
    pub week: String,
    pub month: String,
}

/// One entry of a free company member list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMember {
    pub name: String,
    pub lodestone_id: String,
    pub rank: String,
    pub leader: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn free_company(formed: Option<&str>) -> FreeCompanyRecord {
        FreeCompanyRecord {
            name: "Test Company".to_string(),
            server: "Cerberus".to_string(),
            grand_company: "Maelstrom".to_string(),
            slogan: String::new(),
            tag: "«TEST»".to_string(),
            formed: formed.map(str::to_string),
            crest: vec![],
            active_members: "12".to_string(),
            rank: "8".to_string(),
            estate: None,
            ranking: None,
        }
    }

    #[test]
    fn test_formed_at() {
        let record = free_company(Some("1378829297"));
        let formed = record.formed_at().unwrap();
        assert_eq!(formed.timestamp(), 1378829297);
        assert_eq!(formed.format("%Y-%m-%d").to_string(), "2013-09-10");
    }

    #[test]
    fn test_formed_at_not_a_timestamp() {
        assert!(free_company(None).formed_at().is_none());
        assert!(free_company(Some("soon")).formed_at().is_none());
    }

    #[test]
    fn test_ranking_omitted_when_absent() {
        let json = serde_json::to_value(free_company(None)).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("ranking"));
        assert!(object.contains_key("estate"));
        assert!(object["estate"].is_null());
        assert!(object["formed"].is_null());
    }

    #[test]
    fn test_gender_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Gender::Male).unwrap(), "\"male\"");
        assert_eq!(serde_json::to_string(&Gender::Female).unwrap(), "\"female\"");
    }
}
