//! Lodestone-Scrape: profile extraction for the FINAL FANTASY XIV Lodestone
//!
//! This crate turns Lodestone HTML pages into plain records: characters,
//! free companies and free company rosters. Extraction is pure and
//! synchronous; fetching is a thin async wrapper around it.

#[macro_use]
mod macros;

pub mod client;
pub mod config;
pub mod extract;
pub mod locate;
pub mod model;
pub mod normalize;

use thiserror::Error;

/// Main error type for Lodestone operations
#[derive(Debug, Error)]
pub enum LodestoneError {
    /// The search found no matching entry, or the page request was not a success.
    #[error("Not found")]
    NotFound,

    #[error("HTTP error for {url}: {source}")]
    Http { url: String, source: reqwest::Error },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("Extraction error: {0}")]
    Extract(#[from] ExtractError),

    #[error("Worker task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Raised when a page does not look like the layout an extractor expects
///
/// Only required blocks produce this; optional sections and individual rows
/// are absorbed by the extractors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractError {
    #[error("{page} page: missing {what}")]
    MissingElement {
        page: &'static str,
        what: &'static str,
    },

    #[error("{page} page: could not decode {what} from {value:?}")]
    Malformed {
        page: &'static str,
        what: &'static str,
        value: String,
    },
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Lodestone operations
pub type Result<T> = std::result::Result<T, LodestoneError>;

/// Result type alias for extractors
pub type ExtractResult<T> = std::result::Result<T, ExtractError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use client::{HttpClient, HttpResponse, Lodestone};
pub use config::Config;
pub use extract::{
    parse_character, parse_free_company, parse_free_company_members, search_character,
};
pub use model::{CharacterRecord, FreeCompanyRecord, RosterMember};
