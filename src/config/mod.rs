//! Configuration module for Lodestone-Scrape
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key has a default, so a missing file section is never an error.
//!
//! # Example
//!
//! ```no_run
//! use lodestone_scrape::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lodestone.toml")).unwrap();
//! println!("Fetching from: {}", config.lodestone.base_url());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, HttpConfig, LodestoneConfig, Region, UserAgentConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
