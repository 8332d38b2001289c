//! Lodestone-Scrape main entry point
//!
//! Command-line access to the Lodestone lookups. Records are printed to
//! stdout as JSON; logs go to stderr.

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lodestone_scrape::client::CHARACTER_CATEGORY;
use lodestone_scrape::config::{load_config, Config};
use lodestone_scrape::{
    parse_character, parse_free_company, parse_free_company_members, search_character, Lodestone,
};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

/// Lodestone-Scrape: character and free company profiles from the Lodestone
#[derive(Parser, Debug)]
#[command(name = "lodestone-scrape")]
#[command(version)]
#[command(about = "Extracts FINAL FANTASY XIV Lodestone profiles as JSON", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Look up a Lodestone ID by name and server
    Find {
        server: String,
        name: String,
        /// Search category
        #[arg(long, default_value = CHARACTER_CATEGORY)]
        category: String,
    },

    /// Fetch a character profile
    Character { id: String },

    /// Fetch a free company profile
    FreeCompany { id: String },

    /// Fetch the first page of a free company's member list
    Members { id: String },

    /// Extract a record from a saved HTML page instead of fetching it
    Parse {
        #[arg(value_enum)]
        page: PageKind,
        file: PathBuf,
        /// Character name to look for (search pages only)
        #[arg(long, required_if_eq("page", "search"))]
        name: Option<String>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum PageKind {
    Search,
    Character,
    FreeCompany,
    Members,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration from {}", path.display()))?
        }
        None => Config::default(),
    };

    match cli.command {
        Command::Find {
            server,
            name,
            category,
        } => handle_find(&connect(&config)?, &category, &server, &name).await,
        Command::Character { id } => print_json(&connect(&config)?.character(&id).await?),
        Command::FreeCompany { id } => print_json(&connect(&config)?.free_company(&id).await?),
        Command::Members { id } => {
            let members = connect(&config)?.free_company_members(&id).await?;
            tracing::info!("{} members on the first roster page", members.len());
            print_json(&members)
        }
        Command::Parse { page, file, name } => handle_parse(page, &file, name.as_deref()),
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("lodestone_scrape=info,warn"),
            1 => EnvFilter::new("lodestone_scrape=debug,info"),
            2 => EnvFilter::new("lodestone_scrape=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Builds a Lodestone handle from the configuration
fn connect(config: &Config) -> anyhow::Result<Lodestone> {
    let lodestone = Lodestone::from_config(config)?;
    tracing::debug!("Using Lodestone at {}", lodestone.base_url());
    Ok(lodestone)
}

/// Handles `find`: searches by name and prints the matching ID
async fn handle_find(
    lodestone: &Lodestone,
    category: &str,
    server: &str,
    name: &str,
) -> anyhow::Result<()> {
    let id = lodestone
        .find_character_id(category, server, name)
        .await
        .with_context(|| format!("No {} named {:?} on {}", category, name, server))?;
    print_json(&serde_json::json!({ "lodestone_id": id }))
}

/// Handles `parse`: runs an extractor over a saved page
fn handle_parse(page: PageKind, file: &Path, name: Option<&str>) -> anyhow::Result<()> {
    let html = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read {}", file.display()))?;

    match page {
        PageKind::Search => {
            let name = name.context("--name is required for search pages")?;
            let id = search_character(&html, name)
                .with_context(|| format!("No entry named {:?} in {}", name, file.display()))?;
            print_json(&serde_json::json!({ "lodestone_id": id }))
        }
        PageKind::Character => print_json(&parse_character(&html)?),
        PageKind::FreeCompany => print_json(&parse_free_company(&html)?),
        PageKind::Members => print_json(&parse_free_company_members(&html)?),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
