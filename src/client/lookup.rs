//! Lodestone lookups
//!
//! Requests go out on the caller's task; parsing the returned page runs on
//! the blocking pool so a large document does not stall other work on the
//! runtime.

use reqwest::Client;
use url::Url;

use crate::client::fetcher::{build_http_client, HttpClient};
use crate::config::Config;
use crate::extract::{
    parse_character, parse_free_company, parse_free_company_members, search_character,
};
use crate::model::{CharacterRecord, FreeCompanyRecord, RosterMember};
use crate::normalize::title_case;
use crate::{LodestoneError, Result};

/// Search category for characters
pub const CHARACTER_CATEGORY: &str = "character";

/// Search category for free companies
pub const FREE_COMPANY_CATEGORY: &str = "freecompany";

/// A handle on one regional Lodestone
pub struct Lodestone<C = Client> {
    client: C,
    base_url: String,
}

impl Lodestone<Client> {
    /// Creates a handle with a `reqwest` client built from `config`
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = build_http_client(&config.user_agent, &config.http)?;
        Self::new(client, &config.lodestone.base_url())
    }
}

impl<C: HttpClient> Lodestone<C> {
    /// Creates a handle that sends requests through `client`
    ///
    /// # Arguments
    ///
    /// * `client` - The HTTP client to use
    /// * `base_url` - Lodestone root, e.g. `https://eu.finalfantasyxiv.com/lodestone`
    pub fn new(client: C, base_url: &str) -> Result<Self> {
        Url::parse(base_url)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Looks up the Lodestone ID of a character by name and server
    ///
    /// Searches `category` for `character_name` on `server_name` and returns
    /// the ID of the first result whose name matches exactly, ignoring case.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The Lodestone ID
    /// * `Err(LodestoneError::NotFound)` - No result matched, or the search
    ///   request did not succeed
    /// * `Err(_)` - The request itself could not be made
    pub async fn find_character_id(
        &self,
        category: &str,
        server_name: &str,
        character_name: &str,
    ) -> Result<String> {
        let worldname = title_case(server_name);
        let query = [("q", character_name), ("worldname", worldname.as_str())];
        let body = self.fetch_page(category, &query).await?;

        let name = character_name.to_string();
        let id = tokio::task::spawn_blocking(move || search_character(&body, &name)).await?;

        id.ok_or(LodestoneError::NotFound)
    }

    /// Fetches and extracts a character profile
    pub async fn character(&self, lodestone_id: &str) -> Result<CharacterRecord> {
        let body = self
            .fetch_page(&format!("{}/{}", CHARACTER_CATEGORY, lodestone_id), &[])
            .await?;
        let record = tokio::task::spawn_blocking(move || parse_character(&body)).await?;
        Ok(record?)
    }

    /// Fetches and extracts a free company profile
    pub async fn free_company(&self, lodestone_id: &str) -> Result<FreeCompanyRecord> {
        let body = self
            .fetch_page(&format!("{}/{}", FREE_COMPANY_CATEGORY, lodestone_id), &[])
            .await?;
        let record = tokio::task::spawn_blocking(move || parse_free_company(&body)).await?;
        Ok(record?)
    }

    /// Fetches and extracts the first page of a free company's member list
    ///
    /// Further roster pages are not requested.
    pub async fn free_company_members(&self, lodestone_id: &str) -> Result<Vec<RosterMember>> {
        let body = self
            .fetch_page(
                &format!("{}/{}/member", FREE_COMPANY_CATEGORY, lodestone_id),
                &[],
            )
            .await?;
        let members =
            tokio::task::spawn_blocking(move || parse_free_company_members(&body)).await?;
        Ok(members?)
    }

    /// GETs `{base_url}/{path}/`; anything but a 200 is reported as not found
    async fn fetch_page(&self, path: &str, query: &[(&str, &str)]) -> Result<String> {
        let url = Url::parse(&format!("{}/{}/", self.base_url, path))?;
        let response = self.client.get(&url, query).await?;

        if !response.is_ok() {
            tracing::debug!("{} answered with status {}", url, response.status);
            return Err(LodestoneError::NotFound);
        }

        Ok(response.body)
    }
}
