//! Integration tests for the Lodestone lookups
//!
//! These tests use wiremock to stand in for the Lodestone and drive the
//! `reqwest`-backed client end-to-end: request building, status handling,
//! and extraction on the blocking pool.

use lodestone_scrape::client::{CHARACTER_CATEGORY, FREE_COMPANY_CATEGORY};
use lodestone_scrape::config::{parse_config, Config};
use lodestone_scrape::{Lodestone, LodestoneError};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SEARCH_HTML: &str = include_str!("../fixtures/search.html");
const CHARACTER_HTML: &str = include_str!("../fixtures/character.html");
const FREE_COMPANY_HTML: &str = include_str!("../fixtures/free_company.html");
const MEMBERS_HTML: &str = include_str!("../fixtures/members.html");

/// Creates a configuration pointing at the mock server
fn create_test_config(mock_server: &MockServer) -> Config {
    parse_config(&format!(
        r#"
[lodestone]
base-url = "{}/lodestone"

[user-agent]
name = "TestScraper"
version = "1.0.0"

[http]
timeout-secs = 5
connect-timeout-secs = 2
"#,
        mock_server.uri()
    ))
    .expect("Failed to build test config")
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_string(body)
        .insert_header("content-type", "text/html; charset=utf-8")
}

#[tokio::test]
async fn test_find_character_id() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodestone/character/"))
        .and(query_param("q", "bob"))
        .and(query_param("worldname", "Cerberus"))
        .respond_with(html(SEARCH_HTML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let lodestone = Lodestone::from_config(&create_test_config(&mock_server))
        .expect("Failed to create client");

    let id = lodestone
        .find_character_id(CHARACTER_CATEGORY, "cerberus", "bob")
        .await
        .expect("Lookup failed");
    assert_eq!(id, "2222222");
}

#[tokio::test]
async fn test_find_character_no_match() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodestone/character/"))
        .respond_with(html(SEARCH_HTML))
        .mount(&mock_server)
        .await;

    let lodestone = Lodestone::from_config(&create_test_config(&mock_server))
        .expect("Failed to create client");

    let result = lodestone
        .find_character_id(CHARACTER_CATEGORY, "Cerberus", "Carol")
        .await;
    assert!(matches!(result, Err(LodestoneError::NotFound)));
}

#[tokio::test]
async fn test_find_character_server_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodestone/character/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&mock_server)
        .await;

    let lodestone = Lodestone::from_config(&create_test_config(&mock_server))
        .expect("Failed to create client");

    // A failed request and a missing entry are reported the same way
    let result = lodestone
        .find_character_id(CHARACTER_CATEGORY, "Cerberus", "bob")
        .await;
    assert!(matches!(result, Err(LodestoneError::NotFound)));
}

#[tokio::test]
async fn test_fetch_character() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodestone/character/1111111/"))
        .respond_with(html(CHARACTER_HTML))
        .expect(1)
        .mount(&mock_server)
        .await;

    let lodestone = Lodestone::from_config(&create_test_config(&mock_server))
        .expect("Failed to create client");

    let character = lodestone.character("1111111").await.expect("Fetch failed");
    assert_eq!(character.name, "Alice Example");
    assert_eq!(character.current_job.as_deref(), Some("Paladin"));
    assert_eq!(
        character.free_company.map(|fc| fc.id).as_deref(),
        Some("9233645873504776755")
    );
}

#[tokio::test]
async fn test_fetch_free_company_and_members() {
    let mock_server = MockServer::start().await;
    let fc_id = "9233645873504776755";

    Mock::given(method("GET"))
        .and(path(format!("/lodestone/{}/{}/", FREE_COMPANY_CATEGORY, fc_id)))
        .respond_with(html(FREE_COMPANY_HTML))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path(format!("/lodestone/{}/{}/member/", FREE_COMPANY_CATEGORY, fc_id)))
        .respond_with(html(MEMBERS_HTML))
        .mount(&mock_server)
        .await;

    let lodestone = Lodestone::from_config(&create_test_config(&mock_server))
        .expect("Failed to create client");

    let fc = lodestone.free_company(fc_id).await.expect("Fetch failed");
    assert_eq!(fc.name, "Test Company");
    assert_eq!(fc.formed.as_deref(), Some("1378829297"));

    let members = lodestone
        .free_company_members(fc_id)
        .await
        .expect("Fetch failed");
    assert_eq!(members.len(), 3);
    assert!(members[0].leader);
    assert_eq!(members[0].lodestone_id, "1111111");
}

#[tokio::test]
async fn test_missing_profile_is_not_found() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let lodestone = Lodestone::from_config(&create_test_config(&mock_server))
        .expect("Failed to create client");

    assert!(matches!(
        lodestone.character("1").await,
        Err(LodestoneError::NotFound)
    ));
    assert!(matches!(
        lodestone.free_company("1").await,
        Err(LodestoneError::NotFound)
    ));
}

#[tokio::test]
async fn test_concurrent_lookups() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/lodestone/character/"))
        .respond_with(html(SEARCH_HTML))
        .expect(2)
        .mount(&mock_server)
        .await;

    let lodestone = Lodestone::from_config(&create_test_config(&mock_server))
        .expect("Failed to create client");

    let (alice, bob) = tokio::join!(
        lodestone.find_character_id(CHARACTER_CATEGORY, "Cerberus", "Alice"),
        lodestone.find_character_id(CHARACTER_CATEGORY, "Cerberus", "Bob"),
    );
    assert_eq!(alice.expect("Alice lookup failed"), "1111111");
    assert_eq!(bob.expect("Bob lookup failed"), "2222222");
}
