//! Page and single-character fetches against a mock catalog server.

#![allow(clippy::unwrap_used)]

use std::time::Duration;

use httpmock::prelude::*;

use atlas_client::catalog::CatalogError;
use atlas_core::CharacterId;
use atlas_integration_tests::{catalog_client, character_json, page_json};

const TTL: Duration = Duration::from_secs(300);

#[tokio::test]
async fn fetch_page_returns_parsed_page() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path("/api/character")
            .query_param("page", "1");
        then.status(200).json_body(page_json(
            2,
            1,
            &[character_json(1, "Rick Sanchez"), character_json(2, "Morty Smith")],
        ));
    });

    let client = catalog_client(&server.base_url(), TTL);
    let page = client.fetch_page(1).await.unwrap();

    mock.assert();
    assert_eq!(page.info.count, 2);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].name, "Rick Sanchez");
}

#[tokio::test]
async fn fetch_page_past_the_end_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET)
            .path("/api/character")
            .query_param("page", "9999");
        then.status(404).json_body(serde_json::json!({"error": "There is nothing here"}));
    });

    let client = catalog_client(&server.base_url(), TTL);
    let err = client.fetch_page(9999).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn fetch_page_server_error_is_upstream() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/character");
        then.status(503);
    });

    let client = catalog_client(&server.base_url(), TTL);
    let err = client.fetch_page(1).await.unwrap_err();
    assert!(matches!(err, CatalogError::Upstream { status: 503, .. }));
}

#[tokio::test]
async fn fetch_by_id_returns_character() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path("/api/character/1");
        then.status(200).json_body(character_json(1, "Rick Sanchez"));
    });

    let client = catalog_client(&server.base_url(), TTL);
    let character = client.fetch_by_id(CharacterId::new(1)).await.unwrap();

    mock.assert();
    assert_eq!(character.id, CharacterId::new(1));
    assert_eq!(character.name, "Rick Sanchez");
    assert_eq!(character.origin.name, "Earth (C-137)");
}

#[tokio::test]
async fn fetch_by_id_unknown_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/character/999999");
        then.status(404).json_body(serde_json::json!({"error": "Character not found"}));
    });

    let client = catalog_client(&server.base_url(), TTL);
    let err = client.fetch_by_id(CharacterId::new(999_999)).await.unwrap_err();
    assert!(matches!(err, CatalogError::NotFound(_)));
}

#[tokio::test]
async fn malformed_body_is_a_parse_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/api/character/1");
        then.status(200).body("<html>definitely not json</html>");
    });

    let client = catalog_client(&server.base_url(), TTL);
    let err = client.fetch_by_id(CharacterId::new(1)).await.unwrap_err();
    assert!(matches!(err, CatalogError::Parse(_)));
}
