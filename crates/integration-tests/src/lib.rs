//! Shared fixtures for the integration test suites.
//!
//! The catalog suites run the real client against a local `httpmock` server;
//! the account suites run the real store against files in a temp directory.
//! Nothing here touches the network.

use std::time::Duration;

use serde_json::{Value, json};

use atlas_client::catalog::CatalogClient;
use atlas_client::config::CatalogConfig;

/// Build a catalog client pointed at a mock server.
#[must_use]
pub fn catalog_client(base_url: &str, cache_ttl: Duration) -> CatalogClient {
    CatalogClient::new(&CatalogConfig {
        base_url: format!("{base_url}/api/character"),
        cache_ttl,
    })
}

/// A minimal valid character body.
#[must_use]
pub fn character_json(id: u32, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "status": "Alive",
        "species": "Human",
        "origin": { "name": "Earth (C-137)" },
        "image": format!("https://example.test/avatar/{id}.jpeg"),
        "episode": ["https://example.test/episode/1"],
    })
}

/// A listing page wrapping the given character bodies.
#[must_use]
pub fn page_json(count: u32, pages: u32, results: &[Value]) -> Value {
    json!({
        "info": { "count": count, "pages": pages, "next": null, "prev": null },
        "results": results,
    })
}
