//! Catalog API client.
//!
//! # Architecture
//!
//! - Plain REST calls with `reqwest`; responses are read as text and parsed
//!   with `serde_json` so parse failures carry useful diagnostics
//! - Read-through caching via [`TtlCache`] for pages and characters
//!   (5 minute TTL by default); search results are never cached
//! - Multi-ID fetches go through the catalog's batched endpoint and fall
//!   back to per-ID requests when the batch fails
//!
//! # Example
//!
//! ```rust,ignore
//! use atlas_client::catalog::CatalogClient;
//!
//! let client = CatalogClient::new(&config.catalog);
//!
//! let page = client.fetch_page(1).await?;
//! let rick = client.fetch_by_id(CharacterId::new(1)).await?;
//! let favorites = client.fetch_by_ids(&ids).await?;
//! ```

mod cache;

pub use cache::{CacheKey, CacheStats, CacheValue, TtlCache};

use std::sync::Arc;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument, warn};

use atlas_core::{Character, CharacterId, CharacterPage};

use crate::config::CatalogConfig;

/// Errors that can occur when talking to the catalog API.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Bad caller input, rejected before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The requested resource does not exist upstream (HTTP 404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The upstream returned a non-success, non-404 status.
    #[error("upstream error: HTTP {status} {reason}")]
    Upstream {
        /// HTTP status code.
        status: u16,
        /// Canonical reason phrase, if known.
        reason: String,
    },

    /// The HTTP request itself failed (connection, timeout, etc.).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not the JSON shape we expected.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),
}

/// A batched character response: the upstream returns a bare object when
/// exactly one requested ID resolves, and an array otherwise.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OneOrMany {
    Many(Vec<Character>),
    One(Box<Character>),
}

impl From<OneOrMany> for Vec<Character> {
    fn from(value: OneOrMany) -> Self {
        match value {
            OneOrMany::Many(characters) => characters,
            OneOrMany::One(character) => vec![*character],
        }
    }
}

/// Client for the upstream character catalog.
///
/// Pages and individual characters are cached with a TTL; cloning the client
/// shares the cache.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    http: reqwest::Client,
    base_url: String,
    cache: TtlCache,
}

impl CatalogClient {
    /// Create a new catalog client.
    #[must_use]
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            inner: Arc::new(CatalogClientInner {
                http: reqwest::Client::new(),
                base_url: config.base_url.trim_end_matches('/').to_owned(),
                cache: TtlCache::new(config.cache_ttl),
            }),
        }
    }

    /// Issue a GET and return the status plus the raw body text.
    async fn get_raw(&self, url: &str) -> Result<(reqwest::StatusCode, String), CatalogError> {
        let response = self.inner.http.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;
        Ok((status, body))
    }

    fn parse_body<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, CatalogError> {
        serde_json::from_str(body).map_err(|e| {
            warn!(
                url = %url,
                error = %e,
                body = %body.chars().take(200).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    fn upstream_error(status: reqwest::StatusCode) -> CatalogError {
        CatalogError::Upstream {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("unknown").to_owned(),
        }
    }

    // =========================================================================
    // Fetch Methods
    // =========================================================================

    /// Fetch one page of the character listing.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for a page past the end of the listing, `Upstream`
    /// for other non-success statuses, and `Http`/`Parse` for transport and
    /// decoding failures.
    #[instrument(skip(self))]
    pub async fn fetch_page(&self, page: u32) -> Result<CharacterPage, CatalogError> {
        if page == 0 {
            return Err(CatalogError::InvalidArgument(
                "page number must be positive".to_owned(),
            ));
        }

        if let Some(CacheValue::Page(cached)) = self.inner.cache.get(&CacheKey::Page(page)) {
            debug!("Cache hit for page");
            return Ok(cached);
        }

        let url = format!("{}?page={page}", self.inner.base_url);
        let (status, body) = self.get_raw(&url).await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("page {page}")));
        }
        if !status.is_success() {
            return Err(Self::upstream_error(status));
        }

        let parsed: CharacterPage = Self::parse_body(&url, &body)?;
        self.inner
            .cache
            .insert(CacheKey::Page(page), CacheValue::Page(parsed.clone()));

        debug!(characters = parsed.results.len(), "Page loaded");
        Ok(parsed)
    }

    /// Fetch a single character by ID.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the catalog has no such ID, `Upstream` for other
    /// non-success statuses, and `Http`/`Parse` for transport and decoding
    /// failures.
    #[instrument(skip(self))]
    pub async fn fetch_by_id(&self, id: CharacterId) -> Result<Character, CatalogError> {
        if id.as_u32() == 0 {
            return Err(CatalogError::InvalidArgument(
                "character id must be positive".to_owned(),
            ));
        }

        if let Some(CacheValue::Character(cached)) =
            self.inner.cache.get(&CacheKey::Character(id))
        {
            debug!("Cache hit for character");
            return Ok(*cached);
        }

        let url = format!("{}/{id}", self.inner.base_url);
        let (status, body) = self.get_raw(&url).await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(format!("character {id}")));
        }
        if !status.is_success() {
            return Err(Self::upstream_error(status));
        }

        let character: Character = Self::parse_body(&url, &body)?;
        self.inner.cache.insert(
            CacheKey::Character(id),
            CacheValue::Character(Box::new(character.clone())),
        );

        debug!(name = %character.name, "Character loaded");
        Ok(character)
    }

    /// Fetch several characters at once.
    ///
    /// An empty `ids` slice yields an empty vector. A single ID delegates to
    /// [`fetch_by_id`](Self::fetch_by_id). Multiple IDs are requested in one
    /// batched call; if that call fails for any reason, each ID is retried
    /// individually and the successes are returned, silently skipping IDs
    /// that fail on their own. Only when the batch *and* every individual
    /// retry fail does the original batch error surface.
    ///
    /// # Errors
    ///
    /// See above: errors surface only when no character could be retrieved
    /// by any strategy.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn fetch_by_ids(
        &self,
        ids: &[CharacterId],
    ) -> Result<Vec<Character>, CatalogError> {
        let Some(&first) = ids.first() else {
            return Ok(Vec::new());
        };
        if ids.len() == 1 {
            return Ok(vec![self.fetch_by_id(first).await?]);
        }

        match self.fetch_batch(ids).await {
            Ok(characters) => Ok(characters),
            Err(batch_err) => {
                warn!(error = %batch_err, "Batched fetch failed, retrying individually");
                let mut collected = Vec::new();
                for &id in ids {
                    match self.fetch_by_id(id).await {
                        Ok(character) => collected.push(character),
                        Err(err) => {
                            debug!(%id, error = %err, "Skipping character that failed individually");
                        }
                    }
                }
                if collected.is_empty() {
                    Err(batch_err)
                } else {
                    debug!(
                        loaded = collected.len(),
                        requested = ids.len(),
                        "Partial batch recovered individually"
                    );
                    Ok(collected)
                }
            }
        }
    }

    /// One comma-joined request for all IDs, caching each resolved character
    /// under its own key so later single fetches hit cache.
    async fn fetch_batch(&self, ids: &[CharacterId]) -> Result<Vec<Character>, CatalogError> {
        let joined = ids
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        let url = format!("{}/{joined}", self.inner.base_url);
        let (status, body) = self.get_raw(&url).await?;

        if !status.is_success() {
            return Err(Self::upstream_error(status));
        }

        let characters: Vec<Character> = Self::parse_body::<OneOrMany>(&url, &body)?.into();
        for character in &characters {
            self.inner.cache.insert(
                CacheKey::Character(character.id),
                CacheValue::Character(Box::new(character.clone())),
            );
        }
        Ok(characters)
    }

    /// Search characters by name.
    ///
    /// The query is trimmed and percent-encoded. A 404 means "no matches"
    /// and is normalized to an empty page rather than an error - unlike
    /// [`fetch_page`](Self::fetch_page) and [`fetch_by_id`](Self::fetch_by_id),
    /// where 404 is a failure. Results are not cached.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty or whitespace-only query before
    /// any network call, `Upstream` for non-success, non-404 statuses, and
    /// `Http`/`Parse` for transport and decoding failures.
    #[instrument(skip(self))]
    pub async fn search(&self, name: &str) -> Result<CharacterPage, CatalogError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(CatalogError::InvalidArgument(
                "search name must not be empty".to_owned(),
            ));
        }

        let url = format!("{}?name={}", self.inner.base_url, urlencoding::encode(trimmed));
        let (status, body) = self.get_raw(&url).await?;

        if status == reqwest::StatusCode::NOT_FOUND {
            debug!("Search matched nothing");
            return Ok(CharacterPage::empty());
        }
        if !status.is_success() {
            return Err(Self::upstream_error(status));
        }

        let page: CharacterPage = Self::parse_body(&url, &body)?;
        debug!(results = page.results.len(), "Search completed");
        Ok(page)
    }

    // =========================================================================
    // Cache Management
    // =========================================================================

    /// Drop every cached entry.
    pub fn clear_cache(&self) {
        self.inner.cache.clear();
    }

    /// Current cache occupancy, split into live and expired entries.
    #[must_use]
    pub fn cache_stats(&self) -> CacheStats {
        self.inner.cache.stats()
    }

    /// Remove expired entries, returning how many were removed.
    ///
    /// Intended to be driven periodically by the host application's
    /// scheduler; the client never starts its own timers.
    pub fn sweep_expired(&self) -> usize {
        self.inner.cache.sweep_expired()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_client() -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url: "http://127.0.0.1:9".to_owned(),
            cache_ttl: Duration::from_secs(300),
        })
    }

    #[tokio::test]
    async fn test_fetch_page_zero_is_rejected_before_io() {
        let err = test_client().fetch_page(0).await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_fetch_by_id_zero_is_rejected_before_io() {
        let err = test_client()
            .fetch_by_id(CharacterId::new(0))
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_empty_id_list_yields_empty_vec() {
        let characters = test_client().fetch_by_ids(&[]).await.unwrap();
        assert!(characters.is_empty());
    }

    #[tokio::test]
    async fn test_blank_search_is_rejected_before_io() {
        let err = test_client().search("   ").await.unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn test_one_or_many_normalization() {
        let single = r#"{
            "id": 3, "name": "Summer Smith", "status": "Alive",
            "species": "Human", "origin": {"name": "Earth"},
            "image": "https://example.test/3.jpeg", "episode": []
        }"#;
        let characters: Vec<Character> =
            serde_json::from_str::<OneOrMany>(single).unwrap().into();
        assert_eq!(characters.len(), 1);

        let many = format!("[{single}, {single}]");
        let characters: Vec<Character> =
            serde_json::from_str::<OneOrMany>(&many).unwrap().into();
        assert_eq!(characters.len(), 2);
    }

    #[test]
    fn test_error_display() {
        let err = CatalogError::NotFound("character 42".to_owned());
        assert_eq!(err.to_string(), "not found: character 42");

        let err = CatalogError::Upstream {
            status: 500,
            reason: "Internal Server Error".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "upstream error: HTTP 500 Internal Server Error"
        );
    }
}
