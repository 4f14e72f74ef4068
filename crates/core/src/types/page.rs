//! Paginated catalog listings.

use serde::{Deserialize, Serialize};

use super::character::Character;

/// Pagination metadata attached to every catalog listing response.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    /// Total number of records matching the listing.
    pub count: u32,
    /// Total number of pages.
    pub pages: u32,
    /// URL of the next page, if any.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page, if any.
    #[serde(default)]
    pub prev: Option<String>,
}

/// One page of catalog results, as returned by the listing and search
/// endpoints.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterPage {
    /// Pagination metadata.
    pub info: PageInfo,
    /// The characters on this page.
    pub results: Vec<Character>,
}

impl CharacterPage {
    /// An empty page with zero counts.
    ///
    /// Used to normalize a no-match search into a successful empty result.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_page() {
        let page = CharacterPage::empty();
        assert_eq!(page.info.count, 0);
        assert_eq!(page.info.pages, 0);
        assert!(page.results.is_empty());
    }

    #[test]
    fn test_deserialize_listing() {
        let json = r#"{
            "info": {"count": 826, "pages": 42, "next": "https://example.test/?page=2", "prev": null},
            "results": []
        }"#;
        let page: CharacterPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.info.count, 826);
        assert_eq!(page.info.pages, 42);
        assert_eq!(page.info.next.as_deref(), Some("https://example.test/?page=2"));
        assert_eq!(page.info.prev, None);
    }
}
