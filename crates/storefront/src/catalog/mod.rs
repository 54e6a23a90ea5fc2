//! Open Library catalog client.
//!
//! Supplies the records shown on the genre shelves, search results and the
//! book detail view. Responses are cached in memory via `moka` for the
//! configured TTL (5 minutes by default).
//!
//! Catalog failures are transient: they are reported to the user as the
//! catalog being unavailable and never touch cart state.
//!
//! # Example
//!
//! ```rust,ignore
//! use bookpedia_storefront::catalog::{CatalogClient, Genre, SHELF_LIMIT};
//!
//! let client = CatalogClient::new(&config.catalog)?;
//! let records = client.subject(Genre::Fiction, SHELF_LIMIT).await?;
//! ```

mod render;
pub mod types;

pub use render::{FALLBACK_COVER, MAX_PRICE_CENTS, MIN_PRICE_CENTS, Renderer, draw_price};
pub use types::WorkDetail;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use bookpedia_core::CatalogRecord;
use moka::future::Cache;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};

use crate::config::CatalogConfig;
use types::{SearchResponse, SubjectResponse, WorkResponse};

/// Books fetched per genre shelf.
pub const SHELF_LIMIT: usize = 15;

/// Books fetched per search.
pub const SEARCH_LIMIT: usize = 20;

/// Errors that can occur when talking to the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Catalog answered with a non-success status.
    #[error("catalog returned HTTP {status} for {url}")]
    Status { status: u16, url: String },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Search query was empty after trimming.
    #[error("search query is empty")]
    EmptyQuery,

    /// Work key is not a catalog work identifier.
    #[error("invalid work key: {0:?}")]
    InvalidKey(String),
}

impl CatalogError {
    /// Message safe to show to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Http(_) | Self::Status { .. } | Self::Parse(_) => {
                "The book catalog is unavailable right now. Please try again later.".to_string()
            }
            Self::EmptyQuery => "Please enter something to search for.".to_string(),
            Self::InvalidKey(key) => format!("No book with key {key:?}."),
        }
    }

    /// Whether the failure came from the remote catalog rather than the input.
    #[must_use]
    pub const fn is_unavailable(&self) -> bool {
        matches!(self, Self::Http(_) | Self::Status { .. } | Self::Parse(_))
    }
}

/// Genre shelves on the home page, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Fiction,
    NonFiction,
    ScienceFiction,
}

impl Genre {
    /// All shelves, in the order they are shown.
    pub const ALL: [Self; 3] = [Self::Fiction, Self::NonFiction, Self::ScienceFiction];

    /// Open Library subject slug.
    #[must_use]
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Fiction => "fiction",
            Self::NonFiction => "non_fiction",
            Self::ScienceFiction => "science_fiction",
        }
    }

    /// Shelf heading.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            Self::Fiction => "Fiction",
            Self::NonFiction => "Non-Fiction",
            Self::ScienceFiction => "Science Fiction",
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

/// Error parsing a [`Genre`] name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown genre {0:?} (expected fiction, non_fiction or science_fiction)")]
pub struct UnknownGenre(pub String);

impl FromStr for Genre {
    type Err = UnknownGenre;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "fiction" => Ok(Self::Fiction),
            "non_fiction" | "nonfiction" => Ok(Self::NonFiction),
            "science_fiction" | "sciencefiction" | "scifi" | "sci_fi" => Ok(Self::ScienceFiction),
            _ => Err(UnknownGenre(s.to_string())),
        }
    }
}

/// Cached catalog responses.
#[derive(Debug, Clone)]
enum CacheValue {
    Records(Vec<CatalogRecord>),
    Work(Box<WorkDetail>),
}

// =============================================================================
// CatalogClient
// =============================================================================

/// Client for the Open Library HTTP API.
#[derive(Clone)]
pub struct CatalogClient {
    inner: Arc<CatalogClientInner>,
}

struct CatalogClientInner {
    client: reqwest::Client,
    base_url: String,
    cache: Cache<String, CacheValue>,
}

impl fmt::Debug for CatalogClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl CatalogClient {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::Http` if the HTTP client cannot be built.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.cache_ttl)
            .build();

        let client = reqwest::Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            inner: Arc::new(CatalogClientInner {
                client,
                base_url: config.base_url.as_str().trim_end_matches('/').to_string(),
                cache,
            }),
        })
    }

    /// Books on a genre shelf.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError` if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn subject(
        &self,
        genre: Genre,
        limit: usize,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let url = self.subject_url(genre, limit);
        if let Some(CacheValue::Records(records)) = self.inner.cache.get(&url).await {
            debug!("Cache hit for {genre} shelf");
            return Ok(records);
        }

        let response: SubjectResponse = self.get_json(&url).await?;
        let records: Vec<CatalogRecord> = response.works.into_iter().map(Into::into).collect();

        self.inner
            .cache
            .insert(url, CacheValue::Records(records.clone()))
            .await;
        Ok(records)
    }

    /// Search the catalog.
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::EmptyQuery` for a blank query (no request is
    /// made), otherwise `CatalogError` if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn search(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<CatalogRecord>, CatalogError> {
        let url = self.search_url(query, limit)?;
        if let Some(CacheValue::Records(records)) = self.inner.cache.get(&url).await {
            debug!("Cache hit for search {query:?}");
            return Ok(records);
        }

        let response: SearchResponse = self.get_json(&url).await?;
        let records: Vec<CatalogRecord> = response.docs.into_iter().map(Into::into).collect();

        self.inner
            .cache
            .insert(url, CacheValue::Records(records.clone()))
            .await;
        Ok(records)
    }

    /// Detail for a single work, by key (`/works/OL45804W` or `OL45804W`).
    ///
    /// # Errors
    ///
    /// Returns `CatalogError::InvalidKey` for a key that is not a work id,
    /// otherwise `CatalogError` if the request or decoding fails.
    #[instrument(skip(self))]
    pub async fn work(&self, key: &str) -> Result<WorkDetail, CatalogError> {
        let url = self.work_url(key)?;
        if let Some(CacheValue::Work(detail)) = self.inner.cache.get(&url).await {
            debug!("Cache hit for work {key}");
            return Ok(*detail);
        }

        let response: WorkResponse = self.get_json(&url).await?;
        let detail = WorkDetail::from(response);

        self.inner
            .cache
            .insert(url, CacheValue::Work(Box::new(detail.clone())))
            .await;
        Ok(detail)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, CatalogError> {
        let response = self.inner.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            tracing::error!(status = %status, url, "Catalog returned non-success status");
            return Err(CatalogError::Status {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }

    pub(crate) fn subject_url(&self, genre: Genre, limit: usize) -> String {
        format!(
            "{}/subjects/{}.json?limit={limit}",
            self.inner.base_url,
            genre.slug()
        )
    }

    pub(crate) fn search_url(&self, query: &str, limit: usize) -> Result<String, CatalogError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CatalogError::EmptyQuery);
        }
        Ok(format!(
            "{}/search.json?q={}&limit={limit}",
            self.inner.base_url,
            urlencoding::encode(query)
        ))
    }

    pub(crate) fn work_url(&self, key: &str) -> Result<String, CatalogError> {
        let id = key.trim().trim_start_matches("/works/");
        if id.is_empty() || !id.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(CatalogError::InvalidKey(key.to_string()));
        }
        Ok(format!("{}/works/{id}.json", self.inner.base_url))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use url::Url;

    use super::*;

    fn client() -> CatalogClient {
        let config = CatalogConfig::new(
            Url::parse("https://openlibrary.org").unwrap(),
            Url::parse("https://covers.openlibrary.org").unwrap(),
        );
        CatalogClient::new(&config).unwrap()
    }

    #[test]
    fn test_genre_slugs_in_shelf_order() {
        let slugs: Vec<&str> = Genre::ALL.iter().map(|g| g.slug()).collect();
        assert_eq!(slugs, ["fiction", "non_fiction", "science_fiction"]);
    }

    #[test]
    fn test_genre_from_str() {
        assert_eq!("Fiction".parse::<Genre>().unwrap(), Genre::Fiction);
        assert_eq!("non-fiction".parse::<Genre>().unwrap(), Genre::NonFiction);
        assert_eq!("scifi".parse::<Genre>().unwrap(), Genre::ScienceFiction);
        assert!("poetry".parse::<Genre>().is_err());
    }

    #[test]
    fn test_subject_url() {
        assert_eq!(
            client().subject_url(Genre::NonFiction, SHELF_LIMIT),
            "https://openlibrary.org/subjects/non_fiction.json?limit=15"
        );
    }

    #[test]
    fn test_search_url_encodes_query() {
        assert_eq!(
            client().search_url("  dune & co ", SEARCH_LIMIT).unwrap(),
            "https://openlibrary.org/search.json?q=dune%20%26%20co&limit=20"
        );
    }

    #[test]
    fn test_empty_search_rejected() {
        assert!(matches!(
            client().search_url("   ", SEARCH_LIMIT),
            Err(CatalogError::EmptyQuery)
        ));
    }

    #[test]
    fn test_work_url() {
        let client = client();
        assert_eq!(
            client.work_url("/works/OL45804W").unwrap(),
            "https://openlibrary.org/works/OL45804W.json"
        );
        assert_eq!(
            client.work_url("OL45804W").unwrap(),
            "https://openlibrary.org/works/OL45804W.json"
        );
        assert!(matches!(
            client.work_url("../etc/passwd"),
            Err(CatalogError::InvalidKey(_))
        ));
        assert!(client.work_url("local:abc").is_err());
    }

    #[tokio::test]
    async fn test_empty_search_makes_no_request() {
        let result = client().search("", SEARCH_LIMIT).await;
        assert!(matches!(result, Err(CatalogError::EmptyQuery)));
    }

    #[test]
    fn test_user_message_hides_details() {
        let err = CatalogError::Status {
            status: 503,
            url: "https://openlibrary.org/subjects/fiction.json".to_string(),
        };
        assert!(err.is_unavailable());
        assert!(err.user_message().contains("unavailable"));
        assert!(!err.user_message().contains("503"));
    }
}
