//! Catalog records as handed over by the book catalog.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// A book entry as returned by the catalog, before it becomes a cart item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogRecord {
    /// Book title.
    pub title: String,
    /// Author names, possibly empty.
    #[serde(default)]
    pub author_names: Vec<String>,
    /// Cover image identifier in the covers service.
    #[serde(default)]
    pub cover_image_id: Option<u64>,
    /// Catalog key (e.g. `/works/OL45804W`).
    #[serde(default)]
    pub key: Option<String>,
}

impl CatalogRecord {
    /// The first listed author, if any.
    #[must_use]
    pub fn primary_author(&self) -> Option<&str> {
        self.author_names
            .first()
            .map(String::as_str)
            .filter(|name| !name.trim().is_empty())
    }
}

/// A catalog record as rendered on a shelf: cover resolved and price fixed.
///
/// The price is drawn once when the listing is rendered and travels with
/// the listing, so adding the same listing twice adds it at the same price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Listing {
    /// The underlying catalog record.
    pub record: CatalogRecord,
    /// Resolved cover URL (or the fallback placeholder).
    pub cover_url: String,
    /// Price shown on the card.
    pub price: Price,
}
