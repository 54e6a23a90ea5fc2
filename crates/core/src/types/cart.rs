//! Cart line items.

use serde::{Deserialize, Serialize};

use super::catalog::Listing;
use super::key::BookKey;
use super::price::Price;

/// Author shown when the catalog lists none.
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// Errors that can occur when building a [`CartItem`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CartItemError {
    /// The title is empty or only whitespace.
    #[error("cart item title cannot be empty")]
    EmptyTitle,
}

/// One entry in the cart or in the purchase history.
///
/// Field names follow the stored layout (`coverUrl`), so lists written by
/// earlier versions of the storefront load unchanged. Items are never
/// mutated in place; checkout moves them from the cart into the history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Catalog key or a locally generated placeholder.
    pub key: BookKey,
    /// Book title (never empty).
    pub title: String,
    /// First author, or [`UNKNOWN_AUTHOR`].
    pub author: String,
    /// Price fixed when the listing was rendered.
    pub price: Price,
    /// Cover image URL.
    pub cover_url: String,
}

impl CartItem {
    /// Derive a cart item from a rendered listing.
    ///
    /// # Errors
    ///
    /// Returns `CartItemError::EmptyTitle` if the record has no usable title.
    pub fn from_listing(listing: &Listing) -> Result<Self, CartItemError> {
        let record = &listing.record;
        let title = record.title.trim();
        if title.is_empty() {
            return Err(CartItemError::EmptyTitle);
        }

        Ok(Self {
            key: record
                .key
                .as_deref()
                .filter(|key| !key.is_empty())
                .map_or_else(BookKey::placeholder, BookKey::new),
            title: title.to_owned(),
            author: record
                .primary_author()
                .unwrap_or(UNKNOWN_AUTHOR)
                .to_owned(),
            price: listing.price,
            cover_url: listing.cover_url.clone(),
        })
    }

    /// Whether this item satisfies the cart invariants.
    ///
    /// Used when loading stored lists, which may have been edited by hand.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.title.trim().is_empty()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::types::catalog::CatalogRecord;

    fn listing(title: &str, authors: &[&str], key: Option<&str>) -> Listing {
        Listing {
            record: CatalogRecord {
                title: title.to_string(),
                author_names: authors.iter().map(ToString::to_string).collect(),
                cover_image_id: Some(42),
                key: key.map(ToString::to_string),
            },
            cover_url: "https://covers.example/42-L.jpg".to_string(),
            price: Price::from_cents(1999).unwrap(),
        }
    }

    #[test]
    fn test_from_listing_maps_fields() {
        let item =
            CartItem::from_listing(&listing("Dune", &["Frank Herbert"], Some("/works/OL1W")))
                .unwrap();
        assert_eq!(item.key.as_str(), "/works/OL1W");
        assert_eq!(item.title, "Dune");
        assert_eq!(item.author, "Frank Herbert");
        assert_eq!(item.price, Price::from_cents(1999).unwrap());
        assert_eq!(item.cover_url, "https://covers.example/42-L.jpg");
    }

    #[test]
    fn test_missing_author_and_key() {
        let item = CartItem::from_listing(&listing("Beowulf", &[], None)).unwrap();
        assert_eq!(item.author, UNKNOWN_AUTHOR);
        assert!(item.key.is_placeholder());
    }

    #[test]
    fn test_empty_title_rejected() {
        assert_eq!(
            CartItem::from_listing(&listing("  ", &["Someone"], None)),
            Err(CartItemError::EmptyTitle)
        );
    }

    #[test]
    fn test_stored_layout() {
        let item = CartItem::from_listing(&listing("Dune", &[], Some("/works/OL1W"))).unwrap();
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["coverUrl"], "https://covers.example/42-L.jpg");
        assert_eq!(value["price"], serde_json::json!(19.99));
        assert_eq!(value["key"], "/works/OL1W");
    }
}
