//! Turning catalog records into shelf listings.

use bookpedia_core::{CatalogRecord, Listing, Price};
use rand::Rng;

/// Cover shown when the catalog has no cover image for a book.
pub const FALLBACK_COVER: &str = "https://via.placeholder.com/220x330?text=No+Cover";

/// Lowest drawn price, in cents (inclusive).
pub const MIN_PRICE_CENTS: u32 = 1299;

/// Upper bound of drawn prices, in cents (exclusive).
pub const MAX_PRICE_CENTS: u32 = 3299;

/// Draw a shelf price, uniform over `[12.99, 32.99)`.
pub fn draw_price<R: Rng + ?Sized>(rng: &mut R) -> Price {
    Price::from_whole_cents(rng.random_range(MIN_PRICE_CENTS..MAX_PRICE_CENTS))
}

/// Resolves covers and prices for catalog records.
#[derive(Debug, Clone)]
pub struct Renderer {
    covers_base: String,
}

impl Renderer {
    /// Create a renderer using the given covers service base URL.
    #[must_use]
    pub fn new(covers_base: &str) -> Self {
        Self {
            covers_base: covers_base.trim_end_matches('/').to_string(),
        }
    }

    /// Large cover image URL for `cover_image_id`, or the fallback cover.
    #[must_use]
    pub fn cover_url(&self, cover_image_id: Option<u64>) -> String {
        cover_image_id.map_or_else(
            || FALLBACK_COVER.to_string(),
            |id| format!("{}/b/id/{id}-L.jpg", self.covers_base),
        )
    }

    /// Render one record. The price is drawn here and fixed on the listing.
    pub fn listing<R: Rng + ?Sized>(&self, record: CatalogRecord, rng: &mut R) -> Listing {
        Listing {
            cover_url: self.cover_url(record.cover_image_id),
            price: draw_price(rng),
            record,
        }
    }

    /// Render records in order.
    pub fn listings<R: Rng + ?Sized>(
        &self,
        records: impl IntoIterator<Item = CatalogRecord>,
        rng: &mut R,
    ) -> Vec<Listing> {
        records
            .into_iter()
            .map(|record| self.listing(record, rng))
            .collect()
    }
}
