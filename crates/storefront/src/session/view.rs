//! Display data derived from the cart.
//!
//! Everything here is recomputed from the current items on every change;
//! nothing is cached between renders.

use bookpedia_core::{CartItem, Price};

/// One cart line as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLineView {
    /// Position in the cart; pass this back to remove the line.
    pub index: usize,
    pub title: String,
    pub author: String,
    pub cover_url: String,
    /// Price with currency symbol, e.g. `$12.99`.
    pub price: String,
}

impl CartLineView {
    fn from_item(index: usize, item: &CartItem) -> Self {
        Self {
            index,
            title: item.title.clone(),
            author: item.author.clone(),
            cover_url: item.cover_url.clone(),
            price: item.price.to_string(),
        }
    }
}

/// Cart display data: badge count, lines, total and the buy button state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartView {
    pub lines: Vec<CartLineView>,
    pub item_count: usize,
    /// Total with exactly two decimals and no symbol, e.g. `25.50`.
    pub total: String,
    pub buy_enabled: bool,
}

impl CartView {
    /// Build the view for `items`.
    #[must_use]
    pub fn new(items: &[CartItem], buy_enabled: bool) -> Self {
        let total: Price = items.iter().map(|item| item.price).sum();
        Self {
            lines: lines(items),
            item_count: items.len(),
            total: total.format_amount(),
            buy_enabled,
        }
    }

    /// An empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(&[], false)
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

/// Line views for any list of items (cart or purchase history).
#[must_use]
pub fn lines(items: &[CartItem]) -> Vec<CartLineView> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| CartLineView::from_item(index, item))
        .collect()
}
