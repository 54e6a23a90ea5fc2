//! Core types for Bookpedia.
//!
//! This module provides type-safe wrappers for the storefront domain.

pub mod cart;
pub mod catalog;
pub mod email;
pub mod identity;
pub mod key;
pub mod price;

pub use cart::{CartItem, CartItemError, UNKNOWN_AUTHOR};
pub use catalog::{CatalogRecord, Listing};
pub use email::{Email, EmailError};
pub use identity::IdentitySnapshot;
pub use key::BookKey;
pub use price::{Price, PriceError};
