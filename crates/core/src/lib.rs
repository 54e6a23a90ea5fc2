//! Bookpedia Core - Shared types library.
//!
//! This crate provides the types shared by every Bookpedia component:
//! - `storefront` - Cart session, accounts, catalog client and storage backends
//! - `cli` - Command-line storefront that replaces the browser page
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no storage
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Prices, emails, book keys, catalog records and cart items

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
