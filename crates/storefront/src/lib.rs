//! Bookpedia storefront library.
//!
//! Cart and purchase history state, accounts, the Open Library catalog
//! client and the storage they share, independent of any front end.
//!
//! # Modules
//!
//! - [`session`] - `CartSession`, the single owner of cart state
//! - [`accounts`] - signup, login and the current user
//! - [`catalog`] - genre shelves, search and book detail
//! - [`storage`] - browser-style key-value storage backends
//! - [`state`] - everything above bundled for a front end

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod accounts;
pub mod catalog;
pub mod config;
pub mod error;
pub mod session;
pub mod state;
pub mod storage;

pub use error::AppError;
pub use state::AppState;
