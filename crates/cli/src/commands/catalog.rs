//! Browsing commands: genre shelves, search and book detail.
//!
//! Every command that lists books saves the rendered listings under
//! `bookpedia_listings`, so `add <n>` adds a book at the price it was shown
//! with.

use bookpedia_core::Listing;
use bookpedia_storefront::catalog::{Genre, SEARCH_LIMIT, SHELF_LIMIT};
use bookpedia_storefront::storage::{self, keys};
use bookpedia_storefront::{AppError, AppState};

use crate::console::print_listings;

/// Show the genre shelves.
///
/// A shelf that fails to load is shown as unavailable; the other shelves
/// still render.
pub async fn home(state: &AppState) -> Result<(), AppError> {
    let mut rng = rand::rng();
    let mut shown: Vec<Listing> = Vec::new();

    for genre in Genre::ALL {
        println!("{genre}");
        match state.catalog().subject(genre, SHELF_LIMIT).await {
            Ok(records) if records.is_empty() => println!("  No books found."),
            Ok(records) => {
                let listings = state.renderer().listings(records, &mut rng);
                print_listings(shown.len() + 1, &listings);
                shown.extend(listings);
            }
            Err(e) => {
                let message = e.user_message();
                AppError::from(e).report();
                println!("  {message}");
            }
        }
        println!();
    }

    remember(state, &shown)
}

/// Search the catalog and list the results.
pub async fn search(state: &AppState, query: &str) -> Result<(), AppError> {
    let records = state.catalog().search(query, SEARCH_LIMIT).await?;
    if records.is_empty() {
        println!("No results found.");
        return remember(state, &[]);
    }

    let listings = state.renderer().listings(records, &mut rand::rng());
    println!("Search results for {:?}", query.trim());
    print_listings(1, &listings);
    remember(state, &listings)
}

/// Show details for one work.
pub async fn show(state: &AppState, key: &str) -> Result<(), AppError> {
    let detail = state.catalog().work(key).await?;
    let listing = state
        .renderer()
        .listing(detail.record(), &mut rand::rng());

    println!("{}", detail.title);
    if let Some(date) = &detail.first_publish_date {
        println!("First published: {date}");
    }
    if !detail.subjects.is_empty() {
        let subjects: Vec<&str> = detail.subjects.iter().take(10).map(String::as_str).collect();
        println!("Subjects: {}", subjects.join(", "));
    }
    println!("Cover: {}", listing.cover_url);
    println!("Price: {}", listing.price);
    if let Some(description) = &detail.description {
        println!();
        println!("{description}");
    }
    println!();
    println!("Run `bookpedia add 1` to add it to your cart.");

    remember(state, std::slice::from_ref(&listing))
}

fn remember(state: &AppState, listings: &[Listing]) -> Result<(), AppError> {
    storage::write_list(state.storage().as_ref(), keys::LISTINGS, listings)?;
    Ok(())
}
