//! Integration tests for the on-disk profile layout.
//!
//! Profiles written by the browser storefront store prices as JSON numbers
//! and sometimes carry numeric placeholder keys; both must load.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;

use bookpedia_core::{BookKey, CartItem};
use bookpedia_integration_tests::{file_storage, listing, recorded_session};
use bookpedia_storefront::session::CartSession;
use bookpedia_storefront::storage::{self, StorageError, keys};
use rust_decimal::Decimal;
use tempfile::TempDir;

#[test]
fn test_browser_profile_loads() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("bookpedia_cart.json"),
        r#"[
            {"key": "/works/OL45804W", "title": "Fantastic Mr Fox", "author": "Roald Dahl",
             "price": 14.37, "coverUrl": "https://covers.openlibrary.org/b/id/6498519-L.jpg"},
            {"key": 0.8812, "title": "Searched", "author": "Unknown",
             "price": 20, "coverUrl": "https://via.placeholder.com/220x330?text=No+Cover"}
        ]"#,
    )
    .unwrap();

    let state = CartSession::load_state(file_storage(dir.path()).as_ref());
    assert_eq!(state.items.len(), 2);
    assert_eq!(state.items[0].price.amount(), Decimal::new(1437, 2));
    assert!(state.items[1].key.is_placeholder());
    assert_eq!(state.total().format_amount(), "34.37");
}

#[test]
fn test_bad_entries_are_skipped() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("bookpedia_bought.json"),
        r#"[
            {"key": "/works/OL1W", "title": "Good", "author": "A", "price": 12.99, "coverUrl": "x"},
            {"key": "/works/OL2W", "title": "Negative", "author": "A", "price": -1, "coverUrl": "x"},
            {"title": "No key or price"},
            "just a string"
        ]"#,
    )
    .unwrap();

    let state = CartSession::load_state(file_storage(dir.path()).as_ref());
    assert_eq!(state.purchased.len(), 1);
    assert_eq!(state.purchased[0].title, "Good");
}

#[test]
fn test_next_write_drops_skipped_entries() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bookpedia_cart.json");
    fs::write(
        &path,
        r#"[
            {"key": "/works/OL1W", "title": "Good", "author": "A", "price": 12.99, "coverUrl": "x"},
            {"title": "No key or price"}
        ]"#,
    )
    .unwrap();

    let (mut session, _) = recorded_session(file_storage(dir.path()), None, true);
    session.add_item(&listing("Added", 1500)).unwrap();

    let raw: serde_json::Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    let stored_titles: Vec<&str> = raw
        .as_array()
        .unwrap()
        .iter()
        .map(|item| item["title"].as_str().unwrap())
        .collect();
    assert_eq!(stored_titles, ["Good", "Added"]);
}

#[test]
fn test_oversized_prices_are_dropped() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("bookpedia_cart.json"),
        r#"[
            {"key": "/works/OL1W", "title": "Huge", "author": "A", "price": 5e28, "coverUrl": "x"},
            {"key": "/works/OL2W", "title": "Huger", "author": "A", "price": 5e28, "coverUrl": "x"},
            {"key": "/works/OL3W", "title": "Normal", "author": "A", "price": 12.99, "coverUrl": "x"}
        ]"#,
    )
    .unwrap();

    let (session, transcript) = recorded_session(file_storage(dir.path()), None, true);

    assert_eq!(session.items().len(), 1);
    assert_eq!(session.items()[0].title, "Normal");
    assert_eq!(transcript.borrow().views[0].total, "12.99");
}

#[test]
fn test_cart_item_field_names() {
    let dir = TempDir::new().unwrap();
    let storage = file_storage(dir.path());
    let (mut session, _) = recorded_session(storage, None, true);
    session.add_item(&listing("Layout", 1299)).unwrap();

    let raw = fs::read_to_string(dir.path().join("bookpedia_cart.json")).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    let item = &value[0];
    assert_eq!(item["title"], "Layout");
    assert_eq!(item["price"], serde_json::json!(12.99));
    assert!(item["coverUrl"].is_string());
    assert!(item["author"].is_string());
    assert!(item["key"].is_string());
}

#[test]
fn test_writes_leave_no_temp_files() {
    let dir = TempDir::new().unwrap();
    let storage = file_storage(dir.path());
    let items = vec![CartItem::from_listing(&listing("A", 1500)).unwrap()];
    for _ in 0..3 {
        storage::write_list(storage.as_ref(), keys::CART, &items).unwrap();
    }

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["bookpedia_cart.json"]);
}

#[test]
fn test_keys_outside_the_profile_are_rejected() {
    let dir = TempDir::new().unwrap();
    let storage = file_storage(dir.path());
    assert!(matches!(
        storage.set_item("../escape", "[]"),
        Err(StorageError::InvalidKey(_))
    ));
}

#[test]
fn test_placeholder_keys_are_unique() {
    let first = BookKey::placeholder();
    let second = BookKey::placeholder();
    assert_ne!(first, second);
    assert!(first.as_str().starts_with("local:"));
}
