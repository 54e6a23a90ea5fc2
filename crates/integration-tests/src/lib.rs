//! Integration tests for Bookpedia.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p bookpedia-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_session` - cart and history behavior over file-backed storage
//! - `accounts` - signup, login and the buy button
//! - `storage` - the on-disk profile layout
//!
//! Nothing here touches the network.

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use bookpedia_core::{CatalogRecord, IdentitySnapshot, Listing, Price};
use bookpedia_storefront::session::{
    CartObserver, CartSession, CartView, CheckoutSummary, IdentitySource, Notice, NoticeError,
    Prompter,
};
use bookpedia_storefront::storage::{FileStorage, Storage};

/// A listing as the catalog renderer would produce it.
#[must_use]
pub fn listing(title: &str, cents: u32) -> Listing {
    Listing {
        record: CatalogRecord {
            title: title.to_string(),
            author_names: vec![format!("Author of {title}")],
            cover_image_id: None,
            key: Some(format!("/works/{}", title.replace(' ', ""))),
        },
        cover_url: "https://via.placeholder.com/220x330?text=No+Cover".to_string(),
        price: Price::from_whole_cents(cents),
    }
}

/// A file-backed profile in `dir`.
#[must_use]
pub fn file_storage(dir: &Path) -> Arc<dyn Storage> {
    Arc::new(FileStorage::new(dir))
}

/// Shared log of what the session asked and told the user.
#[derive(Debug, Default)]
pub struct Transcript {
    pub confirmations: Vec<CheckoutSummary>,
    pub notices: Vec<Notice>,
    pub views: Vec<CartView>,
}

/// Answers checkout prompts with a fixed answer and records everything.
#[derive(Debug, Clone)]
pub struct ScriptedPrompter {
    pub answer: bool,
    pub transcript: Rc<RefCell<Transcript>>,
}

impl Prompter for ScriptedPrompter {
    fn confirm_checkout(&self, summary: &CheckoutSummary) -> bool {
        self.transcript.borrow_mut().confirmations.push(*summary);
        self.answer
    }

    fn notify(&self, notice: &Notice) -> Result<(), NoticeError> {
        self.transcript.borrow_mut().notices.push(notice.clone());
        Ok(())
    }
}

/// Records every rendered cart view.
#[derive(Debug, Clone)]
pub struct RecordingObserver {
    pub transcript: Rc<RefCell<Transcript>>,
}

impl CartObserver for RecordingObserver {
    fn cart_changed(&self, view: &CartView) {
        self.transcript.borrow_mut().views.push(view.clone());
    }
}

/// Start a recorded session over `storage` with a fixed identity.
#[must_use]
pub fn recorded_session(
    storage: Arc<dyn Storage>,
    identity: Option<IdentitySnapshot>,
    answer: bool,
) -> (CartSession, Rc<RefCell<Transcript>>) {
    recorded_session_with(storage, Arc::new(identity), answer)
}

/// Start a recorded session over `storage` with any identity source.
#[must_use]
pub fn recorded_session_with(
    storage: Arc<dyn Storage>,
    identity: Arc<dyn IdentitySource>,
    answer: bool,
) -> (CartSession, Rc<RefCell<Transcript>>) {
    let transcript = Rc::new(RefCell::new(Transcript::default()));
    let prompter = ScriptedPrompter {
        answer,
        transcript: Rc::clone(&transcript),
    };
    let mut session = CartSession::initialize(storage, identity, Box::new(prompter));
    session.subscribe(Box::new(RecordingObserver {
        transcript: Rc::clone(&transcript),
    }));
    (session, transcript)
}
