//! Cart session: the single owner of cart and purchase history state.
//!
//! # Invariants
//!
//! - Every mutation writes the affected list(s) back to storage before it
//!   returns, so a reload sees exactly what the session holds.
//! - Observers are handed a freshly computed [`CartView`] after every
//!   mutation. The buy button state is recomputed from the identity source
//!   each time, never cached, because logout can happen while the cart is
//!   full.
//! - Reading corrupt storage never fails; it yields an empty list.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut session = CartSession::initialize(storage, accounts, Box::new(prompter));
//! session.subscribe(Box::new(renderer));
//! session.add_item(&listing)?;
//! match session.checkout_current_user() {
//!     CheckoutResult::RequiresLogin => redirect_to_login(),
//!     CheckoutResult::Confirmed { total } => println!("Paid {total}"),
//!     _ => {}
//! }
//! ```

mod notify;
mod view;

pub use notify::{
    AutoConfirm, CartObserver, CheckoutSummary, IdentitySource, Notice, NoticeError, Prompter,
};
pub use view::{CartLineView, CartView, lines};

use std::sync::Arc;

use bookpedia_core::{CartItem, CartItemError, IdentitySnapshot, Listing, Price};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::storage::{self, Storage, keys};

/// Errors returned by cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// The listing cannot become a cart item.
    #[error("invalid item: {0}")]
    InvalidItem(#[from] CartItemError),

    /// A removal index that does not point at a cart line.
    ///
    /// Callers should only pass indices taken from the current view.
    #[error("cart index {index} out of range (cart has {len} items)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Outcome of a checkout attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutResult {
    /// Nobody is logged in; send the user to the login page.
    RequiresLogin,
    /// The cart is empty; nothing to buy.
    Noop,
    /// The user declined the confirmation prompt.
    Cancelled,
    /// The cart moved into the purchase history.
    Confirmed { total: Price },
}

/// Cart contents and purchase history.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartState {
    /// Cart items in the order they were added. Duplicates are allowed.
    pub items: Vec<CartItem>,
    /// Everything bought so far, oldest first.
    pub purchased: Vec<CartItem>,
}

impl CartState {
    /// Exact sum of the cart item prices.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(|item| item.price).sum()
    }
}

/// Whether the buy button should be enabled.
///
/// True only when someone is logged in and the cart has at least one item.
#[must_use]
pub const fn compute_buy_eligibility(
    identity: Option<&IdentitySnapshot>,
    items: &[CartItem],
) -> bool {
    identity.is_some() && !items.is_empty()
}

/// The cart session.
///
/// Construct one per page/session with [`CartSession::initialize`]; it is
/// the only code that mutates the cart or history lists or writes them to
/// storage.
pub struct CartSession {
    storage: Arc<dyn Storage>,
    identity: Arc<dyn IdentitySource>,
    prompter: Box<dyn Prompter>,
    observers: Vec<Box<dyn CartObserver>>,
    state: CartState,
}

impl std::fmt::Debug for CartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartSession")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish_non_exhaustive()
    }
}

impl CartSession {
    /// Read cart and history from storage.
    ///
    /// Missing or malformed lists read as empty; this never fails.
    #[must_use]
    pub fn load_state(storage: &dyn Storage) -> CartState {
        let keep_valid = |items: Vec<CartItem>| -> Vec<CartItem> {
            items.into_iter().filter(CartItem::is_valid).collect()
        };

        CartState {
            items: keep_valid(storage::read_list(storage, keys::CART)),
            purchased: keep_valid(storage::read_list(storage, keys::PURCHASED)),
        }
    }

    /// Start a session from whatever is in storage.
    #[must_use]
    pub fn initialize(
        storage: Arc<dyn Storage>,
        identity: Arc<dyn IdentitySource>,
        prompter: Box<dyn Prompter>,
    ) -> Self {
        let state = Self::load_state(storage.as_ref());
        info!(
            items = state.items.len(),
            purchased = state.purchased.len(),
            "cart session initialized"
        );

        Self {
            storage,
            identity,
            prompter,
            observers: Vec::new(),
            state,
        }
    }

    /// Register an observer and render the current cart to it immediately.
    pub fn subscribe(&mut self, observer: Box<dyn CartObserver>) {
        observer.cart_changed(&self.view());
        self.observers.push(observer);
    }

    /// Current cart and history.
    #[must_use]
    pub const fn state(&self) -> &CartState {
        &self.state
    }

    /// Items in the cart.
    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.state.items
    }

    /// Purchase history.
    #[must_use]
    pub fn purchased(&self) -> &[CartItem] {
        &self.state.purchased
    }

    /// Exact cart total.
    #[must_use]
    pub fn total(&self) -> Price {
        self.state.total()
    }

    /// Whether checkout is currently possible.
    #[must_use]
    pub fn buy_enabled(&self) -> bool {
        compute_buy_eligibility(self.identity.current_user().as_ref(), &self.state.items)
    }

    /// Display data for the current cart.
    #[must_use]
    pub fn view(&self) -> CartView {
        CartView::new(&self.state.items, self.buy_enabled())
    }

    /// Push a fresh view to every observer.
    ///
    /// Mutations call this themselves; call it directly after something the
    /// session cannot see changes, such as a login or logout.
    pub fn refresh(&self) {
        if self.observers.is_empty() {
            return;
        }
        let view = self.view();
        for observer in &self.observers {
            observer.cart_changed(&view);
        }
    }

    /// Add a rendered listing to the cart.
    ///
    /// No duplicate check: adding the same listing twice gives two lines.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidItem` if the listing has no title.
    #[instrument(skip_all, fields(title = %listing.record.title))]
    pub fn add_item(&mut self, listing: &Listing) -> Result<(), CartError> {
        let item = CartItem::from_listing(listing)?;
        let title = item.title.clone();

        self.state.items.push(item);
        self.persist(keys::CART, &self.state.items);
        self.refresh();

        info!(items = self.state.items.len(), "added to cart");
        self.send(&Notice::Added { title });
        Ok(())
    }

    /// Remove the cart line at `index` and return it.
    ///
    /// # Errors
    ///
    /// Returns `CartError::IndexOutOfRange` without touching the cart if
    /// `index` is not a current line.
    #[instrument(skip(self))]
    pub fn remove_item(&mut self, index: usize) -> Result<CartItem, CartError> {
        let len = self.state.items.len();
        if index >= len {
            error!(index, len, "remove called with an index outside the cart");
            return Err(CartError::IndexOutOfRange { index, len });
        }

        let removed = self.state.items.remove(index);
        self.persist(keys::CART, &self.state.items);
        self.refresh();

        info!(title = %removed.title, "removed from cart");
        Ok(removed)
    }

    /// Empty the cart. Purchase history is untouched.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.state.items.clear();
        self.persist(keys::CART, &self.state.items);
        self.refresh();
        info!("cart cleared");
    }

    /// Buy everything in the cart on behalf of `identity`.
    ///
    /// Nothing changes unless someone is logged in, the cart is non-empty and
    /// the user confirms the prompt.
    #[instrument(skip_all, fields(logged_in = identity.is_some()))]
    pub fn checkout(&mut self, identity: Option<&IdentitySnapshot>) -> CheckoutResult {
        if identity.is_none() {
            info!("checkout requires login");
            return CheckoutResult::RequiresLogin;
        }
        if self.state.items.is_empty() {
            return CheckoutResult::Noop;
        }

        let summary = CheckoutSummary {
            item_count: self.state.items.len(),
            total: self.total(),
        };
        if !self.prompter.confirm_checkout(&summary) {
            info!("checkout cancelled");
            return CheckoutResult::Cancelled;
        }

        let bought = std::mem::take(&mut self.state.items);
        self.state.purchased.extend(bought);
        // The stored cart is only emptied once the history holds its items
        if self.persist(keys::PURCHASED, &self.state.purchased) {
            self.persist(keys::CART, &self.state.items);
        } else {
            warn!("history not saved, stored cart left in place");
        }
        self.refresh();

        info!(count = summary.item_count, total = %summary.total, "checkout confirmed");
        self.send(&Notice::Purchased {
            count: summary.item_count,
            total: summary.total,
        });
        CheckoutResult::Confirmed {
            total: summary.total,
        }
    }

    /// [`checkout`](Self::checkout) for whoever the identity source says is
    /// logged in.
    pub fn checkout_current_user(&mut self) -> CheckoutResult {
        let identity = self.identity.current_user();
        self.checkout(identity.as_ref())
    }

    /// Write `items` under `key`, warning the user on failure. Returns
    /// whether the write succeeded.
    fn persist(&self, key: &str, items: &[CartItem]) -> bool {
        match storage::write_list(self.storage.as_ref(), key, items) {
            Ok(()) => true,
            Err(e) => {
                warn!(key, error = %e, "failed to save cart state");
                self.send(&Notice::StorageWarning {
                    message: format!("your cart could not be saved ({e})"),
                });
                false
            }
        }
    }

    fn send(&self, notice: &Notice) {
        if let Err(e) = self.prompter.notify(notice) {
            warn!(error = %e, "notification not shown");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use bookpedia_core::{CatalogRecord, Email};

    use super::*;
    use crate::storage::{MemoryStorage, StorageError};

    fn listing(title: &str, cents: i64) -> Listing {
        Listing {
            record: CatalogRecord {
                title: title.to_string(),
                author_names: vec!["Author".to_string()],
                cover_image_id: None,
                key: Some(format!("/works/{title}")),
            },
            cover_url: "cover".to_string(),
            price: Price::from_cents(cents).unwrap(),
        }
    }

    fn reader() -> IdentitySnapshot {
        IdentitySnapshot {
            name: "Reader".to_string(),
            email: Email::parse("reader@example.com").unwrap(),
        }
    }

    #[derive(Default)]
    struct Recorder {
        notices: RefCell<Vec<Notice>>,
        prompts: RefCell<Vec<CheckoutSummary>>,
        views: RefCell<Vec<CartView>>,
    }

    struct RecordingPrompter {
        answer: bool,
        fail_notify: bool,
        recorder: Rc<Recorder>,
    }

    impl Prompter for RecordingPrompter {
        fn confirm_checkout(&self, summary: &CheckoutSummary) -> bool {
            self.recorder.prompts.borrow_mut().push(*summary);
            self.answer
        }

        fn notify(&self, notice: &Notice) -> Result<(), NoticeError> {
            if self.fail_notify {
                return Err(NoticeError("display closed".to_string()));
            }
            self.recorder.notices.borrow_mut().push(notice.clone());
            Ok(())
        }
    }

    struct RecordingObserver(Rc<Recorder>);

    impl CartObserver for RecordingObserver {
        fn cart_changed(&self, view: &CartView) {
            self.0.views.borrow_mut().push(view.clone());
        }
    }

    struct ReadOnlyStorage(MemoryStorage);

    impl Storage for ReadOnlyStorage {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.0.get_item(key)
        }

        fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }

        fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other("disk full")))
        }
    }

    /// Fails writes to one key only.
    struct FailingKey {
        inner: MemoryStorage,
        key: &'static str,
    }

    impl Storage for FailingKey {
        fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
            self.inner.get_item(key)
        }

        fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
            if key == self.key {
                return Err(StorageError::Io(std::io::Error::other("disk full")));
            }
            self.inner.set_item(key, value)
        }

        fn remove_item(&self, key: &str) -> Result<(), StorageError> {
            self.inner.remove_item(key)
        }
    }

    fn session_with(
        storage: Arc<dyn Storage>,
        identity: Option<IdentitySnapshot>,
        answer: bool,
    ) -> (CartSession, Rc<Recorder>) {
        let recorder = Rc::new(Recorder::default());
        let prompter = RecordingPrompter {
            answer,
            fail_notify: false,
            recorder: Rc::clone(&recorder),
        };
        let mut session = CartSession::initialize(storage, Arc::new(identity), Box::new(prompter));
        session.subscribe(Box::new(RecordingObserver(Rc::clone(&recorder))));
        (session, recorder)
    }

    #[test]
    fn test_add_persists_and_notifies() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, recorder) = session_with(storage.clone(), None, true);

        session.add_item(&listing("Dune", 1299)).unwrap();
        session.add_item(&listing("Dune", 1299)).unwrap();

        assert_eq!(session.items().len(), 2);
        let stored: Vec<CartItem> = storage::read_list(storage.as_ref(), keys::CART);
        assert_eq!(stored, session.items());
        assert_eq!(
            recorder.notices.borrow()[0],
            Notice::Added {
                title: "Dune".to_string()
            }
        );
        // initial render plus one per add
        assert_eq!(recorder.views.borrow().len(), 3);
        assert_eq!(recorder.views.borrow()[2].item_count, 2);
    }

    #[test]
    fn test_add_rejects_untitled_listing() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, _) = session_with(storage.clone(), None, true);

        let result = session.add_item(&listing(" ", 500));
        assert_eq!(
            result,
            Err(CartError::InvalidItem(CartItemError::EmptyTitle))
        );
        assert!(session.items().is_empty());
        assert_eq!(storage.get_item(keys::CART).unwrap(), None);
    }

    #[test]
    fn test_failed_notification_keeps_item() {
        let storage = Arc::new(MemoryStorage::new());
        let prompter = RecordingPrompter {
            answer: true,
            fail_notify: true,
            recorder: Rc::new(Recorder::default()),
        };
        let mut session = CartSession::initialize(
            storage,
            Arc::new(None::<IdentitySnapshot>),
            Box::new(prompter),
        );

        session.add_item(&listing("Dune", 1299)).unwrap();
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_remove_keeps_order() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, _) = session_with(storage.clone(), None, true);
        for title in ["A", "B", "C"] {
            session.add_item(&listing(title, 1000)).unwrap();
        }

        let removed = session.remove_item(1).unwrap();
        assert_eq!(removed.title, "B");

        let stored: Vec<CartItem> = storage::read_list(storage.as_ref(), keys::CART);
        let titles: Vec<_> = stored.iter().map(|item| item.title.as_str()).collect();
        assert_eq!(titles, ["A", "C"]);
    }

    #[test]
    fn test_remove_out_of_range() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, _) = session_with(storage, None, true);
        session.add_item(&listing("A", 1000)).unwrap();

        assert_eq!(
            session.remove_item(1),
            Err(CartError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert_eq!(session.items().len(), 1);
    }

    #[test]
    fn test_clear_keeps_history() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, _) = session_with(storage, Some(reader()), true);
        session.add_item(&listing("A", 1000)).unwrap();
        session.checkout_current_user();
        session.add_item(&listing("B", 2000)).unwrap();

        session.clear();
        session.clear();

        assert!(session.items().is_empty());
        assert_eq!(session.purchased().len(), 1);
    }

    #[test]
    fn test_checkout_requires_login() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, recorder) = session_with(storage, None, true);
        for title in ["A", "B", "C"] {
            session.add_item(&listing(title, 1000)).unwrap();
        }

        assert_eq!(session.checkout(None), CheckoutResult::RequiresLogin);
        assert_eq!(session.items().len(), 3);
        assert!(recorder.prompts.borrow().is_empty());
    }

    #[test]
    fn test_checkout_empty_cart_is_noop() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, recorder) = session_with(storage, Some(reader()), true);

        assert_eq!(session.checkout_current_user(), CheckoutResult::Noop);
        assert!(recorder.prompts.borrow().is_empty());
    }

    #[test]
    fn test_checkout_confirmed_moves_items() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, recorder) = session_with(storage.clone(), Some(reader()), true);
        session.add_item(&listing("A", 1000)).unwrap();
        session.add_item(&listing("B", 1550)).unwrap();

        let result = session.checkout(Some(&reader()));

        assert_eq!(
            result,
            CheckoutResult::Confirmed {
                total: Price::from_cents(2550).unwrap()
            }
        );
        assert_eq!(recorder.prompts.borrow()[0].item_count, 2);
        assert!(session.items().is_empty());
        let titles: Vec<_> = session.purchased().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);

        let reloaded = CartSession::load_state(storage.as_ref());
        assert_eq!(&reloaded, session.state());
        assert!(!recorder.views.borrow().last().unwrap().buy_enabled);
    }

    #[test]
    fn test_checkout_declined_changes_nothing() {
        let storage = Arc::new(MemoryStorage::new());
        let (mut session, _) = session_with(storage.clone(), Some(reader()), false);
        session.add_item(&listing("A", 1000)).unwrap();
        let cart_before = storage.get_item(keys::CART).unwrap();
        let bought_before = storage.get_item(keys::PURCHASED).unwrap();
        let state_before = session.state().clone();

        assert_eq!(session.checkout_current_user(), CheckoutResult::Cancelled);

        assert_eq!(session.state(), &state_before);
        assert_eq!(storage.get_item(keys::CART).unwrap(), cart_before);
        assert_eq!(storage.get_item(keys::PURCHASED).unwrap(), bought_before);
    }

    #[test]
    fn test_buy_eligibility() {
        let item = CartItem::from_listing(&listing("A", 1000)).unwrap();
        let who = reader();

        assert!(!compute_buy_eligibility(None, std::slice::from_ref(&item)));
        assert!(!compute_buy_eligibility(Some(&who), &[]));
        assert!(compute_buy_eligibility(Some(&who), &[item]));
    }

    #[test]
    fn test_write_failure_is_a_warning() {
        let storage = Arc::new(ReadOnlyStorage(MemoryStorage::new()));
        let (mut session, recorder) = session_with(storage, None, true);

        session.add_item(&listing("A", 1000)).unwrap();

        assert_eq!(session.items().len(), 1);
        assert!(
            recorder
                .notices
                .borrow()
                .iter()
                .any(|n| matches!(n, Notice::StorageWarning { .. }))
        );
    }

    #[test]
    fn test_checkout_keeps_stored_cart_when_history_write_fails() {
        let storage = Arc::new(FailingKey {
            inner: MemoryStorage::new(),
            key: keys::PURCHASED,
        });
        let (mut session, recorder) = session_with(storage.clone(), Some(reader()), true);
        session.add_item(&listing("A", 1000)).unwrap();
        session.add_item(&listing("B", 1550)).unwrap();

        session.checkout_current_user();

        let reloaded = CartSession::load_state(storage.as_ref());
        assert_eq!(reloaded.items.len(), 2);
        assert!(reloaded.purchased.is_empty());
        assert!(
            recorder
                .notices
                .borrow()
                .iter()
                .any(|n| matches!(n, Notice::StorageWarning { .. }))
        );
    }

    #[test]
    fn test_initialize_ignores_corrupt_storage() {
        let storage = Arc::new(MemoryStorage::new());
        storage.set_item(keys::CART, "definitely not json").unwrap();
        storage.set_item(keys::PURCHASED, r#"{"items":[]}"#).unwrap();

        let state = CartSession::load_state(storage.as_ref());
        assert_eq!(state, CartState::default());
        assert_eq!(CartSession::load_state(storage.as_ref()), state);
    }

    #[test]
    fn test_initialize_drops_untitled_items() {
        let storage = Arc::new(MemoryStorage::new());
        storage
            .set_item(
                keys::CART,
                r#"[{"key":"k","title":"","author":"A","price":1,"coverUrl":"c"},
                    {"key":"k2","title":"Kept","author":"A","price":1.5,"coverUrl":"c"}]"#,
            )
            .unwrap();

        let state = CartSession::load_state(storage.as_ref());
        assert_eq!(state.items.len(), 1);
        assert_eq!(state.items[0].title, "Kept");
    }
}
