//! Cart commands.

use bookpedia_core::Listing;
use bookpedia_storefront::session::{CartSession, CheckoutResult};
use bookpedia_storefront::storage::{self, keys};
use bookpedia_storefront::{AppError, AppState};

use crate::console::{ConsolePrompter, ConsoleRenderer, print_history};

fn session(state: &AppState, assume_yes: bool, renderer: ConsoleRenderer) -> CartSession {
    let mut session = state.cart_session(Box::new(ConsolePrompter::new(assume_yes)));
    session.subscribe(Box::new(renderer));
    session
}

/// Add book `number` (1-based) from the last listing shown.
pub fn add(state: &AppState, number: usize) -> Result<(), AppError> {
    let listings: Vec<Listing> = storage::read_list(state.storage().as_ref(), keys::LISTINGS);
    let listing = number
        .checked_sub(1)
        .and_then(|index| listings.get(index))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "No book #{number} in the last listing. Run `bookpedia home` or `bookpedia search` first."
            ))
        })?;

    let mut session = session(state, false, ConsoleRenderer::after_change());
    session.add_item(listing)?;
    Ok(())
}

/// Print the cart.
pub fn show(state: &AppState) {
    session(state, false, ConsoleRenderer::immediate());
}

/// Remove cart line `number` (1-based, as printed by `cart`).
pub fn remove(state: &AppState, number: usize) -> Result<(), AppError> {
    let index = number
        .checked_sub(1)
        .ok_or_else(|| AppError::BadRequest("Cart lines are numbered from 1.".to_string()))?;
    let mut session = session(state, false, ConsoleRenderer::after_change());
    let removed = session.remove_item(index)?;
    println!("Removed \"{}\"", removed.title);
    Ok(())
}

/// Empty the cart.
pub fn clear(state: &AppState) {
    session(state, false, ConsoleRenderer::after_change()).clear();
}

/// Check out as the logged-in user.
pub fn checkout(state: &AppState, assume_yes: bool) {
    let mut session = session(state, assume_yes, ConsoleRenderer::after_change());
    match session.checkout_current_user() {
        CheckoutResult::RequiresLogin => {
            println!("Please log in first: bookpedia login <email or name>");
        }
        CheckoutResult::Noop => println!("Your cart is empty."),
        CheckoutResult::Cancelled => println!("Checkout cancelled."),
        CheckoutResult::Confirmed { .. } => {}
    }
}

/// Print purchase history.
pub fn history(state: &AppState) {
    let saved = CartSession::load_state(state.storage().as_ref());
    print_history(&saved.purchased);
}
