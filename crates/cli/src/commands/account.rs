//! Account commands: signup, login, logout, whoami and the rotating quotes.

use bookpedia_storefront::accounts::{QUOTES, QuoteRotator, quotes::ROTATION_INTERVAL};
use bookpedia_storefront::session::IdentitySource;
use bookpedia_storefront::{AppError, AppState};
use rand::Rng;
use secrecy::SecretString;

use crate::console::{ConsolePrompter, ConsoleRenderer, prompt};

/// Use the given password, or ask for one.
fn password(given: Option<String>) -> Result<SecretString, AppError> {
    let password = match given {
        Some(password) => password,
        None => prompt("Password: ")
            .map_err(|e| AppError::BadRequest(format!("Could not read password: {e}")))?,
    };
    Ok(SecretString::from(password))
}

fn print_quote() {
    let rotator = QuoteRotator::starting_at(rand::rng().random_range(0..QUOTES.len()));
    println!("\"{}\"", rotator.current());
}

/// Create an account. Signing up does not log in.
pub fn signup(
    state: &AppState,
    name: &str,
    email: &str,
    given_password: Option<String>,
) -> Result<(), AppError> {
    print_quote();
    let password = password(given_password)?;
    let user = state.accounts().signup(name, email, &password)?;
    println!("Account created for {}. You can log in now.", user.email);
    Ok(())
}

/// Log in by email or name.
pub fn login(
    state: &AppState,
    identifier: &str,
    given_password: Option<String>,
) -> Result<(), AppError> {
    print_quote();
    let password = password(given_password)?;
    let user = state.accounts().login(identifier, &password)?;
    println!("Welcome back, {}!", user.name);
    Ok(())
}

/// Log out and show the cart as it now looks (buying disabled).
pub fn logout(state: &AppState) -> Result<(), AppError> {
    state.accounts().logout()?;
    println!("Logged out.");

    let mut session = state.cart_session(Box::new(ConsolePrompter::new(false)));
    session.subscribe(Box::new(ConsoleRenderer::after_change()));
    if !session.items().is_empty() {
        session.refresh();
    }
    Ok(())
}

/// Print the logged-in user.
pub fn whoami(state: &AppState) {
    match state.accounts().current_user() {
        Some(user) => println!("{} <{}>", user.name, user.email),
        None => println!("Not logged in."),
    }
}

/// Print `count` quotes, one every rotation interval.
pub async fn quotes(count: usize) {
    let mut rotator = QuoteRotator::new();
    let mut interval = tokio::time::interval(ROTATION_INTERVAL);
    for _ in 0..count {
        interval.tick().await;
        println!("\"{}\"", rotator.current());
        rotator.advance();
    }
}
