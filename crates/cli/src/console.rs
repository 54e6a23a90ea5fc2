//! Terminal implementations of the cart session collaborators, and the
//! printing shared by commands.

use std::cell::Cell;
use std::io::{self, BufRead, Write};

use bookpedia_core::{CartItem, Listing, Price, UNKNOWN_AUTHOR};
use bookpedia_storefront::session::{
    CartObserver, CartView, CheckoutSummary, Notice, NoticeError, Prompter, lines,
};

/// Prompts on stdin and prints notices to stdout.
#[derive(Debug, Clone, Copy)]
pub struct ConsolePrompter {
    assume_yes: bool,
}

impl ConsolePrompter {
    pub const fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for ConsolePrompter {
    fn confirm_checkout(&self, summary: &CheckoutSummary) -> bool {
        if self.assume_yes {
            return true;
        }
        let question = format!(
            "Buy {} book(s) for {}? [y/N] ",
            summary.item_count, summary.total
        );
        match prompt(&question) {
            Ok(answer) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!(error = %e, "could not read confirmation, cancelling");
                false
            }
        }
    }

    fn notify(&self, notice: &Notice) -> Result<(), NoticeError> {
        writeln!(io::stdout().lock(), "{notice}").map_err(|e| NoticeError(e.to_string()))
    }
}

/// Prints the cart whenever it changes.
///
/// Built with [`ConsoleRenderer::after_change`], the render that comes with
/// subscribing is skipped so only the result of the command is printed.
#[derive(Debug)]
pub struct ConsoleRenderer {
    skip_next: Cell<bool>,
}

impl ConsoleRenderer {
    /// Print on subscribe and on every change.
    pub const fn immediate() -> Self {
        Self {
            skip_next: Cell::new(false),
        }
    }

    /// Print on every change, but not on subscribe.
    pub const fn after_change() -> Self {
        Self {
            skip_next: Cell::new(true),
        }
    }
}

impl CartObserver for ConsoleRenderer {
    fn cart_changed(&self, view: &CartView) {
        if self.skip_next.replace(false) {
            return;
        }
        print_cart(view);
    }
}

/// Print a prompt and read one line from stdin.
pub fn prompt(question: &str) -> io::Result<String> {
    let mut stdout = io::stdout().lock();
    write!(stdout, "{question}")?;
    stdout.flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

pub fn print_cart(view: &CartView) {
    if view.is_empty() {
        println!("Your cart is empty.");
        return;
    }

    println!("Cart ({} item(s))", view.item_count);
    for line in &view.lines {
        println!(
            "  {:>2}. {} by {}  {}",
            line.index + 1,
            line.title,
            line.author,
            line.price
        );
    }
    println!("  Total: ${}", view.total);
    if view.buy_enabled {
        println!("  Run `bookpedia checkout` to buy.");
    } else {
        println!("  Log in to check out.");
    }
}

pub fn print_history(items: &[CartItem]) {
    if items.is_empty() {
        println!("No purchases yet.");
        return;
    }

    println!("Purchased books");
    for line in lines(items) {
        println!("  {} by {}  {}", line.title, line.author, line.price);
    }
    let spent: Price = items.iter().map(|item| item.price).sum();
    println!("  Total spent: {spent}");
}

/// Print listings numbered from `first`.
pub fn print_listings(first: usize, listings: &[Listing]) {
    for (offset, listing) in listings.iter().enumerate() {
        let record = &listing.record;
        println!(
            "  {:>2}. {} by {}  {}",
            first + offset,
            record.title,
            record.primary_author().unwrap_or(UNKNOWN_AUTHOR),
            listing.price
        );
    }
}
