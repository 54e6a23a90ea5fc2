//! Bookpedia CLI - browse Open Library, keep a cart, check out.
//!
//! # Usage
//!
//! ```bash
//! # Show the genre shelves, then add the third book
//! bookpedia home
//! bookpedia add 3
//!
//! # Search and inspect a result
//! bookpedia search the left hand of darkness
//! bookpedia show /works/OL59800W
//!
//! # Accounts and checkout
//! bookpedia signup -n Ada -e ada@example.com
//! bookpedia login ada@example.com
//! bookpedia checkout
//! ```
//!
//! # Environment Variables
//!
//! - `BOOKPEDIA_PASSWORD` - Password for `signup`/`login` (prompted if unset)
//! - `BOOKPEDIA_LOG_FORMAT` - Set to `json` for JSON logs on stderr
//! - `RUST_LOG` - Log filter (default: `bookpedia_cli=info,bookpedia_storefront=warn`)
//!
//! Storefront settings (`BOOKPEDIA_PROFILE_DIR`, `BOOKPEDIA_CATALOG_URL`, ...)
//! are described in `bookpedia_storefront::config`.

#![cfg_attr(not(test), forbid(unsafe_code))]
#![allow(clippy::print_stdout, clippy::print_stderr)]

use bookpedia_storefront::config::BookpediaConfig;
use bookpedia_storefront::{AppError, AppState};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod console;

#[derive(Parser)]
#[command(name = "bookpedia")]
#[command(author, version, about = "Bookpedia storefront in the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the Fiction, Non-Fiction and Science Fiction shelves
    Home,
    /// Search the catalog
    Search {
        /// Search terms
        #[arg(required = true)]
        query: Vec<String>,
    },
    /// Show details for a book
    Show {
        /// Work key, e.g. `/works/OL45804W`
        key: String,
    },
    /// Add a book from the last shelf or search to the cart
    Add {
        /// Book number as listed
        number: usize,
    },
    /// Show the cart
    Cart,
    /// Remove a line from the cart
    Remove {
        /// Line number as shown by `cart`
        number: usize,
    },
    /// Empty the cart
    Clear,
    /// Buy everything in the cart
    Checkout {
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
    /// Show purchase history
    History,
    /// Create an account
    Signup {
        /// Display name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password (prompted if not given)
        #[arg(long, env = "BOOKPEDIA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log in by email or name
    Login {
        /// Email address or display name
        identifier: String,

        /// Password (prompted if not given)
        #[arg(long, env = "BOOKPEDIA_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Log out
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Cycle through the login page quotes
    Quotes {
        /// How many quotes to show
        #[arg(short, long, default_value_t = 5)]
        count: usize,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        e.report();
        eprintln!("{}", e.user_message());
        std::process::exit(1);
    }
}

fn init_tracing() {
    // Storefront info logs would interleave with command output
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookpedia_cli=info,bookpedia_storefront=warn".into());

    // JSON on request for structured log collection, text otherwise
    let json = std::env::var("BOOKPEDIA_LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = BookpediaConfig::from_env()?;
    let state = AppState::new(config)?;

    match cli.command {
        Commands::Home => commands::catalog::home(&state).await?,
        Commands::Search { query } => commands::catalog::search(&state, &query.join(" ")).await?,
        Commands::Show { key } => commands::catalog::show(&state, &key).await?,
        Commands::Add { number } => commands::cart::add(&state, number)?,
        Commands::Cart => commands::cart::show(&state),
        Commands::Remove { number } => commands::cart::remove(&state, number)?,
        Commands::Clear => commands::cart::clear(&state),
        Commands::Checkout { yes } => commands::cart::checkout(&state, yes),
        Commands::History => commands::cart::history(&state),
        Commands::Signup {
            name,
            email,
            password,
        } => commands::account::signup(&state, &name, &email, password)?,
        Commands::Login {
            identifier,
            password,
        } => commands::account::login(&state, &identifier, password)?,
        Commands::Logout => commands::account::logout(&state)?,
        Commands::Whoami => commands::account::whoami(&state),
        Commands::Quotes { count } => commands::account::quotes(count).await,
    }
    Ok(())
}
