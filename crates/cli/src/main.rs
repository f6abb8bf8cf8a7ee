//! Tiffin CLI - browse the menu, manage the cart and place orders.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! tiffin menu --category pizza
//! tiffin menu --search paneer
//!
//! # Manage the cart
//! tiffin cart add "Margherita Pizza"
//! tiffin cart set "Margherita Pizza" 3
//! tiffin cart show
//!
//! # Place the order
//! tiffin checkout
//! tiffin confirm
//!
//! # Forms
//! tiffin login -n "Asha Rao" -p 9876543210
//! tiffin subscribe asha@example.com
//! ```
//!
//! State is kept as JSON files under `TIFFIN_DATA_DIR` (default `.tiffin`).
//! Set `RUST_LOG` to change verbosity.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use tiffin_storefront::StorefrontConfig;

mod commands;

use commands::Context;

#[derive(Parser)]
#[command(name = "tiffin")]
#[command(author, version, about = "Tiffin food-ordering storefront")]
struct Cli {
    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the menu
    Menu {
        /// Only show this category ("all" shows everything)
        #[arg(short, long)]
        category: Option<String>,

        /// Only show items whose name or description contains this text
        #[arg(short, long)]
        search: Option<String>,

        /// Show menu statistics instead of items
        #[arg(long)]
        stats: bool,
    },
    /// Show or change the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Show the order summary
    Checkout,
    /// Confirm the order and empty the cart
    Confirm,
    /// List past orders
    Orders,
    /// Log in with name and phone number
    Login {
        #[arg(short, long)]
        name: String,

        /// 10-digit mobile number
        #[arg(short, long)]
        phone: String,
    },
    /// Save the delivery address
    Address {
        /// House or flat number
        #[arg(long)]
        house: String,

        #[arg(long)]
        street: String,

        #[arg(long)]
        city: String,

        #[arg(long)]
        state: String,

        /// 6-digit postal code
        #[arg(long)]
        pincode: String,
    },
    /// Post a review
    Review {
        #[arg(short, long)]
        name: String,

        /// Star rating (1-5)
        #[arg(short, long, default_value = "")]
        rating: String,

        #[arg(short, long)]
        text: String,
    },
    /// Subscribe to the newsletter
    Subscribe {
        /// E-mail address
        email: String,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show the cart (default)
    Show,
    /// Add one unit of a menu item
    Add {
        /// Menu item name
        name: String,
    },
    /// Remove a line from the cart
    Remove { name: String },
    /// Set the quantity of a line; zero or less removes it
    Set {
        name: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
}

#[tokio::main]
async fn main() {
    // Load .env before the log filter reads RUST_LOG
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    init_tracing(cli.json_logs);

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn init_tracing(json: bool) {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "tiffin_cli=info,tiffin_storefront=info".into());

    let registry = tracing_subscriber::registry().with(env_filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_target(false))
            .init();
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = StorefrontConfig::from_env()?;
    let ctx = Context::open(config)?;

    match cli.command {
        Commands::Menu {
            category,
            search,
            stats,
        } => {
            if stats {
                commands::menu::stats()?;
            } else {
                commands::menu::list(category.as_deref(), search.as_deref())?;
            }
        }
        Commands::Cart { action } => match action.unwrap_or(CartAction::Show) {
            CartAction::Show => commands::cart::show(&ctx),
            CartAction::Add { name } => commands::cart::add(&ctx, &name)?,
            CartAction::Remove { name } => commands::cart::remove(&ctx, &name),
            CartAction::Set { name, quantity } => commands::cart::set(&ctx, &name, quantity),
            CartAction::Clear => commands::cart::clear(&ctx),
        },
        Commands::Checkout => commands::cart::checkout(&ctx)?,
        Commands::Confirm => commands::cart::confirm(&ctx).await?,
        Commands::Orders => commands::cart::orders(&ctx),
        Commands::Login { name, phone } => commands::account::login(&ctx, &name, &phone).await?,
        Commands::Address {
            house,
            street,
            city,
            state,
            pincode,
        } => {
            let address = commands::account::AddressInput {
                house_flat_no: house,
                street_name: street,
                city,
                state,
                pincode,
            };
            commands::account::address(&ctx, address).await?;
        }
        Commands::Review { name, rating, text } => {
            commands::account::review(&ctx, &name, &rating, &text).await?;
        }
        Commands::Subscribe { email } => commands::account::subscribe(&ctx, &email).await?,
    }
    Ok(())
}
