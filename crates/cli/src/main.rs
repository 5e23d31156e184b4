//! Sous Chef CLI - Database migrations and order inspection.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! sous-chef migrate
//!
//! # Show a user's order history
//! sous-chef orders history --user 7
//!
//! # Price a cart without touching the database
//! sous-chef orders price --item 9003:2:1.50 --item 11215:3:0.99
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `orders history` - Aggregated order history for a user
//! - `orders price` - Price an ad-hoc cart

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

use sous_chef_core::{LineItem, UserId};

mod commands;

#[derive(Parser)]
#[command(name = "sous-chef")]
#[command(author, version, about = "Sous Chef CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Inspect and price orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// Print a user's order history, newest first
    History {
        /// User ID
        #[arg(short, long)]
        user: i32,
    },
    /// Price a cart
    Price {
        /// Line item as `ingredient:count:price` (repeatable)
        #[arg(short, long = "item", required = true, value_parser = commands::orders::parse_item)]
        items: Vec<LineItem>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Orders { action } => match action {
            OrdersAction::History { user } => {
                commands::orders::history(UserId::new(user)).await?;
            }
            OrdersAction::Price { items } => commands::orders::price(&items)?,
        },
    }
    Ok(())
}
