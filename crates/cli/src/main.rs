//! ZOCO CLI - Admin console on the command line.
//!
//! # Usage
//!
//! ```bash
//! # Catalog
//! zoco products list --category T-Shirts --max-price 40
//! zoco products get black-hoodie
//! zoco products create --file product.yaml
//! zoco upload ./hero.jpg
//!
//! # Site content
//! zoco content show
//! zoco content set --file content.yaml
//!
//! # Orders
//! zoco orders list
//! zoco dashboard
//! ```
//!
//! Uses the same environment as the storefront server (`SUPABASE_URL`,
//! `SUPABASE_ANON_KEY`, `STOREFRONT_DATA_DIR`, ...) and the same fallback
//! behaviour: with no reachable backend, answers come from the built-in
//! fixtures and the local data directory. Results are printed to stdout as
//! pretty JSON; logs go to stderr.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use zoco_core::Price;

mod commands;

#[derive(Parser)]
#[command(name = "zoco")]
#[command(author, version, about = "ZOCO storefront admin console")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse and create products
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Upload an image and print its URL
    Upload {
        /// Image file to upload
        path: PathBuf,
    },
    /// Show or replace the site content
    Content {
        #[command(subcommand)]
        action: ContentAction,
    },
    /// Inspect orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Revenue, order, and stock figures
    Dashboard,
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products, optionally filtered
    List {
        /// Exact category name
        #[arg(short, long)]
        category: Option<String>,

        /// Inclusive upper price bound
        #[arg(long)]
        max_price: Option<Price>,
    },
    /// Show a product by slug
    Get {
        /// Product slug
        slug: String,
    },
    /// Create a product from a YAML file
    Create {
        /// YAML file with the product fields
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum ContentAction {
    /// Print the current site content
    Show,
    /// Replace the site content from a YAML file
    Set {
        /// YAML file with the site content
        #[arg(short, long)]
        file: PathBuf,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List recent orders
    List,
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays valid JSON
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "zoco_storefront=warn,zoco_cli=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let api = commands::connect()?;

    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                max_price,
            } => commands::products::list(&api, category, max_price).await?,
            ProductsAction::Get { slug } => commands::products::get(&api, &slug).await?,
            ProductsAction::Create { file } => commands::products::create(&api, &file).await?,
        },
        Commands::Upload { path } => commands::upload::upload(&api, &path).await?,
        Commands::Content { action } => match action {
            ContentAction::Show => commands::content::show(&api).await?,
            ContentAction::Set { file } => commands::content::set(&api, &file).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List => commands::orders::list(&api)?,
        },
        Commands::Dashboard => commands::orders::dashboard(&api).await?,
    }
    Ok(())
}
