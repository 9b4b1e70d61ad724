//! # Storefront
//!
//! Command-line explorer for the storefront catalog query layer.
//!
//! ## Usage
//!
//! ```bash
//! # Point at a catalog seed (defaults to config/catalog.toml)
//! export CATALOG_SEED=config/catalog.toml
//!
//! storefront category 3
//! storefront products 3 --attribute color:red --sort -price --first 10
//! storefront --staff product 103
//! storefront node Q2F0ZWdvcnk6Mw==
//! ```

use anyhow::Context as _;
use catalog_cli::{handlers, AppConfig, AppState};
use catalog_core::{
    CategoryFilter, Currency, DiscountValue, PageArgs, ProductFilter, ProductOrder, QueryContext,
    Requester, Sale, VIEW_PRODUCT_PERMISSION,
};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Query the storefront catalog
#[derive(Parser)]
#[command(name = "storefront")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Catalog seed file
    #[arg(long, global = true, env = "CATALOG_SEED")]
    seed: Option<PathBuf>,

    /// Query as staff holding the product.view_product permission
    #[arg(long, global = true)]
    staff: bool,

    /// Currency for local prices (defaults to CATALOG_CURRENCY)
    #[arg(long, global = true)]
    currency: Option<Currency>,

    /// Pin "today" for availability checks (YYYY-MM-DD)
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Percentage sale on a category, as CATEGORY_ID:PERCENT
    #[arg(long = "sale", global = true, value_parser = parse_sale)]
    sales: Vec<Sale>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a category with its ancestors, children and counts
    Category {
        id: i64,
    },

    /// List categories
    Categories {
        /// Case-insensitive name filter
        #[arg(long)]
        name: Option<String>,

        #[command(flatten)]
        page: PageOpts,
    },

    /// List the products of a category
    Products {
        category_id: i64,

        /// Attribute filter as SLUG:VALUE, may be repeated
        #[arg(long = "attribute")]
        attributes: Vec<String>,

        /// Minimum price, in the smallest currency unit
        #[arg(long)]
        price_gte: Option<i64>,

        /// Maximum price, in the smallest currency unit
        #[arg(long)]
        price_lte: Option<i64>,

        /// name, -name, price or -price
        #[arg(long, allow_hyphen_values = true)]
        sort: Option<ProductOrder>,

        /// Thumbnail size, e.g. 540x540
        #[arg(long)]
        thumbnail: Option<String>,

        #[command(flatten)]
        page: PageOpts,
    },

    /// Show one product
    Product {
        id: i64,

        /// Thumbnail size, e.g. 540x540
        #[arg(long)]
        thumbnail: Option<String>,
    },

    /// List attributes, optionally limited to a category subtree
    Attributes {
        #[arg(long)]
        category: Option<i64>,
    },

    /// Resolve an opaque global id
    Node {
        global_id: String,
    },

    /// Print the payment vocabularies
    PaymentChoices,
}

#[derive(Args)]
struct PageOpts {
    /// Page size
    #[arg(long)]
    first: Option<usize>,

    /// Cursor to continue after
    #[arg(long)]
    after: Option<String>,
}

impl From<PageOpts> for PageArgs {
    fn from(opts: PageOpts) -> Self {
        PageArgs {
            first: opts.first,
            after: opts.after,
            ..PageArgs::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging (stderr, so stdout stays parseable)
    let filter = EnvFilter::builder()
        .with_default_directive(Level::WARN.into())
        .from_env_lossy();
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    let state = AppState::new(AppConfig::from_env(cli.seed.clone()))?;
    info!("Environment: {}", state.config.environment);

    let mut ctx = query_context(&cli, &state);

    match cli.command {
        Commands::Category { id } => {
            let category = handlers::category(&state, &mut ctx, id).await?;
            print_found(category, || format!("category {id}"))
        }
        Commands::Categories { name, page } => {
            let filter = CategoryFilter { id: None, name };
            print_json(&handlers::categories(&state, &filter, &page.into()).await?)
        }
        Commands::Products {
            category_id,
            attributes,
            price_gte,
            price_lte,
            sort,
            thumbnail,
            page,
        } => {
            let mut filter = ProductFilter::default()
                .with_attributes(attributes.iter().map(String::as_str))?
                .with_price_range(price_gte, price_lte);
            if let Some(order) = sort {
                filter = filter.sorted_by(order);
            }
            let products = handlers::category_products(
                &state,
                &mut ctx,
                category_id,
                &filter,
                &page.into(),
                thumbnail.as_deref(),
            )
            .await?;
            print_found(products, || format!("category {category_id}"))
        }
        Commands::Product { id, thumbnail } => {
            let product = handlers::product(&state, &ctx, id, thumbnail.as_deref()).await?;
            print_found(product, || format!("product {id}"))
        }
        Commands::Attributes { category } => {
            print_json(&handlers::attributes(&state, category).await?)
        }
        Commands::Node { global_id } => {
            let node = handlers::node(&state, &mut ctx, &global_id).await?;
            print_found(node, || format!("node {global_id}"))
        }
        Commands::PaymentChoices => print_json(&handlers::payment_choices()),
    }
}

/// Request context for this invocation
fn query_context(cli: &Cli, state: &AppState) -> QueryContext {
    let requester = if cli.staff {
        Requester::staff(0, [VIEW_PRODUCT_PERMISSION])
    } else {
        Requester::anonymous()
    };

    let currency = cli
        .currency
        .unwrap_or(state.resolver.config().default_currency);
    let mut ctx = QueryContext::new(requester)
        .with_currency(currency)
        .with_discounts(cli.sales.clone());
    if let Some(date) = cli.date {
        ctx = ctx.on(date);
    }
    ctx
}

fn parse_sale(arg: &str) -> Result<Sale, String> {
    let (category, percent) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected CATEGORY_ID:PERCENT, got {arg:?}"))?;
    let category_id: i64 = category
        .parse()
        .map_err(|_| format!("invalid category id {category:?}"))?;
    let percent: u8 = percent
        .parse()
        .ok()
        .filter(|p| *p <= 100)
        .ok_or_else(|| format!("percent must be 0-100, got {percent:?}"))?;

    Ok(Sale {
        id: category_id,
        name: format!("{percent}% off category {category_id}"),
        value: DiscountValue::Percentage(percent),
        product_ids: Vec::new(),
        category_ids: vec![category_id],
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_found<T: Serialize>(value: Option<T>, what: impl FnOnce() -> String) -> anyhow::Result<()> {
    let value = value.with_context(|| format!("{} not found", what()))?;
    print_json(&value)
}
