//! # catalog-cli
//!
//! Command-line front end for storefront-catalog-rs.
//!
//! This crate provides:
//! - Seed loading and resolver wiring (`AppState`)
//! - One handler per subcommand, each returning a JSON-serializable view
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `category <id>` | Category with ancestors, children, siblings and counts |
//! | `categories` | Paginated category listing |
//! | `products <category>` | Filtered, sorted, paginated products of a category |
//! | `product <id>` | One product with images, variants and availability |
//! | `attributes` | Attributes, optionally limited to a category subtree |
//! | `node <global id>` | Resolve any node by opaque id |
//! | `payment-choices` | Payment vocabularies |

pub mod handlers;
pub mod state;

pub use state::{AppConfig, AppState};
