//! # catalog-core
//!
//! Storefront catalog query layer and payment vocabulary.
//!
//! This crate provides:
//! - `CatalogResolver` for resolving Category, Product, ProductVariant,
//!   ProductImage and ProductAttribute fields
//! - `AncestorCache`, the request-scoped memo of category ancestor chains
//! - `CatalogStore`, `VisibilityPolicy`, `AvailabilityCalculator` and
//!   `ImageCropper` collaborator traits with standard implementations
//! - `GlobalId` and `Node` for opaque identifier dispatch
//! - `TransactionKind`, `ChargeStatus`, `TransactionError`, `OperationType`,
//!   `CustomPaymentChoices`, `PaymentError` and `GatewayError`
//!
//! ## Example
//!
//! ```rust,ignore
//! use catalog_core::{CatalogConfig, CatalogResolver, InMemoryStore, QueryContext};
//!
//! let store = Arc::new(InMemoryStore::from_toml(&std::fs::read_to_string("config/catalog.toml")?)?);
//! let resolver = CatalogResolver::new(store, CatalogConfig::from_env()?);
//!
//! // One context per query execution
//! let mut ctx = QueryContext::anonymous();
//! let category = resolver.resolve_category(1, &mut ctx).await?;
//! ```

pub mod ancestors;
pub mod availability;
pub mod category;
pub mod config;
pub mod connection;
pub mod context;
pub mod error;
pub mod filter;
pub mod memory;
pub mod node;
pub mod payment;
pub mod pricing;
pub mod product;
pub mod resolver;
pub mod store;
pub mod thumbnail;
pub mod view;
pub mod visibility;

// Re-exports for convenience
pub use ancestors::AncestorCache;
pub use availability::{AvailabilityCalculator, AvailabilityInfo, DiscountValue, Sale, StandardAvailability};
pub use category::{Category, CategoryTree};
pub use config::CatalogConfig;
pub use connection::{Connection, Edge, PageArgs, PageInfo};
pub use context::QueryContext;
pub use error::{CatalogError, CatalogResult};
pub use filter::{AttributeFilter, CategoryFilter, ProductFilter, ProductOrder};
pub use memory::{CatalogSeed, InMemoryStore};
pub use node::{GlobalId, Node, NodeType};
pub use payment::{
    ChargeStatus, CustomPaymentChoices, GatewayError, OperationType, PaymentError,
    PaymentFailure, TransactionError, TransactionKind,
};
pub use pricing::{Currency, Price, PriceRange};
pub use product::{
    AttributeChoiceValue, Product, ProductAttribute, ProductImage, ProductType, ProductVariant,
    Stock,
};
pub use resolver::{CatalogResolver, ProductAvailability};
pub use store::{BoxedCatalogStore, CatalogStore, ProductQuery, ProductScope};
pub use thumbnail::{ImageCropper, SizedPathCropper, ThumbnailSize, DEFAULT_THUMBNAIL_SIZE};
pub use view::{ProductNode, VariantNode};
pub use visibility::{PublishedProductsPolicy, Requester, VisibilityPolicy, VIEW_PRODUCT_PERMISSION};
