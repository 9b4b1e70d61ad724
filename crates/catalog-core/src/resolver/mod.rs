//! # Catalog Resolvers
//!
//! Field resolvers for the catalog entities. A `CatalogResolver` holds the
//! collaborators (store, visibility policy, availability calculator, image
//! cropper); per-request state travels separately in a `QueryContext`.
//!
//! ```rust,ignore
//! use catalog_core::{CatalogConfig, CatalogResolver, InMemoryStore, QueryContext};
//!
//! let store = Arc::new(InMemoryStore::from_toml(&seed)?);
//! let resolver = CatalogResolver::new(store, CatalogConfig::default());
//!
//! let mut ctx = QueryContext::anonymous();
//! if let Some(category) = resolver.resolve_category(4, &mut ctx).await? {
//!     // served from the ancestor cache built above
//!     let url = resolver.category_url(&category, &ctx).await?;
//! }
//! ```

mod attribute;
mod category;
mod global;
mod product;

pub use product::ProductAvailability;

use crate::availability::{AvailabilityCalculator, StandardAvailability};
use crate::category::Category;
use crate::config::CatalogConfig;
use crate::context::QueryContext;
use crate::error::CatalogResult;
use crate::product::{Product, ProductImage, ProductVariant};
use crate::store::{BoxedCatalogStore, ProductScope};
use crate::thumbnail::{ImageCropper, SizedPathCropper};
use crate::view::{ProductNode, VariantNode};
use crate::visibility::{PublishedProductsPolicy, VisibilityPolicy};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves catalog fields against a backing store
#[derive(Clone)]
pub struct CatalogResolver {
    store: BoxedCatalogStore,
    visibility: Arc<dyn VisibilityPolicy>,
    availability: Arc<dyn AvailabilityCalculator>,
    cropper: Arc<dyn ImageCropper>,
    config: CatalogConfig,
}

impl CatalogResolver {
    /// Resolver with the standard policy, calculator and cropper
    pub fn new(store: BoxedCatalogStore, config: CatalogConfig) -> Self {
        let cropper = SizedPathCropper::new(&config.media_url, &config.static_url);
        Self {
            store,
            visibility: Arc::new(PublishedProductsPolicy),
            availability: Arc::new(StandardAvailability::new()),
            cropper: Arc::new(cropper),
            config,
        }
    }

    /// Builder: replace the visibility policy
    pub fn with_visibility(mut self, policy: Arc<dyn VisibilityPolicy>) -> Self {
        self.visibility = policy;
        self
    }

    /// Builder: replace the availability calculator
    pub fn with_availability(mut self, calculator: Arc<dyn AvailabilityCalculator>) -> Self {
        self.availability = calculator;
        self
    }

    /// Builder: replace the image cropper
    pub fn with_cropper(mut self, cropper: Arc<dyn ImageCropper>) -> Self {
        self.cropper = cropper;
        self
    }

    pub fn store(&self) -> &BoxedCatalogStore {
        &self.store
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    fn product_scope(&self, ctx: &QueryContext) -> ProductScope {
        self.visibility.product_scope(&ctx.requester, ctx.today)
    }

    /// Load images, variants and stock for many products in three store
    /// calls, whatever the number of products. `category` is the already
    /// resolved category the products belong to.
    async fn prefetch(
        &self,
        products: Vec<Product>,
        category: &Category,
    ) -> CatalogResult<Vec<ProductNode>> {
        if products.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<i64> = products.iter().map(|p| p.id).collect();

        let images = self.store.images_for(&ids).await?;
        let variants = self.store.variants_for(&ids).await?;
        let variant_ids: Vec<i64> = variants.iter().map(|v| v.id).collect();
        let stocks = if variant_ids.is_empty() {
            Vec::new()
        } else {
            self.store.stocks_for(&variant_ids).await?
        };

        let mut images_by_product: HashMap<i64, Vec<ProductImage>> = HashMap::new();
        for image in images {
            images_by_product.entry(image.product_id).or_default().push(image);
        }
        let mut variants_by_product: HashMap<i64, Vec<ProductVariant>> = HashMap::new();
        for variant in variants {
            variants_by_product.entry(variant.product_id).or_default().push(variant);
        }

        Ok(products
            .into_iter()
            .map(|product| {
                let images = images_by_product.remove(&product.id).unwrap_or_default();
                let variants = variants_by_product.remove(&product.id).unwrap_or_default();
                let variants = VariantNode::group(variants, &stocks);
                ProductNode::prefetched(product, Some(category.clone()), images, variants)
            })
            .collect())
    }
}
