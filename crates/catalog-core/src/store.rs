//! # Catalog Store Trait
//!
//! The backing persistence store the resolvers read from. Every method is
//! one round-trip; resolvers are written so that the number of calls they
//! make does not grow with the number of products in a response.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │             CatalogStore (trait)             │
//! │  ├── category_tree()   one subtree fetch     │
//! │  ├── ancestors()       direct traversal      │
//! │  ├── products()        scoped product query  │
//! │  └── images_for() / variants_for() / ...     │
//! └──────────────────────────────────────────────┘
//!                       ▲
//!          ┌────────────┴────────────┐
//!  ┌───────┴───────┐         ┌───────┴───────┐
//!  │ InMemoryStore │         │ SQL store     │
//!  │ (seeded TOML) │         │ (external)    │
//!  └───────────────┘         └───────────────┘
//! ```

use crate::category::{Category, CategoryTree};
use crate::error::CatalogResult;
use crate::product::{
    AttributeChoiceValue, Product, ProductAttribute, ProductImage, ProductVariant, Stock,
};
use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::sync::Arc;

/// Which products a query may return, as decided by a visibility policy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductScope {
    /// Every product, published or not
    All,
    /// Published products available on the given date
    AvailableOn(NaiveDate),
}

impl ProductScope {
    pub fn admits(&self, product: &Product) -> bool {
        match self {
            ProductScope::All => true,
            ProductScope::AvailableOn(date) => product.is_available_on(*date),
        }
    }
}

/// Product query, composed the way a queryset is
#[derive(Debug, Clone)]
pub struct ProductQuery {
    pub scope: ProductScope,
    /// Restrict to these product ids
    pub ids: Option<Vec<i64>>,
    /// Restrict to products in any of these categories
    pub category_ids: Option<Vec<i64>>,
}

impl ProductQuery {
    pub fn new(scope: ProductScope) -> Self {
        Self {
            scope,
            ids: None,
            category_ids: None,
        }
    }

    pub fn with_ids(mut self, ids: Vec<i64>) -> Self {
        self.ids = Some(ids);
        self
    }

    pub fn in_categories(mut self, category_ids: Vec<i64>) -> Self {
        self.category_ids = Some(category_ids);
        self
    }

    /// Whether a stored product satisfies every clause
    pub fn matches(&self, product: &Product) -> bool {
        self.scope.admits(product)
            && self.ids.as_ref().map_or(true, |ids| ids.contains(&product.id))
            && self
                .category_ids
                .as_ref()
                .map_or(true, |ids| ids.contains(&product.category_id))
    }
}

/// Read access to the persisted catalog.
///
/// Implementations return rows ordered by id unless stated otherwise.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    /// Single category by local key
    async fn category(&self, id: i64) -> CatalogResult<Option<Category>>;

    /// All categories
    async fn categories(&self) -> CatalogResult<Vec<Category>>;

    /// The category and all its descendants in one fetch
    async fn category_tree(&self, id: i64) -> CatalogResult<Option<CategoryTree>>;

    /// Ancestors of a category, ordered root first, excluding the category
    async fn ancestors(&self, id: i64) -> CatalogResult<Vec<Category>>;

    /// Direct children of a category
    async fn children(&self, id: i64) -> CatalogResult<Vec<Category>>;

    /// Categories sharing the parent (roots are siblings of each other),
    /// excluding the category itself
    async fn siblings(&self, id: i64) -> CatalogResult<Vec<Category>>;

    /// Descendants in depth-first order, optionally including the category
    async fn descendants(&self, id: i64, include_self: bool) -> CatalogResult<Vec<Category>>;

    /// Products matching a query
    async fn products(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>>;

    /// Number of products directly in a category, regardless of visibility
    async fn product_count(&self, category_id: i64) -> CatalogResult<usize>;

    /// Images of several products, ordered by product then sort order
    async fn images_for(&self, product_ids: &[i64]) -> CatalogResult<Vec<ProductImage>>;

    /// Variants of several products
    async fn variants_for(&self, product_ids: &[i64]) -> CatalogResult<Vec<ProductVariant>>;

    /// Stock records of several variants
    async fn stocks_for(&self, variant_ids: &[i64]) -> CatalogResult<Vec<Stock>>;

    async fn variant(&self, id: i64) -> CatalogResult<Option<ProductVariant>>;

    async fn image(&self, id: i64) -> CatalogResult<Option<ProductImage>>;

    /// Distinct product type ids used by products in the given categories
    async fn product_type_ids_in(&self, category_ids: &[i64]) -> CatalogResult<BTreeSet<i64>>;

    /// All attributes
    async fn attributes(&self) -> CatalogResult<Vec<ProductAttribute>>;

    /// Distinct attributes attached to any of the product types, through
    /// either the product or the variant association
    async fn attributes_for_product_types(
        &self,
        product_type_ids: &BTreeSet<i64>,
    ) -> CatalogResult<Vec<ProductAttribute>>;

    async fn attribute(&self, id: i64) -> CatalogResult<Option<ProductAttribute>>;

    /// Choice values of several attributes, ordered by sort order
    async fn attribute_values(&self, attribute_ids: &[i64])
        -> CatalogResult<Vec<AttributeChoiceValue>>;

    async fn attribute_value(&self, id: i64) -> CatalogResult<Option<AttributeChoiceValue>>;
}

/// Type alias for a shared store (dynamic dispatch)
pub type BoxedCatalogStore = Arc<dyn CatalogStore>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pricing::{Currency, Price};

    #[test]
    fn test_query_matching() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        let product = Product::new(3, "Cap", 2, 1, Price::from_cents(1200, Currency::USD));
        let hidden = product.clone().unpublished();

        let query = ProductQuery::new(ProductScope::AvailableOn(today)).in_categories(vec![2]);
        assert!(query.matches(&product));
        assert!(!query.matches(&hidden));
        assert!(ProductQuery::new(ProductScope::All).matches(&hidden));
        assert!(!ProductQuery::new(ProductScope::All).with_ids(vec![4]).matches(&product));
    }
}
