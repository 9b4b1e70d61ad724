//! # In-Memory Catalog Store
//!
//! A `CatalogStore` seeded from TOML (see `config/catalog.toml`).
//! Every trait call counts as one round-trip so callers can check that a
//! resolution stays within a bounded number of store calls.

use crate::category::{Category, CategoryTree};
use crate::error::{CatalogError, CatalogResult};
use crate::product::{
    AttributeChoiceValue, Product, ProductAttribute, ProductImage, ProductType, ProductVariant,
    Stock,
};
use crate::store::{CatalogStore, ProductQuery};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};

/// Catalog contents as loaded from a seed file
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogSeed {
    pub categories: Vec<Category>,
    pub product_types: Vec<ProductType>,
    pub attributes: Vec<ProductAttribute>,
    pub attribute_values: Vec<AttributeChoiceValue>,
    pub products: Vec<Product>,
    pub variants: Vec<ProductVariant>,
    pub stocks: Vec<Stock>,
    pub images: Vec<ProductImage>,
}

impl CatalogSeed {
    /// Load seed from TOML string
    pub fn from_toml(toml_str: &str) -> CatalogResult<Self> {
        toml::from_str(toml_str).map_err(|e| CatalogError::Seed(e.to_string()))
    }
}

/// Seeded, read-only catalog held in memory
#[derive(Debug, Default)]
pub struct InMemoryStore {
    seed: CatalogSeed,
    round_trips: AtomicUsize,
}

impl InMemoryStore {
    /// Build a store, rejecting seeds with dangling parents or cycles
    pub fn from_seed(mut seed: CatalogSeed) -> CatalogResult<Self> {
        seed.categories.sort_by_key(|c| c.id);
        seed.products.sort_by_key(|p| p.id);
        seed.variants.sort_by_key(|v| v.id);
        seed.stocks.sort_by_key(|s| s.id);
        seed.images.sort_by_key(|i| (i.product_id, i.sort_order, i.id));
        seed.attributes.sort_by_key(|a| a.id);
        seed.attribute_values
            .sort_by_key(|v| (v.attribute_id, v.sort_order, v.id));

        let parents: HashMap<i64, Option<i64>> =
            seed.categories.iter().map(|c| (c.id, c.parent_id)).collect();
        for category in &seed.categories {
            let mut steps = 0;
            let mut cursor = category.parent_id;
            while let Some(parent) = cursor {
                cursor = *parents.get(&parent).ok_or_else(|| {
                    CatalogError::Seed(format!(
                        "category {} has unknown parent {}",
                        category.id, parent
                    ))
                })?;
                steps += 1;
                if steps > parents.len() {
                    return Err(CatalogError::Seed(format!(
                        "category {} is part of a cycle",
                        category.id
                    )));
                }
            }
        }

        tracing::debug!(
            categories = seed.categories.len(),
            products = seed.products.len(),
            "In-memory catalog ready"
        );

        Ok(Self {
            seed,
            round_trips: AtomicUsize::new(0),
        })
    }

    /// Parse and validate a TOML seed
    pub fn from_toml(toml_str: &str) -> CatalogResult<Self> {
        Self::from_seed(CatalogSeed::from_toml(toml_str)?)
    }

    /// Number of store calls served so far
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::Relaxed)
    }

    /// Reset the round-trip counter
    pub fn reset_round_trips(&self) {
        self.round_trips.store(0, Ordering::Relaxed);
    }

    fn tick(&self, call: &'static str) {
        self.round_trips.fetch_add(1, Ordering::Relaxed);
        tracing::trace!(call, "catalog store query");
    }

    fn find_category(&self, id: i64) -> Option<&Category> {
        self.seed.categories.iter().find(|c| c.id == id)
    }

    fn collect_descendants<'a>(&'a self, id: i64, out: &mut Vec<&'a Category>) {
        for child in self.seed.categories.iter().filter(|c| c.parent_id == Some(id)) {
            out.push(child);
            self.collect_descendants(child.id, out);
        }
    }

    fn descendants_of(&self, id: i64) -> Vec<Category> {
        let mut out = Vec::new();
        self.collect_descendants(id, &mut out);
        out.into_iter().cloned().collect()
    }
}

#[async_trait]
impl CatalogStore for InMemoryStore {
    async fn category(&self, id: i64) -> CatalogResult<Option<Category>> {
        self.tick("category");
        Ok(self.find_category(id).cloned())
    }

    async fn categories(&self) -> CatalogResult<Vec<Category>> {
        self.tick("categories");
        Ok(self.seed.categories.clone())
    }

    async fn category_tree(&self, id: i64) -> CatalogResult<Option<CategoryTree>> {
        self.tick("category_tree");
        Ok(self.find_category(id).map(|root| CategoryTree {
            root: root.clone(),
            nodes: self.descendants_of(id),
        }))
    }

    async fn ancestors(&self, id: i64) -> CatalogResult<Vec<Category>> {
        self.tick("ancestors");
        let mut chain = Vec::new();
        let mut cursor = self.find_category(id).and_then(|c| c.parent_id);
        while let Some(parent_id) = cursor {
            let parent = self.find_category(parent_id).ok_or_else(|| {
                CatalogError::Store(format!("dangling parent {parent_id}"))
            })?;
            cursor = parent.parent_id;
            chain.push(parent.clone());
        }
        chain.reverse();
        Ok(chain)
    }

    async fn children(&self, id: i64) -> CatalogResult<Vec<Category>> {
        self.tick("children");
        Ok(self
            .seed
            .categories
            .iter()
            .filter(|c| c.parent_id == Some(id))
            .cloned()
            .collect())
    }

    async fn siblings(&self, id: i64) -> CatalogResult<Vec<Category>> {
        self.tick("siblings");
        let Some(category) = self.find_category(id) else {
            return Ok(Vec::new());
        };
        Ok(self
            .seed
            .categories
            .iter()
            .filter(|c| c.parent_id == category.parent_id && c.id != id)
            .cloned()
            .collect())
    }

    async fn descendants(&self, id: i64, include_self: bool) -> CatalogResult<Vec<Category>> {
        self.tick("descendants");
        let Some(category) = self.find_category(id) else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        if include_self {
            out.push(category.clone());
        }
        out.extend(self.descendants_of(id));
        Ok(out)
    }

    async fn products(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>> {
        self.tick("products");
        Ok(self
            .seed
            .products
            .iter()
            .filter(|p| query.matches(p))
            .cloned()
            .collect())
    }

    async fn product_count(&self, category_id: i64) -> CatalogResult<usize> {
        self.tick("product_count");
        Ok(self
            .seed
            .products
            .iter()
            .filter(|p| p.category_id == category_id)
            .count())
    }

    async fn images_for(&self, product_ids: &[i64]) -> CatalogResult<Vec<ProductImage>> {
        self.tick("images_for");
        Ok(self
            .seed
            .images
            .iter()
            .filter(|i| product_ids.contains(&i.product_id))
            .cloned()
            .collect())
    }

    async fn variants_for(&self, product_ids: &[i64]) -> CatalogResult<Vec<ProductVariant>> {
        self.tick("variants_for");
        Ok(self
            .seed
            .variants
            .iter()
            .filter(|v| product_ids.contains(&v.product_id))
            .cloned()
            .collect())
    }

    async fn stocks_for(&self, variant_ids: &[i64]) -> CatalogResult<Vec<Stock>> {
        self.tick("stocks_for");
        Ok(self
            .seed
            .stocks
            .iter()
            .filter(|s| variant_ids.contains(&s.variant_id))
            .cloned()
            .collect())
    }

    async fn variant(&self, id: i64) -> CatalogResult<Option<ProductVariant>> {
        self.tick("variant");
        Ok(self.seed.variants.iter().find(|v| v.id == id).cloned())
    }

    async fn image(&self, id: i64) -> CatalogResult<Option<ProductImage>> {
        self.tick("image");
        Ok(self.seed.images.iter().find(|i| i.id == id).cloned())
    }

    async fn product_type_ids_in(&self, category_ids: &[i64]) -> CatalogResult<BTreeSet<i64>> {
        self.tick("product_type_ids_in");
        Ok(self
            .seed
            .products
            .iter()
            .filter(|p| category_ids.contains(&p.category_id))
            .map(|p| p.product_type_id)
            .collect())
    }

    async fn attributes(&self) -> CatalogResult<Vec<ProductAttribute>> {
        self.tick("attributes");
        Ok(self.seed.attributes.clone())
    }

    async fn attributes_for_product_types(
        &self,
        product_type_ids: &BTreeSet<i64>,
    ) -> CatalogResult<Vec<ProductAttribute>> {
        self.tick("attributes_for_product_types");
        let types: Vec<&ProductType> = self
            .seed
            .product_types
            .iter()
            .filter(|t| product_type_ids.contains(&t.id))
            .collect();
        Ok(self
            .seed
            .attributes
            .iter()
            .filter(|a| types.iter().any(|t| t.uses_attribute(a.id)))
            .cloned()
            .collect())
    }

    async fn attribute(&self, id: i64) -> CatalogResult<Option<ProductAttribute>> {
        self.tick("attribute");
        Ok(self.seed.attributes.iter().find(|a| a.id == id).cloned())
    }

    async fn attribute_values(
        &self,
        attribute_ids: &[i64],
    ) -> CatalogResult<Vec<AttributeChoiceValue>> {
        self.tick("attribute_values");
        Ok(self
            .seed
            .attribute_values
            .iter()
            .filter(|v| attribute_ids.contains(&v.attribute_id))
            .cloned()
            .collect())
    }

    async fn attribute_value(&self, id: i64) -> CatalogResult<Option<AttributeChoiceValue>> {
        self.tick("attribute_value");
        Ok(self.seed.attribute_values.iter().find(|v| v.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = r#"
        [[categories]]
        id = 1
        name = "Apparel"
        slug = "apparel"

        [[categories]]
        id = 2
        name = "Shirts"
        slug = "shirts"
        parent_id = 1

        [[categories]]
        id = 3
        name = "T-Shirts"
        slug = "t-shirts"
        parent_id = 2

        [[categories]]
        id = 4
        name = "Hats"
        slug = "hats"
        parent_id = 1

        [[products]]
        id = 10
        name = "Plain Tee"
        category_id = 3
        product_type_id = 1
        price = { amount = 1500, currency = "USD" }
    "#;

    #[tokio::test]
    async fn test_tree_and_ancestors() {
        let store = InMemoryStore::from_toml(SEED).unwrap();

        let tree = store.category_tree(1).await.unwrap().unwrap();
        let ids: Vec<i64> = tree.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);

        let ancestors: Vec<i64> = store.ancestors(3).await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(ancestors, vec![1, 2]);
        assert!(store.ancestors(1).await.unwrap().is_empty());
        assert_eq!(store.round_trips(), 3);
    }

    #[tokio::test]
    async fn test_siblings_and_descendants() {
        let store = InMemoryStore::from_toml(SEED).unwrap();

        let siblings: Vec<i64> = store.siblings(2).await.unwrap().iter().map(|c| c.id).collect();
        assert_eq!(siblings, vec![4]);

        let with_self = store.descendants(2, true).await.unwrap();
        assert_eq!(with_self.len(), 2);
        assert!(store.descendants(99, true).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_round_trip_counter_reset() {
        let store = InMemoryStore::from_toml(SEED).unwrap();
        store.product_count(3).await.unwrap();
        assert_eq!(store.round_trips(), 1);
        store.reset_round_trips();
        assert_eq!(store.round_trips(), 0);
    }

    #[test]
    fn test_rejects_dangling_parent() {
        let seed = CatalogSeed {
            categories: vec![Category::new(1, "Orphan", "orphan").with_parent(9)],
            ..Default::default()
        };
        let err = InMemoryStore::from_seed(seed).unwrap_err();
        assert!(err.to_string().contains("unknown parent 9"));
    }

    #[test]
    fn test_rejects_cycle() {
        let seed = CatalogSeed {
            categories: vec![
                Category::new(1, "A", "a").with_parent(2),
                Category::new(2, "B", "b").with_parent(1),
            ],
            ..Default::default()
        };
        assert!(matches!(
            InMemoryStore::from_seed(seed),
            Err(CatalogError::Seed(_))
        ));
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            InMemoryStore::from_toml("categories = 5"),
            Err(CatalogError::Seed(_))
        ));
    }
}
