//! # Resolved Views
//!
//! Entities as handed out by the resolvers. A `ProductNode` produced by a
//! collection query carries its category, images and variants (with stock)
//! already loaded, so nested fields resolve without further store calls.

use crate::category::Category;
use crate::product::{stock_quantity, Product, ProductImage, ProductVariant, Stock};
use serde::Serialize;

/// A variant together with its stock records
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantNode {
    #[serde(flatten)]
    pub variant: ProductVariant,
    #[serde(skip)]
    pub stocks: Vec<Stock>,
}

impl VariantNode {
    pub fn new(variant: ProductVariant, stocks: Vec<Stock>) -> Self {
        Self { variant, stocks }
    }

    /// Units available for sale
    pub fn stock_quantity(&self) -> i32 {
        stock_quantity(&self.stocks)
    }

    /// Group stock rows under their variants, preserving variant order
    pub fn group(variants: Vec<ProductVariant>, stocks: &[Stock]) -> Vec<VariantNode> {
        variants
            .into_iter()
            .map(|variant| {
                let own = stocks
                    .iter()
                    .filter(|s| s.variant_id == variant.id)
                    .cloned()
                    .collect();
                VariantNode::new(variant, own)
            })
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Prefetched {
    category: Option<Category>,
    images: Vec<ProductImage>,
    variants: Vec<VariantNode>,
}

/// A product, optionally with related collections preloaded
#[derive(Debug, Clone)]
pub struct ProductNode {
    pub product: Product,
    prefetched: Option<Prefetched>,
}

impl ProductNode {
    /// Product without preloaded relations
    pub fn new(product: Product) -> Self {
        Self {
            product,
            prefetched: None,
        }
    }

    /// Product with category, images and variants already loaded.
    /// A category that does not match `product.category_id` is dropped.
    pub fn prefetched(
        product: Product,
        category: Option<Category>,
        images: Vec<ProductImage>,
        variants: Vec<VariantNode>,
    ) -> Self {
        let category = category.filter(|c| c.id == product.category_id);
        Self {
            product,
            prefetched: Some(Prefetched {
                category,
                images,
                variants,
            }),
        }
    }

    pub fn id(&self) -> i64 {
        self.product.id
    }

    pub fn is_prefetched(&self) -> bool {
        self.prefetched.is_some()
    }

    pub fn prefetched_category(&self) -> Option<&Category> {
        self.prefetched.as_ref().and_then(|p| p.category.as_ref())
    }

    pub fn prefetched_images(&self) -> Option<&[ProductImage]> {
        self.prefetched.as_ref().map(|p| p.images.as_slice())
    }

    pub fn prefetched_variants(&self) -> Option<&[VariantNode]> {
        self.prefetched.as_ref().map(|p| p.variants.as_slice())
    }
}
