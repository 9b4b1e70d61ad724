//! # Collection Filters
//!
//! Arguments accepted by the category and product collection fields.

use crate::category::Category;
use crate::error::{CatalogError, CatalogResult};
use crate::product::Product;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Filter on the category collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    #[serde(default)]
    pub id: Option<i64>,
    /// Case-insensitive substring of the name
    #[serde(default)]
    pub name: Option<String>,
}

impl CategoryFilter {
    pub fn matches(&self, category: &Category) -> bool {
        self.id.map_or(true, |id| category.id == id)
            && self.name.as_ref().map_or(true, |name| {
                category.name.to_lowercase().contains(&name.to_lowercase())
            })
    }
}

/// Ordering of a product collection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProductOrder {
    NameAsc,
    NameDesc,
    PriceAsc,
    PriceDesc,
}

impl ProductOrder {
    pub fn sort(&self, products: &mut [Product]) {
        match self {
            ProductOrder::NameAsc => products.sort_by(|a, b| a.name.cmp(&b.name)),
            ProductOrder::NameDesc => products.sort_by(|a, b| b.name.cmp(&a.name)),
            ProductOrder::PriceAsc => products.sort_by_key(|p| p.price.amount),
            ProductOrder::PriceDesc => products.sort_by_key(|p| std::cmp::Reverse(p.price.amount)),
        }
    }
}

impl FromStr for ProductOrder {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "name" => Ok(ProductOrder::NameAsc),
            "-name" => Ok(ProductOrder::NameDesc),
            "price" => Ok(ProductOrder::PriceAsc),
            "-price" => Ok(ProductOrder::PriceDesc),
            other => Err(CatalogError::InvalidFilter(format!("unknown sort key {other}"))),
        }
    }
}

/// `attribute-slug:value-slug` pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeFilter {
    pub attribute: String,
    pub value: String,
}

impl FromStr for AttributeFilter {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((attribute, value)) if !attribute.is_empty() && !value.is_empty() => Ok(Self {
                attribute: attribute.to_string(),
                value: value.to_string(),
            }),
            _ => Err(CatalogError::InvalidFilter(format!(
                "attribute filter must be slug:value, got {s}"
            ))),
        }
    }
}

/// Filter on a product collection
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFilter {
    /// Minimum base price, smallest currency unit
    #[serde(default)]
    pub price_gte: Option<i64>,
    /// Maximum base price, smallest currency unit
    #[serde(default)]
    pub price_lte: Option<i64>,
    /// Every pair must match
    #[serde(default)]
    pub attributes: Vec<AttributeFilter>,
    #[serde(default)]
    pub sort_by: Option<ProductOrder>,
}

impl ProductFilter {
    /// Builder: attribute filters in `slug:value` form
    pub fn with_attributes<'a>(mut self, pairs: impl IntoIterator<Item = &'a str>) -> CatalogResult<Self> {
        for pair in pairs {
            self.attributes.push(pair.parse()?);
        }
        Ok(self)
    }

    /// Builder: base price bounds
    pub fn with_price_range(mut self, gte: Option<i64>, lte: Option<i64>) -> Self {
        self.price_gte = gte;
        self.price_lte = lte;
        self
    }

    /// Builder: ordering
    pub fn sorted_by(mut self, order: ProductOrder) -> Self {
        self.sort_by = Some(order);
        self
    }

    pub fn matches_price(&self, product: &Product) -> bool {
        self.price_gte.map_or(true, |min| product.price.amount >= min)
            && self.price_lte.map_or(true, |max| product.price.amount <= max)
    }
}
