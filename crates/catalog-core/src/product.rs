//! # Product Types
//!
//! Products, variants, stock records, images, product types and attributes
//! as stored in the catalog. Derived fields are computed by the resolvers.

use crate::pricing::Price;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One attribute value assigned to a product or variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeAssignment {
    /// Attribute id
    pub attribute: i64,
    /// Choice value id
    pub value: i64,
}

/// A product in the catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,

    /// Display name
    pub name: String,

    #[serde(default)]
    pub description: String,

    /// Owning category
    pub category_id: i64,

    /// Product type (drives which attributes apply)
    pub product_type_id: i64,

    /// Base price, used by variants without an override
    pub price: Price,

    #[serde(default = "default_true")]
    pub is_published: bool,

    /// Date from which the product may be shown; `None` means immediately
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub available_on: Option<NaiveDate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeAssignment>,
}

fn default_true() -> bool {
    true
}

impl Product {
    pub fn new(
        id: i64,
        name: impl Into<String>,
        category_id: i64,
        product_type_id: i64,
        price: Price,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            category_id,
            product_type_id,
            price,
            is_published: true,
            available_on: None,
            attributes: Vec::new(),
        }
    }

    /// Builder: mark unpublished
    pub fn unpublished(mut self) -> Self {
        self.is_published = false;
        self
    }

    /// Builder: set availability date
    pub fn available_from(mut self, date: NaiveDate) -> Self {
        self.available_on = Some(date);
        self
    }

    /// Builder: assign an attribute value
    pub fn with_attribute(mut self, attribute: i64, value: i64) -> Self {
        self.attributes.push(AttributeAssignment { attribute, value });
        self
    }

    /// Published and past its availability date
    pub fn is_available_on(&self, today: NaiveDate) -> bool {
        self.is_published && self.available_on.map_or(true, |date| date <= today)
    }

    /// Value assigned to `attribute`, if any
    pub fn attribute_value(&self, attribute: i64) -> Option<i64> {
        self.attributes
            .iter()
            .find(|a| a.attribute == attribute)
            .map(|a| a.value)
    }

    /// Slug derived from the product name
    pub fn slug(&self) -> String {
        slugify(&self.name)
    }

    /// Canonical storefront URL
    pub fn absolute_url(&self) -> String {
        format!("/products/{}-{}/", self.slug(), self.id)
    }
}

/// A purchasable variant of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: i64,
    pub product_id: i64,
    pub sku: String,

    #[serde(default)]
    pub name: String,

    /// Replaces the product's base price when set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_override: Option<Price>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attributes: Vec<AttributeAssignment>,
}

impl ProductVariant {
    pub fn new(id: i64, product_id: i64, sku: impl Into<String>) -> Self {
        Self {
            id,
            product_id,
            sku: sku.into(),
            name: String::new(),
            price_override: None,
            attributes: Vec::new(),
        }
    }

    /// Builder: set price override
    pub fn with_price_override(mut self, price: Price) -> Self {
        self.price_override = Some(price);
        self
    }

    /// Effective price given the product's base price
    pub fn price(&self, base: Price) -> Price {
        self.price_override.unwrap_or(base)
    }
}

/// Stock held for a variant at one location
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    pub id: i64,
    pub variant_id: i64,
    pub quantity: i32,
    #[serde(default)]
    pub quantity_allocated: i32,
}

impl Stock {
    /// Units not yet allocated to orders
    pub fn quantity_available(&self) -> i32 {
        (self.quantity - self.quantity_allocated).max(0)
    }
}

/// Stock quantity of a variant: the best single stock record, zero without stock
pub fn stock_quantity<'a>(stocks: impl IntoIterator<Item = &'a Stock>) -> i32 {
    stocks
        .into_iter()
        .map(Stock::quantity_available)
        .max()
        .unwrap_or(0)
}

/// An image attached to a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    pub id: i64,
    pub product_id: i64,

    /// Stored path relative to the media root (e.g., "products/shirt.jpg")
    pub image: String,

    #[serde(default)]
    pub alt: String,

    #[serde(default)]
    pub sort_order: i32,
}

/// A product type groups the attributes that apply to its products
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductType {
    pub id: i64,
    pub name: String,

    /// Attributes set on the product itself
    #[serde(default)]
    pub product_attributes: Vec<i64>,

    /// Attributes set on each variant
    #[serde(default)]
    pub variant_attributes: Vec<i64>,
}

impl ProductType {
    /// Whether `attribute` is attached through either path
    pub fn uses_attribute(&self, attribute: i64) -> bool {
        self.product_attributes.contains(&attribute) || self.variant_attributes.contains(&attribute)
    }
}

/// A product attribute (e.g., "Color")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductAttribute {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

/// One choice of an attribute (e.g., "Red")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeChoiceValue {
    pub id: i64,
    pub attribute_id: i64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub sort_order: i32,
}

/// Lowercase ASCII slug: alphanumerics kept, everything else collapsed to `-`
pub fn slugify(text: &str) -> String {
    let mut slug = String::with_capacity(text.len());
    for ch in text.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}
