//! # Global Identifiers
//!
//! Opaque ids exposed to clients: base64 of `"<Type>:<local key>"`.
//! Decoding yields the entity type tag and the local key; `Node` is the
//! tagged union the resolver dispatches into.

use crate::category::Category;
use crate::error::{CatalogError, CatalogResult};
use crate::product::{AttributeChoiceValue, ProductAttribute, ProductImage};
use crate::view::{ProductNode, VariantNode};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Entity types reachable by global id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    Product,
    Category,
    ProductVariant,
    ProductImage,
    ProductAttribute,
    ProductAttributeValue,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Product => "Product",
            NodeType::Category => "Category",
            NodeType::ProductVariant => "ProductVariant",
            NodeType::ProductImage => "ProductImage",
            NodeType::ProductAttribute => "ProductAttribute",
            NodeType::ProductAttributeValue => "ProductAttributeValue",
        }
    }
}

impl FromStr for NodeType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Product" => Ok(NodeType::Product),
            "Category" => Ok(NodeType::Category),
            "ProductVariant" => Ok(NodeType::ProductVariant),
            "ProductImage" => Ok(NodeType::ProductImage),
            "ProductAttribute" => Ok(NodeType::ProductAttribute),
            "ProductAttributeValue" => Ok(NodeType::ProductAttributeValue),
            other => Err(CatalogError::InvalidGlobalId(format!("unknown type {other}"))),
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type tag plus local key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GlobalId {
    pub node_type: NodeType,
    pub local_key: i64,
}

impl GlobalId {
    pub fn new(node_type: NodeType, local_key: i64) -> Self {
        Self { node_type, local_key }
    }

    /// Opaque string form
    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}:{}", self.node_type, self.local_key))
    }

    /// Parse the opaque string form
    pub fn decode(encoded: &str) -> CatalogResult<Self> {
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| CatalogError::InvalidGlobalId(format!("{encoded}: {e}")))?;
        let raw = String::from_utf8(bytes)
            .map_err(|_| CatalogError::InvalidGlobalId(format!("{encoded}: not utf-8")))?;
        let (node_type, key) = raw
            .split_once(':')
            .ok_or_else(|| CatalogError::InvalidGlobalId(format!("{encoded}: missing type")))?;
        let local_key = key
            .parse()
            .map_err(|_| CatalogError::InvalidGlobalId(format!("{encoded}: bad key {key:?}")))?;
        Ok(Self::new(node_type.parse()?, local_key))
    }
}

impl fmt::Display for GlobalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for GlobalId {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

/// Any entity reachable by global id
#[derive(Debug, Clone)]
pub enum Node {
    Product(ProductNode),
    Category(Category),
    ProductVariant(VariantNode),
    ProductImage(ProductImage),
    ProductAttribute(ProductAttribute),
    ProductAttributeValue(AttributeChoiceValue),
}

impl Node {
    /// The global id this node answers to
    pub fn global_id(&self) -> GlobalId {
        match self {
            Node::Product(p) => GlobalId::new(NodeType::Product, p.id()),
            Node::Category(c) => GlobalId::new(NodeType::Category, c.id),
            Node::ProductVariant(v) => GlobalId::new(NodeType::ProductVariant, v.variant.id),
            Node::ProductImage(i) => GlobalId::new(NodeType::ProductImage, i.id),
            Node::ProductAttribute(a) => GlobalId::new(NodeType::ProductAttribute, a.id),
            Node::ProductAttributeValue(v) => GlobalId::new(NodeType::ProductAttributeValue, v.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_encoding() {
        let id = GlobalId::new(NodeType::Category, 12);
        assert_eq!(id.encode(), "Q2F0ZWdvcnk6MTI=");
        assert_eq!(GlobalId::decode("Q2F0ZWdvcnk6MTI=").unwrap(), id);
    }

    #[test]
    fn test_every_type_decodes() {
        for node_type in [
            NodeType::Product,
            NodeType::ProductVariant,
            NodeType::ProductImage,
            NodeType::ProductAttribute,
            NodeType::ProductAttributeValue,
        ] {
            let id = GlobalId::new(node_type, 42);
            assert_eq!(id.to_string().parse::<GlobalId>().unwrap(), id);
        }
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(GlobalId::decode("!!!"), Err(CatalogError::InvalidGlobalId(_))));
        // "Order:1"
        assert!(GlobalId::decode("T3JkZXI6MQ==").is_err());
        // "Product"
        assert!(GlobalId::decode("UHJvZHVjdA==").is_err());
        // "Product:abc"
        assert!(GlobalId::decode("UHJvZHVjdDphYmM=").is_err());
    }
}
