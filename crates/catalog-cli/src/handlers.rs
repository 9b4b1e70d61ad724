//! # Command Handlers
//!
//! One handler per CLI subcommand. Each resolves through `CatalogResolver`
//! and returns a serializable view, the same shape a storefront client
//! would read.

use crate::state::AppState;
use catalog_core::{
    CatalogResult, Category, CategoryFilter, ChargeStatus, Connection, CustomPaymentChoices,
    GlobalId, Node, NodeType, OperationType, PageArgs, ProductAttribute, ProductAvailability,
    ProductFilter, ProductImage, ProductNode, QueryContext, TransactionError, TransactionKind,
    VariantNode,
};
use serde::Serialize;
use tracing::{info, instrument};

// =============================================================================
// Response Types
// =============================================================================

/// Category with its derived fields
#[derive(Debug, Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub url: String,
    /// Ancestor names, root first
    pub ancestors: Vec<String>,
    pub children: Vec<String>,
    pub siblings: Vec<String>,
    pub products_count: usize,
    pub descendants_count: usize,
}

/// Product with images, variants and pricing
#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub url: String,
    pub thumbnail_url: String,
    pub category: Option<String>,
    pub images: Vec<ImageResponse>,
    pub variants: Vec<VariantResponse>,
    pub availability: ProductAvailability,
}

#[derive(Debug, Serialize)]
pub struct ImageResponse {
    pub id: String,
    pub url: String,
    pub alt: String,
}

#[derive(Debug, Serialize)]
pub struct VariantResponse {
    pub id: String,
    pub sku: String,
    pub stock_quantity: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_override: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AttributeResponse {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub values: Vec<String>,
}

/// `(value, label)` pairs of one payment vocabulary
#[derive(Debug, Serialize)]
pub struct VocabularyResponse {
    pub name: &'static str,
    pub choices: Vec<(&'static str, &'static str)>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Resolve one category and all of its derived fields
#[instrument(skip(state, ctx))]
pub async fn category(
    state: &AppState,
    ctx: &mut QueryContext,
    id: i64,
) -> CatalogResult<Option<CategoryResponse>> {
    let Some(category) = state.resolver.resolve_category(id, ctx).await? else {
        return Ok(None);
    };
    category_response(state, ctx, &category).await.map(Some)
}

/// Category listing with optional name filter
pub async fn categories(
    state: &AppState,
    filter: &CategoryFilter,
    page: &PageArgs,
) -> CatalogResult<Connection<String>> {
    let connection = state.resolver.resolve_categories(filter, page).await?;
    let names: Vec<String> = connection.nodes().map(|c| c.name.clone()).collect();
    Ok(connection.zip_nodes(names))
}

/// Products of a category, fully resolved
#[instrument(skip(state, ctx, filter, page))]
pub async fn category_products(
    state: &AppState,
    ctx: &mut QueryContext,
    category_id: i64,
    filter: &ProductFilter,
    page: &PageArgs,
    thumbnail_size: Option<&str>,
) -> CatalogResult<Option<Connection<ProductResponse>>> {
    let Some(category) = state.resolver.resolve_category(category_id, ctx).await? else {
        return Ok(None);
    };

    let before = state.store.round_trips();
    let connection = state
        .resolver
        .resolve_products(&category, ctx, filter, page)
        .await?;

    let mut responses = Vec::with_capacity(connection.edges.len());
    for node in connection.nodes() {
        responses.push(product_response(state, ctx, node, thumbnail_size).await?);
    }
    info!(
        products = responses.len(),
        round_trips = state.store.round_trips() - before,
        "category products resolved"
    );
    Ok(Some(connection.zip_nodes(responses)))
}

/// One product, if visible
pub async fn product(
    state: &AppState,
    ctx: &QueryContext,
    id: i64,
    thumbnail_size: Option<&str>,
) -> CatalogResult<Option<ProductResponse>> {
    let Some(node) = state.resolver.resolve_product(id, ctx).await? else {
        return Ok(None);
    };
    product_response(state, ctx, &node, thumbnail_size).await.map(Some)
}

/// Attributes, optionally limited to a category subtree, with their values
pub async fn attributes(
    state: &AppState,
    category_id: Option<i64>,
) -> CatalogResult<Vec<AttributeResponse>> {
    let attributes = state.resolver.resolve_attributes(category_id).await?;
    let mut responses = Vec::with_capacity(attributes.len());
    for attribute in &attributes {
        responses.push(attribute_response(state, attribute).await?);
    }
    Ok(responses)
}

/// Resolve an opaque global id into whatever node it names
pub async fn node(
    state: &AppState,
    ctx: &mut QueryContext,
    global_id: &str,
) -> anyhow::Result<Option<serde_json::Value>> {
    let Some(node) = state.resolver.resolve_global_id(global_id, ctx).await? else {
        return Ok(None);
    };

    let id = node.global_id().encode();
    let value = match node {
        Node::Product(node) => to_value(&product_response(state, ctx, &node, None).await?)?,
        Node::Category(category) => to_value(&category_response(state, ctx, &category).await?)?,
        Node::ProductVariant(variant) => to_value(&variant_response(state, &variant))?,
        Node::ProductImage(image) => to_value(&image_response(state, &image, None)?)?,
        Node::ProductAttribute(attribute) => {
            to_value(&attribute_response(state, &attribute).await?)?
        }
        Node::ProductAttributeValue(value) => serde_json::json!({
            "id": id,
            "name": value.name,
            "slug": value.slug,
        }),
    };
    Ok(Some(value))
}

/// Every payment vocabulary with its choices
pub fn payment_choices() -> Vec<VocabularyResponse> {
    vec![
        VocabularyResponse {
            name: "TransactionKind",
            choices: TransactionKind::CHOICES.to_vec(),
        },
        VocabularyResponse {
            name: "ChargeStatus",
            choices: ChargeStatus::CHOICES.to_vec(),
        },
        VocabularyResponse {
            name: "TransactionError",
            choices: TransactionError::CHOICES.to_vec(),
        },
        VocabularyResponse {
            name: "OperationType",
            choices: OperationType::CHOICES.to_vec(),
        },
        VocabularyResponse {
            name: "CustomPaymentChoices",
            choices: CustomPaymentChoices::CHOICES.to_vec(),
        },
    ]
}

// =============================================================================
// View Builders
// =============================================================================

async fn category_response(
    state: &AppState,
    ctx: &QueryContext,
    category: &Category,
) -> CatalogResult<CategoryResponse> {
    let resolver = &state.resolver;
    let ancestors = resolver.ancestors_from_cache(category, ctx).await?;

    Ok(CategoryResponse {
        id: global_id(NodeType::Category, category.id),
        name: category.name.clone(),
        slug: category.slug.clone(),
        url: category.absolute_url(&ancestors),
        ancestors: ancestors.into_iter().map(|c| c.name).collect(),
        children: names(resolver.category_children(category).await?),
        siblings: names(resolver.category_siblings(category).await?),
        products_count: resolver.category_products_count(category).await?,
        descendants_count: resolver.category_descendants_count(category).await?,
    })
}

async fn product_response(
    state: &AppState,
    ctx: &QueryContext,
    node: &ProductNode,
    thumbnail_size: Option<&str>,
) -> CatalogResult<ProductResponse> {
    let resolver = &state.resolver;

    let images = resolver
        .product_images(node)
        .await?
        .iter()
        .map(|image| image_response(state, image, None))
        .collect::<CatalogResult<Vec<_>>>()?;
    let variants = resolver
        .product_variants(node)
        .await?
        .iter()
        .map(|variant| variant_response(state, variant))
        .collect();

    Ok(ProductResponse {
        id: global_id(NodeType::Product, node.id()),
        name: node.product.name.clone(),
        url: resolver.product_url(node),
        thumbnail_url: resolver.product_thumbnail_url(node, thumbnail_size).await?,
        category: resolver.product_category(node).await?.map(|c| c.name),
        images,
        variants,
        availability: resolver.product_availability(node, ctx).await?,
    })
}

fn image_response(
    state: &AppState,
    image: &ProductImage,
    size: Option<&str>,
) -> CatalogResult<ImageResponse> {
    Ok(ImageResponse {
        id: global_id(NodeType::ProductImage, image.id),
        url: state.resolver.image_url(image, size)?,
        alt: image.alt.clone(),
    })
}

fn variant_response(state: &AppState, variant: &VariantNode) -> VariantResponse {
    VariantResponse {
        id: global_id(NodeType::ProductVariant, variant.variant.id),
        sku: variant.variant.sku.clone(),
        stock_quantity: state.resolver.variant_stock_quantity(variant),
        price_override: state
            .resolver
            .variant_price_override(variant)
            .map(|price| price.display()),
    }
}

async fn attribute_response(
    state: &AppState,
    attribute: &ProductAttribute,
) -> CatalogResult<AttributeResponse> {
    let values = state.resolver.attribute_values(attribute).await?;
    Ok(AttributeResponse {
        id: global_id(NodeType::ProductAttribute, attribute.id),
        name: attribute.name.clone(),
        slug: attribute.slug.clone(),
        values: values.into_iter().map(|v| v.slug).collect(),
    })
}

fn global_id(node_type: NodeType, id: i64) -> String {
    GlobalId::new(node_type, id).encode()
}

fn names(categories: Vec<Category>) -> Vec<String> {
    categories.into_iter().map(|c| c.name).collect()
}

fn to_value<T: Serialize>(value: &T) -> anyhow::Result<serde_json::Value> {
    Ok(serde_json::to_value(value)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppConfig;
    use catalog_core::{BoxedCatalogStore, CatalogConfig, CatalogResolver, InMemoryStore};
    use std::collections::HashMap;
    use std::sync::Arc;

    fn test_state() -> AppState {
        let seed = include_str!("../../../config/catalog.toml");
        let store = Arc::new(InMemoryStore::from_toml(seed).unwrap());
        AppState {
            resolver: CatalogResolver::new(
                store.clone() as BoxedCatalogStore,
                CatalogConfig::default(),
            ),
            store,
            config: AppConfig {
                seed_path: None,
                environment: "test".to_string(),
            },
        }
    }

    #[test]
    fn test_to_value_reports_serialization_errors() {
        let mut tuple_keys = HashMap::new();
        tuple_keys.insert((1, 2), "not a json object key");
        assert!(to_value(&tuple_keys).is_err());
    }

    #[tokio::test]
    async fn test_node_renders_attribute_value() {
        let state = test_state();
        let mut ctx = QueryContext::anonymous();
        let id = GlobalId::new(NodeType::ProductAttributeValue, 11).encode();

        let value = node(&state, &mut ctx, &id).await.unwrap().unwrap();
        assert_eq!(value["id"], id.as_str());
        assert_eq!(value["slug"], "red");
    }

    #[tokio::test]
    async fn test_node_renders_category() {
        let state = test_state();
        let mut ctx = QueryContext::anonymous();
        let id = GlobalId::new(NodeType::Category, 3).encode();

        let value = node(&state, &mut ctx, &id).await.unwrap().unwrap();
        assert_eq!(value["url"], "/products/category/apparel/shirts/t-shirts-3/");
        assert!(node(&state, &mut ctx, "not base64!").await.is_err());
    }

    #[test]
    fn test_payment_choices_cover_every_vocabulary() {
        let choices = payment_choices();
        assert_eq!(choices.len(), 5);
        assert_eq!(choices[0].choices[0], ("auth", "Authorization"));
        assert_eq!(choices[4].choices, vec![("manual", "Manual")]);
    }
}
