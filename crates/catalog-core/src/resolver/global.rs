use super::CatalogResolver;
use crate::context::QueryContext;
use crate::error::CatalogResult;
use crate::node::{GlobalId, Node, NodeType};
use crate::view::VariantNode;
use tracing::instrument;

impl CatalogResolver {
    /// Resolve an opaque global id
    pub async fn resolve_global_id(
        &self,
        encoded: &str,
        ctx: &mut QueryContext,
    ) -> CatalogResult<Option<Node>> {
        let id = GlobalId::decode(encoded)?;
        self.resolve_node(id, ctx).await
    }

    /// Dispatch a decoded global id to the resolver for its type.
    ///
    /// Variants and images are only returned when their product is
    /// visible to the requester.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn resolve_node(
        &self,
        id: GlobalId,
        ctx: &mut QueryContext,
    ) -> CatalogResult<Option<Node>> {
        let key = id.local_key;
        let node = match id.node_type {
            NodeType::Product => self.resolve_product(key, ctx).await?.map(Node::Product),
            NodeType::Category => self.resolve_category(key, ctx).await?.map(Node::Category),
            NodeType::ProductVariant => {
                let Some(variant) = self.store.variant(key).await? else {
                    return Ok(None);
                };
                if self.resolve_product(variant.product_id, ctx).await?.is_none() {
                    return Ok(None);
                }
                let stocks = self.store.stocks_for(&[variant.id]).await?;
                Some(Node::ProductVariant(VariantNode::new(variant, stocks)))
            }
            NodeType::ProductImage => {
                let Some(image) = self.store.image(key).await? else {
                    return Ok(None);
                };
                if self.resolve_product(image.product_id, ctx).await?.is_none() {
                    return Ok(None);
                }
                Some(Node::ProductImage(image))
            }
            NodeType::ProductAttribute => {
                self.store.attribute(key).await?.map(Node::ProductAttribute)
            }
            NodeType::ProductAttributeValue => self
                .store
                .attribute_value(key)
                .await?
                .map(Node::ProductAttributeValue),
        };
        Ok(node)
    }
}
