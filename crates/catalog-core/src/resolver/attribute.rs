use super::CatalogResolver;
use crate::error::CatalogResult;
use crate::product::{AttributeChoiceValue, ProductAttribute};
use std::collections::HashSet;
use tracing::{debug, instrument};

impl CatalogResolver {
    /// Attributes, optionally limited to a category subtree.
    ///
    /// Without a category every attribute is returned. With one, only
    /// attributes attached (on the product or on the variant) to a product
    /// type used in the category or any descendant. Each attribute appears
    /// once.
    #[instrument(skip(self))]
    pub async fn resolve_attributes(
        &self,
        category_id: Option<i64>,
    ) -> CatalogResult<Vec<ProductAttribute>> {
        let Some(category_id) = category_id else {
            return Ok(distinct(self.store.attributes().await?));
        };

        let tree = self.store.descendants(category_id, true).await?;
        if tree.is_empty() {
            debug!("category not found");
            return Ok(Vec::new());
        }
        let category_ids: Vec<i64> = tree.iter().map(|c| c.id).collect();

        let product_types = self.store.product_type_ids_in(&category_ids).await?;
        if product_types.is_empty() {
            return Ok(Vec::new());
        }

        let attributes = self.store.attributes_for_product_types(&product_types).await?;
        Ok(distinct(attributes))
    }

    /// Choice values of an attribute, in sort order
    pub async fn attribute_values(
        &self,
        attribute: &ProductAttribute,
    ) -> CatalogResult<Vec<AttributeChoiceValue>> {
        self.store.attribute_values(&[attribute.id]).await
    }
}

/// Drop repeated attributes, keeping first occurrence order
fn distinct(attributes: Vec<ProductAttribute>) -> Vec<ProductAttribute> {
    let mut seen = HashSet::new();
    attributes.into_iter().filter(|a| seen.insert(a.id)).collect()
}
