use super::CatalogResolver;
use crate::availability::AvailabilityInfo;
use crate::category::Category;
use crate::context::QueryContext;
use crate::error::CatalogResult;
use crate::pricing::{Price, PriceRange};
use crate::product::ProductImage;
use crate::store::ProductQuery;
use crate::thumbnail::{ThumbnailSize, DEFAULT_THUMBNAIL_SIZE};
use crate::view::{ProductNode, VariantNode};
use serde::Serialize;
use tracing::{debug, instrument};

/// Availability as exposed on a product
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductAvailability {
    pub available: bool,
    pub on_sale: bool,
    pub discount: Option<Price>,
    pub discount_local_currency: Option<Price>,
    pub price_range: Option<PriceRange>,
    pub price_range_undiscounted: Option<PriceRange>,
    pub price_range_local_currency: Option<PriceRange>,
}

impl From<AvailabilityInfo> for ProductAvailability {
    fn from(info: AvailabilityInfo) -> Self {
        Self {
            available: info.available,
            on_sale: info.on_sale,
            discount: info.discount,
            discount_local_currency: info.discount_local_currency,
            price_range: info.price_range,
            price_range_undiscounted: info.price_range_undiscounted,
            price_range_local_currency: info.price_range_local_currency,
        }
    }
}

/// A missing or empty size argument means "use the default"
fn requested_size(size: Option<&str>) -> Option<&str> {
    size.filter(|s| !s.trim().is_empty())
}

impl CatalogResolver {
    /// Product by id, if the requester may see it
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn resolve_product(
        &self,
        id: i64,
        ctx: &QueryContext,
    ) -> CatalogResult<Option<ProductNode>> {
        let query = ProductQuery::new(self.product_scope(ctx)).with_ids(vec![id]);
        let product = self.store.products(&query).await?.into_iter().next();
        if product.is_none() {
            debug!("product not found or not visible");
        }
        Ok(product.map(ProductNode::new))
    }

    /// Images ordered by sort order
    pub async fn product_images(&self, node: &ProductNode) -> CatalogResult<Vec<ProductImage>> {
        match node.prefetched_images() {
            Some(images) => Ok(images.to_vec()),
            None => self.store.images_for(&[node.id()]).await,
        }
    }

    /// Variants with their stock
    pub async fn product_variants(&self, node: &ProductNode) -> CatalogResult<Vec<VariantNode>> {
        if let Some(variants) = node.prefetched_variants() {
            return Ok(variants.to_vec());
        }
        let variants = self.store.variants_for(&[node.id()]).await?;
        if variants.is_empty() {
            return Ok(Vec::new());
        }
        let variant_ids: Vec<i64> = variants.iter().map(|v| v.id).collect();
        let stocks = self.store.stocks_for(&variant_ids).await?;
        Ok(VariantNode::group(variants, &stocks))
    }

    pub async fn product_category(&self, node: &ProductNode) -> CatalogResult<Option<Category>> {
        match node.prefetched_category() {
            Some(category) => Ok(Some(category.clone())),
            None => self.store.category(node.product.category_id).await,
        }
    }

    pub fn product_url(&self, node: &ProductNode) -> String {
        node.product.absolute_url()
    }

    /// URL of the first image cropped to `size` (default `255x255`), or a
    /// placeholder when the product has no image
    pub async fn product_thumbnail_url(
        &self,
        node: &ProductNode,
        size: Option<&str>,
    ) -> CatalogResult<String> {
        let size = match requested_size(size) {
            Some(size) => size.parse::<ThumbnailSize>()?,
            None => DEFAULT_THUMBNAIL_SIZE,
        };
        let images = self.product_images(node).await?;
        Ok(match images.first() {
            Some(image) => self.cropper.crop_url(&image.image, size),
            None => self.cropper.placeholder_url(size),
        })
    }

    /// Availability for the request's sales and currency
    pub async fn product_availability(
        &self,
        node: &ProductNode,
        ctx: &QueryContext,
    ) -> CatalogResult<ProductAvailability> {
        let variants = self.product_variants(node).await?;
        let info = self.availability.availability(
            &node.product,
            &variants,
            &ctx.discounts,
            ctx.currency,
            ctx.today,
        );
        Ok(info.into())
    }

    pub fn variant_stock_quantity(&self, variant: &VariantNode) -> i32 {
        variant.stock_quantity()
    }

    pub fn variant_price_override(&self, variant: &VariantNode) -> Option<Price> {
        variant.variant.price_override
    }

    /// Original image URL, or the rendition cropped to `size`
    pub fn image_url(&self, image: &ProductImage, size: Option<&str>) -> CatalogResult<String> {
        match requested_size(size) {
            Some(size) => Ok(self.cropper.crop_url(&image.image, size.parse()?)),
            None => Ok(self.cropper.original_url(&image.image)),
        }
    }
}
