use super::CatalogResolver;
use crate::category::Category;
use crate::connection::{Connection, PageArgs};
use crate::context::QueryContext;
use crate::error::CatalogResult;
use crate::filter::{AttributeFilter, CategoryFilter, ProductFilter};
use crate::product::Product;
use crate::store::ProductQuery;
use crate::view::ProductNode;
use std::collections::HashMap;
use tracing::{debug, instrument};

impl CatalogResolver {
    /// Look up a category by id and cache the ancestor chain of every node
    /// in its subtree on the request context.
    ///
    /// Costs one subtree fetch, plus one ancestor traversal when the
    /// category is not a root. A miss leaves the context untouched.
    #[instrument(skip(self, ctx), fields(request_id = %ctx.request_id))]
    pub async fn resolve_category(
        &self,
        id: i64,
        ctx: &mut QueryContext,
    ) -> CatalogResult<Option<Category>> {
        let Some(tree) = self.store.category_tree(id).await? else {
            debug!("category not found");
            return Ok(None);
        };

        let root_ancestors = if tree.root.is_root() {
            Vec::new()
        } else {
            self.store.ancestors(id).await?
        };
        ctx.ancestor_cache_mut().populate(&tree, root_ancestors);
        debug!(cached = tree.len(), "ancestor cache populated");

        Ok(Some(tree.root))
    }

    /// Ancestors of `category`, root first.
    ///
    /// Served from the request's ancestor cache when it holds the category;
    /// otherwise falls back to a direct store traversal, so a category
    /// reached without `resolve_category` still gets a correct answer.
    pub async fn ancestors_from_cache(
        &self,
        category: &Category,
        ctx: &QueryContext,
    ) -> CatalogResult<Vec<Category>> {
        if let Some(chain) = ctx.ancestor_cache().and_then(|cache| cache.get(category)) {
            return Ok(chain.to_vec());
        }
        debug!(category = category.id, "ancestor cache miss, traversing store");
        self.store.ancestors(category.id).await
    }

    /// Canonical URL, built from the (cached) ancestor chain
    pub async fn category_url(&self, category: &Category, ctx: &QueryContext) -> CatalogResult<String> {
        let ancestors = self.ancestors_from_cache(category, ctx).await?;
        Ok(category.absolute_url(&ancestors))
    }

    pub async fn category_children(&self, category: &Category) -> CatalogResult<Vec<Category>> {
        self.store.children(category.id).await
    }

    pub async fn category_siblings(&self, category: &Category) -> CatalogResult<Vec<Category>> {
        self.store.siblings(category.id).await
    }

    /// Products directly in the category, regardless of visibility
    pub async fn category_products_count(&self, category: &Category) -> CatalogResult<usize> {
        self.store.product_count(category.id).await
    }

    pub async fn category_descendants_count(&self, category: &Category) -> CatalogResult<usize> {
        Ok(self.store.descendants(category.id, false).await?.len())
    }

    /// Category collection with id/name filtering and pagination
    #[instrument(skip(self))]
    pub async fn resolve_categories(
        &self,
        filter: &CategoryFilter,
        page: &PageArgs,
    ) -> CatalogResult<Connection<Category>> {
        let categories: Vec<Category> = self
            .store
            .categories()
            .await?
            .into_iter()
            .filter(|c| filter.matches(c))
            .collect();
        Connection::from_vec(categories, page)
    }

    /// Products of a category visible to the requester.
    ///
    /// Category, images, variants and variant stock are loaded for the whole
    /// page up front, so resolving them for N products costs no extra store
    /// calls.
    #[instrument(skip(self, ctx, filter, page), fields(request_id = %ctx.request_id, category = category.id))]
    pub async fn resolve_products(
        &self,
        category: &Category,
        ctx: &QueryContext,
        filter: &ProductFilter,
        page: &PageArgs,
    ) -> CatalogResult<Connection<ProductNode>> {
        let query = ProductQuery::new(self.product_scope(ctx)).in_categories(vec![category.id]);
        let mut products = self.store.products(&query).await?;

        products.retain(|p| filter.matches_price(p));
        if !filter.attributes.is_empty() {
            let wanted = self.attribute_filter_ids(&filter.attributes).await?;
            products.retain(|p| matches_attributes(p, &wanted));
        }
        if let Some(order) = filter.sort_by {
            order.sort(&mut products);
        }

        let page = Connection::from_vec(products, page)?;
        let nodes = self.prefetch(page.nodes().cloned().collect(), category).await?;
        debug!(count = nodes.len(), total = page.total_count, "products resolved");
        Ok(page.zip_nodes(nodes))
    }

    /// Map `slug:value` pairs onto attribute id -> accepted value ids.
    /// Pairs naming an unknown attribute or value are ignored.
    async fn attribute_filter_ids(
        &self,
        pairs: &[AttributeFilter],
    ) -> CatalogResult<HashMap<i64, Vec<i64>>> {
        let attributes = self.store.attributes().await?;
        let slugs: HashMap<&str, i64> = attributes.iter().map(|a| (a.slug.as_str(), a.id)).collect();

        let attribute_ids: Vec<i64> = pairs
            .iter()
            .filter_map(|pair| slugs.get(pair.attribute.as_str()).copied())
            .collect();
        if attribute_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let values = self.store.attribute_values(&attribute_ids).await?;

        let mut wanted: HashMap<i64, Vec<i64>> = HashMap::new();
        for pair in pairs {
            let Some(&attribute_id) = slugs.get(pair.attribute.as_str()) else {
                continue;
            };
            if let Some(value) = values
                .iter()
                .find(|v| v.attribute_id == attribute_id && v.slug == pair.value)
            {
                wanted.entry(attribute_id).or_default().push(value.id);
            }
        }
        Ok(wanted)
    }
}

/// Values of one attribute are alternatives; different attributes must all match
fn matches_attributes(product: &Product, wanted: &HashMap<i64, Vec<i64>>) -> bool {
    wanted.iter().all(|(attribute, values)| {
        product
            .attribute_value(*attribute)
            .map_or(false, |value| values.contains(&value))
    })
}
