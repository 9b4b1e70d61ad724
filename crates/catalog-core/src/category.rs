//! # Category Types
//!
//! Nodes of the category tree and the subtree snapshot returned by a single
//! tree fetch.

use serde::{Deserialize, Serialize};

/// A node in the category tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Local key
    pub id: i64,

    /// Display name
    pub name: String,

    /// URL slug (e.g., "t-shirts")
    pub slug: String,

    #[serde(default)]
    pub description: String,

    /// Parent category, `None` for a root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<i64>,
}

impl Category {
    pub fn new(id: i64, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            slug: slug.into(),
            description: String::new(),
            parent_id: None,
        }
    }

    /// Builder: attach to a parent
    pub fn with_parent(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }

    /// Builder: set description
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Slug path from the root down to this category, e.g. `apparel/t-shirts`
    pub fn full_path(&self, ancestors: &[Category]) -> String {
        ancestors
            .iter()
            .chain(std::iter::once(self))
            .map(|node| node.slug.as_str())
            .collect::<Vec<_>>()
            .join("/")
    }

    /// Canonical storefront URL built from a precomputed ancestor chain
    pub fn absolute_url(&self, ancestors: &[Category]) -> String {
        format!("/products/category/{}-{}/", self.full_path(ancestors), self.id)
    }
}

/// A category together with every descendant, fetched in one round-trip.
///
/// `nodes` holds the descendants in depth-first order; the root is kept
/// separately.
#[derive(Debug, Clone)]
pub struct CategoryTree {
    pub root: Category,
    pub nodes: Vec<Category>,
}

impl CategoryTree {
    /// Direct children of `id` within this subtree
    pub fn children_of(&self, id: i64) -> impl Iterator<Item = &Category> {
        self.nodes.iter().filter(move |node| node.parent_id == Some(id))
    }

    /// Every category in the subtree, root first
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        std::iter::once(&self.root).chain(self.nodes.iter())
    }

    pub fn len(&self) -> usize {
        self.nodes.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_url() {
        let root = Category::new(1, "Apparel", "apparel");
        assert!(root.is_root());
        assert_eq!(root.absolute_url(&[]), "/products/category/apparel-1/");
    }

    #[test]
    fn test_nested_url() {
        let root = Category::new(1, "Apparel", "apparel");
        let shirts = Category::new(2, "Shirts", "shirts").with_parent(1);
        let tees = Category::new(3, "T-Shirts", "t-shirts").with_parent(2);

        assert_eq!(tees.full_path(&[root.clone(), shirts.clone()]), "apparel/shirts/t-shirts");
        assert_eq!(
            tees.absolute_url(&[root, shirts]),
            "/products/category/apparel/shirts/t-shirts-3/"
        );
    }

    #[test]
    fn test_tree_children() {
        let tree = CategoryTree {
            root: Category::new(1, "Apparel", "apparel"),
            nodes: vec![
                Category::new(2, "Shirts", "shirts").with_parent(1),
                Category::new(3, "T-Shirts", "t-shirts").with_parent(2),
                Category::new(4, "Hats", "hats").with_parent(1),
            ],
        };

        let children: Vec<i64> = tree.children_of(1).map(|c| c.id).collect();
        assert_eq!(children, vec![2, 4]);
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.iter().next().map(|c| c.id), Some(1));
    }
}
