//! # Category Ancestor Cache
//!
//! Request-scoped memo of ancestor chains. Built from one subtree fetch plus
//! the root's own ancestors, so resolving `ancestors`/`url` for every node
//! of a nested listing costs no further store calls.

use crate::category::{Category, CategoryTree};
use std::collections::HashMap;

/// Maps a category id to its ancestors, ordered root first
#[derive(Debug, Clone, Default)]
pub struct AncestorCache {
    chains: HashMap<i64, Vec<Category>>,
}

impl AncestorCache {
    /// Cache every node of `tree`, given the ancestors of its root
    pub fn build(tree: &CategoryTree, root_ancestors: Vec<Category>) -> Self {
        let mut cache = Self::default();
        cache.populate(tree, root_ancestors);
        cache
    }

    /// Add every node of `tree` to this cache
    pub fn populate(&mut self, tree: &CategoryTree, root_ancestors: Vec<Category>) {
        let mut pending = vec![(&tree.root, root_ancestors)];
        while let Some((node, chain)) = pending.pop() {
            for child in tree.children_of(node.id) {
                let mut child_chain = chain.clone();
                child_chain.push(node.clone());
                pending.push((child, child_chain));
            }
            self.chains.insert(node.id, chain);
        }
    }

    /// Cached chain for `category`, `None` when it was never cached
    pub fn get(&self, category: &Category) -> Option<&[Category]> {
        self.chains.get(&category.id).map(Vec::as_slice)
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.chains.contains_key(&category.id)
    }

    pub fn len(&self) -> usize {
        self.chains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.is_empty()
    }
}
