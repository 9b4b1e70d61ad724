//! # Visibility Policy
//!
//! Decides which products a requester may see. The resolvers never filter
//! on their own; they ask the policy for a `ProductScope` and compose it
//! into every product query.

use crate::store::ProductScope;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Permission that unlocks unpublished products
pub const VIEW_PRODUCT_PERMISSION: &str = "product.view_product";

/// The user a query executes for
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Requester {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,

    #[serde(default)]
    pub is_staff: bool,

    /// Holds every permission
    #[serde(default)]
    pub is_superuser: bool,

    #[serde(default)]
    pub permissions: BTreeSet<String>,
}

impl Requester {
    /// Unauthenticated storefront visitor
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Signed-in customer without staff permissions
    pub fn customer(user_id: i64) -> Self {
        Self {
            user_id: Some(user_id),
            ..Self::default()
        }
    }

    /// Staff member holding the given permissions
    pub fn staff<I, S>(user_id: i64, permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            user_id: Some(user_id),
            is_staff: true,
            is_superuser: false,
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }

    pub fn has_perm(&self, permission: &str) -> bool {
        self.is_superuser || self.permissions.contains(permission)
    }
}

/// Rule set determining which products a requester may see
pub trait VisibilityPolicy: Send + Sync {
    fn product_scope(&self, requester: &Requester, today: NaiveDate) -> ProductScope;
}

/// Staff with `product.view_product` see everything; everyone else sees
/// published products whose availability date has passed.
#[derive(Debug, Clone, Copy, Default)]
pub struct PublishedProductsPolicy;

impl VisibilityPolicy for PublishedProductsPolicy {
    fn product_scope(&self, requester: &Requester, today: NaiveDate) -> ProductScope {
        if requester.has_perm(VIEW_PRODUCT_PERMISSION) {
            ProductScope::All
        } else {
            ProductScope::AvailableOn(today)
        }
    }
}
