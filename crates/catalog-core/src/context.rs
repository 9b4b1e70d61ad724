//! # Query Context
//!
//! State scoped to one query execution: who is asking, which sales and
//! currency apply, today's date, and the ancestor cache. Create one per
//! request and drop it when the response is built; it is never shared.

use crate::ancestors::AncestorCache;
use crate::availability::Sale;
use crate::pricing::Currency;
use crate::visibility::Requester;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct QueryContext {
    /// Correlates log lines of one execution
    pub request_id: Uuid,
    pub requester: Requester,
    /// Sales active for this request
    pub discounts: Vec<Sale>,
    /// Currency prices should be shown in
    pub currency: Currency,
    /// Date used for availability checks
    pub today: NaiveDate,
    ancestors: Option<AncestorCache>,
}

impl QueryContext {
    pub fn new(requester: Requester) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            requester,
            discounts: Vec::new(),
            currency: Currency::default(),
            today: Utc::now().date_naive(),
            ancestors: None,
        }
    }

    /// Anonymous visitor, today's date, default currency
    pub fn anonymous() -> Self {
        Self::new(Requester::anonymous())
    }

    /// Builder: active sales
    pub fn with_discounts(mut self, discounts: Vec<Sale>) -> Self {
        self.discounts = discounts;
        self
    }

    /// Builder: requested currency
    pub fn with_currency(mut self, currency: Currency) -> Self {
        self.currency = currency;
        self
    }

    /// Builder: pin the date (tests, previews)
    pub fn on(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    /// Ancestor cache, if a category lookup populated one
    pub fn ancestor_cache(&self) -> Option<&AncestorCache> {
        self.ancestors.as_ref()
    }

    /// Ancestor cache for writing, created on first use
    pub fn ancestor_cache_mut(&mut self) -> &mut AncestorCache {
        self.ancestors.get_or_insert_with(AncestorCache::default)
    }
}
