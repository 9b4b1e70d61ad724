//! # Product Availability
//!
//! Availability and pricing collaborator. Given a product, its variants,
//! the active sales and the requested currency it answers whether the
//! product can be bought, what it costs, and whether it is discounted.

use crate::pricing::{Currency, Price, PriceRange};
use crate::product::Product;
use crate::view::VariantNode;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How a sale reduces a price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DiscountValue {
    /// Percentage off (0-100)
    Percentage(u8),
    /// Fixed amount off, in the smallest unit of the product's currency
    Fixed(i64),
}

/// A running sale
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sale {
    pub id: i64,
    pub name: String,
    pub value: DiscountValue,
    #[serde(default)]
    pub product_ids: Vec<i64>,
    #[serde(default)]
    pub category_ids: Vec<i64>,
}

impl Sale {
    pub fn applies_to(&self, product: &Product) -> bool {
        self.product_ids.contains(&product.id) || self.category_ids.contains(&product.category_id)
    }

    /// Price after this sale, never negative
    pub fn apply(&self, price: Price) -> Price {
        let reduction = match self.value {
            DiscountValue::Percentage(pct) => {
                // |reduction| <= |amount|, so the narrowing cannot truncate
                (i128::from(price.amount) * i128::from(pct.min(100)) / 100) as i64
            }
            DiscountValue::Fixed(amount) => amount,
        };
        price.saturating_sub(reduction)
    }
}

/// Collaborator result: availability, discount and price ranges
#[derive(Debug, Clone, PartialEq)]
pub struct AvailabilityInfo {
    pub available: bool,
    pub on_sale: bool,
    pub discount: Option<Price>,
    pub discount_local_currency: Option<Price>,
    pub price_range: Option<PriceRange>,
    pub price_range_undiscounted: Option<PriceRange>,
    pub price_range_local_currency: Option<PriceRange>,
}

/// Computes availability for a product
pub trait AvailabilityCalculator: Send + Sync {
    fn availability(
        &self,
        product: &Product,
        variants: &[VariantNode],
        discounts: &[Sale],
        currency: Currency,
        today: NaiveDate,
    ) -> AvailabilityInfo;
}

/// Default calculator: best applicable sale per price, optional exchange
/// rates for local-currency ranges.
#[derive(Debug, Clone, Default)]
pub struct StandardAvailability {
    rates: HashMap<(Currency, Currency), f64>,
}

impl StandardAvailability {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: register a conversion rate (`to` units per `from` unit)
    pub fn with_rate(mut self, from: Currency, to: Currency, rate: f64) -> Self {
        self.rates.insert((from, to), rate);
        self
    }

    fn rate(&self, from: Currency, to: Currency) -> Option<f64> {
        if from == to {
            return None;
        }
        self.rates.get(&(from, to)).copied()
    }
}

impl AvailabilityCalculator for StandardAvailability {
    fn availability(
        &self,
        product: &Product,
        variants: &[VariantNode],
        discounts: &[Sale],
        currency: Currency,
        today: NaiveDate,
    ) -> AvailabilityInfo {
        let prices: Vec<Price> = if variants.is_empty() {
            vec![product.price]
        } else {
            variants.iter().map(|v| v.variant.price(product.price)).collect()
        };
        let applicable: Vec<&Sale> = discounts.iter().filter(|s| s.applies_to(product)).collect();
        let best = |price: Price| {
            applicable
                .iter()
                .map(|sale| sale.apply(price))
                .min_by_key(|discounted| discounted.amount)
                .unwrap_or(price)
        };

        let undiscounted = PriceRange::spanning(prices.iter().copied());
        let discounted = PriceRange::spanning(prices.iter().copied().map(best));

        let in_stock = variants.iter().any(|v| v.stock_quantity() > 0);
        let available = product.is_available_on(today) && in_stock;

        let discount = match (undiscounted, discounted) {
            (Some(before), Some(after)) if before.start.amount > after.start.amount => Some(
                Price::from_cents(before.start.amount - after.start.amount, before.start.currency),
            ),
            _ => None,
        };

        let rate = self.rate(product.price.currency, currency);

        AvailabilityInfo {
            available,
            on_sale: available && discount.is_some(),
            discount,
            discount_local_currency: rate.and_then(|r| discount.map(|d| d.convert(currency, r))),
            price_range: discounted,
            price_range_undiscounted: undiscounted,
            price_range_local_currency: rate.and_then(|r| discounted.map(|p| p.convert(currency, r))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::product::{ProductVariant, Stock};

    fn usd(cents: i64) -> Price {
        Price::from_cents(cents, Currency::USD)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    fn variant(id: i64, price: Option<i64>, quantity: i32) -> VariantNode {
        let mut v = ProductVariant::new(id, 1, format!("SKU-{id}"));
        v.price_override = price.map(usd);
        VariantNode::new(v, vec![Stock { id, variant_id: id, quantity, quantity_allocated: 0 }])
    }

    #[test]
    fn test_sale_on_extreme_amounts() {
        let max = usd(i64::MAX);
        assert_eq!(sale(DiscountValue::Percentage(100)).apply(max).amount, 0);
        assert_eq!(
            sale(DiscountValue::Percentage(50)).apply(max).amount,
            i64::MAX - i64::MAX / 2
        );
        assert_eq!(sale(DiscountValue::Fixed(i64::MIN)).apply(usd(10)).amount, i64::MAX);
    }

    fn sale(value: DiscountValue) -> Sale {
        Sale {
            id: 1,
            name: "Summer".into(),
            value,
            product_ids: Vec::new(),
            category_ids: vec![2],
        }
    }

    #[test]
    fn test_undiscounted_range() {
        let product = Product::new(1, "Tee", 2, 1, usd(1000));
        let variants = [variant(1, None, 3), variant(2, Some(1500), 0)];

        let info = StandardAvailability::new().availability(&product, &variants, &[], Currency::USD, today());
        assert!(info.available);
        assert!(!info.on_sale);
        assert_eq!(info.discount, None);
        assert_eq!(info.price_range, Some(PriceRange::new(usd(1000), usd(1500))));
        assert_eq!(info.price_range_undiscounted, info.price_range);
        assert_eq!(info.price_range_local_currency, None);
    }

    #[test]
    fn test_percentage_sale() {
        let product = Product::new(1, "Tee", 2, 1, usd(1000));
        let variants = [variant(1, None, 3)];

        let info = StandardAvailability::new().availability(
            &product,
            &variants,
            &[sale(DiscountValue::Percentage(25))],
            Currency::USD,
            today(),
        );
        assert!(info.on_sale);
        assert_eq!(info.discount, Some(usd(250)));
        assert_eq!(info.price_range.unwrap().start, usd(750));
        assert_eq!(info.price_range_undiscounted.unwrap().start, usd(1000));
    }

    #[test]
    fn test_best_sale_wins_and_floor_at_zero() {
        let product = Product::new(1, "Sticker", 2, 1, usd(300));
        let variants = [variant(1, None, 1)];
        let sales = [sale(DiscountValue::Percentage(10)), sale(DiscountValue::Fixed(500))];

        let info = StandardAvailability::new().availability(&product, &variants, &sales, Currency::USD, today());
        assert_eq!(info.price_range.unwrap().start, usd(0));
        assert_eq!(info.discount, Some(usd(300)));
    }

    #[test]
    fn test_out_of_stock_not_on_sale() {
        let product = Product::new(1, "Tee", 2, 1, usd(1000));
        let variants = [variant(1, None, 0)];

        let info = StandardAvailability::new().availability(
            &product,
            &variants,
            &[sale(DiscountValue::Percentage(50))],
            Currency::USD,
            today(),
        );
        assert!(!info.available);
        assert!(!info.on_sale);
        assert!(info.discount.is_some());
    }

    #[test]
    fn test_local_currency() {
        let product = Product::new(1, "Tee", 2, 1, usd(1000));
        let variants = [variant(1, None, 2)];
        let calc = StandardAvailability::new().with_rate(Currency::USD, Currency::PLN, 4.0);

        let info = calc.availability(&product, &variants, &[], Currency::PLN, today());
        let local = info.price_range_local_currency.unwrap();
        assert_eq!(local.start, Price::from_cents(4000, Currency::PLN));
        assert_eq!(info.discount_local_currency, None);
    }

    #[test]
    fn test_sale_targeting() {
        let product = Product::new(7, "Cap", 3, 1, usd(1000));
        let by_product = Sale { product_ids: vec![7], category_ids: Vec::new(), ..sale(DiscountValue::Fixed(100)) };
        assert!(by_product.applies_to(&product));
        assert!(!sale(DiscountValue::Fixed(100)).applies_to(&product));
    }
}
