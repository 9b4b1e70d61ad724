//! # Money Types
//!
//! Currencies, prices and price ranges used by the catalog.
//! Amounts are always kept in the smallest currency unit.

use crate::error::CatalogError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Supported currencies (ISO 4217)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    USD,
    EUR,
    GBP,
    JPY,
    CAD,
    AUD,
    CHF,
    PLN,
}

impl Currency {
    /// Returns the ISO 4217 currency code
    pub fn as_str(&self) -> &'static str {
        match self {
            Currency::USD => "USD",
            Currency::EUR => "EUR",
            Currency::GBP => "GBP",
            Currency::JPY => "JPY",
            Currency::CAD => "CAD",
            Currency::AUD => "AUD",
            Currency::CHF => "CHF",
            Currency::PLN => "PLN",
        }
    }

    /// Returns the number of decimal places for this currency
    /// (JPY has 0 decimals, most others have 2)
    pub fn decimal_places(&self) -> u8 {
        match self {
            Currency::JPY => 0,
            _ => 2,
        }
    }
}

impl Default for Currency {
    fn default() -> Self {
        Currency::USD
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Currency {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::USD),
            "EUR" => Ok(Currency::EUR),
            "GBP" => Ok(Currency::GBP),
            "JPY" => Ok(Currency::JPY),
            "CAD" => Ok(Currency::CAD),
            "AUD" => Ok(Currency::AUD),
            "CHF" => Ok(Currency::CHF),
            "PLN" => Ok(Currency::PLN),
            other => Err(CatalogError::Configuration(format!(
                "unsupported currency {other}"
            ))),
        }
    }
}

/// Price with amount in smallest currency unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in smallest currency unit (cents for USD)
    pub amount: i64,
    /// Currency
    pub currency: Currency,
}

impl Price {
    /// Create a price from smallest unit (cents)
    pub fn from_cents(amount: i64, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Get the decimal amount
    pub fn as_decimal(&self) -> f64 {
        self.amount as f64 / 10_f64.powi(self.currency.decimal_places() as i32)
    }

    /// Subtract another amount, never going below zero
    pub fn saturating_sub(&self, amount: i64) -> Self {
        Self {
            amount: self.amount.saturating_sub(amount).max(0),
            currency: self.currency,
        }
    }

    /// Convert into another currency at `rate` target units per source unit
    pub fn convert(&self, currency: Currency, rate: f64) -> Self {
        let source = self.as_decimal() * rate;
        let multiplier = 10_f64.powi(currency.decimal_places() as i32);
        Self {
            amount: (source * multiplier).round() as i64,
            currency,
        }
    }

    /// Format for display (e.g., "USD 10.00")
    pub fn display(&self) -> String {
        if self.currency.decimal_places() == 0 {
            format!("{} {}", self.currency, self.amount)
        } else {
            format!("{} {:.2}", self.currency, self.as_decimal())
        }
    }
}

/// Inclusive price range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    pub start: Price,
    pub stop: Price,
}

impl PriceRange {
    pub fn new(start: Price, stop: Price) -> Self {
        Self { start, stop }
    }

    /// Smallest range covering every price, or `None` for an empty input
    pub fn spanning(prices: impl IntoIterator<Item = Price>) -> Option<Self> {
        let mut iter = prices.into_iter();
        let first = iter.next()?;
        Some(iter.fold(Self::new(first, first), |range, price| Self {
            start: if price.amount < range.start.amount { price } else { range.start },
            stop: if price.amount > range.stop.amount { price } else { range.stop },
        }))
    }

    pub fn convert(&self, currency: Currency, rate: f64) -> Self {
        Self::new(
            self.start.convert(currency, rate),
            self.stop.convert(currency, rate),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_display() {
        assert_eq!(Price::from_cents(2999, Currency::USD).display(), "USD 29.99");
        assert_eq!(Price::from_cents(1500, Currency::JPY).display(), "JPY 1500");
    }

    #[test]
    fn test_currency_parse() {
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::EUR);
        assert!("XYZ".parse::<Currency>().is_err());
    }

    #[test]
    fn test_saturating_sub() {
        let price = Price::from_cents(500, Currency::USD);
        assert_eq!(price.saturating_sub(200).amount, 300);
        assert_eq!(price.saturating_sub(900).amount, 0);
        assert_eq!(price.saturating_sub(i64::MIN).amount, i64::MAX);
        assert_eq!(Price::from_cents(i64::MIN, Currency::USD).saturating_sub(1).amount, 0);
    }

    #[test]
    fn test_convert() {
        let price = Price::from_cents(1000, Currency::USD);
        let pln = price.convert(Currency::PLN, 4.0);
        assert_eq!(pln, Price::from_cents(4000, Currency::PLN));
        let jpy = price.convert(Currency::JPY, 150.0);
        assert_eq!(jpy.amount, 1500);
    }

    #[test]
    fn test_range_spanning() {
        let range = PriceRange::spanning([
            Price::from_cents(700, Currency::USD),
            Price::from_cents(300, Currency::USD),
            Price::from_cents(900, Currency::USD),
        ])
        .unwrap();
        assert_eq!(range.start.amount, 300);
        assert_eq!(range.stop.amount, 900);
        assert!(PriceRange::spanning(Vec::new()).is_none());
    }
}
