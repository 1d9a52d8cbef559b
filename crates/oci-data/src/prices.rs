//! Product price book (prices.json).
//!
//! Prices feed the per-dollar ratio conversions. Every mutation bumps an
//! epoch counter; extent cache entries computed under the per-dollar ratio
//! record the epoch they saw and are recomputed when it moves on.

use crate::{DataResult, read_file};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceBook {
    prices: BTreeMap<String, f64>,
    epoch: u64,
}

impl PriceBook {
    pub fn load(path: &Path) -> DataResult<PriceBook> {
        let book = Self::from_json_str(&read_file(path)?)?;
        tracing::info!(products = book.len(), "loaded price book");
        Ok(book)
    }

    pub fn from_json_str(json: &str) -> DataResult<PriceBook> {
        let prices: BTreeMap<String, f64> = serde_json::from_str(json)?;
        Ok(PriceBook { prices, epoch: 0 })
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Price for a product; zero when unpriced.
    pub fn get(&self, product: &str) -> f64 {
        self.prices.get(product).copied().unwrap_or(0.0)
    }

    /// Monotonic stamp of the current price state.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn set(&mut self, product: &str, price: f64) {
        self.prices.insert(product.to_string(), price);
        self.epoch += 1;
    }

    /// Replace every price at once (e.g. a fresh prices.json), as a single
    /// epoch step.
    pub fn replace_all(&mut self, prices: BTreeMap<String, f64>) {
        self.prices = prices;
        self.epoch += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mutations_bump_epoch() {
        let mut book = PriceBook::from_json_str(r#"{"gasoline": 2.5}"#).unwrap();
        assert_eq!(book.epoch(), 0);
        assert_eq!(book.get("gasoline"), 2.5);
        assert_eq!(book.get("unknown"), 0.0);

        book.set("diesel", 3.0);
        assert_eq!(book.epoch(), 1);

        book.replace_all(BTreeMap::from([("gasoline".to_string(), 9.0)]));
        assert_eq!(book.epoch(), 2);
        assert_eq!(book.get("diesel"), 0.0);
    }
}
