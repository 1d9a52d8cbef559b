//! Baseline field table (info.json).
//!
//! One record per oil field: identifying attributes, auxiliary constants for
//! ratio conversion, per-product refined volumes, and two baseline emissions
//! triples (20-year and 100-year GWP horizon). Immutable after ingestion.
//!
//! The upstream CSV-to-JSON conversion emits numbers as strings, so every
//! numeric field here accepts either a JSON number or a numeric string.

use crate::prices::PriceBook;
use crate::{DataError, DataResult, read_file};
use oci_core::FieldConstants;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::path::Path;

/// Global warming potential horizon, selected by the `gwp` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GwpHorizon {
    Years20,
    Years100,
}

impl GwpHorizon {
    /// A `gwp` parameter value of 20 selects the 20-year tables; any other
    /// value (including a catalog with no `gwp` parameter) selects 100-year.
    pub fn from_param_value(value: Option<f64>) -> GwpHorizon {
        match value {
            Some(v) if v == 20.0 => GwpHorizon::Years20,
            _ => GwpHorizon::Years100,
        }
    }
}

/// Baseline emissions for one horizon, kg CO2 eq. per BOE.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct BaselineTriple {
    #[serde(rename = "Upstream Emissions", deserialize_with = "num_or_str")]
    pub upstream: f64,
    #[serde(rename = "Midstream Emissions", deserialize_with = "num_or_str")]
    pub midstream: f64,
    #[serde(rename = "Downstream Emissions", deserialize_with = "num_or_str")]
    pub downstream: f64,
}

/// Refined product volumes, barrels per day. Used to blend a revenue per BOE
/// from the price book.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct ProductVolumes {
    #[serde(rename = "Gasoline Volume", default, deserialize_with = "num_or_str")]
    pub gasoline: f64,
    #[serde(rename = "Jet Fuel Volume", default, deserialize_with = "num_or_str")]
    pub jet_fuel: f64,
    #[serde(rename = "Diesel Volume", default, deserialize_with = "num_or_str")]
    pub diesel: f64,
    #[serde(rename = "Fuel Oil Volume", default, deserialize_with = "num_or_str")]
    pub fuel_oil: f64,
    #[serde(
        rename = "Petroleum Coke Volume",
        default,
        deserialize_with = "num_or_str"
    )]
    pub petcoke: f64,
    #[serde(
        rename = "Liquid Heavy Ends Volume",
        default,
        deserialize_with = "num_or_str"
    )]
    pub heavy_ends: f64,
    #[serde(
        rename = "Natural Gas Liquids Volume",
        default,
        deserialize_with = "num_or_str"
    )]
    pub natural_gas_liquids: f64,
    #[serde(
        rename = "Liquefied Petroleum Gases Volume",
        default,
        deserialize_with = "num_or_str"
    )]
    pub lpg: f64,
    #[serde(
        rename = "Petrochemical Feedstocks Volume",
        default,
        deserialize_with = "num_or_str"
    )]
    pub feedstocks: f64,
}

impl ProductVolumes {
    /// (price-book key, volume) pairs for revenue blending.
    pub fn by_product(&self) -> [(&'static str, f64); 9] {
        [
            ("gasoline", self.gasoline),
            ("jetFuel", self.jet_fuel),
            ("diesel", self.diesel),
            ("fuelOil", self.fuel_oil),
            ("petcoke", self.petcoke),
            ("heavyEnds", self.heavy_ends),
            ("naturalGasLiquids", self.natural_gas_liquids),
            ("lpg", self.lpg),
            ("feedstocks", self.feedstocks),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct FieldRecord {
    #[serde(rename = "Field Name")]
    pub name: String,
    #[serde(rename = "Resource Type", default)]
    pub resource_type: String,
    #[serde(rename = "Location", default)]
    pub location: String,
    #[serde(
        rename = "Heating Value Processed Oil and Gas",
        default,
        deserialize_with = "num_or_str"
    )]
    pub heating_value: f64,
    #[serde(
        rename = "Per $ Crude Oil - Current",
        default,
        deserialize_with = "num_or_str"
    )]
    pub current_price: f64,
    #[serde(
        rename = "Per $ Crude Oil - Historic",
        default,
        deserialize_with = "num_or_str"
    )]
    pub historic_price: f64,
    #[serde(
        rename = "Estimated Total Processed Oil, NGLs, and Gas",
        default,
        deserialize_with = "num_or_str"
    )]
    pub total_processed: f64,
    #[serde(flatten)]
    pub product_volumes: ProductVolumes,
    pub gwp20: BaselineTriple,
    pub gwp100: BaselineTriple,
}

impl FieldRecord {
    pub fn baseline(&self, horizon: GwpHorizon) -> &BaselineTriple {
        match horizon {
            GwpHorizon::Years20 => &self.gwp20,
            GwpHorizon::Years100 => &self.gwp100,
        }
    }

    /// Blended product revenue per barrel equivalent under the given prices.
    /// Zero when no processed volume is recorded.
    pub fn revenue_per_boe(&self, prices: &PriceBook) -> f64 {
        if self.total_processed <= 0.0 {
            return 0.0;
        }
        let revenue: f64 = self
            .product_volumes
            .by_product()
            .into_iter()
            .map(|(product, volume)| volume * prices.get(product))
            .sum();
        revenue / self.total_processed
    }

    /// Resolve the converter constants for this field under the given prices.
    pub fn constants(&self, prices: &PriceBook) -> FieldConstants {
        FieldConstants {
            heating_value: self.heating_value,
            revenue_per_boe: self.revenue_per_boe(prices),
            current_price: self.current_price,
            historic_price: self.historic_price,
        }
    }
}

/// All known oil fields, keyed by field name in stable order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldTable {
    fields: BTreeMap<String, FieldRecord>,
}

impl FieldTable {
    pub fn load(path: &Path) -> DataResult<FieldTable> {
        let table = Self::from_json_str(&read_file(path)?)?;
        tracing::info!(fields = table.len(), "loaded baseline field table");
        Ok(table)
    }

    pub fn from_json_str(json: &str) -> DataResult<FieldTable> {
        let fields: BTreeMap<String, FieldRecord> = serde_json::from_str(json)?;
        if fields.is_empty() {
            return Err(DataError::Invalid {
                artifact: "baseline field table",
                what: "no field records".to_string(),
            });
        }
        Ok(FieldTable { fields })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&FieldRecord> {
        self.fields.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldRecord)> {
        self.fields.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }
}

/// Accept a JSON number or a numeric string (the ingestion scripts emit
/// strings). An empty string reads as zero, matching the source data's
/// blank-cell convention.
fn num_or_str<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    match NumOrStr::deserialize(deserializer)? {
        NumOrStr::Num(n) => Ok(n),
        NumOrStr::Str(s) => {
            let trimmed = s.trim().replace(',', "");
            if trimmed.is_empty() {
                Ok(0.0)
            } else {
                trimmed
                    .parse::<f64>()
                    .map_err(|_| serde::de::Error::custom(format!("non-numeric value `{s}`")))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INFO: &str = r#"{
        "Test Field": {
            "Field Name": "Test Field",
            "Resource Type": "Light Oil",
            "Heating Value Processed Oil and Gas": "6100",
            "Per $ Crude Oil - Current": 60,
            "Per $ Crude Oil - Historic": "40",
            "Estimated Total Processed Oil, NGLs, and Gas": "100",
            "Gasoline Volume": "50",
            "Diesel Volume": 25,
            "gwp20": {
                "Upstream Emissions": "120.5",
                "Midstream Emissions": 80,
                "Downstream Emissions": "400"
            },
            "gwp100": {
                "Upstream Emissions": 100,
                "Midstream Emissions": "70",
                "Downstream Emissions": 380
            }
        }
    }"#;

    #[test]
    fn parses_numbers_and_numeric_strings() {
        let table = FieldTable::from_json_str(INFO).unwrap();
        let field = table.get("Test Field").unwrap();
        assert_eq!(field.heating_value, 6100.0);
        assert_eq!(field.historic_price, 40.0);
        assert_eq!(field.gwp20.upstream, 120.5);
        assert_eq!(field.gwp100.downstream, 380.0);
        assert_eq!(field.product_volumes.gasoline, 50.0);
        assert_eq!(field.product_volumes.diesel, 25.0);
        // absent volumes default to zero
        assert_eq!(field.product_volumes.petcoke, 0.0);
    }

    #[test]
    fn horizon_selection() {
        let table = FieldTable::from_json_str(INFO).unwrap();
        let field = table.get("Test Field").unwrap();
        assert_eq!(
            field.baseline(GwpHorizon::from_param_value(Some(20.0))).upstream,
            120.5
        );
        assert_eq!(
            field.baseline(GwpHorizon::from_param_value(Some(100.0))).upstream,
            100.0
        );
        assert_eq!(
            field.baseline(GwpHorizon::from_param_value(None)).upstream,
            100.0
        );
    }

    #[test]
    fn revenue_blends_prices_over_processed_volume() {
        let table = FieldTable::from_json_str(INFO).unwrap();
        let field = table.get("Test Field").unwrap();
        let mut prices = PriceBook::default();
        prices.set("gasoline", 2.0);
        prices.set("diesel", 4.0);
        // (50*2 + 25*4) / 100 == 2.0
        assert!((field.revenue_per_boe(&prices) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn empty_table_is_fatal() {
        assert!(FieldTable::from_json_str("{}").is_err());
        assert!(FieldTable::from_json_str("[]").is_err());
    }
}
