//! Parameter catalog (metadata.json).
//!
//! Each adjustable model parameter carries an ordered domain of numeric
//! values. Parameter order is always lexicographic by name; the index into a
//! domain — not the value — is what a run-ID digit encodes.

use crate::{DataError, DataResult, read_file};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// One run-ID digit per parameter, so a domain cannot exceed ten values.
pub const MAX_DOMAIN_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterKind {
    Slider,
    Toggle,
}

/// On-disk form: `{"type": "slider", "values": "0,1,2"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawParameterDef {
    #[serde(rename = "type")]
    kind: ParameterKind,
    values: String,
}

/// A validated parameter: kind plus its ordered, distinct value domain.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDef {
    pub kind: ParameterKind,
    pub values: Vec<f64>,
}

/// The full parameter catalog, keyed and iterated in lexicographic name
/// order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    params: BTreeMap<String, ParameterDef>,
}

impl Catalog {
    pub fn load(path: &Path) -> DataResult<Catalog> {
        let catalog = Self::from_json_str(&read_file(path)?)?;
        tracing::info!(
            parameters = catalog.len(),
            runs = catalog.run_count(),
            "loaded parameter catalog"
        );
        Ok(catalog)
    }

    pub fn from_json_str(json: &str) -> DataResult<Catalog> {
        let raw: BTreeMap<String, RawParameterDef> = serde_json::from_str(json)?;
        let mut params = BTreeMap::new();
        for (name, def) in raw {
            let values = parse_domain(&name, &def.values)?;
            params.insert(
                name,
                ParameterDef {
                    kind: def.kind,
                    values,
                },
            );
        }
        Ok(Catalog { params })
    }

    /// Number of parameters (run-ID width).
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Parameters in lexicographic name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &ParameterDef)> {
        self.params.iter()
    }

    pub fn get(&self, name: &str) -> Option<&ParameterDef> {
        self.params.get(name)
    }

    /// Total number of runs: the product of all domain sizes. One for the
    /// empty catalog (the single baseline run).
    pub fn run_count(&self) -> usize {
        self.params.values().map(|p| p.values.len()).product()
    }

    /// The all-default run ID: digit 0 for every parameter.
    pub fn default_run_id(&self) -> String {
        "0".repeat(self.params.len())
    }
}

fn parse_domain(name: &str, values: &str) -> DataResult<Vec<f64>> {
    let invalid = |what: String| DataError::Invalid {
        artifact: "parameter catalog",
        what,
    };

    let parsed: Vec<f64> = values
        .split(',')
        .map(|v| {
            v.trim()
                .parse::<f64>()
                .map_err(|_| invalid(format!("parameter `{name}`: non-numeric value `{v}`")))
        })
        .collect::<DataResult<_>>()?;

    if parsed.is_empty() {
        return Err(invalid(format!("parameter `{name}` has an empty domain")));
    }
    if parsed.len() > MAX_DOMAIN_SIZE {
        return Err(invalid(format!(
            "parameter `{name}` has {} values, limit is {MAX_DOMAIN_SIZE}",
            parsed.len()
        )));
    }
    for (i, a) in parsed.iter().enumerate() {
        if parsed[..i].contains(a) {
            return Err(invalid(format!(
                "parameter `{name}` has duplicate value {a}"
            )));
        }
    }
    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    const METADATA: &str = r#"{
        "flaring": { "type": "slider", "values": "0,1" },
        "gwp": { "type": "toggle", "values": "20,100" }
    }"#;

    #[test]
    fn parses_and_sorts_parameters() {
        let catalog = Catalog::from_json_str(METADATA).unwrap();
        let names: Vec<_> = catalog.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["flaring", "gwp"]);
        assert_eq!(catalog.get("gwp").unwrap().values, vec![20.0, 100.0]);
        assert_eq!(catalog.get("gwp").unwrap().kind, ParameterKind::Toggle);
        assert_eq!(catalog.run_count(), 4);
        assert_eq!(catalog.default_run_id(), "00");
    }

    #[test]
    fn empty_catalog_has_one_run() {
        let catalog = Catalog::from_json_str("{}").unwrap();
        assert!(catalog.is_empty());
        assert_eq!(catalog.run_count(), 1);
        assert_eq!(catalog.default_run_id(), "");
    }

    #[test]
    fn rejects_bad_domains() {
        let dup = r#"{ "x": { "type": "slider", "values": "1,1" } }"#;
        assert!(Catalog::from_json_str(dup).is_err());

        let non_numeric = r#"{ "x": { "type": "slider", "values": "1,two" } }"#;
        assert!(Catalog::from_json_str(non_numeric).is_err());

        let too_wide = r#"{ "x": { "type": "slider", "values": "0,1,2,3,4,5,6,7,8,9,10" } }"#;
        assert!(Catalog::from_json_str(too_wide).is_err());
    }

    #[test]
    fn rejects_malformed_json() {
        assert!(Catalog::from_json_str("not json").is_err());
    }
}
