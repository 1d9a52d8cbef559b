//! Result and query types.

use oci_core::{Component, Direction, Ratio};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// An extent query: which ratio and component, which direction, and an
/// optional single-field filter (absent means scan every field).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ExtentQuery {
    pub ratio: Ratio,
    pub direction: Direction,
    pub component: Component,
    pub field: Option<String>,
}

impl ExtentQuery {
    /// Key for the field axis of the extents artifact.
    pub fn field_key(&self) -> &str {
        self.field.as_deref().unwrap_or("global")
    }
}

/// Consolidated extents artifact:
/// ratio → field-or-"global" → component-or-"total" → "min"|"max" → value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalExtents(
    pub BTreeMap<String, BTreeMap<String, BTreeMap<String, BTreeMap<String, f64>>>>,
);

impl GlobalExtents {
    pub fn insert(&mut self, query: &ExtentQuery, value: f64) {
        self.0
            .entry(query.ratio.as_key().to_string())
            .or_default()
            .entry(query.field_key().to_string())
            .or_default()
            .entry(query.component.as_key().to_string())
            .or_default()
            .insert(query.direction.as_key().to_string(), value);
    }

    pub fn get(&self, query: &ExtentQuery) -> Option<f64> {
        self.0
            .get(query.ratio.as_key())?
            .get(query.field_key())?
            .get(query.component.as_key())?
            .get(query.direction.as_key())
            .copied()
    }

    /// Number of stored extent values.
    pub fn len(&self) -> usize {
        self.0
            .values()
            .flat_map(|f| f.values())
            .flat_map(|c| c.values())
            .map(|d| d.len())
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use oci_core::Stage;

    #[test]
    fn insert_get_roundtrip() {
        let mut extents = GlobalExtents::default();
        let query = ExtentQuery {
            ratio: Ratio::PerBarrel,
            direction: Direction::Max,
            component: Component::Stage(Stage::Upstream),
            field: None,
        };
        extents.insert(&query, 42.0);
        assert_eq!(extents.get(&query), Some(42.0));
        assert_eq!(extents.len(), 1);

        let other = ExtentQuery {
            field: Some("F".to_string()),
            ..query
        };
        assert_eq!(extents.get(&other), None);
    }

    #[test]
    fn artifact_shape() {
        let mut extents = GlobalExtents::default();
        extents.insert(
            &ExtentQuery {
                ratio: Ratio::PerBarrel,
                direction: Direction::Min,
                component: Component::Total,
                field: None,
            },
            7.5,
        );
        let json = serde_json::to_string(&extents).unwrap();
        assert_eq!(json, r#"{"perBarrel":{"global":{"total":{"min":7.5}}}}"#);
    }
}
