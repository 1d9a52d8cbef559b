//! Slider delta tables (CSV, one per GWP horizon).
//!
//! Sparse adjustments keyed by (parameter, domain value, stage), with one
//! column per field. A missing row or blank cell contributes zero.

use crate::fields::GwpHorizon;
use crate::{DataError, DataResult};
use oci_core::Stage;
use std::collections::HashMap;
use std::path::Path;

/// Lookup key for one delta row. Domain values come from the same parsed
/// catalog on both sides of the lookup, so matching on the f64 bit pattern is
/// exact.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct DeltaKey {
    slider: String,
    value_bits: u64,
    stage: Stage,
}

impl DeltaKey {
    fn new(slider: &str, value: f64, stage: Stage) -> DeltaKey {
        DeltaKey {
            slider: slider.to_string(),
            value_bits: value.to_bits(),
            stage,
        }
    }
}

/// One horizon's delta table, indexed for O(1) lookup.
#[derive(Debug, Clone, Default)]
pub struct DeltaTable {
    rows: Vec<HashMap<String, f64>>,
    index: HashMap<DeltaKey, usize>,
}

impl DeltaTable {
    pub fn load(path: &Path) -> DataResult<DeltaTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(DataError::Csv)?;
        let table = Self::from_reader(&mut reader)?;
        tracing::info!(path = %path.display(), rows = table.len(), "loaded delta table");
        Ok(table)
    }

    pub fn from_csv_str(data: &str) -> DataResult<DeltaTable> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(data.as_bytes());
        Self::from_reader(&mut reader)
    }

    fn from_reader<R: std::io::Read>(reader: &mut csv::Reader<R>) -> DataResult<DeltaTable> {
        let invalid = |what: String| DataError::Invalid {
            artifact: "delta table",
            what,
        };

        let headers = reader.headers().map_err(DataError::Csv)?.clone();
        let mut column = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| invalid(format!("missing `{name}` column")))
        };
        let slider_col = column("slider")?;
        let value_col = column("value")?;
        let stage_col = column("stage")?;

        let field_cols: Vec<(usize, String)> = headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != slider_col && *i != value_col && *i != stage_col)
            .map(|(i, h)| (i, h.to_string()))
            .collect();

        let mut table = DeltaTable::default();
        for record in reader.records() {
            let record = record.map_err(DataError::Csv)?;
            let slider = &record[slider_col];
            let value: f64 = record[value_col]
                .parse()
                .map_err(|_| invalid(format!("non-numeric value `{}`", &record[value_col])))?;
            let stage: Stage = record[stage_col].parse().map_err(|e: String| invalid(e))?;

            let mut by_field = HashMap::with_capacity(field_cols.len());
            for (col, field) in &field_cols {
                let cell = record.get(*col).unwrap_or("");
                let delta = if cell.is_empty() {
                    0.0
                } else {
                    cell.parse::<f64>().map_err(|_| {
                        invalid(format!("non-numeric delta `{cell}` for field `{field}`"))
                    })?
                };
                by_field.insert(field.clone(), delta);
            }

            let key = DeltaKey::new(slider, value, stage);
            if table.index.contains_key(&key) {
                return Err(invalid(format!(
                    "duplicate row for ({slider}, {value}, {stage})"
                )));
            }
            table.index.insert(key, table.rows.len());
            table.rows.push(by_field);
        }
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Delta for (parameter, domain value, stage, field); zero when no row or
    /// column matches.
    pub fn delta(&self, slider: &str, value: f64, stage: Stage, field: &str) -> f64 {
        self.index
            .get(&DeltaKey::new(slider, value, stage))
            .and_then(|&row| self.rows[row].get(field))
            .copied()
            .unwrap_or(0.0)
    }
}

/// Both horizons' tables.
#[derive(Debug, Clone, Default)]
pub struct DeltaTables {
    pub gwp20: DeltaTable,
    pub gwp100: DeltaTable,
}

impl DeltaTables {
    pub fn load(path20: &Path, path100: &Path) -> DataResult<DeltaTables> {
        Ok(DeltaTables {
            gwp20: DeltaTable::load(path20)?,
            gwp100: DeltaTable::load(path100)?,
        })
    }

    pub fn for_horizon(&self, horizon: GwpHorizon) -> &DeltaTable {
        match horizon {
            GwpHorizon::Years20 => &self.gwp20,
            GwpHorizon::Years100 => &self.gwp100,
        }
    }
}
