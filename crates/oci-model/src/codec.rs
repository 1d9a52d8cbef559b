//! Run-ID codec: decode an ID into parameter values, encode values into an
//! ID, and strictly validate IDs before store lookups.
//!
//! Decoding is deliberately lenient — IDs arrive from shared URLs, so an
//! out-of-range or missing digit substitutes index 0 instead of failing.
//! Validation is the strict counterpart used by the run store.

use crate::{ModelError, ModelResult, RunId};
use oci_data::Catalog;
use std::collections::BTreeMap;

/// Decoded parameter assignment, name → selected domain value.
pub type ParamValues = BTreeMap<String, f64>;

/// Decode a run ID against the catalog. The i-th character (an ASCII digit)
/// indexes the i-th sorted parameter's domain; anything out of range, missing,
/// or non-numeric falls back to index 0.
pub fn decode_run(catalog: &Catalog, run_id: &str) -> ParamValues {
    let chars: Vec<char> = run_id.chars().collect();
    catalog
        .iter()
        .enumerate()
        .map(|(i, (name, param))| {
            let index = chars
                .get(i)
                .and_then(|c| c.to_digit(10))
                .map(|d| d as usize)
                .filter(|d| *d < param.values.len())
                .unwrap_or(0);
            (name.clone(), param.values[index])
        })
        .collect()
}

/// Encode parameter values into a run ID. A value absent from its domain (or
/// a parameter absent from the map) encodes as index 0, mirroring the decode
/// fallback.
pub fn encode_run(catalog: &Catalog, params: &ParamValues) -> RunId {
    catalog
        .iter()
        .map(|(name, param)| {
            let index = params
                .get(name)
                .and_then(|value| param.values.iter().position(|v| v == value))
                .unwrap_or(0);
            char::from_digit(index as u32, 10).unwrap_or('0')
        })
        .collect()
}

/// Strict validation: exactly one digit per parameter, every digit within its
/// domain.
pub fn validate_run_id(catalog: &Catalog, run_id: &str) -> ModelResult<()> {
    let malformed = |reason: String| ModelError::MalformedRunId {
        run_id: run_id.to_string(),
        reason,
    };

    let chars: Vec<char> = run_id.chars().collect();
    if chars.len() != catalog.len() {
        return Err(malformed(format!(
            "expected {} digits, got {}",
            catalog.len(),
            chars.len()
        )));
    }
    for (i, (name, param)) in catalog.iter().enumerate() {
        let digit = chars[i]
            .to_digit(10)
            .ok_or_else(|| malformed(format!("non-digit character `{}`", chars[i])))?;
        if digit as usize >= param.values.len() {
            return Err(malformed(format!(
                "digit {digit} out of range for parameter `{name}` ({} values)",
                param.values.len()
            )));
        }
    }
    Ok(())
}
