//! Global extent cache.
//!
//! An extent is the global minimum or maximum of one component's converted
//! value across every run and every field in scope. The full scan is
//! O(runs × fields) — the single most expensive operation in the system — so
//! results are memoized per query key behind the same slot-per-key coalescing
//! the run store uses: concurrent misses for one query run a single scan. The
//! run-ID space is enumerated once per catalog and shared across calls.
//!
//! Per-dollar entries additionally record the price-book epoch they were
//! computed under; a moved epoch makes the entry stale and forces a rescan.
//!
//! A ratio whose conversion constants are unavailable (zero heating value,
//! empty price book, missing per-$ columns) would divide to ±inf; those
//! values are excluded from the scan, and a scan left with nothing finite is
//! a typed error rather than an infinite extent.

use crate::store::RunStore;
use crate::types::{ExtentQuery, GlobalExtents};
use crate::{ResultsError, ResultsResult, RunId, lock_unpoisoned};
use oci_core::{Component, Direction, Ratio, convert};
use oci_data::{FieldTable, PriceBook};
use oci_model::enumerate_runs;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, OnceLock};

#[derive(Debug, Clone, Copy)]
struct ExtentEntry {
    value: f64,
    price_epoch: u64,
}

/// Per-query slot. The slot lock is held for the duration of a scan, so
/// concurrent misses for the same query coalesce into one scan.
type Slot = Arc<Mutex<Option<ExtentEntry>>>;

#[derive(Default)]
pub struct ExtentCache {
    runs: OnceLock<Vec<RunId>>,
    entries: Mutex<HashMap<ExtentQuery, Slot>>,
}

impl ExtentCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute or recall the extent for a query.
    pub fn extent(
        &self,
        store: &RunStore,
        fields: &FieldTable,
        prices: &PriceBook,
        query: &ExtentQuery,
    ) -> ResultsResult<f64> {
        let slot = {
            let mut entries = lock_unpoisoned(&self.entries);
            entries.entry(query.clone()).or_default().clone()
        };

        let mut guard = lock_unpoisoned(&slot);
        if let Some(entry) = guard.as_ref()
            && !(query.ratio == Ratio::PerDollar && entry.price_epoch != prices.epoch())
        {
            return Ok(entry.value);
        }

        let value = self.scan(store, fields, prices, query)?;
        *guard = Some(ExtentEntry {
            value,
            price_epoch: prices.epoch(),
        });
        Ok(value)
    }

    /// Every extent combination, for the batch artifact: each ratio × global
    /// and each field × each component × min and max. Ratios with no finite
    /// value for a scope are omitted from the artifact rather than baked as
    /// ±inf (which would serialize as null).
    pub fn all_extents(
        &self,
        store: &RunStore,
        fields: &FieldTable,
        prices: &PriceBook,
    ) -> ResultsResult<GlobalExtents> {
        let mut extents = GlobalExtents::default();
        for ratio in Ratio::ALL {
            let mut field_axis: Vec<Option<String>> = vec![None];
            field_axis.extend(fields.keys().cloned().map(Some));
            for field in field_axis {
                for component in Component::ALL {
                    for direction in Direction::ALL {
                        let query = ExtentQuery {
                            ratio,
                            direction,
                            component,
                            field: field.clone(),
                        };
                        let value = match self.extent(store, fields, prices, &query) {
                            Ok(value) => value,
                            Err(ResultsError::NonFiniteExtent { .. }) => continue,
                            Err(other) => return Err(other),
                        };
                        extents.insert(&query, value);
                    }
                }
            }
        }
        Ok(extents)
    }

    /// Number of memoized extents, for diagnostics.
    pub fn cached_len(&self) -> usize {
        lock_unpoisoned(&self.entries)
            .values()
            .filter(|slot| lock_unpoisoned(slot).is_some())
            .count()
    }

    fn scan(
        &self,
        store: &RunStore,
        fields: &FieldTable,
        prices: &PriceBook,
        query: &ExtentQuery,
    ) -> ResultsResult<f64> {
        let scope: Vec<&str> = match &query.field {
            Some(field) => {
                if !fields.contains(field) {
                    return Err(ResultsError::FieldNotFound {
                        field: field.clone(),
                    });
                }
                vec![field.as_str()]
            }
            None => fields.keys().map(String::as_str).collect(),
        };
        if scope.is_empty() {
            return Err(ResultsError::EmptyExtentScan);
        }

        let runs = self.runs.get_or_init(|| enumerate_runs(store.catalog()));
        tracing::debug!(
            ratio = query.ratio.as_key(),
            component = query.component.as_key(),
            direction = query.direction.as_key(),
            field = query.field_key(),
            runs = runs.len(),
            "scanning extent"
        );

        let mut extent: Option<f64> = None;
        let mut saw_value = false;
        for run in runs {
            let dataset = store.get(run)?;
            for field_key in &scope {
                let Some(triple) = dataset.get(*field_key) else {
                    continue;
                };
                // contains() above guarantees the record exists
                let Some(record) = fields.get(field_key) else {
                    continue;
                };
                saw_value = true;
                let raw = query.component.select(triple);
                let value = convert(raw, query.ratio, &record.constants(prices));
                if !value.is_finite() {
                    continue;
                }
                match extent {
                    Some(current) if !query.direction.improves(value, current) => {}
                    _ => extent = Some(value),
                }
            }
        }
        match extent {
            Some(value) => Ok(value),
            None if saw_value => Err(ResultsError::NonFiniteExtent {
                ratio: query.ratio.as_key(),
                field: query.field_key().to_string(),
            }),
            None => Err(ResultsError::EmptyExtentScan),
        }
    }
}
