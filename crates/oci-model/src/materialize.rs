//! Run materialization: baseline emissions plus slider deltas.

use crate::codec::decode_run;
use oci_core::{Stage, StageTriple};
use oci_data::{Catalog, DeltaTables, FieldTable, GwpHorizon};
use std::collections::BTreeMap;

/// One run's emissions dataset: field name → stage triple. Ordered so that
/// serialization is byte-stable, which the run store relies on.
pub type RunDataset = BTreeMap<String, StageTriple>;

/// Materialize the dataset for one run ID.
///
/// Decodes the run's parameter values, picks the GWP horizon from the decoded
/// `gwp` parameter, and for every field and stage computes
/// `baseline + Σ delta(param, value, stage, field)`. Plain f64 sums, no
/// rounding. Deterministic: the same inputs always produce identical output.
pub fn materialize_run(
    catalog: &Catalog,
    fields: &FieldTable,
    deltas: &DeltaTables,
    run_id: &str,
) -> RunDataset {
    let params = decode_run(catalog, run_id);
    let horizon = GwpHorizon::from_param_value(params.get("gwp").copied());
    let table = deltas.for_horizon(horizon);

    fields
        .iter()
        .map(|(key, record)| {
            let baseline = record.baseline(horizon);
            let stage_sum = |stage: Stage, base: f64| {
                base + params
                    .iter()
                    .map(|(name, value)| table.delta(name, *value, stage, key))
                    .sum::<f64>()
            };
            let triple = StageTriple {
                upstream: stage_sum(Stage::Upstream, baseline.upstream),
                midstream: stage_sum(Stage::Midstream, baseline.midstream),
                downstream: stage_sum(Stage::Downstream, baseline.downstream),
            };
            (key.clone(), triple)
        })
        .collect()
}
