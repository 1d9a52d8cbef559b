//! Batch precomputation.
//!
//! Enumerates the full run space, materializes every run in parallel, writes
//! one artifact per run, then computes every extent combination and writes
//! the consolidated extents artifact plus a small manifest. A run that fails
//! to materialize or persist is a hard error — the build must not silently
//! skip runs.

use crate::error::AppResult;
use crate::progress::{PrecalcProgressEvent, PrecalcStage};
use oci_core::{Component, Direction, Ratio};
use oci_data::{Catalog, DeltaTables, FieldTable, PriceBook};
use oci_model::{RunId, enumerate_runs, materialize_run};
use oci_results::{ArtifactStore, ExtentCache, RunStore};
use rayon::prelude::*;
use serde::Serialize;
use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Runs are processed in chunks so progress can be reported between parallel
/// batches.
const CHUNK_SIZE: usize = 64;

#[derive(Debug, Clone, Default)]
pub struct PrecalcOptions {
    /// Skip runs whose artifact already exists, for restarting a partial
    /// build.
    pub resume: bool,
}

/// Execution summary for a batch build.
#[derive(Debug, Clone, Serialize)]
pub struct PrecalcSummary {
    pub run_count: usize,
    pub runs_written: usize,
    pub runs_skipped: usize,
    pub field_count: usize,
    pub extent_count: usize,
    pub elapsed_wall_s: f64,
}

#[derive(Debug, Serialize)]
struct PrecalcManifest<'a> {
    generated_at: String,
    parameters: Vec<&'a str>,
    run_count: usize,
    runs_written: usize,
    runs_skipped: usize,
    field_count: usize,
    extent_count: usize,
}

fn emit(
    progress_cb: &mut Option<&mut dyn FnMut(PrecalcProgressEvent)>,
    stage: PrecalcStage,
    completed: usize,
    total: usize,
    started: Instant,
    message: Option<String>,
) {
    if let Some(cb) = progress_cb.as_deref_mut() {
        cb(PrecalcProgressEvent {
            stage,
            completed,
            total,
            elapsed_wall_s: started.elapsed().as_secs_f64(),
            message,
        });
    }
}

/// Run the batch build into `out_dir` (`runs/run_<id>.json` per run,
/// `global-extents.json`, `precalc-manifest.json`).
pub fn precalc(
    catalog: &Arc<Catalog>,
    fields: &Arc<FieldTable>,
    deltas: &Arc<DeltaTables>,
    prices: &PriceBook,
    out_dir: &Path,
    options: &PrecalcOptions,
    mut progress_cb: Option<&mut dyn FnMut(PrecalcProgressEvent)>,
) -> AppResult<PrecalcSummary> {
    let started = Instant::now();

    let runs: Vec<RunId> = enumerate_runs(catalog);
    emit(
        &mut progress_cb,
        PrecalcStage::EnumeratingRuns,
        0,
        runs.len(),
        started,
        Some(format!("{} runs over {} parameters", runs.len(), catalog.len())),
    );

    let artifacts = ArtifactStore::new(out_dir.join("runs"))?;
    let mut runs_written = 0usize;
    let mut runs_skipped = 0usize;

    for chunk in runs.chunks(CHUNK_SIZE) {
        let outcomes: Vec<bool> = chunk
            .par_iter()
            .map(|run| -> AppResult<bool> {
                if options.resume && artifacts.has_run(run) {
                    return Ok(false);
                }
                let dataset = materialize_run(catalog, fields, deltas, run);
                artifacts.save_run(run, &dataset)?;
                Ok(true)
            })
            .collect::<AppResult<_>>()?;

        runs_written += outcomes.iter().filter(|written| **written).count();
        runs_skipped += outcomes.iter().filter(|written| !**written).count();
        emit(
            &mut progress_cb,
            PrecalcStage::MaterializingRuns,
            runs_written + runs_skipped,
            runs.len(),
            started,
            None,
        );
    }

    // Extents read back through a store over the just-written artifacts, so
    // the batch scan exercises the same data the site will serve.
    let store = RunStore::with_inputs(
        Arc::clone(catalog),
        Arc::clone(fields),
        Arc::clone(deltas),
        Some(ArtifactStore::open(out_dir.join("runs"))),
    );
    let cache = ExtentCache::new();
    // upper bound: unconvertible ratios are omitted from the artifact
    let extent_total =
        Ratio::ALL.len() * (fields.len() + 1) * Component::ALL.len() * Direction::ALL.len();
    emit(
        &mut progress_cb,
        PrecalcStage::ComputingExtents,
        0,
        extent_total,
        started,
        None,
    );
    let extents = cache.all_extents(&store, fields, prices)?;
    emit(
        &mut progress_cb,
        PrecalcStage::ComputingExtents,
        extents.len(),
        extent_total,
        started,
        None,
    );

    emit(
        &mut progress_cb,
        PrecalcStage::SavingArtifacts,
        0,
        2,
        started,
        None,
    );
    fs::write(
        out_dir.join("global-extents.json"),
        serde_json::to_string(&extents)?,
    )?;

    let manifest = PrecalcManifest {
        generated_at: chrono::Utc::now().to_rfc3339(),
        parameters: catalog.iter().map(|(name, _)| name.as_str()).collect(),
        run_count: runs.len(),
        runs_written,
        runs_skipped,
        field_count: fields.len(),
        extent_count: extents.len(),
    };
    fs::write(
        out_dir.join("precalc-manifest.json"),
        serde_json::to_string_pretty(&manifest)?,
    )?;

    let summary = PrecalcSummary {
        run_count: runs.len(),
        runs_written,
        runs_skipped,
        field_count: fields.len(),
        extent_count: extents.len(),
        elapsed_wall_s: started.elapsed().as_secs_f64(),
    };
    tracing::info!(
        runs = summary.run_count,
        written = summary.runs_written,
        skipped = summary.runs_skipped,
        extents = summary.extent_count,
        "precalc complete"
    );
    emit(
        &mut progress_cb,
        PrecalcStage::Completed,
        runs.len(),
        runs.len(),
        started,
        None,
    );
    Ok(summary)
}
