use clap::{Args, Parser, Subcommand};
use oci_app::{
    AppError, AppResult, InputPaths, PrecalcOptions, PrecalcProgressEvent, PrecalcStage, Session,
    precalc,
};
use oci_core::{Component, Direction, Ratio};
use oci_results::ExtentQuery;
use std::io::{self, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "oci-cli")]
#[command(about = "Oil-Climate Index CLI - run-space precalc and lookup tool", long_about = None)]
struct Cli {
    #[command(flatten)]
    inputs: InputArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Locations of the input artifacts, shared by every subcommand.
#[derive(Args)]
struct InputArgs {
    /// Slider/toggle parameter metadata JSON
    #[arg(long, global = true, default_value = "data/metadata.json")]
    metadata: PathBuf,
    /// Per-field baseline info JSON
    #[arg(long, global = true, default_value = "data/info.json")]
    info: PathBuf,
    /// 20-year-horizon delta table CSV
    #[arg(long, global = true, default_value = "data/deltas20.csv")]
    deltas20: PathBuf,
    /// 100-year-horizon delta table CSV
    #[arg(long, global = true, default_value = "data/deltas100.csv")]
    deltas100: PathBuf,
    /// Product price book JSON (needed for per-dollar ratios)
    #[arg(long, global = true)]
    prices: Option<PathBuf>,
    /// Directory of prebaked run artifacts to serve from
    #[arg(long, global = true)]
    runs_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the input artifacts and report run-space size
    Validate,
    /// Precompute every run and the consolidated extents
    Precalc {
        /// Output directory for the generated artifacts
        #[arg(short, long, default_value = "precalc-out")]
        out: PathBuf,
        /// Skip runs whose artifact already exists
        #[arg(long)]
        resume: bool,
    },
    /// Show the dataset for one run
    Run {
        /// Run ID (one digit per parameter); malformed IDs fall back to the
        /// default run
        run_id: String,
        /// Output JSON file path (optional, defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Look up a global extent
    Extent {
        /// Ratio key (perBarrel, perMJ, perDollar, perCurrent, perHistoric)
        ratio: String,
        /// min or max
        direction: String,
        /// Component key (ghgTotal, upstream, midstream, downstream)
        #[arg(default_value = "ghgTotal")]
        component: String,
        /// Restrict the scan to one field (defaults to all fields)
        #[arg(long)]
        field: Option<String>,
    },
    /// Decode a run ID into parameter values
    Params {
        /// Run ID to decode
        run_id: String,
    },
    /// List the full run-ID space
    Runs {
        /// Print only the run count
        #[arg(long)]
        count: bool,
    },
}

fn main() -> AppResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let paths = InputPaths {
        metadata: cli.inputs.metadata,
        info: cli.inputs.info,
        deltas20: cli.inputs.deltas20,
        deltas100: cli.inputs.deltas100,
        prices: cli.inputs.prices,
        runs_dir: cli.inputs.runs_dir,
    };

    match cli.command {
        Commands::Validate => cmd_validate(&paths),
        Commands::Precalc { out, resume } => cmd_precalc(&paths, &out, resume),
        Commands::Run { run_id, output } => cmd_run(&paths, &run_id, output.as_deref()),
        Commands::Extent {
            ratio,
            direction,
            component,
            field,
        } => cmd_extent(&paths, &ratio, &direction, &component, field),
        Commands::Params { run_id } => cmd_params(&paths, &run_id),
        Commands::Runs { count } => cmd_runs(&paths, count),
    }
}

fn cmd_validate(paths: &InputPaths) -> AppResult<()> {
    println!("Validating inputs:");
    println!("  metadata: {}", paths.metadata.display());
    println!("  info:     {}", paths.info.display());
    let session = Session::load(paths)?;
    println!("✓ Inputs are valid");
    println!("  Parameters: {}", session.catalog().len());
    println!("  Runs:       {}", session.catalog().run_count());
    println!("  Fields:     {}", session.fields().len());
    println!("  Prices:     {}", session.prices().len());
    Ok(())
}

fn cmd_precalc(paths: &InputPaths, out: &std::path::Path, resume: bool) -> AppResult<()> {
    let session = Session::load(paths)?;
    println!(
        "Precomputing {} runs into {}",
        session.catalog().run_count(),
        out.display()
    );

    let mut last_stage = PrecalcStage::EnumeratingRuns;
    let summary = precalc(
        session.catalog_arc(),
        session.fields_arc(),
        session.deltas_arc(),
        session.prices(),
        out,
        &PrecalcOptions { resume },
        Some(&mut |event: PrecalcProgressEvent| {
            if event.stage != last_stage {
                clear_progress_line();
                last_stage = event.stage;
            }
            render_cli_progress(&event);
        }),
    )?;
    clear_progress_line();

    println!("✓ Precalc complete in {:.2}s", summary.elapsed_wall_s);
    println!("  Runs written: {}", summary.runs_written);
    if summary.runs_skipped > 0 {
        println!("  Runs skipped: {}", summary.runs_skipped);
    }
    println!("  Extents:      {}", summary.extent_count);
    Ok(())
}

fn cmd_run(paths: &InputPaths, run_id: &str, output: Option<&std::path::Path>) -> AppResult<()> {
    let session = Session::load(paths)?;
    let (served_id, dataset) = session.dataset_or_default(run_id)?;
    if served_id != run_id {
        eprintln!("note: run '{}' unavailable, serving '{}'", run_id, served_id);
    }

    let json = serde_json::to_string_pretty(dataset.as_ref())?;
    if let Some(path) = output {
        std::fs::write(path, json)?;
        println!("✓ Wrote run {} to {}", served_id, path.display());
    } else {
        println!("{}", json);
    }
    Ok(())
}

fn cmd_extent(
    paths: &InputPaths,
    ratio: &str,
    direction: &str,
    component: &str,
    field: Option<String>,
) -> AppResult<()> {
    let ratio = Ratio::from_key(ratio)
        .ok_or_else(|| AppError::InvalidInput(format!("unknown ratio key: {}", ratio)))?;
    let direction = match direction {
        "min" => Direction::Min,
        "max" => Direction::Max,
        other => {
            return Err(AppError::InvalidInput(format!(
                "direction must be min or max, got: {}",
                other
            )));
        }
    };
    let component = Component::from_key(component);

    let session = Session::load(paths)?;
    let query = ExtentQuery {
        ratio,
        direction,
        component,
        field,
    };
    let value = session.extent(&query)?;
    println!(
        "{} {} {} [{}] = {}",
        query.ratio.as_key(),
        query.direction.as_key(),
        query.component.as_key(),
        query.field_key(),
        value
    );
    Ok(())
}

fn cmd_params(paths: &InputPaths, run_id: &str) -> AppResult<()> {
    let session = Session::load(paths)?;
    let params = session.params_for_run(run_id);
    for (name, value) in &params {
        println!("  {} = {}", name, value);
    }
    Ok(())
}

fn cmd_runs(paths: &InputPaths, count_only: bool) -> AppResult<()> {
    let session = Session::load(paths)?;
    let runs = session.run_ids();
    println!("{} runs", runs.len());
    if !count_only {
        for run in &runs {
            println!("  {}", run);
        }
    }
    Ok(())
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(120));
    let _ = io::stderr().flush();
}

fn render_cli_progress(event: &PrecalcProgressEvent) {
    let label = match event.stage {
        PrecalcStage::EnumeratingRuns => "Enumerating runs",
        PrecalcStage::MaterializingRuns => "Materializing runs",
        PrecalcStage::ComputingExtents => "Computing extents",
        PrecalcStage::SavingArtifacts => "Saving artifacts",
        PrecalcStage::Completed => "Done",
    };
    if event.total > 0 {
        let fraction = event.completed as f64 / event.total as f64;
        let width = 28usize;
        let filled = ((fraction * width as f64).round() as usize).min(width);
        let bar = format!(
            "{}{}",
            "#".repeat(filled),
            "-".repeat(width.saturating_sub(filled))
        );
        eprint!(
            "\r[{}] {:>6.2}%  {}  {}/{}  elapsed={:.1}s",
            bar,
            fraction * 100.0,
            label,
            event.completed,
            event.total,
            event.elapsed_wall_s
        );
    } else {
        eprint!("\r{}  elapsed={:.1}s", label, event.elapsed_wall_s);
    }
    if let Some(msg) = &event.message {
        eprint!("  {}", msg);
    }
    let _ = io::stderr().flush();
}
