//! Barrido command-line interface.
//!
//! Wires the sweep pipeline together: parse arguments, run the grid sweep
//! with an external FID engine command, aggregate, and write the three
//! report artifacts.

use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use barrido::aggregate::Aggregation;
use barrido::config::SweepConfig;
use barrido::engine::CommandEngine;
use barrido::report::{ReportExporter, ReportPaths};
use barrido::sweep::{Decision, SweepRunner};

/// FID grid sweep: score sampler configurations and report the results.
///
/// Each grid point (steps, eta) is expected as a sample folder named
/// `steps_{steps}_{eta token}` under the samples root. Every point is scored
/// with the external engine command; points with a missing folder or a
/// failing engine call are recorded and skipped, never fatal.
#[derive(Parser)]
#[command(name = "barrido", version, about, long_about = None)]
struct Cli {
    /// FID engine command, invoked as:
    /// `<engine> <reference> <sample> --img-size N --batch-size N`
    #[arg(long)]
    engine: PathBuf,

    /// Reference dataset directory
    #[arg(long, default_value = "./data/afhq/eval")]
    reference: PathBuf,

    /// Root directory of the per-configuration sample folders
    #[arg(long, default_value = "./samples")]
    samples: PathBuf,

    /// Steps axis (outer loop), in sweep order
    #[arg(long, value_delimiter = ',', default_values_t = [10u32, 20, 50, 100, 1000])]
    steps: Vec<u32>,

    /// Eta axis (inner loop), in sweep order
    #[arg(long, value_delimiter = ',', default_values_t = [0.0, 0.2, 0.5, 1.0])]
    etas: Vec<f64>,

    /// Image resolution passed to the engine
    #[arg(long, default_value_t = 256)]
    image_size: u32,

    /// Batch size passed to the engine
    #[arg(long, default_value_t = 64)]
    batch_size: u32,

    /// Load the sweep configuration from a JSON file instead of the
    /// path/axis flags above (flags are ignored when set)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output directory for fid_results.{xlsx,csv,txt}
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Continue without prompting when the reference path is missing
    #[arg(long)]
    assume_yes: bool,
}

impl Cli {
    fn sweep_config(&self) -> anyhow::Result<SweepConfig> {
        if let Some(path) = &self.config {
            return Ok(SweepConfig::from_json_file(path)?);
        }
        Ok(SweepConfig {
            reference_path: self.reference.clone(),
            samples_root: self.samples.clone(),
            steps: self.steps.clone(),
            etas: self.etas.clone(),
            image_size: self.image_size,
            batch_size: self.batch_size,
        })
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = cli.sweep_config()?;
    let engine = CommandEngine::new(&cli.engine);
    let runner = SweepRunner::new(&config, &engine);

    let sweep = if cli.assume_yes {
        runner.run(&Decision::Proceed)?
    } else {
        runner.run(&prompt_on_missing_reference)?
    };

    let aggregation = Aggregation::from_results(sweep.results());
    let paths = ReportPaths::in_dir(&cli.out_dir);
    ReportExporter::new(sweep.results(), &aggregation, sweep.info()).write_all(&paths)?;

    println!("Reports written:");
    println!("  {}", paths.workbook.display());
    println!("  {}", paths.pivot_csv.display());
    println!("  {}", paths.text.display());
    Ok(())
}

/// Interactive stand-in for unattended policies: ask the operator whether a
/// sweep without its reference dataset is worth running.
fn prompt_on_missing_reference(reference: &Path) -> Decision {
    eprintln!("Reference path not found: {}", reference.display());
    eprint!("Continue anyway? (y/n): ");

    let mut line = String::new();
    if io::stdin().lock().read_line(&mut line).is_err() {
        return Decision::Abort;
    }
    if line.trim().eq_ignore_ascii_case("y") {
        Decision::Proceed
    } else {
        Decision::Abort
    }
}
