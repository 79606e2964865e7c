use std::fs::File;
use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use isr_core::IsrCalculator;
use isr_data::{BatchProcessor, TaxTableLoader};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Calculate ISR and TSS withholding for every employee in a CSV payroll.
///
/// The input CSV must have the following columns:
/// - total_ingresos: monthly gross income
/// - numero_dependientes: number of dependents
/// - total_ingresos_tss: (optional) separate TSS contribution base
///
/// The output CSV repeats the first two columns and adds
/// isr, imponible, tss, afp, sfs, percapita and cobro.
#[derive(Parser, Debug)]
#[command(name = "isr-batch")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the payroll CSV file
    #[arg(short, long)]
    file: PathBuf,

    /// Where to write the results CSV (stdout when omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// TOML tax table replacing the built-in DGII table
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    let config = TaxTableLoader::load_or_default(args.config.as_deref())
        .context("Failed to load tax table")?;
    let calculator = IsrCalculator::new(config);
    let processor = BatchProcessor::new(&calculator);

    info!("Reading payroll from: {}", args.file.display());
    let input = File::open(&args.file)
        .with_context(|| format!("Failed to open: {}", args.file.display()))?;

    let summary = match &args.output {
        Some(path) => processor
            .run_to_file(input, path)
            .with_context(|| format!("Failed to write results: {}", path.display())),
        None => processor
            .run(input, io::stdout().lock())
            .with_context(|| format!("Failed to process payroll: {}", args.file.display())),
    }?;

    info!(
        "Processed {} rows: ISR {}, TSS {}, net pay {}",
        summary.rows, summary.total_isr, summary.total_tss, summary.total_cobro
    );

    Ok(())
}
