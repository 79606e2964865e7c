use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use isr_cli::input::{parse_dependientes, parse_ingresos};
use isr_cli::{Session, SessionOptions, logging};
use isr_core::{CalculationInputs, IsrCalculator};
use isr_data::TaxTableLoader;
use tracing::{debug, info};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Dominican Republic payroll withholding calculator (ISR and TSS).
///
/// With `--ingresos`, calculates once and exits. Without it, prompts for
/// income and dependents until `salir` or end of input.
#[derive(Debug, Parser)]
#[command(name = "isr-calc", version, about)]
struct Cli {
    /// Monthly gross income, e.g. `50,000.00`.
    #[arg(long)]
    ingresos: Option<String>,

    /// Number of dependents.
    #[arg(long, default_value = "0")]
    dependientes: String,

    /// Separate monthly base for TSS contributions (defaults to income).
    #[arg(long)]
    ingresos_tss: Option<String>,

    /// TOML tax table replacing the built-in DGII table.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Break TSS down into AFP, SFS and Percapita.
    #[arg(long)]
    detalle: bool,

    /// Print the result as JSON.
    #[arg(long)]
    json: bool,

    /// Print the bracket table and contribution parameters.
    #[arg(long)]
    escalas: bool,

    /// Print the tax table in use as TOML and exit.
    #[arg(long)]
    exportar_tabla: bool,

    /// Log filter, e.g. `debug` or `isr_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Also append log records to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    logging::init_logging();

    let cli = Cli::parse();
    if let Some(level) = &cli.log_level {
        logging::set_log_level(level)?;
    }
    if let Some(path) = &cli.log_file {
        logging::enable_file_logging(path)?;
    }

    let config = TaxTableLoader::load_or_default(cli.config.as_deref())
        .context("Failed to load tax table")?;
    debug!(?config, "tax table loaded");

    if cli.exportar_tabla {
        print!("{}", TaxTableLoader::to_toml(&config)?);
        return Ok(());
    }

    let session = Session::new(
        IsrCalculator::new(config),
        SessionOptions {
            detalle: cli.detalle,
            json: cli.json,
            escalas: cli.escalas,
        },
    );
    let mut stdout = io::stdout().lock();

    let Some(ingresos_text) = &cli.ingresos else {
        let calculations = session.run_interactive(io::stdin().lock(), &mut stdout)?;
        info!(calculations, "done");
        return Ok(());
    };

    let ingresos = parse_ingresos(ingresos_text)?;
    if let Some(warning) = ingresos.warning() {
        eprintln!("{warning}");
    }
    let mut inputs =
        CalculationInputs::new(ingresos.value, parse_dependientes(&cli.dependientes)?);
    if let Some(text) = &cli.ingresos_tss {
        let base = parse_ingresos(text)?;
        if let Some(warning) = base.warning() {
            eprintln!("{warning}");
        }
        inputs = inputs.with_ingresos_tss(base.value);
    }

    session.run_once(&inputs, &mut stdout)?;
    Ok(())
}
