//! Integration tests for payroll batches and tax table files.

use std::fs;
use std::path::{Path, PathBuf};

use isr_core::{CalculationInputs, IsrCalculator, TaxConfig};
use isr_data::{BatchError, BatchProcessor, TaxTableLoader};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;

const NOMINA_CSV: &str = include_str!("../test-data/nomina.csv");
const ESCALAS_2016: &str = include_str!("../test-data/escalas_2016.toml");
const SALARIO_MINIMO_2025: &str = include_str!("../test-data/salario_minimo_2025.toml");

const EXPECTED_OUTPUT: &str = "\
total_ingresos,numero_dependientes,isr,imponible,tss,afp,sfs,percapita,cobro
0.000,0,0.000,0.000,0.000,0.000,0.000,0.000,0.000
15000.000,2,0.000,10682.580,4317.420,430.500,456.000,3430.920,10682.580
50000.000,0,1854.000,47045.000,2955.000,1435.000,1520.000,0.000,45191.000
50000.000,0,1942.650,47636.000,2364.000,1148.000,1216.000,0.000,45693.350
60000.000,0,3486.650,56454.000,3546.000,1722.000,1824.000,0.000,52967.350
100000.000,0,12105.437,94090.000,5910.000,2870.000,3040.000,0.000,81984.563
200000.000,0,35962.337,189517.600,10482.400,5740.000,4742.400,0.000,153555.263
5000.000,3,0.000,-441.880,5441.880,143.500,152.000,5146.380,-441.880
";

fn run_batch(
    calculator: &IsrCalculator,
    csv: &str,
) -> (String, isr_data::BatchSummary) {
    let processor = BatchProcessor::new(calculator);
    let mut output = Vec::new();

    let summary = processor
        .run(csv.as_bytes(), &mut output)
        .expect("batch should succeed");

    (String::from_utf8(output).expect("output is UTF-8"), summary)
}

#[test]
fn test_full_payroll_with_default_table() {
    let calculator = IsrCalculator::default();

    let (output, summary) = run_batch(&calculator, NOMINA_CSV);

    assert_eq!(output, EXPECTED_OUTPUT);
    assert_eq!(summary.rows, 8);
    assert_eq!(summary.total_isr, dec!(55351.074));
    assert_eq!(summary.total_tss, dec!(35016.700));
    assert_eq!(summary.total_cobro, dec!(389632.226));
}

#[test]
fn test_explicit_2016_table_matches_builtin() {
    let config = TaxTableLoader::parse(ESCALAS_2016).expect("fixture table is valid");

    assert_eq!(config, TaxConfig::default());

    let (output, _) = run_batch(&IsrCalculator::new(config), NOMINA_CSV);
    assert_eq!(output, EXPECTED_OUTPUT);
}

#[test]
fn test_partial_table_raises_sfs_cap() {
    let config = TaxTableLoader::parse(SALARIO_MINIMO_2025).expect("fixture table is valid");
    let calculator = IsrCalculator::new(config);

    let result = calculator
        .calculate(&CalculationInputs::new(dec!(200000), 0))
        .unwrap();

    // SFS cap is now 210,000, so 200,000 is no longer capped.
    assert_eq!(result.sfs, dec!(6080.00));
    assert_eq!(result.tss, dec!(11820.00));
    assert_eq!(result.isr, dec!(35627.937));
    assert_eq!(result.cobro, dec!(152552.063));
}

#[test]
fn test_load_fixture_from_disk() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("test-data/escalas_2016.toml");

    let config = TaxTableLoader::load(&path).expect("fixture loads");

    assert_eq!(config, TaxConfig::default());
}

#[test]
fn test_negative_row_aborts_batch_without_output() {
    let calculator = IsrCalculator::default();
    let processor = BatchProcessor::new(&calculator);
    let mut output = Vec::new();
    let csv = "total_ingresos,numero_dependientes\n50000,0\n15000,1\n-200,0\n";

    let result = processor.run(csv.as_bytes(), &mut output);

    assert!(matches!(result, Err(BatchError::Calculation { row: 3, .. })));
    assert!(output.is_empty());
}

fn scratch_file(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("isr-batch-{}-{name}", std::process::id()))
}

#[test]
fn test_failed_batch_keeps_existing_output_file() {
    let calculator = IsrCalculator::default();
    let processor = BatchProcessor::new(&calculator);
    let path = scratch_file("keeps-existing.csv");
    fs::write(&path, "previous results\n").unwrap();
    let csv = "total_ingresos,numero_dependientes\n50000,0\n-200,0\n";

    let result = processor.run_to_file(csv.as_bytes(), &path);
    let contents = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert!(matches!(result, Err(BatchError::Calculation { row: 2, .. })));
    assert_eq!(contents, "previous results\n");
}

#[test]
fn test_successful_batch_replaces_output_file() {
    let calculator = IsrCalculator::default();
    let processor = BatchProcessor::new(&calculator);
    let path = scratch_file("replaces.csv");
    fs::write(&path, "previous results\n").unwrap();

    let summary = processor
        .run_to_file(NOMINA_CSV.as_bytes(), &path)
        .unwrap();
    let contents = fs::read_to_string(&path).unwrap();
    fs::remove_file(&path).unwrap();

    assert_eq!(summary.rows, 8);
    assert_eq!(contents, EXPECTED_OUTPUT);
}

#[test]
fn test_header_only_file_is_empty_batch() {
    let calculator = IsrCalculator::default();

    let (output, summary) = run_batch(&calculator, "total_ingresos,numero_dependientes\n");

    assert_eq!(output, "");
    assert_eq!(summary.rows, 0);
}
