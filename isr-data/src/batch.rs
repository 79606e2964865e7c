use std::fs;
use std::io::{Read, Write};
use std::path::Path;

use isr_core::{CalculationInputs, CalculatorError, IsrCalculator, IsrResult};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize, Serializer};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur when running a payroll batch.
#[derive(Debug, Error)]
pub enum BatchError {
    #[error("CSV error: {0}")]
    Csv(String),

    #[error("row {row}: {source}")]
    Calculation {
        row: usize,
        #[source]
        source: CalculatorError,
    },

    #[error("row {row}: batch totals are too large")]
    TotalsOutOfRange { row: usize },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<csv::Error> for BatchError {
    fn from(err: csv::Error) -> Self {
        BatchError::Csv(err.to_string())
    }
}

/// One employee line of the input CSV.
///
/// - `total_ingresos`: monthly gross income
/// - `numero_dependientes`: dependent count
/// - `total_ingresos_tss`: optional TSS base (column may be missing or empty)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BatchInputRecord {
    pub total_ingresos: Decimal,
    pub numero_dependientes: u32,
    #[serde(default, deserialize_with = "deserialize_optional_decimal")]
    pub total_ingresos_tss: Option<Decimal>,
}

impl From<&BatchInputRecord> for CalculationInputs {
    fn from(record: &BatchInputRecord) -> Self {
        CalculationInputs {
            total_ingresos: record.total_ingresos,
            numero_dependientes: record.numero_dependientes,
            total_ingresos_tss: record.total_ingresos_tss,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// One line of the output CSV: the inputs followed by the seven results.
///
/// Amounts are written with exactly three decimals.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct BatchOutputRecord {
    #[serde(serialize_with = "serialize_amount")]
    pub total_ingresos: Decimal,
    pub numero_dependientes: u32,
    #[serde(serialize_with = "serialize_amount")]
    pub isr: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub imponible: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub tss: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub afp: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub sfs: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub percapita: Decimal,
    #[serde(serialize_with = "serialize_amount")]
    pub cobro: Decimal,
}

impl BatchOutputRecord {
    fn new(
        input: &BatchInputRecord,
        result: &IsrResult,
    ) -> Self {
        Self {
            total_ingresos: input.total_ingresos,
            numero_dependientes: input.numero_dependientes,
            isr: result.isr,
            imponible: result.imponible,
            tss: result.tss,
            afp: result.afp,
            sfs: result.sfs,
            percapita: result.percapita,
            cobro: result.cobro,
        }
    }
}

fn serialize_amount<S>(
    value: &Decimal,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&format!("{value:.3}"))
}

/// Totals over every processed row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub rows: usize,
    pub total_isr: Decimal,
    pub total_tss: Decimal,
    pub total_cobro: Decimal,
}

impl BatchSummary {
    fn add(
        &mut self,
        output: &BatchOutputRecord,
    ) -> Result<(), BatchError> {
        let row = self.rows + 1;
        let sum = |total: Decimal, amount: Decimal| {
            total
                .checked_add(amount)
                .ok_or(BatchError::TotalsOutOfRange { row })
        };

        let total_isr = sum(self.total_isr, output.isr)?;
        let total_tss = sum(self.total_tss, output.tss)?;
        let total_cobro = sum(self.total_cobro, output.cobro)?;

        *self = Self {
            rows: row,
            total_isr,
            total_tss,
            total_cobro,
        };
        Ok(())
    }
}

/// Runs the withholding calculation over every row of a CSV payroll.
pub struct BatchProcessor<'a> {
    calculator: &'a IsrCalculator,
}

impl<'a> BatchProcessor<'a> {
    pub fn new(calculator: &'a IsrCalculator) -> Self {
        Self { calculator }
    }

    /// Parses input records from a CSV reader.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BatchInputRecord>, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BatchInputRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    /// Calculates every record, numbering rows from 1 in error reports.
    pub fn calculate(
        &self,
        records: &[BatchInputRecord],
    ) -> Result<Vec<BatchOutputRecord>, BatchError> {
        records
            .iter()
            .enumerate()
            .map(|(index, record)| {
                let result = self
                    .calculator
                    .calculate(&CalculationInputs::from(record))
                    .map_err(|source| BatchError::Calculation {
                        row: index + 1,
                        source,
                    })?;
                debug!(row = index + 1, cobro = %result.cobro, "calculated row");
                Ok(BatchOutputRecord::new(record, &result))
            })
            .collect()
    }

    /// Reads a payroll CSV, calculates each row and writes the results CSV.
    ///
    /// Nothing is written if any row fails.
    pub fn run<R: Read, W: Write>(
        &self,
        reader: R,
        writer: W,
    ) -> Result<BatchSummary, BatchError> {
        let records = Self::parse(reader)?;
        let outputs = self.calculate(&records)?;

        let mut summary = BatchSummary::default();
        for output in &outputs {
            summary.add(output)?;
        }

        let mut csv_writer = csv::Writer::from_writer(writer);
        for output in &outputs {
            csv_writer.serialize(output)?;
        }
        csv_writer.flush()?;

        info!(
            rows = summary.rows,
            total_isr = %summary.total_isr,
            total_tss = %summary.total_tss,
            total_cobro = %summary.total_cobro,
            "batch complete"
        );

        Ok(summary)
    }

    /// Like [`run`](Self::run), but creates or replaces `path` only after
    /// every row has been calculated.
    pub fn run_to_file<R: Read>(
        &self,
        reader: R,
        path: &Path,
    ) -> Result<BatchSummary, BatchError> {
        let mut buffer = Vec::new();
        let summary = self.run(reader, &mut buffer)?;
        fs::write(path, buffer)?;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_reads_optional_tss_column() {
        let csv = "total_ingresos,numero_dependientes,total_ingresos_tss\n50000,0,\n50000,1,40000\n";

        let records = BatchProcessor::parse(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].total_ingresos_tss, None);
        assert_eq!(records[1].total_ingresos_tss, Some(dec!(40000)));
    }

    #[test]
    fn parse_accepts_missing_tss_column() {
        let csv = "total_ingresos,numero_dependientes\n15000,2\n";

        let records = BatchProcessor::parse(csv.as_bytes()).unwrap();

        assert_eq!(
            records,
            vec![BatchInputRecord {
                total_ingresos: dec!(15000),
                numero_dependientes: 2,
                total_ingresos_tss: None,
            }]
        );
    }

    #[test]
    fn parse_rejects_non_numeric_income() {
        let csv = "total_ingresos,numero_dependientes\nmucho,0\n";

        assert!(matches!(
            BatchProcessor::parse(csv.as_bytes()),
            Err(BatchError::Csv(_))
        ));
    }

    #[test]
    fn calculate_reports_failing_row() {
        let calculator = IsrCalculator::default();
        let processor = BatchProcessor::new(&calculator);
        let records = vec![
            BatchInputRecord {
                total_ingresos: dec!(50000),
                numero_dependientes: 0,
                total_ingresos_tss: None,
            },
            BatchInputRecord {
                total_ingresos: dec!(-1),
                numero_dependientes: 0,
                total_ingresos_tss: None,
            },
        ];

        let result = processor.calculate(&records);

        match result {
            Err(BatchError::Calculation { row, source }) => {
                assert_eq!(row, 2);
                assert_eq!(source, CalculatorError::NegativeIncome(dec!(-1)));
            }
            other => panic!("expected calculation error, got {other:?}"),
        }
    }

    #[test]
    fn summary_rejects_totals_that_overflow() {
        let output = BatchOutputRecord {
            total_ingresos: Decimal::MAX,
            numero_dependientes: 0,
            isr: dec!(0),
            imponible: dec!(0),
            tss: dec!(0),
            afp: dec!(0),
            sfs: dec!(0),
            percapita: dec!(0),
            cobro: Decimal::MAX,
        };
        let mut summary = BatchSummary::default();

        summary.add(&output).unwrap();
        let result = summary.add(&output);

        assert!(matches!(result, Err(BatchError::TotalsOutOfRange { row: 2 })));
        assert_eq!(summary.rows, 1);
    }

    #[test]
    fn run_writes_three_decimal_amounts() {
        let calculator = IsrCalculator::default();
        let processor = BatchProcessor::new(&calculator);
        let mut output = Vec::new();

        let summary = processor
            .run("total_ingresos,numero_dependientes\n50000,0\n".as_bytes(), &mut output)
            .unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "total_ingresos,numero_dependientes,isr,imponible,tss,afp,sfs,percapita,cobro\n\
             50000.000,0,1854.000,47045.000,2955.000,1435.000,1520.000,0.000,45191.000\n"
        );
        assert_eq!(summary.rows, 1);
        assert_eq!(summary.total_cobro, dec!(45191));
    }
}
