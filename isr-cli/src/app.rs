use std::io::{BufRead, Write};

use anyhow::{Context, Result};
use isr_core::{CalculationInputs, IsrCalculator, IsrResult};
use tracing::{debug, info};

use crate::format::format_input_value;
use crate::input::{parse_dependientes, parse_ingresos};
use crate::report::{render_escalas, render_inputs, render_json, render_result};

/// Words that end an interactive session.
const SALIR: [&str; 3] = ["salir", "q", "exit"];

const PROMPT_INGRESOS: &str = "Ingresos totales mensuales (RD$): ";
const PROMPT_DEPENDIENTES: &str = "Número de dependientes: ";

/// How results are presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionOptions {
    /// Expand TSS into AFP, SFS and Percapita.
    pub detalle: bool,
    /// Print JSON instead of the text panel.
    pub json: bool,
    /// Print the bracket table before the first result.
    pub escalas: bool,
}

/// Drives the calculator from the command line, once or interactively.
#[derive(Debug, Clone)]
pub struct Session {
    calculator: IsrCalculator,
    options: SessionOptions,
}

impl Session {
    pub fn new(
        calculator: IsrCalculator,
        options: SessionOptions,
    ) -> Self {
        Self {
            calculator,
            options,
        }
    }

    /// Prints the bracket table.
    pub fn show_escalas<W: Write>(
        &self,
        out: &mut W,
    ) -> Result<()> {
        write!(out, "{}", render_escalas(self.calculator.config()))?;
        Ok(())
    }

    /// Calculates one set of inputs and prints it.
    pub fn run_once<W: Write>(
        &self,
        inputs: &CalculationInputs,
        out: &mut W,
    ) -> Result<IsrResult> {
        if self.options.escalas && !self.options.json {
            self.show_escalas(out)?;
            writeln!(out)?;
        }
        self.calculate_and_print(inputs, out)
    }

    /// Prompts for income and dependents until EOF or a quit word,
    /// recalculating after every pair of answers.
    ///
    /// Returns how many calculations were printed.
    pub fn run_interactive<R: BufRead, W: Write>(
        &self,
        mut input: R,
        out: &mut W,
    ) -> Result<usize> {
        if self.options.escalas {
            self.show_escalas(out)?;
            writeln!(out)?;
        }
        writeln!(out, "Escriba 'salir' para terminar.")?;

        let mut calculations = 0;
        loop {
            let Some(ingresos_text) = prompt(&mut input, out, PROMPT_INGRESOS)? else {
                break;
            };
            let parsed = match parse_ingresos(&ingresos_text) {
                Ok(parsed) => parsed,
                Err(e) => {
                    writeln!(out, "  {e}")?;
                    continue;
                }
            };
            if let Some(warning) = parsed.warning() {
                writeln!(out, "  {warning}")?;
            }

            let Some(dependientes_text) = prompt(&mut input, out, PROMPT_DEPENDIENTES)? else {
                break;
            };
            let dependientes = match parse_dependientes(&dependientes_text) {
                Ok(count) => count,
                Err(e) => {
                    writeln!(out, "  {e}")?;
                    continue;
                }
            };

            debug!(
                ingresos = %format_input_value(parsed.value),
                dependientes,
                "recalculating"
            );
            writeln!(out)?;
            self.calculate_and_print(&CalculationInputs::new(parsed.value, dependientes), out)?;
            writeln!(out)?;
            calculations += 1;
        }

        info!(calculations, "interactive session ended");
        Ok(calculations)
    }

    fn calculate_and_print<W: Write>(
        &self,
        inputs: &CalculationInputs,
        out: &mut W,
    ) -> Result<IsrResult> {
        let result = self
            .calculator
            .calculate(inputs)
            .context("withholding calculation failed")?;

        if self.options.json {
            writeln!(out, "{}", render_json(inputs, &result)?)?;
        } else {
            write!(out, "{}", render_inputs(inputs, self.calculator.config()))?;
            writeln!(out)?;
            write!(out, "{}", render_result(&result, self.options.detalle))?;
        }

        Ok(result)
    }
}

/// Writes `label`, reads one line. `None` on EOF or a quit word.
fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    label: &str,
) -> Result<Option<String>> {
    write!(out, "{label}")?;
    out.flush()?;

    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        writeln!(out)?;
        return Ok(None);
    }
    let answer = line.trim();
    if SALIR.contains(&answer.to_lowercase().as_str()) {
        return Ok(None);
    }
    Ok(Some(answer.to_string()))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn session(options: SessionOptions) -> Session {
        Session::new(IsrCalculator::default(), options)
    }

    #[test]
    fn run_once_returns_result_and_prints_panel() {
        let mut out = Vec::new();

        let result = session(SessionOptions::default())
            .run_once(&CalculationInputs::new(dec!(50000), 0), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(result.cobro, dec!(45191));
        assert!(text.starts_with("Ingresos mensuales"));
        assert!(text.contains("RD$45,191.00  (mensual)"));
        assert!(!text.contains("Monto AFP"));
    }

    #[test]
    fn run_once_json_skips_escalas() {
        let options = SessionOptions {
            json: true,
            escalas: true,
            ..SessionOptions::default()
        };
        let mut out = Vec::new();

        session(options)
            .run_once(&CalculationInputs::new(dec!(50000), 0), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.trim_start().starts_with('{'));
        assert!(!text.contains("Escalas"));
    }

    #[test]
    fn run_once_rejects_negative_tss_base() {
        let inputs = CalculationInputs::new(dec!(50000), 0).with_ingresos_tss(dec!(-1));

        let result = session(SessionOptions::default()).run_once(&inputs, &mut Vec::new());

        assert!(result.is_err());
    }

    #[test]
    fn interactive_stops_on_salir() {
        let mut out = Vec::new();

        let count = session(SessionOptions::default())
            .run_interactive("50,000\n0\nsalir\n".as_bytes(), &mut out)
            .unwrap();

        assert_eq!(count, 1);
    }

    #[test]
    fn interactive_reports_bad_dependents_and_continues() {
        let mut out = Vec::new();

        let count = session(SessionOptions::default())
            .run_interactive("15000\n25\n15000\n2\n".as_bytes(), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(count, 1);
        assert!(text.contains("at most 20 dependents are allowed, got 25"));
        assert!(text.contains("RD$10,682.58  (mensual)"));
    }

    #[test]
    fn interactive_warns_about_sanitized_income() {
        let mut out = Vec::new();

        session(SessionOptions::default())
            .run_interactive("RD$60000\n\n".as_bytes(), &mut out)
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("  Solo se permiten números, comas y puntos.\n"));
        assert!(text.contains("Monto ISR                      RD$3,486.65"));
    }

    #[test]
    fn interactive_ends_quietly_on_eof() {
        let mut out = Vec::new();

        let count = session(SessionOptions::default())
            .run_interactive("".as_bytes(), &mut out)
            .unwrap();

        assert_eq!(count, 0);
    }
}
