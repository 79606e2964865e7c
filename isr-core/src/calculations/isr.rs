//! Income tax (ISR) withholding for a monthly salary.
//!
//! # Calculation Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1 | TSS contributions on the TSS base, rounded |
//! | 2 | Annual taxable base: `(income - tss) × 12` |
//! | 3 | First bracket whose inclusive range holds the annual base |
//! | 4 | Monthly ISR from that bracket, rounded |
//! | 5 | Reported imponible: annual base / 12, rounded |
//! | 6 | Net pay: `income - isr - tss`, rounded |
//!
//! Steps 2 and 6 consume the already rounded `tss` and `isr`, so the
//! invariant `cobro == income - isr - tss` holds exactly.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use isr_core::{CalculationInputs, IsrCalculator, TaxConfig};
//!
//! let calculator = IsrCalculator::new(TaxConfig::default());
//! let result = calculator
//!     .calculate(&CalculationInputs::new(dec!(50000), 0))
//!     .unwrap();
//!
//! assert_eq!(result.tss, dec!(2955.00));
//! assert_eq!(result.isr, dec!(1854.000));
//! assert_eq!(result.imponible, dec!(47045.00));
//! assert_eq!(result.cobro, dec!(45191.000));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::calculations::common::round_amount;
use crate::calculations::tss::compute_tss;
use crate::models::{CalculationInputs, Escala, IsrResult, TaxConfig, TaxConfigError, TssBreakdown};

/// Errors that can occur during withholding calculations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CalculatorError {
    /// The tax table failed validation.
    #[error("invalid tax configuration: {0}")]
    InvalidConfig(#[from] TaxConfigError),

    /// Monthly gross income below zero.
    #[error("monthly income must be non-negative, got {0}")]
    NegativeIncome(Decimal),

    /// TSS contribution base below zero.
    #[error("TSS income must be non-negative, got {0}")]
    NegativeTssIncome(Decimal),

    /// Monthly income too large to annualize.
    #[error("monthly income {0} is too large to annualize")]
    IncomeOutOfRange(Decimal),
}

/// Calculator for ISR and TSS withholding.
///
/// Holds an immutable [`TaxConfig`]; every call is a pure function of its
/// inputs and that table.
#[derive(Debug, Clone, Default)]
pub struct IsrCalculator {
    config: TaxConfig,
}

impl IsrCalculator {
    pub fn new(config: TaxConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// Calculates the full withholding breakdown.
    ///
    /// # Errors
    ///
    /// Returns [`CalculatorError`] if the configuration is invalid, if the
    /// income or TSS base is negative, or if the income overflows once
    /// annualized.
    ///
    /// # Example: Dependents below the exempt threshold
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use isr_core::{CalculationInputs, IsrCalculator};
    ///
    /// let calculator = IsrCalculator::default();
    /// let result = calculator
    ///     .calculate(&CalculationInputs::new(dec!(15000), 2))
    ///     .unwrap();
    ///
    /// assert_eq!(result.percapita, dec!(3430.92));
    /// assert_eq!(result.isr, dec!(0));
    /// ```
    pub fn calculate(
        &self,
        inputs: &CalculationInputs,
    ) -> Result<IsrResult, CalculatorError> {
        self.config.validate()?;

        let income = inputs.total_ingresos;
        if income < Decimal::ZERO {
            return Err(CalculatorError::NegativeIncome(income));
        }
        let tss_base = inputs.tss_base();
        if tss_base < Decimal::ZERO {
            return Err(CalculatorError::NegativeTssIncome(tss_base));
        }

        // Step 1
        let tss = compute_tss(&self.config, tss_base, inputs.numero_dependientes);

        // Step 2
        let imponible_anual = self.imponible_anual(income, tss.tss)?;

        // Steps 3-4
        let isr = round_amount(self.monthly_isr(imponible_anual));

        // Step 5
        let imponible = round_amount(imponible_anual / Decimal::from(12));

        // Step 6
        let cobro = round_amount(income - isr - tss.tss);

        debug!(
            income = %income,
            imponible_anual = %imponible_anual,
            isr = %isr,
            tss = %tss.tss,
            cobro = %cobro,
            "calculated withholding"
        );

        Ok(IsrResult {
            isr,
            imponible,
            tss: tss.tss,
            afp: tss.afp,
            sfs: tss.sfs,
            percapita: tss.percapita,
            cobro,
        })
    }

    /// TSS contributions alone, with the same validation as [`calculate`](Self::calculate).
    pub fn tss(
        &self,
        income: Decimal,
        dependents: u32,
    ) -> Result<TssBreakdown, CalculatorError> {
        self.config.validate()?;
        if income < Decimal::ZERO {
            return Err(CalculatorError::NegativeTssIncome(income));
        }
        Ok(compute_tss(&self.config, income, dependents))
    }

    /// The bracket whose inclusive range holds an annual taxable base.
    ///
    /// Returns `None` for negative bases, for bases that fall in the one-cent
    /// gap between two brackets, and above the table ceiling.
    pub fn escala_for(
        &self,
        imponible_anual: Decimal,
    ) -> Option<Escala> {
        self.config
            .escalas()
            .into_iter()
            .find(|escala| escala.contains(imponible_anual))
    }

    fn imponible_anual(
        &self,
        income: Decimal,
        tss: Decimal,
    ) -> Result<Decimal, CalculatorError> {
        income
            .checked_sub(tss)
            .and_then(|mensual| mensual.checked_mul(Decimal::from(12)))
            .ok_or(CalculatorError::IncomeOutOfRange(income))
    }

    /// Monthly ISR for an annual base, zero when no bracket matches.
    fn monthly_isr(
        &self,
        imponible_anual: Decimal,
    ) -> Decimal {
        match self.escala_for(imponible_anual) {
            Some(escala) => {
                debug!(escala = escala.numero, imponible_anual = %imponible_anual, "selected bracket");
                escala.monthly_tax(imponible_anual)
            }
            None => {
                warn!(
                    imponible_anual = %imponible_anual,
                    "annual taxable base matches no bracket; ISR set to zero"
                );
                Decimal::ZERO
            }
        }
    }
}

/// Calculates the withholding for `income` and `dependents` under `config`.
///
/// Shorthand for [`IsrCalculator::calculate`] without a TSS base override.
pub fn compute_isr(
    config: &TaxConfig,
    income: Decimal,
    dependents: u32,
) -> Result<IsrResult, CalculatorError> {
    IsrCalculator::new(config.clone()).calculate(&CalculationInputs::new(income, dependents))
}
