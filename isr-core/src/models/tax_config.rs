//! Regulatory parameters for TSS and ISR withholding.
//!
//! A [`TaxConfig`] is an immutable value handed to the calculators at
//! construction. Regulatory updates are applied by building (or loading) a
//! new value, never by editing one in place.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::escala::{ESCALA_TECHO, Escala};

/// Errors reported by [`TaxConfig::validate`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TaxConfigError {
    /// The minimum contributable wage must be positive.
    #[error("salario minimo cotizable must be positive, got {0}")]
    InvalidSalarioMinimo(Decimal),

    /// A TSS percentage (AFP or SFS) must be between 0 and 100.
    #[error("{name} must be between 0 and 100, got {value}")]
    InvalidPorcentaje { name: &'static str, value: Decimal },

    /// A TSS cap multiplier must be positive.
    #[error("{name} must be positive, got {value}")]
    InvalidMultiplier { name: &'static str, value: Decimal },

    /// The per-dependent discount must be non-negative.
    #[error("descuento por dependiente must be non-negative, got {0}")]
    InvalidDescuento(Decimal),

    /// A bracket rate must be a fraction between 0 and 1.
    #[error("rate of escala {escala} must be between 0 and 1, got {value}")]
    InvalidTasa { escala: u8, value: Decimal },

    /// A bracket flat amount must be non-negative.
    #[error("flat amount of escala {escala} must be non-negative, got {value}")]
    InvalidMonto { escala: u8, value: Decimal },

    /// Bracket upper bounds must be positive, strictly ascending and below the ceiling.
    #[error("upper bound of escala {escala} ({value}) must be above {previous} and below the ceiling")]
    EscalasNotAscending {
        escala: u8,
        value: Decimal,
        previous: Decimal,
    },
}

/// TSS contribution rates and caps plus the annual ISR bracket table.
///
/// Percentages for AFP and SFS are expressed in percent (`2.87` means 2.87%),
/// while bracket rates are fractions (`0.15` means 15%), matching how DGII
/// and TSS publish them.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use isr_core::TaxConfig;
///
/// let config = TaxConfig::default();
///
/// assert_eq!(config.tope_afp(), dec!(312000.00));
/// assert_eq!(config.tope_sfs(), dec!(156000.00));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxConfig {
    /// Minimum contributable wage used to derive the TSS caps.
    pub salario_minimo_cotizable: Decimal,

    /// Pension fund (AFP) employee rate, in percent.
    pub afp_porciento: Decimal,

    /// Health insurance (SFS) employee rate, in percent.
    pub sfs_porciento: Decimal,

    /// AFP cap expressed in minimum wages.
    pub tope_afp_multiplier: Decimal,

    /// SFS cap expressed in minimum wages.
    pub tope_sfs_multiplier: Decimal,

    /// Amount withheld per additional dependent.
    pub descuento_por_dependiente: Decimal,

    /// Upper bound of the exempt bracket (annual).
    pub escala1_hasta: Decimal,
    pub escala2_hasta: Decimal,
    pub escala3_hasta: Decimal,

    /// Flat amount owed on entering bracket 3 (annual).
    pub escala3_monto: Decimal,

    /// Flat amount owed on entering bracket 4 (annual).
    pub escala4_monto: Decimal,

    pub escala2_porciento: Decimal,
    pub escala3_porciento: Decimal,
    pub escala4_porciento: Decimal,
}

impl Default for TaxConfig {
    fn default() -> Self {
        Self::dgii_2016()
    }
}

impl TaxConfig {
    /// The TSS parameters and the DGII annual bracket table in force since January 2016.
    pub fn dgii_2016() -> Self {
        Self {
            salario_minimo_cotizable: dec!(15600.00),
            afp_porciento: dec!(2.87),
            sfs_porciento: dec!(3.04),
            tope_afp_multiplier: dec!(20),
            tope_sfs_multiplier: dec!(10),
            descuento_por_dependiente: dec!(1715.46),
            escala1_hasta: dec!(416220.00),
            escala2_hasta: dec!(624329.00),
            escala3_hasta: dec!(867123.00),
            escala3_monto: dec!(31216.00),
            escala4_monto: dec!(79776.00),
            escala2_porciento: dec!(0.15),
            escala3_porciento: dec!(0.20),
            escala4_porciento: dec!(0.25),
        }
    }

    /// Monthly income above which the AFP contribution stops growing.
    pub fn tope_afp(&self) -> Decimal {
        self.salario_minimo_cotizable * self.tope_afp_multiplier
    }

    /// Monthly income above which the SFS contribution stops growing.
    pub fn tope_sfs(&self) -> Decimal {
        self.salario_minimo_cotizable * self.tope_sfs_multiplier
    }

    /// Derives the four contiguous annual brackets.
    ///
    /// Bracket 1 starts at zero, every later bracket starts one cent above the
    /// previous upper bound, and bracket 4 runs up to [`ESCALA_TECHO`].
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use isr_core::TaxConfig;
    ///
    /// let escalas = TaxConfig::default().escalas();
    ///
    /// assert_eq!(escalas[1].desde, dec!(416220.01));
    /// assert_eq!(escalas[3].desde, dec!(867123.01));
    /// ```
    pub fn escalas(&self) -> [Escala; 4] {
        let centavo = dec!(0.01);
        [
            Escala {
                numero: 1,
                desde: Decimal::ZERO,
                hasta: self.escala1_hasta,
                monto: Decimal::ZERO,
                porciento: Decimal::ZERO,
            },
            Escala {
                numero: 2,
                desde: self.escala1_hasta + centavo,
                hasta: self.escala2_hasta,
                monto: Decimal::ZERO,
                porciento: self.escala2_porciento,
            },
            Escala {
                numero: 3,
                desde: self.escala2_hasta + centavo,
                hasta: self.escala3_hasta,
                monto: self.escala3_monto,
                porciento: self.escala3_porciento,
            },
            Escala {
                numero: 4,
                desde: self.escala3_hasta + centavo,
                hasta: ESCALA_TECHO,
                monto: self.escala4_monto,
                porciento: self.escala4_porciento,
            },
        ]
    }

    /// Validates the configuration values.
    ///
    /// # Errors
    ///
    /// Returns [`TaxConfigError`] if:
    /// - `salario_minimo_cotizable` is not positive
    /// - `afp_porciento` or `sfs_porciento` is not in [0, 100]
    /// - a cap multiplier is not positive
    /// - `descuento_por_dependiente`, `escala3_monto` or `escala4_monto` is negative
    /// - a bracket rate is not in [0, 1]
    /// - bracket upper bounds are not positive and strictly ascending below the ceiling
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use isr_core::{TaxConfig, TaxConfigError};
    ///
    /// let config = TaxConfig {
    ///     salario_minimo_cotizable: dec!(0),
    ///     ..TaxConfig::default()
    /// };
    ///
    /// assert_eq!(
    ///     config.validate(),
    ///     Err(TaxConfigError::InvalidSalarioMinimo(dec!(0)))
    /// );
    /// ```
    pub fn validate(&self) -> Result<(), TaxConfigError> {
        if self.salario_minimo_cotizable <= Decimal::ZERO {
            return Err(TaxConfigError::InvalidSalarioMinimo(
                self.salario_minimo_cotizable,
            ));
        }

        for (name, value) in [
            ("afp porciento", self.afp_porciento),
            ("sfs porciento", self.sfs_porciento),
        ] {
            if value < Decimal::ZERO || value > Decimal::ONE_HUNDRED {
                return Err(TaxConfigError::InvalidPorcentaje { name, value });
            }
        }

        for (name, value) in [
            ("tope afp multiplier", self.tope_afp_multiplier),
            ("tope sfs multiplier", self.tope_sfs_multiplier),
        ] {
            if value <= Decimal::ZERO {
                return Err(TaxConfigError::InvalidMultiplier { name, value });
            }
        }

        if self.descuento_por_dependiente < Decimal::ZERO {
            return Err(TaxConfigError::InvalidDescuento(
                self.descuento_por_dependiente,
            ));
        }

        let mut previous = Decimal::ZERO;
        for escala in self.escalas() {
            if escala.porciento < Decimal::ZERO || escala.porciento > Decimal::ONE {
                return Err(TaxConfigError::InvalidTasa {
                    escala: escala.numero,
                    value: escala.porciento,
                });
            }
            if escala.monto < Decimal::ZERO {
                return Err(TaxConfigError::InvalidMonto {
                    escala: escala.numero,
                    value: escala.monto,
                });
            }
            if escala.hasta <= previous || escala.hasta > ESCALA_TECHO {
                return Err(TaxConfigError::EscalasNotAscending {
                    escala: escala.numero,
                    value: escala.hasta,
                    previous,
                });
            }
            previous = escala.hasta;
        }

        Ok(())
    }
}
