use std::fmt;

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// Social-security contributions, each rounded to three decimals.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TssBreakdown {
    /// `afp + sfs + percapita`.
    pub tss: Decimal,
    pub afp: Decimal,
    pub sfs: Decimal,
    /// Discount for additional dependents.
    pub percapita: Decimal,
}

/// The seven withholding figures for one month, each rounded to three decimals.
///
/// `cobro == total_ingresos - isr - tss` holds for every result produced by
/// the calculator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsrResult {
    pub isr: Decimal,
    /// Monthly equivalent of the annualized taxable base.
    pub imponible: Decimal,
    pub tss: Decimal,
    pub afp: Decimal,
    pub sfs: Decimal,
    pub percapita: Decimal,
    /// Net take-home pay.
    pub cobro: Decimal,
}

impl IsrResult {
    /// A result with every field at zero.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn get(
        &self,
        field: IsrField,
    ) -> Decimal {
        match field {
            IsrField::Isr => self.isr,
            IsrField::Imponible => self.imponible,
            IsrField::Tss => self.tss,
            IsrField::Afp => self.afp,
            IsrField::Sfs => self.sfs,
            IsrField::Percapita => self.percapita,
            IsrField::Cobro => self.cobro,
        }
    }

    /// Every field paired with its value, in display order.
    pub fn fields(&self) -> impl Iterator<Item = (IsrField, Decimal)> + '_ {
        IsrField::ALL.into_iter().map(|field| (field, self.get(field)))
    }

    pub fn tss_breakdown(&self) -> TssBreakdown {
        TssBreakdown {
            tss: self.tss,
            afp: self.afp,
            sfs: self.sfs,
            percapita: self.percapita,
        }
    }

    /// Everything withheld from the gross income: `isr + tss`.
    pub fn total_deducciones(&self) -> Decimal {
        self.isr + self.tss
    }

    /// Share of the gross income withheld, in percent with one decimal.
    ///
    /// Zero when there is no positive taxable base.
    pub fn porcentaje_deducciones(&self) -> Decimal {
        let bruto = self.cobro + self.total_deducciones();
        if self.imponible <= Decimal::ZERO || bruto.is_zero() {
            return Decimal::ZERO;
        }
        (self.total_deducciones() / bruto * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }
}

/// Names one of the seven [`IsrResult`] fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsrField {
    Isr,
    Imponible,
    Tss,
    Afp,
    Sfs,
    Percapita,
    Cobro,
}

impl IsrField {
    pub const ALL: [IsrField; 7] = [
        Self::Isr,
        Self::Imponible,
        Self::Tss,
        Self::Afp,
        Self::Sfs,
        Self::Percapita,
        Self::Cobro,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Isr => "isr",
            Self::Imponible => "imponible",
            Self::Tss => "tss",
            Self::Afp => "afp",
            Self::Sfs => "sfs",
            Self::Percapita => "percapita",
            Self::Cobro => "cobro",
        }
    }

    /// Label shown next to the amount.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Isr => "Monto ISR",
            Self::Imponible => "Monto Imponible",
            Self::Tss => "Monto TSS",
            Self::Afp => "Monto AFP",
            Self::Sfs => "Monto SFS",
            Self::Percapita => "Monto Percapita",
            Self::Cobro => "Monto A Cobrar",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.as_str() == s)
    }

    /// Whether the field is one of the TSS components shown under `tss`.
    pub fn is_tss_component(&self) -> bool {
        matches!(self, Self::Afp | Self::Sfs | Self::Percapita)
    }
}

impl fmt::Display for IsrField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}
