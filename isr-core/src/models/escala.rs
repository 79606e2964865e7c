use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Upper bound of the last bracket; annual bases above it match no bracket.
pub const ESCALA_TECHO: Decimal = dec!(999999999999999);

/// One bracket of the annual ISR table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escala {
    /// Position in the table, starting at 1.
    pub numero: u8,
    pub desde: Decimal,
    pub hasta: Decimal,
    /// Flat annual amount owed on entering the bracket.
    pub monto: Decimal,
    /// Marginal rate applied above `desde`, as a fraction.
    pub porciento: Decimal,
}

impl Escala {
    /// Inclusive range membership: `desde <= annual <= hasta`.
    pub fn contains(
        &self,
        annual: Decimal,
    ) -> bool {
        annual >= self.desde && annual <= self.hasta
    }

    /// Monthly tax owed for an annual taxable base that falls in this bracket.
    ///
    /// The exempt bracket always yields zero. Not rounded.
    pub fn monthly_tax(
        &self,
        annual: Decimal,
    ) -> Decimal {
        if self.numero == 1 {
            return Decimal::ZERO;
        }
        ((annual - self.desde) * self.porciento + self.monto) / Decimal::from(12)
    }
}
