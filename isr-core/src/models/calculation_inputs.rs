use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// What the payroll clerk types in: the monthly gross and the dependent count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationInputs {
    /// Monthly gross income.
    pub total_ingresos: Decimal,

    pub numero_dependientes: u32,

    /// Alternate monthly income used as the TSS contribution base.
    ///
    /// `None` or zero means the contributions are computed on `total_ingresos`.
    #[serde(default)]
    pub total_ingresos_tss: Option<Decimal>,
}

impl CalculationInputs {
    pub fn new(
        total_ingresos: Decimal,
        numero_dependientes: u32,
    ) -> Self {
        Self {
            total_ingresos,
            numero_dependientes,
            total_ingresos_tss: None,
        }
    }

    /// Sets a separate TSS contribution base.
    pub fn with_ingresos_tss(
        mut self,
        total_ingresos_tss: Decimal,
    ) -> Self {
        self.total_ingresos_tss = Some(total_ingresos_tss);
        self
    }

    /// Income the TSS contributions are computed on.
    pub fn tss_base(&self) -> Decimal {
        match self.total_ingresos_tss {
            Some(base) if !base.is_zero() => base,
            _ => self.total_ingresos,
        }
    }

    /// Annual equivalent of the monthly gross income, `None` on overflow.
    pub fn ingresos_anuales(&self) -> Option<Decimal> {
        self.total_ingresos.checked_mul(Decimal::from(12))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn tss_base_defaults_to_gross_income() {
        let inputs = CalculationInputs::new(dec!(50000), 0);

        assert_eq!(inputs.tss_base(), dec!(50000));
    }

    #[test]
    fn tss_base_uses_override() {
        let inputs = CalculationInputs::new(dec!(50000), 0).with_ingresos_tss(dec!(40000));

        assert_eq!(inputs.tss_base(), dec!(40000));
    }

    #[test]
    fn zero_override_falls_back_to_gross_income() {
        let inputs = CalculationInputs::new(dec!(50000), 0).with_ingresos_tss(dec!(0));

        assert_eq!(inputs.tss_base(), dec!(50000));
    }

    #[test]
    fn ingresos_anuales_is_twelve_months() {
        let inputs = CalculationInputs::new(dec!(15000.50), 1);

        assert_eq!(inputs.ingresos_anuales(), Some(dec!(180006.00)));
    }

    #[test]
    fn ingresos_anuales_overflow_is_none() {
        let inputs = CalculationInputs::new(Decimal::MAX, 0);

        assert_eq!(inputs.ingresos_anuales(), None);
    }
}
