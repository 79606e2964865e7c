//! Social-security (TSS) withholding.
//!
//! The employee pays AFP (pension) and SFS (health) contributions on the
//! monthly income, each base capped at a multiple of the minimum
//! contributable wage, plus a flat discount for every additional dependent.
//!
//! | Value | Formula |
//! |-------|---------|
//! | afp | `min(income, salario_minimo × 20) × afp_porciento / 100` |
//! | sfs | `min(income, salario_minimo × 10) × sfs_porciento / 100` |
//! | percapita | `dependents × descuento_por_dependiente` |
//! | tss | `afp + sfs + percapita` |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use isr_core::{TaxConfig, compute_tss};
//!
//! let tss = compute_tss(&TaxConfig::default(), dec!(50000), 0);
//!
//! assert_eq!(tss.afp, dec!(1435.00));
//! assert_eq!(tss.sfs, dec!(1520.00));
//! assert_eq!(tss.tss, dec!(2955.00));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::round_amount;
use crate::models::{TaxConfig, TssBreakdown};

/// Computes the TSS contributions for a monthly income.
///
/// Inputs are not range-checked here; [`IsrCalculator`](crate::IsrCalculator)
/// rejects negative income before calling this.
pub fn compute_tss(
    config: &TaxConfig,
    income: Decimal,
    dependents: u32,
) -> TssBreakdown {
    let afp_base = income.min(config.tope_afp());
    let sfs_base = income.min(config.tope_sfs());

    let afp = afp_base * config.afp_porciento / Decimal::ONE_HUNDRED;
    let sfs = sfs_base * config.sfs_porciento / Decimal::ONE_HUNDRED;
    let percapita = Decimal::from(dependents) * config.descuento_por_dependiente;

    debug!(
        income = %income,
        afp_base = %afp_base,
        sfs_base = %sfs_base,
        dependents,
        "computed TSS contribution bases"
    );

    TssBreakdown {
        tss: round_amount(afp + sfs + percapita),
        afp: round_amount(afp),
        sfs: round_amount(sfs),
        percapita: round_amount(percapita),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn zero_income_without_dependents_is_zero() {
        let result = compute_tss(&TaxConfig::default(), dec!(0), 0);

        assert_eq!(result, TssBreakdown::default());
    }

    #[test]
    fn contributions_below_caps_scale_with_income() {
        let result = compute_tss(&TaxConfig::default(), dec!(15000), 0);

        assert_eq!(result.afp, dec!(430.50));
        assert_eq!(result.sfs, dec!(456.00));
        assert_eq!(result.tss, dec!(886.50));
    }

    #[test]
    fn sfs_saturates_at_ten_minimum_wages() {
        let result = compute_tss(&TaxConfig::default(), dec!(200000), 0);

        // AFP cap (312,000) not reached; SFS cap (156,000) is.
        assert_eq!(result.afp, dec!(5740.00));
        assert_eq!(result.sfs, dec!(4742.40));
        assert_eq!(result.tss, dec!(10482.40));
    }

    #[test]
    fn both_contributions_saturate_above_afp_cap() {
        let config = TaxConfig::default();

        let at_cap = compute_tss(&config, dec!(312000), 0);
        let far_above = compute_tss(&config, dec!(5000000), 0);

        assert_eq!(at_cap.afp, dec!(8954.40));
        assert_eq!(far_above.afp, dec!(8954.40));
        assert_eq!(far_above.sfs, dec!(4742.40));
        assert_eq!(at_cap, far_above);
    }

    #[test]
    fn percapita_is_discount_per_dependent() {
        let config = TaxConfig::default();

        for dependents in 0..=20u32 {
            let result = compute_tss(&config, dec!(15000), dependents);

            assert_eq!(
                result.percapita,
                Decimal::from(dependents) * dec!(1715.46)
            );
        }
    }

    #[test]
    fn tss_includes_dependent_discount() {
        let result = compute_tss(&TaxConfig::default(), dec!(15000), 2);

        assert_eq!(result.percapita, dec!(3430.92));
        assert_eq!(result.tss, dec!(4317.42));
    }

    #[test]
    fn tss_rounds_sum_of_unrounded_parts() {
        // afp = 0.0287, sfs = 0.0304 -> each rounds to 0.029 / 0.030, sum 0.0591 -> 0.059
        let result = compute_tss(&TaxConfig::default(), dec!(1), 0);

        assert_eq!(result.afp, dec!(0.029));
        assert_eq!(result.sfs, dec!(0.030));
        assert_eq!(result.tss, dec!(0.059));
    }
}
