//! Text and JSON renderings of inputs, results and the tax table.

use isr_core::{CalculationInputs, IsrField, IsrResult, TaxConfig};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::format::{format_amount, format_currency, format_fraction_as_percent};

const LABEL_WIDTH: usize = 26;
const VALUE_WIDTH: usize = 16;

/// Items listed under the headline, in order. TSS expands to its components.
const DETAIL_ORDER: [IsrField; 3] = [IsrField::Isr, IsrField::Imponible, IsrField::Tss];
const TSS_COMPONENTS: [IsrField; 3] = [IsrField::Afp, IsrField::Sfs, IsrField::Percapita];

fn line(
    label: &str,
    value: &str,
) -> String {
    format!("{label:<LABEL_WIDTH$}{value:>VALUE_WIDTH$}\n")
}

/// Income lines shown under the form: monthly, annual equivalent and dependent discount.
pub fn render_inputs(
    inputs: &CalculationInputs,
    config: &TaxConfig,
) -> String {
    let descuento = Decimal::from(inputs.numero_dependientes) * config.descuento_por_dependiente;
    let anual = inputs
        .ingresos_anuales()
        .map(format_currency)
        .unwrap_or_default();

    let mut out = line("Ingresos mensuales", &format_currency(inputs.total_ingresos));
    out.push_str(&line("Equivalente anual", &anual));
    if let Some(base) = inputs.total_ingresos_tss.filter(|base| !base.is_zero()) {
        out.push_str(&line("Ingresos para TSS", &format_currency(base)));
    }
    out.push_str(&line(
        &format!("Dependientes ({})", inputs.numero_dependientes),
        &format_currency(descuento),
    ));
    out.push_str(&format!(
        "  (RD$ {} por dependiente)\n",
        format_amount(config.descuento_por_dependiente)
    ));

    out
}

/// The results panel: net pay headline, the withholding items and a summary.
///
/// With `detalle`, the TSS item is expanded into AFP, SFS and Percapita.
pub fn render_result(
    result: &IsrResult,
    detalle: bool,
) -> String {
    let mut out = format!(
        "{:<LABEL_WIDTH$}{:>VALUE_WIDTH$}  (mensual)\n\n",
        IsrField::Cobro.label(),
        format_currency(result.cobro)
    );

    for field in DETAIL_ORDER {
        out.push_str(&line(field.label(), &format_currency(result.get(field))));
        if field == IsrField::Tss && detalle {
            for component in TSS_COMPONENTS {
                out.push_str(&line(
                    &format!("  {}", component.label()),
                    &format_currency(result.get(component)),
                ));
            }
        }
    }
    out.push('\n');

    out.push_str(&line(
        "Total deducciones",
        &format_currency(result.total_deducciones()),
    ));
    out.push_str(&line(
        "Porcentaje deducido",
        &format!("{}%", result.porcentaje_deducciones()),
    ));

    out
}

/// The bracket table and the TSS contribution parameters.
pub fn render_escalas(config: &TaxConfig) -> String {
    let mut out = String::from("Escalas de impuesto (anuales)\n");

    for escala in config.escalas() {
        let rango = if escala.numero == 4 {
            format!("  Más de RD$ {}", format_amount(config.escala3_hasta))
        } else {
            format!(
                "  RD$ {} - RD$ {}",
                format_amount(escala.desde),
                format_amount(escala.hasta)
            )
        };
        out.push_str(&format!(
            "{rango:<40}{:>6}\n",
            format_fraction_as_percent(escala.porciento)
        ));
    }

    out.push_str("\nContribuciones TSS\n");
    out.push_str(&line(
        "  AFP (Pensiones)",
        &format!("{}%", format_amount(config.afp_porciento)),
    ));
    out.push_str(&line(
        "  SFS (Salud)",
        &format!("{}%", format_amount(config.sfs_porciento)),
    ));
    out.push_str(&line(
        "  Descuento por dependiente",
        &format!("RD$ {}", format_amount(config.descuento_por_dependiente)),
    ));
    out.push_str(&format!(
        "Topes de cotización:\n  AFP: RD$ {} ({} salarios mínimos)\n  SFS: RD$ {} ({} salarios mínimos)\n",
        format_amount(config.tope_afp()),
        format_amount(config.tope_afp_multiplier),
        format_amount(config.tope_sfs()),
        format_amount(config.tope_sfs_multiplier)
    ));
    out.push_str(&format!(
        "  Salario mínimo cotizable: RD$ {}\n",
        format_amount(config.salario_minimo_cotizable)
    ));

    out
}

#[derive(Serialize)]
struct JsonReport<'a> {
    inputs: &'a CalculationInputs,
    result: IsrResult,
    total_deducciones: Decimal,
}

fn three_decimals(mut value: Decimal) -> Decimal {
    value.rescale(3);
    value
}

/// The inputs and result as pretty-printed JSON. Amounts are strings with
/// three decimals.
pub fn render_json(
    inputs: &CalculationInputs,
    result: &IsrResult,
) -> serde_json::Result<String> {
    let result_fixed = IsrResult {
        isr: three_decimals(result.isr),
        imponible: three_decimals(result.imponible),
        tss: three_decimals(result.tss),
        afp: three_decimals(result.afp),
        sfs: three_decimals(result.sfs),
        percapita: three_decimals(result.percapita),
        cobro: three_decimals(result.cobro),
    };
    serde_json::to_string_pretty(&JsonReport {
        inputs,
        result: result_fixed,
        total_deducciones: three_decimals(result.total_deducciones()),
    })
}
