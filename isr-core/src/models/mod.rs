mod calculation_inputs;
mod escala;
mod isr_result;
mod tax_config;

pub use calculation_inputs::CalculationInputs;
pub use escala::{ESCALA_TECHO, Escala};
pub use isr_result::{IsrField, IsrResult, TssBreakdown};
pub use tax_config::{TaxConfig, TaxConfigError};
