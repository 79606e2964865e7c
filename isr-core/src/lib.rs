pub mod calculations;
pub mod models;

pub use calculations::{CalculatorError, IsrCalculator, compute_isr, compute_tss};
pub use models::*;
