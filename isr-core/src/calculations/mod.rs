//! Withholding calculations for Dominican Republic payroll.
//!
//! The TSS calculator produces the social-security contributions; the ISR
//! calculator builds on it to produce the income tax and the net pay.

pub mod common;
pub mod isr;
pub mod tss;

pub use isr::{CalculatorError, IsrCalculator, compute_isr};
pub use tss::compute_tss;
