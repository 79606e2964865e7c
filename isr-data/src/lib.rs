//! Tax table loading and batch withholding over CSV files.

pub mod batch;
pub mod tax_table;

pub use batch::{BatchError, BatchInputRecord, BatchOutputRecord, BatchProcessor, BatchSummary};
pub use tax_table::{TaxTableError, TaxTableLoader};
