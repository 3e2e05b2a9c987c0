//! Loan input data and CSV loading

mod data;
pub mod loader;

pub use data::{ExtraPayments, LoanInputs, PaymentFrequency, MAX_ANNUAL_RATE_PERCENT, MAX_TERM_YEARS};
pub use loader::{load_loans, load_loans_from_reader, LoanRecord};
