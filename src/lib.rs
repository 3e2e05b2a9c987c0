//! Amortization Engine - loan payment and payoff calculations for calculator widgets
//!
//! This library provides:
//! - Fixed periodic payments for monthly, bi-weekly, accelerated bi-weekly,
//!   weekly and semi-monthly schedules
//! - Period-by-period payoff simulation with monthly, annual and one-time extra payments
//! - Savings metrics against a no-extras baseline and a bi-weekly alternative
//! - Yearly schedules, chart series and formatted display strings
//! - Auto-loan preprocessing (trade-in, sales tax, fees)
//! - Parallel batch runs and CSV/JSON export
//!
//! ```
//! use amortization_engine::{calculate, LoanInputs};
//!
//! let result = calculate(&LoanInputs::new(300_000.0, 6.5, 30));
//! assert!(result.is_valid);
//! assert_eq!(result.formatted.payment, "$1,896.20");
//! ```

pub mod amortization;
pub mod auto_loan;
pub mod config;
pub mod error;
pub mod export;
pub mod format;
pub mod loan;
pub mod scenario;

// Re-export commonly used types
pub use amortization::{calculate, AmortizationEngine, LoanMetrics, LoanResult, YearlySummary};
pub use auto_loan::{calculate_auto_loan, AutoLoanInputs, AutoLoanResult};
pub use config::EngineConfig;
pub use error::LoanError;
pub use loan::{ExtraPayments, LoanInputs, PaymentFrequency};
pub use scenario::ScenarioRunner;
