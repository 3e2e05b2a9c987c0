//! Amortization engine: periodic payment, payoff simulation and savings metrics

mod engine;
mod payment;
mod result;
mod schedule;
mod state;

pub use engine::{calculate, AmortizationEngine};
pub use payment::{annuity_payment, monthly_payment, scheduled_payment};
pub use result::{BiweeklyComparison, LoanMetrics, LoanResult};
pub use schedule::{YearlyAccumulator, YearlySummary};
pub use state::{PeriodPayment, PeriodState};
