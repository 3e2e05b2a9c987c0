//! Yearly schedule aggregation

use serde::{Deserialize, Serialize};

use super::state::{PeriodPayment, PeriodState};

/// One loan year of the payoff schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearlySummary {
    /// Loan year (1-indexed)
    pub year: u32,

    /// Number of payments made in this year
    pub payments: u32,

    /// Everything paid this year: interest + principal + extra
    pub total_payment: f64,

    /// Principal repaid this year, including extra payments
    pub principal: f64,

    /// Portion of `principal` that came from extra payments
    pub extra_principal: f64,

    pub interest: f64,

    /// Interest paid since the start of the loan
    pub cumulative_interest: f64,

    /// Balance after the last payment of the year
    pub ending_balance: f64,
}

/// Folds period payments into yearly rows, flushing every `periods_per_year`
/// periods and once more for a partial final year.
#[derive(Debug)]
pub struct YearlyAccumulator {
    periods_per_year: u32,
    rows: Vec<YearlySummary>,
    current: Option<YearlySummary>,
}

impl YearlyAccumulator {
    pub fn new(periods_per_year: u32) -> Self {
        Self {
            periods_per_year: periods_per_year.max(1),
            rows: Vec::new(),
            current: None,
        }
    }

    /// Record a period that has just been applied to `state`
    pub fn record(&mut self, state: &PeriodState, paid: &PeriodPayment) {
        let year = (state.period - 1) / self.periods_per_year + 1;
        let row = self.current.get_or_insert_with(|| YearlySummary {
            year,
            payments: 0,
            total_payment: 0.0,
            principal: 0.0,
            extra_principal: 0.0,
            interest: 0.0,
            cumulative_interest: 0.0,
            ending_balance: 0.0,
        });

        row.payments += 1;
        row.total_payment += paid.total();
        row.principal += paid.principal + paid.extra;
        row.extra_principal += paid.extra;
        row.interest += paid.interest;
        row.cumulative_interest = state.total_interest;
        row.ending_balance = state.balance.max(0.0);

        if state.period % self.periods_per_year == 0 {
            self.flush();
        }
    }

    fn flush(&mut self) {
        if let Some(row) = self.current.take() {
            self.rows.push(row);
        }
    }

    pub fn finish(mut self) -> Vec<YearlySummary> {
        self.flush();
        self.rows
    }
}
