//! Output structures for an amortization run

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::schedule::YearlySummary;
use crate::format::{ChartSeries, FormattedMetrics};
use crate::loan::PaymentFrequency;

/// Monthly loan re-run as half payments every two weeks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BiweeklyComparison {
    /// Half of the monthly payment
    pub payment: f64,
    pub periods: u32,
    pub total_interest: f64,
    /// Monthly baseline interest minus bi-weekly interest
    pub interest_saved: f64,
    /// Monthly baseline months minus bi-weekly months
    pub months_saved: f64,
    pub payoff_date: Option<NaiveDate>,
}

/// Raw numeric results of a valid calculation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanMetrics {
    pub principal: f64,
    pub frequency: PaymentFrequency,
    pub periods_per_year: u32,

    /// Scheduled payment per period, excluding extras
    pub payment: f64,

    /// Periods actually simulated until payoff, extras included
    pub actual_periods: u32,
    pub total_interest: f64,
    pub total_paid: f64,
    pub payoff_date: Option<NaiveDate>,

    /// Same loan without extra payments
    pub baseline_periods: u32,
    pub baseline_total_interest: f64,
    pub baseline_payoff_date: Option<NaiveDate>,

    pub interest_saved: f64,
    pub time_saved_months: f64,

    /// Principal repaid after `midpoint_period` periods
    pub equity_at_midpoint: f64,
    pub midpoint_period: u32,

    pub daily_interest_cost: f64,
    pub interest_to_principal_ratio: f64,

    /// Present only for monthly loans
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biweekly_comparison: Option<BiweeklyComparison>,

    /// Simulation stopped at the iteration cap with balance remaining
    pub hit_safety_cap: bool,
}

impl LoanMetrics {
    /// Loan length in months, extras included
    pub fn payoff_months(&self) -> f64 {
        self.actual_periods as f64 * 12.0 / self.periods_per_year as f64
    }

    pub fn has_savings(&self) -> bool {
        self.actual_periods < self.baseline_periods || self.interest_saved > 0.0
    }
}

/// Result record handed to the presentation layer.
///
/// Invalid inputs produce `is_valid == false`, no metrics, empty strings and
/// an empty schedule rather than an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoanResult {
    pub is_valid: bool,

    /// Why the inputs were rejected
    #[serde(skip_serializing_if = "Option::is_none")]
    pub invalid_reason: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub metrics: Option<LoanMetrics>,

    pub formatted: FormattedMetrics,

    /// One-line natural-language summary
    pub summary: String,

    pub yearly_schedule: Vec<YearlySummary>,

    pub chart: ChartSeries,

    /// Non-fatal conditions noticed during simulation
    pub warnings: Vec<String>,
}

impl LoanResult {
    pub fn invalid(reason: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            invalid_reason: Some(reason.into()),
            metrics: None,
            formatted: FormattedMetrics::default(),
            summary: String::new(),
            yearly_schedule: Vec::new(),
            chart: ChartSeries::default(),
            warnings: Vec::new(),
        }
    }

    /// Scheduled periodic payment, when computable
    pub fn payment(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.payment)
    }

    pub fn total_interest(&self) -> Option<f64> {
        self.metrics.as_ref().map(|m| m.total_interest)
    }
}
