//! Chart-ready series derived from the yearly schedule

use serde::{Deserialize, Serialize};

use crate::amortization::YearlySummary;

/// Parallel series, one point per loan year
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub balance: Vec<f64>,
    pub cumulative_interest: Vec<f64>,
    pub cumulative_principal: Vec<f64>,
}

impl ChartSeries {
    pub fn from_schedule(schedule: &[YearlySummary]) -> Self {
        let mut series = Self {
            labels: Vec::with_capacity(schedule.len()),
            balance: Vec::with_capacity(schedule.len()),
            cumulative_interest: Vec::with_capacity(schedule.len()),
            cumulative_principal: Vec::with_capacity(schedule.len()),
        };

        let mut principal = 0.0;
        for row in schedule {
            principal += row.principal;
            series.labels.push(format!("Year {}", row.year));
            series.balance.push(row.ending_balance);
            series.cumulative_interest.push(row.cumulative_interest);
            series.cumulative_principal.push(principal);
        }

        series
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}
