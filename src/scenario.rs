//! Scenario runner for batch and what-if calculations
//!
//! Every calculation is independent, so batches fan out across threads with
//! rayon. Results come back in input order.

use log::info;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::amortization::{AmortizationEngine, LoanResult};
use crate::config::EngineConfig;
use crate::loan::{ExtraPayments, LoanInputs, LoanRecord};

/// One row of a batch summary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchSummaryRow {
    pub loan_id: String,
    pub is_valid: bool,
    pub payment: Option<f64>,
    pub periods: Option<u32>,
    pub total_interest: Option<f64>,
    pub total_paid: Option<f64>,
    pub interest_saved: Option<f64>,
    pub time_saved_months: Option<f64>,
    pub payoff_date: Option<String>,
    pub error: Option<String>,
}

impl BatchSummaryRow {
    pub fn from_result(loan_id: &str, result: &LoanResult) -> Self {
        let metrics = result.metrics.as_ref();
        Self {
            loan_id: loan_id.to_string(),
            is_valid: result.is_valid,
            payment: metrics.map(|m| m.payment),
            periods: metrics.map(|m| m.actual_periods),
            total_interest: metrics.map(|m| m.total_interest),
            total_paid: metrics.map(|m| m.total_paid),
            interest_saved: metrics.map(|m| m.interest_saved),
            time_saved_months: metrics.map(|m| m.time_saved_months),
            payoff_date: metrics
                .and_then(|m| m.payoff_date)
                .map(|d| d.format("%Y-%m-%d").to_string()),
            error: result.invalid_reason.clone(),
        }
    }
}

/// Runs many loans or many variants of one loan through a shared engine
///
/// # Example
/// ```
/// use amortization_engine::{ScenarioRunner, LoanInputs, ExtraPayments};
///
/// let runner = ScenarioRunner::new();
/// let loan = LoanInputs::new(250_000.0, 6.0, 30);
/// let results = runner.compare_extras(&loan, &[
///     ExtraPayments::monthly(100.0),
///     ExtraPayments::monthly(250.0),
/// ]);
/// assert_eq!(results.len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScenarioRunner {
    engine: AmortizationEngine,
}

impl ScenarioRunner {
    /// Runner with the default engine configuration
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self {
            engine: AmortizationEngine::new(config),
        }
    }

    pub fn engine(&self) -> &AmortizationEngine {
        &self.engine
    }

    pub fn run(&self, loan: &LoanInputs) -> LoanResult {
        self.engine.calculate(loan)
    }

    /// Calculate every loan in parallel
    pub fn run_batch(&self, loans: &[LoanInputs]) -> Vec<LoanResult> {
        info!("Running batch of {} loans", loans.len());
        loans.par_iter().map(|loan| self.engine.calculate(loan)).collect()
    }

    /// Calculate loaded records and reduce each to a summary row
    pub fn summarize_records(&self, records: &[LoanRecord]) -> Vec<BatchSummaryRow> {
        info!("Summarizing {} loan records", records.len());
        records
            .par_iter()
            .map(|record| {
                let result = self.engine.calculate(&record.inputs);
                BatchSummaryRow::from_result(&record.loan_id, &result)
            })
            .collect()
    }

    /// Same loan under several extra-payment plans, replacing any extras on `loan`
    pub fn compare_extras(&self, loan: &LoanInputs, variants: &[ExtraPayments]) -> Vec<LoanResult> {
        variants
            .par_iter()
            .map(|extras| {
                let variant = loan.clone().with_extras(extras.clone());
                self.engine.calculate(&variant)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loan::PaymentFrequency;

    #[test]
    fn test_batch_preserves_order() {
        let runner = ScenarioRunner::new();
        let loans = vec![
            LoanInputs::new(100_000.0, 5.0, 15),
            LoanInputs::new(0.0, 5.0, 15),
            LoanInputs::new(200_000.0, 7.0, 30).with_frequency(PaymentFrequency::Weekly),
        ];

        let results = runner.run_batch(&loans);
        assert_eq!(results.len(), 3);
        assert!(results[0].is_valid);
        assert!(!results[1].is_valid);
        assert_eq!(results[2].metrics.as_ref().unwrap().frequency, PaymentFrequency::Weekly);

        // Parallel run matches a direct call
        assert_eq!(results[0], runner.run(&loans[0]));
    }

    #[test]
    fn test_larger_extras_save_more() {
        let runner = ScenarioRunner::new();
        let loan = LoanInputs::new(250_000.0, 6.0, 30);
        let results = runner.compare_extras(
            &loan,
            &[
                ExtraPayments::monthly(100.0),
                ExtraPayments::monthly(250.0),
                ExtraPayments::monthly(500.0),
            ],
        );

        let saved: Vec<f64> = results
            .iter()
            .map(|r| r.metrics.as_ref().unwrap().interest_saved)
            .collect();
        assert!(saved[0] < saved[1] && saved[1] < saved[2]);
    }

    #[test]
    fn test_summary_rows() {
        let runner = ScenarioRunner::new();
        let records = vec![
            LoanRecord {
                loan_id: "ok".to_string(),
                inputs: LoanInputs::new(50_000.0, 4.0, 10),
            },
            LoanRecord {
                loan_id: "bad".to_string(),
                inputs: LoanInputs::new(50_000.0, 0.0, 10),
            },
        ];

        let rows = runner.summarize_records(&records);
        assert_eq!(rows[0].loan_id, "ok");
        assert!(rows[0].is_valid);
        assert_eq!(rows[0].periods, Some(120));
        assert!(rows[0].payoff_date.is_some());

        assert!(!rows[1].is_valid);
        assert!(rows[1].payment.is_none());
        assert!(rows[1].error.as_deref().unwrap().contains("annual_rate_percent"));
    }
}
