//! Auto-loan calculator: turns vehicle price, trade-in, tax and fees into an
//! amount financed, then runs the standard amortization engine on it.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use log::debug;

use crate::amortization::{AmortizationEngine, LoanResult};
use crate::error::LoanError;
use crate::loan::{ExtraPayments, LoanInputs, PaymentFrequency};

/// Vehicle purchase and financing terms
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLoanInputs {
    pub vehicle_price: f64,
    #[serde(default)]
    pub down_payment: f64,
    #[serde(default)]
    pub trade_in_value: f64,
    /// Remaining loan balance on the trade-in vehicle
    #[serde(default)]
    pub trade_in_owed: f64,
    #[serde(default)]
    pub sales_tax_percent: f64,
    /// Title, registration and dealer fees
    #[serde(default)]
    pub fees: f64,
    /// Roll sales tax and fees into the loan instead of paying upfront
    #[serde(default = "default_true")]
    pub finance_tax_and_fees: bool,
    /// Tax only the price net of the trade-in value
    #[serde(default = "default_true")]
    pub trade_in_reduces_tax: bool,

    pub annual_rate_percent: f64,
    pub term_years: u32,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[serde(default)]
    pub extras: Option<ExtraPayments>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

fn default_true() -> bool {
    true
}

impl AutoLoanInputs {
    pub fn new(vehicle_price: f64, annual_rate_percent: f64, term_years: u32) -> Self {
        Self {
            vehicle_price,
            down_payment: 0.0,
            trade_in_value: 0.0,
            trade_in_owed: 0.0,
            sales_tax_percent: 0.0,
            fees: 0.0,
            finance_tax_and_fees: true,
            trade_in_reduces_tax: true,
            annual_rate_percent,
            term_years,
            frequency: PaymentFrequency::Monthly,
            extras: None,
            start_date: None,
        }
    }

    /// Price the sales tax is levied on
    pub fn taxable_amount(&self) -> f64 {
        if self.trade_in_reduces_tax {
            (self.vehicle_price - self.trade_in_value).max(0.0)
        } else {
            self.vehicle_price.max(0.0)
        }
    }

    pub fn sales_tax(&self) -> f64 {
        self.taxable_amount() * self.sales_tax_percent / 100.0
    }

    /// Trade-in value minus what is still owed on it (may be negative)
    pub fn trade_in_equity(&self) -> f64 {
        self.trade_in_value - self.trade_in_owed
    }

    pub fn amount_financed(&self) -> f64 {
        let mut amount = self.vehicle_price - self.down_payment - self.trade_in_equity();
        if self.finance_tax_and_fees {
            amount += self.sales_tax() + self.fees;
        }
        amount
    }

    /// Cash due at signing
    pub fn upfront_cost(&self) -> f64 {
        let mut upfront = self.down_payment;
        if !self.finance_tax_and_fees {
            upfront += self.sales_tax() + self.fees;
        }
        upfront
    }

    /// Purchase amounts must be finite and non-negative; the vehicle price positive
    pub fn validate(&self) -> Result<(), LoanError> {
        if !self.vehicle_price.is_finite() || self.vehicle_price <= 0.0 {
            return Err(LoanError::invalid_input(
                "vehicle_price",
                self.vehicle_price,
                "must be greater than zero",
            ));
        }
        for (field, value) in [
            ("down_payment", self.down_payment),
            ("trade_in_value", self.trade_in_value),
            ("trade_in_owed", self.trade_in_owed),
            ("sales_tax_percent", self.sales_tax_percent),
            ("fees", self.fees),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(LoanError::invalid_input(field, value, "must be zero or positive"));
            }
        }
        if self.sales_tax_percent > 100.0 {
            return Err(LoanError::invalid_input(
                "sales_tax_percent",
                self.sales_tax_percent,
                "must not exceed 100 percent",
            ));
        }
        Ok(())
    }

    /// Loan handed to the amortization engine
    pub fn to_loan(&self) -> LoanInputs {
        let mut loan = LoanInputs::new(self.amount_financed(), self.annual_rate_percent, self.term_years)
            .with_frequency(self.frequency);
        if let Some(extras) = &self.extras {
            loan = loan.with_extras(extras.clone());
        }
        if let Some(start) = self.start_date {
            loan = loan.with_start_date(start);
        }
        loan
    }
}

/// Auto-loan figures plus the underlying loan result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoLoanResult {
    pub amount_financed: f64,
    pub sales_tax: f64,
    pub upfront_cost: f64,
    /// Upfront cost plus everything paid over the life of the loan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost: Option<f64>,
    pub loan: LoanResult,
}

impl AutoLoanResult {
    pub fn is_valid(&self) -> bool {
        self.loan.is_valid
    }
}

/// Preprocess the purchase and amortize the amount financed
pub fn calculate_auto_loan(engine: &AmortizationEngine, inputs: &AutoLoanInputs) -> AutoLoanResult {
    if let Err(err) = inputs.validate() {
        debug!("Rejected auto-loan inputs: {}", err);
        return AutoLoanResult {
            amount_financed: 0.0,
            sales_tax: 0.0,
            upfront_cost: 0.0,
            total_cost: None,
            loan: LoanResult::invalid(err.to_string()),
        };
    }

    let loan = engine.calculate(&inputs.to_loan());
    let upfront_cost = inputs.upfront_cost();
    let total_cost = loan.metrics.as_ref().map(|m| upfront_cost + m.total_paid);

    AutoLoanResult {
        amount_financed: inputs.amount_financed(),
        sales_tax: inputs.sales_tax(),
        upfront_cost,
        total_cost,
        loan,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn purchase() -> AutoLoanInputs {
        AutoLoanInputs {
            down_payment: 5_000.0,
            trade_in_value: 8_000.0,
            trade_in_owed: 3_000.0,
            sales_tax_percent: 7.0,
            fees: 500.0,
            ..AutoLoanInputs::new(35_000.0, 6.0, 5)
        }
    }

    #[test]
    fn test_amount_financed_with_tax_credit() {
        let inputs = purchase();
        // Tax on 35,000 - 8,000
        assert_abs_diff_eq!(inputs.sales_tax(), 1_890.0, epsilon = 1e-9);
        // 35,000 - 5,000 - (8,000 - 3,000) + 1,890 + 500
        assert_abs_diff_eq!(inputs.amount_financed(), 27_390.0, epsilon = 1e-9);
        assert_eq!(inputs.upfront_cost(), 5_000.0);
    }

    #[test]
    fn test_tax_and_fees_paid_upfront() {
        let inputs = AutoLoanInputs {
            finance_tax_and_fees: false,
            trade_in_reduces_tax: false,
            ..purchase()
        };
        assert_abs_diff_eq!(inputs.sales_tax(), 2_450.0, epsilon = 1e-9);
        assert_abs_diff_eq!(inputs.amount_financed(), 25_000.0, epsilon = 1e-9);
        assert_abs_diff_eq!(inputs.upfront_cost(), 5_000.0 + 2_450.0 + 500.0, epsilon = 1e-9);
    }

    #[test]
    fn test_negative_equity_rolls_into_loan() {
        let inputs = AutoLoanInputs {
            trade_in_value: 4_000.0,
            trade_in_owed: 6_000.0,
            ..AutoLoanInputs::new(20_000.0, 5.0, 4)
        };
        assert_abs_diff_eq!(inputs.amount_financed(), 22_000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_runs_through_engine() {
        let engine = AmortizationEngine::default();
        let result = calculate_auto_loan(&engine, &purchase());

        assert!(result.is_valid());
        let m = result.loan.metrics.as_ref().unwrap();
        assert_abs_diff_eq!(m.principal, 27_390.0, epsilon = 1e-9);
        assert_eq!(m.actual_periods, 60);
        assert_abs_diff_eq!(
            result.total_cost.unwrap(),
            5_000.0 + 27_390.0 + m.total_interest,
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_negative_purchase_amounts_are_invalid() {
        let engine = AmortizationEngine::default();
        let cases = [
            AutoLoanInputs { down_payment: -10_000.0, ..purchase() },
            AutoLoanInputs { trade_in_value: -1.0, ..purchase() },
            AutoLoanInputs { trade_in_owed: -3_000.0, ..purchase() },
            AutoLoanInputs { sales_tax_percent: -7.0, ..purchase() },
            AutoLoanInputs { sales_tax_percent: 250.0, ..purchase() },
            AutoLoanInputs { fees: f64::NAN, ..purchase() },
            AutoLoanInputs { vehicle_price: 0.0, ..purchase() },
        ];

        for inputs in &cases {
            assert!(inputs.validate().is_err());
            let result = calculate_auto_loan(&engine, inputs);
            assert!(!result.is_valid());
            assert_eq!(result.amount_financed, 0.0);
            assert!(result.total_cost.is_none());
            assert!(result.loan.invalid_reason.is_some());
        }
        assert!(purchase().validate().is_ok());
    }

    #[test]
    fn test_nothing_to_finance_is_invalid() {
        let inputs = AutoLoanInputs {
            down_payment: 20_000.0,
            ..AutoLoanInputs::new(15_000.0, 6.0, 3)
        };
        let result = calculate_auto_loan(&AmortizationEngine::default(), &inputs);

        assert!(!result.is_valid());
        assert!(result.total_cost.is_none());
        assert!(result.loan.payment().is_none());
    }
}
