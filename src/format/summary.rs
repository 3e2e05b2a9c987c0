//! Formatted metric strings and the one-line summary

use serde::{Deserialize, Serialize};

use super::currency::{format_duration_months, CurrencyFormat};
use crate::amortization::LoanMetrics;

/// Summary sentence for every loan
pub const SUMMARY_TEMPLATE: &str =
    "Your {frequency} payment is {payment}. You will pay {totalInterest} in interest and be debt-free by {payoffDate}.";

/// Appended when extra payments shorten the loan
pub const SAVINGS_TEMPLATE: &str = " Extra payments save you {interestSaved} and {timeSaved}.";

/// Display strings for the same metrics as `LoanMetrics`. Empty when invalid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FormattedMetrics {
    pub payment: String,
    pub total_interest: String,
    pub total_paid: String,
    pub payoff_date: String,
    pub baseline_total_interest: String,
    pub interest_saved: String,
    pub time_saved: String,
    pub equity_at_midpoint: String,
    pub daily_interest_cost: String,
    pub interest_to_principal_ratio: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biweekly_interest_saved: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub biweekly_time_saved: Option<String>,
}

impl FormattedMetrics {
    pub fn from_metrics(metrics: &LoanMetrics, currency: &CurrencyFormat) -> Self {
        Self {
            payment: currency.money(metrics.payment),
            total_interest: currency.money(metrics.total_interest),
            total_paid: currency.money(metrics.total_paid),
            payoff_date: metrics
                .payoff_date
                .map(|d| d.format("%B %Y").to_string())
                .unwrap_or_default(),
            baseline_total_interest: currency.money(metrics.baseline_total_interest),
            interest_saved: currency.money(metrics.interest_saved),
            time_saved: format_duration_months(metrics.time_saved_months),
            equity_at_midpoint: currency.money(metrics.equity_at_midpoint),
            daily_interest_cost: currency.money(metrics.daily_interest_cost),
            interest_to_principal_ratio: currency.percent(metrics.interest_to_principal_ratio),
            biweekly_interest_saved: metrics
                .biweekly_comparison
                .as_ref()
                .map(|c| currency.money(c.interest_saved)),
            biweekly_time_saved: metrics
                .biweekly_comparison
                .as_ref()
                .map(|c| format_duration_months(c.months_saved)),
        }
    }
}

/// Replace `{key}` placeholders. Unknown placeholders are left as written.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (key, value) in values {
        out = out.replace(&format!("{{{}}}", key), value);
    }
    out
}

/// Build the summary line for a valid result
pub fn summary_sentence(metrics: &LoanMetrics, formatted: &FormattedMetrics) -> String {
    let mut sentence = fill_template(
        SUMMARY_TEMPLATE,
        &[
            ("frequency", metrics.frequency.label()),
            ("payment", formatted.payment.as_str()),
            ("totalInterest", formatted.total_interest.as_str()),
            ("payoffDate", formatted.payoff_date.as_str()),
        ],
    );

    if metrics.has_savings() {
        sentence.push_str(&fill_template(
            SAVINGS_TEMPLATE,
            &[
                ("interestSaved", formatted.interest_saved.as_str()),
                ("timeSaved", formatted.time_saved.as_str()),
            ],
        ));
    }

    sentence
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fill_template() {
        let out = fill_template("{a} and {b}, {a} again {c}", &[("a", "x"), ("b", "y")]);
        assert_eq!(out, "x and y, x again {c}");
    }

    #[test]
    fn test_fill_template_without_placeholders() {
        assert_eq!(fill_template("plain", &[("a", "x")]), "plain");
    }
}
