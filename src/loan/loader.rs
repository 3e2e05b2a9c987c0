//! Load loan records from CSV
//!
//! Expected columns:
//! `loan_id,principal,annual_rate_percent,term_years,frequency,extra_monthly,extra_annual,extra_one_time,one_time_month,start_date`
//!
//! Extra-payment columns, `frequency` and `start_date` may be left empty.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::Reader;
use log::info;

use super::{ExtraPayments, LoanInputs, PaymentFrequency};
use crate::error::LoanError;

/// A loan tagged with the identifier from its source row
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct LoanRecord {
    pub loan_id: String,
    pub inputs: LoanInputs,
}

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    loan_id: String,
    principal: f64,
    annual_rate_percent: f64,
    term_years: u32,
    #[serde(default)]
    frequency: Option<String>,
    #[serde(default)]
    extra_monthly: Option<f64>,
    #[serde(default)]
    extra_annual: Option<f64>,
    #[serde(default)]
    extra_one_time: Option<f64>,
    #[serde(default)]
    one_time_month: Option<u32>,
    #[serde(default)]
    start_date: Option<String>,
}

impl CsvRow {
    fn into_record(self) -> Result<LoanRecord, LoanError> {
        let frequency = match self.frequency.as_deref().map(str::trim) {
            None | Some("") => PaymentFrequency::Monthly,
            Some(s) => s.parse()?,
        };

        let extras = ExtraPayments {
            extra_per_period: self.extra_monthly.unwrap_or(0.0),
            extra_annual: self.extra_annual.unwrap_or(0.0),
            extra_one_time: self.extra_one_time.unwrap_or(0.0),
            one_time_period_index: self.one_time_month,
        };

        let mut inputs = LoanInputs::new(self.principal, self.annual_rate_percent, self.term_years)
            .with_frequency(frequency);
        if extras != ExtraPayments::default() {
            inputs = inputs.with_extras(extras);
        }

        if let Some(date) = self.start_date.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            let start = NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
                LoanError::Date(format!("loan {}: '{}' ({})", self.loan_id, date, e))
            })?;
            inputs = inputs.with_start_date(start);
        }

        Ok(LoanRecord {
            loan_id: self.loan_id,
            inputs,
        })
    }
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<LoanRecord>, LoanError> {
    let path = path.as_ref();
    let reader = Reader::from_path(path)?;
    let records = read_records(reader)?;
    info!("Loaded {} loans from {}", records.len(), path.display());
    Ok(records)
}

/// Load loans from any reader (e.g., string buffer, stdin)
pub fn load_loans_from_reader<R: Read>(reader: R) -> Result<Vec<LoanRecord>, LoanError> {
    read_records(Reader::from_reader(reader))
}

fn read_records<R: Read>(mut reader: Reader<R>) -> Result<Vec<LoanRecord>, LoanError> {
    let mut records = Vec::new();
    for result in reader.deserialize() {
        let row: CsvRow = result?;
        records.push(row.into_record()?);
    }
    Ok(records)
}
