//! CSV and JSON export of schedules and batch summaries

use std::fs::File;
use std::io::Write;
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::amortization::{LoanResult, YearlySummary};
use crate::error::LoanError;
use crate::scenario::BatchSummaryRow;

/// Flat CSV row with two-decimal money columns
#[derive(Debug, Serialize)]
struct ScheduleCsvRow {
    #[serde(rename = "Year")]
    year: u32,
    #[serde(rename = "Payments")]
    payments: u32,
    #[serde(rename = "TotalPayment")]
    total_payment: String,
    #[serde(rename = "Principal")]
    principal: String,
    #[serde(rename = "ExtraPrincipal")]
    extra_principal: String,
    #[serde(rename = "Interest")]
    interest: String,
    #[serde(rename = "CumulativeInterest")]
    cumulative_interest: String,
    #[serde(rename = "EndingBalance")]
    ending_balance: String,
}

impl From<&YearlySummary> for ScheduleCsvRow {
    fn from(row: &YearlySummary) -> Self {
        Self {
            year: row.year,
            payments: row.payments,
            total_payment: format!("{:.2}", row.total_payment),
            principal: format!("{:.2}", row.principal),
            extra_principal: format!("{:.2}", row.extra_principal),
            interest: format!("{:.2}", row.interest),
            cumulative_interest: format!("{:.2}", row.cumulative_interest),
            ending_balance: format!("{:.2}", row.ending_balance.max(0.0)),
        }
    }
}

/// Write a yearly schedule as CSV to any writer
pub fn write_schedule_csv<W: Write>(writer: W, schedule: &[YearlySummary]) -> Result<(), LoanError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in schedule {
        csv.serialize(ScheduleCsvRow::from(row))?;
    }
    csv.flush()?;
    Ok(())
}

/// Write a yearly schedule to a CSV file
pub fn save_schedule_csv<P: AsRef<Path>>(path: P, schedule: &[YearlySummary]) -> Result<(), LoanError> {
    let path = path.as_ref();
    write_schedule_csv(File::create(path)?, schedule)?;
    info!("Schedule ({} years) written to {}", schedule.len(), path.display());
    Ok(())
}

/// Write batch summary rows as CSV to any writer
pub fn write_batch_csv<W: Write>(writer: W, rows: &[BatchSummaryRow]) -> Result<(), LoanError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(row)?;
    }
    csv.flush()?;
    Ok(())
}

pub fn save_batch_csv<P: AsRef<Path>>(path: P, rows: &[BatchSummaryRow]) -> Result<(), LoanError> {
    let path = path.as_ref();
    write_batch_csv(File::create(path)?, rows)?;
    info!("Batch summary ({} loans) written to {}", rows.len(), path.display());
    Ok(())
}

/// Pretty JSON for the presentation layer
pub fn result_to_json(result: &LoanResult) -> Result<String, LoanError> {
    Ok(serde_json::to_string_pretty(result)?)
}
