//! CSV export of aggregate validation results.
//!
//! Mirrors the dashboard's download: columns `server,status,balance,error,
//! token_type`, one row per registry entry in registry order, with a literal
//! `N/A` wherever a field does not apply to the row's status.

use std::error::Error;

use chrono::Utc;

use crate::core::query::AggregateResult;

const HEADER: [&str; 5] = ["server", "status", "balance", "error", "token_type"];
const ABSENT: &str = "N/A";

/// Render the aggregate result as CSV text.
pub fn results_to_csv(results: &AggregateResult) -> Result<String, Box<dyn Error>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADER)?;

    for (server, outcome) in results {
        writer.write_record([
            server.as_str(),
            outcome.status(),
            outcome
                .balance_display()
                .as_deref()
                .unwrap_or(ABSENT),
            outcome.error_message().unwrap_or(ABSENT),
            outcome.token_type().unwrap_or(ABSENT),
        ])?;
    }

    let bytes = writer.into_inner()?;
    Ok(String::from_utf8(bytes)?)
}

/// Default export filename, matching the dashboard's
/// `token-validation-{timestamp}.csv` download name.
pub fn default_export_filename() -> String {
    format!("token-validation-{}.csv", Utc::now().timestamp_millis())
}
