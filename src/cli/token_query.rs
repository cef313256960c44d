//! `validate` subcommand: classify a token, fan it out across the server
//! registry, render the aggregate result, and optionally export it as CSV.

use std::error::Error;
use std::fs;

use tracing::debug;

use crate::api::client::BackendClient;
use crate::core::config::Config;
use crate::core::export::{default_export_filename, results_to_csv};
use crate::core::query::{query_servers, AggregateResult, ServerOutcome};
use crate::core::token::{classify, mask_token};

pub async fn run_token_query(
    config: &Config,
    backend: &BackendClient,
    token: &str,
    export: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let classification = classify(token);
    if !classification.valid {
        // Format errors never reach the network.
        return Err(
            "Invalid token format. Please enter a valid NewAPI (sk-...) or Webscout (ws_...) token"
                .into(),
        );
    }

    let registry = config.registry()?;
    if registry.is_empty() {
        return Err("The server registry is empty; set BASE_URL to at least one server".into());
    }

    println!(
        "Validating {} token {} against {} server(s)...",
        classification.kind,
        mask_token(token),
        registry.len()
    );

    let results = query_servers(token, &registry, backend).await;

    println!();
    print!("{}", render_results_table(&results, config.flags.show_balance));

    if config.flags.show_detail {
        for (server, outcome) in &results {
            if let ServerOutcome::Valid {
                usage: Some(usage), ..
            } = outcome
            {
                println!();
                println!("{server} usage: {usage}");
            }
        }
        // Detailed usage only exists for tokens some server accepted; the
        // lookup is best-effort and never fails the command.
        if has_valid_outcome(&results) {
            match backend.get_token_usage(token).await {
                Ok(usage) => {
                    println!();
                    println!("Backend usage report: {usage}");
                }
                Err(e) => debug!("usage lookup failed: {e}"),
            }
        }
    }

    if let Some(path) = export {
        let path = if path.is_empty() {
            default_export_filename()
        } else {
            path.to_string()
        };
        fs::write(&path, results_to_csv(&results)?)?;
        println!();
        println!("Results exported to: {path}");
    }

    Ok(())
}

const ABSENT: &str = "N/A";

fn has_valid_outcome(results: &AggregateResult) -> bool {
    results
        .values()
        .any(|outcome| matches!(outcome, ServerOutcome::Valid { .. }))
}

/// Render the aggregate result as a fixed-width table, one row per server in
/// registry order.
fn render_results_table(results: &AggregateResult, show_balance: bool) -> String {
    let mut headers = vec!["Server", "Status"];
    if show_balance {
        headers.push("Balance");
    }
    headers.push("Token Type");
    headers.push("Error");

    let rows: Vec<Vec<String>> = results
        .iter()
        .map(|(server, outcome)| {
            let mut row = vec![server.clone(), outcome.status().to_string()];
            if show_balance {
                row.push(
                    outcome
                        .balance_display()
                        .map(|b| format!("${b}"))
                        .unwrap_or_else(|| ABSENT.to_string()),
                );
            }
            row.push(outcome.token_type().unwrap_or(ABSENT).to_string());
            row.push(outcome.error_message().unwrap_or(ABSENT).to_string());
            row
        })
        .collect();

    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(i, h)| {
            rows.iter()
                .map(|row| row[i].len())
                .chain(std::iter::once(h.len()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let render_row = |cells: Vec<String>| -> String {
        let mut line = String::new();
        for (i, cell) in cells.iter().enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            line.push_str(&format!("{cell:<width$}", width = widths[i]));
        }
        format!("{}\n", line.trim_end())
    };

    out.push_str(&render_row(
        headers.iter().map(|h| h.to_string()).collect(),
    ));
    for row in rows {
        out.push_str(&render_row(row));
    }
    out
}
