//! `search` subcommand: web search through the backend.

use std::error::Error;

use crate::api::client::BackendClient;

pub async fn run_search(
    backend: &BackendClient,
    query: &str,
    engine: &str,
    max_results: u32,
) -> Result<(), Box<dyn Error>> {
    if query.trim().is_empty() {
        return Err("The search query is empty".into());
    }

    let response = backend.search(query, engine, max_results).await?;

    match (response.total_results, response.search_time) {
        (Some(total), Some(time)) => println!("Found {total} results in {time}s"),
        (Some(total), None) => println!("Found {total} results"),
        _ => println!("Found {} results", response.results.len()),
    }

    for result in &response.results {
        println!();
        println!("{}", result.title);
        println!("  {}", result.url);
        if !result.snippet.is_empty() {
            println!("  {}", result.snippet);
        }
    }

    Ok(())
}
