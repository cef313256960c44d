//! `providers` subcommand: print the backend's provider catalog.

use std::error::Error;

use indexmap::IndexMap;

use crate::api::client::BackendClient;

pub async fn list_providers(backend: &BackendClient) -> Result<(), Box<dyn Error>> {
    let response = backend.get_providers().await?;

    if response.providers.is_empty() {
        println!("No providers available.");
        return Ok(());
    }

    let count = if response.count > 0 {
        response.count
    } else {
        response.providers.len()
    };
    println!("Available providers ({count}):");
    println!();

    let width = response
        .providers
        .iter()
        .map(|name| name.len())
        .max()
        .unwrap_or(0)
        .max("Provider".len());
    println!("  {:<width$}  Category", "Provider");
    for provider in &response.providers {
        println!(
            "  {provider:<width$}  {}",
            category_of(provider, &response.categories)
        );
    }

    Ok(())
}

/// First category listing the provider, or `other` when none does.
fn category_of<'a>(provider: &str, categories: &'a IndexMap<String, Vec<String>>) -> &'a str {
    categories
        .iter()
        .find(|(_, members)| members.iter().any(|m| m == provider))
        .map(|(category, _)| category.as_str())
        .unwrap_or("other")
}
