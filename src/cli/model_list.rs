//! `models` subcommand: print the backend's model catalog, either a summary
//! of every provider or one provider's full model list.

use std::error::Error;

use crate::api::client::BackendClient;

pub async fn list_models(
    backend: &BackendClient,
    provider: Option<&str>,
) -> Result<(), Box<dyn Error>> {
    let response = backend.get_models().await?;

    match provider {
        Some(name) => {
            let Some(models) = response.providers.get(name) else {
                return Err(format!(
                    "Unknown provider: {name}. Run `nekotool providers` for the catalog."
                )
                .into());
            };
            if let Some(error) = &models.error {
                println!("{name}: unavailable ({error})");
                return Ok(());
            }
            println!("Models for {name} ({}):", models.count);
            for model in &models.models {
                println!("  {model}");
            }
        }
        None => {
            println!(
                "{} providers, {} models total",
                response.providers.len(),
                response.total_models
            );
            println!();
            let width = response
                .providers
                .keys()
                .map(|name| name.len())
                .max()
                .unwrap_or(0)
                .max("Provider".len());
            println!("  {:<width$}  Models", "Provider");
            for (name, models) in &response.providers {
                match &models.error {
                    Some(error) => println!("  {name:<width$}  error: {error}"),
                    None => println!("  {name:<width$}  {}", models.count),
                }
            }
        }
    }

    Ok(())
}
