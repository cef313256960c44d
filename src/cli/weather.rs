//! `weather` subcommand: weather lookup through the backend.

use std::error::Error;

use crate::api::client::BackendClient;

const ABSENT: &str = "N/A";

pub async fn run_weather(backend: &BackendClient, location: &str) -> Result<(), Box<dyn Error>> {
    if location.trim().is_empty() {
        return Err("The location is empty".into());
    }

    let report = backend.get_weather(location).await?;

    println!("{}", report.location.as_deref().unwrap_or(location));
    println!("  Temperature: {}", report.temperature.as_deref().unwrap_or(ABSENT));
    println!("  Condition:   {}", report.condition.as_deref().unwrap_or(ABSENT));
    println!("  Humidity:    {}", report.humidity.as_deref().unwrap_or(ABSENT));
    println!("  Wind:        {}", report.wind.as_deref().unwrap_or(ABSENT));

    Ok(())
}
