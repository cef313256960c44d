//! `image` subcommand: image generation through the backend.

use std::error::Error;

use crate::api::client::BackendClient;

pub async fn run_image(backend: &BackendClient, prompt: &str) -> Result<(), Box<dyn Error>> {
    if prompt.trim().is_empty() {
        return Err("The image prompt is empty".into());
    }

    let response = backend.generate_image(prompt).await?;
    if response.images.is_empty() {
        println!("No images were generated.");
        return Ok(());
    }

    println!("Generated {} image(s):", response.images.len());
    for image in &response.images {
        println!("  {}", image.url);
    }

    Ok(())
}
