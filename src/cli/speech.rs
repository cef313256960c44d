//! `speak` subcommand: text-to-speech through the backend.

use std::error::Error;

use crate::api::client::BackendClient;

pub async fn run_speech(
    backend: &BackendClient,
    input: &str,
    voice: &str,
) -> Result<(), Box<dyn Error>> {
    if input.trim().is_empty() {
        return Err("There is no text to speak".into());
    }

    let response = backend.text_to_speech(input, voice).await?;

    match response.audio_url {
        Some(url) => {
            println!("Audio: {url}");
            if let Some(duration) = response.duration {
                println!("Duration: {duration}s");
            }
        }
        None => println!("The backend returned no audio."),
    }

    Ok(())
}
