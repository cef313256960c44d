//! `chat` subcommand: one-shot chat completion through the backend.

use std::error::Error;

use crate::api::client::BackendClient;
use crate::api::{ChatMessage, ChatRequest};
use crate::core::config::Config;

#[allow(clippy::too_many_arguments)]
pub async fn run_chat(
    config: &Config,
    backend: &BackendClient,
    prompt: &str,
    model: Option<&str>,
    system: Option<&str>,
    temperature: f64,
    max_tokens: u32,
) -> Result<(), Box<dyn Error>> {
    if prompt.trim().is_empty() {
        return Err("The prompt is empty".into());
    }

    let model = model.unwrap_or(&config.default_model);
    let request = ChatRequest {
        model: model.to_string(),
        messages: build_messages(system, prompt),
        temperature,
        max_tokens,
    };

    let response = backend.chat_completions(&request).await?;
    let Some(choice) = response.choices.first() else {
        return Err("The backend returned no completion choices".into());
    };

    println!("{}", choice.message.content);
    if let Some(total_tokens) = response.usage.total_tokens {
        eprintln!("[{model}, {total_tokens} tokens]");
    }

    Ok(())
}

fn build_messages(system: Option<&str>, prompt: &str) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if let Some(system) = system {
        messages.push(ChatMessage {
            role: "system".to_string(),
            content: system.to_string(),
        });
    }
    messages.push(ChatMessage {
        role: "user".to_string(),
        content: prompt.to_string(),
    });
    messages
}
