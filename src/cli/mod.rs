//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments and dispatches to the
//! appropriate subcommand handler. Each handler lives in its own file.

pub mod chat;
pub mod health;
pub mod image;
pub mod model_list;
pub mod provider_list;
pub mod search;
pub mod speech;
pub mod token_query;
pub mod weather;

use std::error::Error;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::api::client::BackendClient;
use crate::core::config::Config;

#[derive(Parser)]
#[command(name = "nekotool")]
#[command(about = "Validate AI API keys across multiple servers and drive a Webscout-compatible backend")]
#[command(
    long_about = "Nekotool is a terminal dashboard for the Neko API key tool backend. It validates \
NewAPI (sk-...) and Webscout (ws_...) tokens against every configured server, browses \
the backend's provider and model catalog, runs one-shot chat completions, and exposes \
the auxiliary Webscout features (web search, image generation, text-to-speech, weather).\n\n\
Configuration:\n\
  Values come from the config file, overridden by environment variables:\n\
  SERVER            Absolute base URL of the local backend (default http://127.0.0.1:8000)\n\
  BASE_URL          JSON server registry for token fan-out\n\
                    (default {\"Local Backend\": \"/api\"})\n\
  DEFAULT_PROVIDER  Provider preselected for chat (default openai)\n\
  DEFAULT_MODEL     Model preselected for chat (default gpt-3.5-turbo)\n\
  SHOW_BALANCE, SHOW_DETAIL, ENABLE_WEBSCOUT, ENABLE_SEARCH,\n\
  ENABLE_IMAGE_GEN, ENABLE_TTS, ENABLE_WEATHER\n\
                    Set to 'false' to switch a section off\n\n\
Logging:\n\
  Diagnostic output goes to stderr; tune it with RUST_LOG (e.g. RUST_LOG=nekotool=debug)."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Validate a token against every configured server
    Validate {
        /// The API token (sk-... or ws_...)
        token: String,
        /// Export the results as CSV, optionally to a specific file
        #[arg(short = 'e', long, value_name = "FILE", num_args = 0..=1, default_missing_value = "")]
        export: Option<String>,
    },
    /// List the backend's AI providers
    Providers,
    /// List available models, for one provider or all of them
    Models {
        /// Only show models for this provider
        #[arg(short = 'p', long)]
        provider: Option<String>,
    },
    /// Send a one-shot chat prompt
    Chat {
        /// The prompt to send
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
        /// Model to use (defaults to the configured default-model)
        #[arg(short = 'm', long)]
        model: Option<String>,
        /// System message prepended to the conversation
        #[arg(short = 's', long)]
        system: Option<String>,
        #[arg(long, default_value_t = 0.7)]
        temperature: f64,
        #[arg(long, default_value_t = 1000)]
        max_tokens: u32,
    },
    /// Run a web search through the backend
    Search {
        /// The search query
        #[arg(trailing_var_arg = true, required = true)]
        query: Vec<String>,
        /// Search engine to use
        #[arg(long, default_value = "google")]
        engine: String,
        #[arg(long, default_value_t = 10)]
        max_results: u32,
    },
    /// Generate images from a prompt
    Image {
        /// The image description
        #[arg(trailing_var_arg = true, required = true)]
        prompt: Vec<String>,
    },
    /// Convert text to speech
    Speak {
        /// The text to speak
        #[arg(trailing_var_arg = true, required = true)]
        text: Vec<String>,
        /// Voice to use
        #[arg(long, default_value = "default")]
        voice: String,
    },
    /// Look up current weather for a location
    Weather {
        /// City or location name
        location: String,
    },
    /// Check that the backend is reachable
    Health,
    /// Print the effective configuration
    Config,
}

pub fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    tokio::runtime::Runtime::new()?.block_on(async_main())
}

/// Exit with a notice when a feature-flagged section is switched off.
fn require_flag(enabled: bool, what: &str, flag: &str) -> Result<(), Box<dyn Error>> {
    if enabled {
        Ok(())
    } else {
        Err(format!("{what} is disabled ({flag}=false)").into())
    }
}

async fn async_main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    let config = Config::load()?;
    let backend = BackendClient::new(&config.server)?;

    match args.command {
        Commands::Validate { token, export } => {
            token_query::run_token_query(&config, &backend, &token, export.as_deref()).await
        }
        Commands::Providers => {
            require_flag(
                config.flags.enable_webscout,
                "The provider catalog",
                "ENABLE_WEBSCOUT",
            )?;
            provider_list::list_providers(&backend).await
        }
        Commands::Models { provider } => {
            require_flag(
                config.flags.enable_webscout,
                "The model catalog",
                "ENABLE_WEBSCOUT",
            )?;
            model_list::list_models(&backend, provider.as_deref()).await
        }
        Commands::Chat {
            prompt,
            model,
            system,
            temperature,
            max_tokens,
        } => {
            require_flag(config.flags.enable_webscout, "Chat", "ENABLE_WEBSCOUT")?;
            chat::run_chat(
                &config,
                &backend,
                &prompt.join(" "),
                model.as_deref(),
                system.as_deref(),
                temperature,
                max_tokens,
            )
            .await
        }
        Commands::Search {
            query,
            engine,
            max_results,
        } => {
            require_flag(config.flags.enable_webscout, "Web search", "ENABLE_WEBSCOUT")?;
            require_flag(config.flags.enable_search, "Web search", "ENABLE_SEARCH")?;
            search::run_search(&backend, &query.join(" "), &engine, max_results).await
        }
        Commands::Image { prompt } => {
            require_flag(
                config.flags.enable_webscout,
                "Image generation",
                "ENABLE_WEBSCOUT",
            )?;
            require_flag(
                config.flags.enable_image_gen,
                "Image generation",
                "ENABLE_IMAGE_GEN",
            )?;
            image::run_image(&backend, &prompt.join(" ")).await
        }
        Commands::Speak { text, voice } => {
            require_flag(
                config.flags.enable_webscout,
                "Text-to-speech",
                "ENABLE_WEBSCOUT",
            )?;
            require_flag(config.flags.enable_tts, "Text-to-speech", "ENABLE_TTS")?;
            speech::run_speech(&backend, &text.join(" "), &voice).await
        }
        Commands::Weather { location } => {
            require_flag(
                config.flags.enable_webscout,
                "Weather lookup",
                "ENABLE_WEBSCOUT",
            )?;
            require_flag(config.flags.enable_weather, "Weather lookup", "ENABLE_WEATHER")?;
            weather::run_weather(&backend, &location).await
        }
        Commands::Health => health::run_health(&backend).await,
        Commands::Config => {
            config.print_all();
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_flag_passes_when_enabled() {
        assert!(require_flag(true, "Chat", "ENABLE_WEBSCOUT").is_ok());
    }

    #[test]
    fn require_flag_names_the_flag_when_disabled() {
        let err = require_flag(false, "Web search", "ENABLE_SEARCH").unwrap_err();
        assert_eq!(err.to_string(), "Web search is disabled (ENABLE_SEARCH=false)");
    }

    #[test]
    fn cli_parses_validate_with_bare_export() {
        let args = Args::try_parse_from(["nekotool", "validate", "sk-abc", "--export"]).unwrap();
        match args.command {
            Commands::Validate { token, export } => {
                assert_eq!(token, "sk-abc");
                assert_eq!(export.as_deref(), Some(""));
            }
            _ => panic!("expected validate"),
        }
    }

    #[test]
    fn cli_parses_chat_with_multi_word_prompt() {
        let args =
            Args::try_parse_from(["nekotool", "chat", "-m", "gpt-4o", "hello", "there"]).unwrap();
        match args.command {
            Commands::Chat { prompt, model, .. } => {
                assert_eq!(prompt.join(" "), "hello there");
                assert_eq!(model.as_deref(), Some("gpt-4o"));
            }
            _ => panic!("expected chat"),
        }
    }
}
