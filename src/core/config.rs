//! Application configuration.
//!
//! Configuration is assembled once at startup — defaults, then the TOML
//! config file, then environment overrides — and passed down explicitly.
//! Nothing reads ambient process state after that.

use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::core::registry::ServerRegistry;

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8000";
pub const DEFAULT_REGISTRY_JSON: &str = r#"{"Local Backend": "/api"}"#;
pub const DEFAULT_PROVIDER: &str = "openai";
pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";

fn default_true() -> bool {
    true
}

/// UI sections that can be switched off. All default to on; setting the
/// matching environment variable to `false` disables one (any other value
/// leaves it on, mirroring the dashboard's behavior).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FeatureFlags {
    #[serde(default = "default_true")]
    pub show_balance: bool,
    #[serde(default = "default_true")]
    pub show_detail: bool,
    #[serde(default = "default_true")]
    pub enable_webscout: bool,
    #[serde(default = "default_true")]
    pub enable_search: bool,
    #[serde(default = "default_true")]
    pub enable_image_gen: bool,
    #[serde(default = "default_true")]
    pub enable_tts: bool,
    #[serde(default = "default_true")]
    pub enable_weather: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        FeatureFlags {
            show_balance: true,
            show_detail: true,
            enable_webscout: true,
            enable_search: true,
            enable_image_gen: true,
            enable_tts: true,
            enable_weather: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// Absolute base URL of the local backend; `/api/...` paths resolve
    /// against it.
    pub server: String,
    /// JSON-encoded server registry for token fan-out.
    pub base_url: String,
    pub default_provider: String,
    pub default_model: String,
    pub flags: FeatureFlags,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            server: DEFAULT_BACKEND_URL.to_string(),
            base_url: DEFAULT_REGISTRY_JSON.to_string(),
            default_provider: DEFAULT_PROVIDER.to_string(),
            default_model: DEFAULT_MODEL.to_string(),
            flags: FeatureFlags::default(),
        }
    }
}

impl Config {
    /// Load the effective configuration: config file (when present) with
    /// environment overrides applied on top.
    pub fn load() -> Result<Config, Box<dyn Error>> {
        let mut config = Self::load_from_path(&Self::config_path())?;
        config.apply_env_overrides(|name| env::var(name).ok());
        Ok(config)
    }

    pub fn load_from_path(config_path: &PathBuf) -> Result<Config, Box<dyn Error>> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to_path(&self, config_path: &PathBuf) -> Result<(), Box<dyn Error>> {
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        let proj_dirs = ProjectDirs::from("org", "permacommons", "nekotool")
            .expect("Failed to determine config directory");
        proj_dirs.config_dir().join("config.toml")
    }

    /// Apply environment-variable overrides. `lookup` abstracts `env::var`
    /// so tests can inject values without mutating process state.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(server) = lookup("SERVER") {
            self.server = server;
        }
        if let Some(base_url) = lookup("BASE_URL") {
            self.base_url = base_url;
        }
        if let Some(provider) = lookup("DEFAULT_PROVIDER") {
            self.default_provider = provider;
        }
        if let Some(model) = lookup("DEFAULT_MODEL") {
            self.default_model = model;
        }

        let flag = |name: &str, target: &mut bool| {
            if let Some(value) = lookup(name) {
                // Only the literal string "false" disables a section.
                *target = value != "false";
            }
        };
        flag("SHOW_BALANCE", &mut self.flags.show_balance);
        flag("SHOW_DETAIL", &mut self.flags.show_detail);
        flag("ENABLE_WEBSCOUT", &mut self.flags.enable_webscout);
        flag("ENABLE_SEARCH", &mut self.flags.enable_search);
        flag("ENABLE_IMAGE_GEN", &mut self.flags.enable_image_gen);
        flag("ENABLE_TTS", &mut self.flags.enable_tts);
        flag("ENABLE_WEATHER", &mut self.flags.enable_weather);
    }

    /// Parse the configured server registry.
    pub fn registry(&self) -> Result<ServerRegistry, Box<dyn Error>> {
        ServerRegistry::from_json(&self.base_url)
            .map_err(|e| format!("BASE_URL is not a valid JSON server registry: {e}").into())
    }

    pub fn print_all(&self) {
        println!("Current configuration:");
        println!("  server: {}", self.server);
        println!("  base-url: {}", self.base_url);
        println!("  default-provider: {}", self.default_provider);
        println!("  default-model: {}", self.default_model);
        println!("  show-balance: {}", self.flags.show_balance);
        println!("  show-detail: {}", self.flags.show_detail);
        println!("  enable-webscout: {}", self.flags.enable_webscout);
        println!("  enable-search: {}", self.flags.enable_search);
        println!("  enable-image-gen: {}", self.flags.enable_image_gen);
        println!("  enable-tts: {}", self.flags.enable_tts);
        println!("  enable-weather: {}", self.flags.enable_weather);
    }
}
