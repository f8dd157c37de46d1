use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub graph_store: GraphStoreConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

/// Generation service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            api_key_env: default_api_key_env(),
        }
    }
}

/// Graph store configuration. Names the environment variables holding the
/// connection settings; the store is active only when all three are set.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphStoreConfig {
    #[serde(default = "default_url_env")]
    pub url_env: String,
    #[serde(default = "default_username_env")]
    pub username_env: String,
    #[serde(default = "default_password_env")]
    pub password_env: String,
}

impl Default for GraphStoreConfig {
    fn default() -> Self {
        Self {
            url_env: default_url_env(),
            username_env: default_username_env(),
            password_env: default_password_env(),
        }
    }
}

fn default_port() -> u16 {
    8080
}

fn default_allowed_origins() -> Vec<String> {
    // Default empty — set allowed_origins in config.toml for production
    vec![]
}

fn default_model() -> String {
    "gpt-3.5-turbo-16k".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_url_env() -> String {
    "NEO4J_URL".to_string()
}

fn default_username_env() -> String {
    "NEO4J_USERNAME".to_string()
}

fn default_password_env() -> String {
    "NEO4J_PASSWORD".to_string()
}

impl Config {
    /// Load configuration from file
    ///
    /// Loads environment variables from .env file (if present) before loading config.
    /// Looks for the config file in this order:
    /// 1. Path specified in KGFORGE_CONFIG environment variable (must exist)
    /// 2. ./config.toml in current directory (optional)
    ///
    /// When neither is present, built-in defaults apply and the service is
    /// configured entirely from environment variables.
    pub fn load() -> Result<Self> {
        // Load .env file if it exists (ignore errors - file is optional)
        let _ = dotenv::dotenv();

        let config = match std::env::var("KGFORGE_CONFIG") {
            Ok(path) => {
                let path = PathBuf::from(path);
                let config_str = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                toml::from_str(&config_str).context("Failed to parse config.toml")?
            }
            Err(_) => {
                let path = PathBuf::from("config.toml");
                if path.exists() {
                    let config_str = std::fs::read_to_string(&path)
                        .with_context(|| format!("Failed to read config file: {}", path.display()))?;
                    toml::from_str(&config_str).context("Failed to parse config.toml")?
                } else {
                    Config::default()
                }
            }
        };

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values
    fn validate(&self) -> Result<()> {
        if self.server.port == 0 {
            anyhow::bail!("server.port must be greater than 0");
        }

        // Check both environment variable and .env file (dotenv already loaded in Config::load)
        std::env::var(&self.generation.api_key_env).with_context(|| {
            format!(
                "Environment variable {} not set. Set it in your .env file or as an environment variable with your OpenAI API key.",
                self.generation.api_key_env
            )
        })?;

        Ok(())
    }
}
