use std::fs;
use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Environment variable consulted when the config file carries no API key.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Environment variable overriding `client_config.server_url`.
pub const SERVER_URL_ENV: &str = "TRANSLATOR_SERVER_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub system_config: SystemConfig,
    #[serde(default)]
    pub provider_config: ProviderConfig,
    #[serde(default)]
    pub client_config: ClientConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8001
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Settings for the hosted OpenAI-compatible chat-completions API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub temperature: Option<f32>,
    /// Unset keeps the HTTP client's own default.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_key: None,
            temperature: None,
            timeout_secs: None,
        }
    }
}

impl ProviderConfig {
    /// API key from the file, falling back to the environment.
    /// Blank keys and unresolved `${VAR}` placeholders count as absent.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .filter(|key| !key.starts_with("${"))
            .or_else(|| std::env::var(API_KEY_ENV).ok())
            .filter(|key| !key.trim().is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_server_url")]
    pub server_url: String,
}

fn default_server_url() -> String {
    "http://127.0.0.1:8001".to_string()
}

impl ClientConfig {
    /// Server URL from the environment override, else the configured one.
    pub fn resolved_server_url(&self) -> String {
        self.server_url_with_override(std::env::var(SERVER_URL_ENV).ok())
    }

    /// Blank overrides are ignored.
    pub fn server_url_with_override(&self, override_url: Option<String>) -> String {
        override_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| self.server_url.clone())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
        }
    }
}

impl Config {
    /// Load a YAML or JSON config file, substituting `${VAR}` placeholders first.
    pub fn load(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            anyhow::bail!("Configuration file not found: {}", path);
        }

        let content = substitute_env_vars(&read_text_file(path)?)?;

        let path_lower = path.to_lowercase();
        if path_lower.ends_with(".jsonld") || path_lower.ends_with(".json") {
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(serde_yaml::from_str(&content)?)
        }
    }

    /// Try `CONFIG_PATH`, then the default file names; fall back to built-in defaults.
    pub fn discover() -> (Self, Option<String>) {
        Self::discover_from(std::env::var("CONFIG_PATH").ok())
    }

    /// An explicit path that fails to load is reported at `warn`; default names at `debug`.
    pub fn discover_from(explicit_path: Option<String>) -> (Self, Option<String>) {
        if let Some(path) = explicit_path {
            match Config::load(&path) {
                Ok(cfg) => return (cfg, Some(path)),
                Err(e) => warn!("Failed to load config from CONFIG_PATH {}: {:#}", path, e),
            }
        }

        for path in ["conf.yaml", "conf.json"] {
            match Config::load(path) {
                Ok(cfg) => return (cfg, Some(path.to_string())),
                Err(e) => debug!("Failed to load config from {}: {}", path, e),
            }
        }

        (Config::default(), None)
    }
}

/// Read a text file as UTF-8, dropping a leading BOM.
fn read_text_file(path: &str) -> Result<String> {
    let bytes = fs::read(path)?;
    let (text, _, had_errors) = encoding_rs::UTF_8.decode(&bytes);
    if had_errors {
        anyhow::bail!("Configuration file is not valid UTF-8: {}", path);
    }
    Ok(text.into_owned())
}

/// Replace `${VAR_NAME}` with the variable's value; unknown variables are left as written.
pub fn substitute_env_vars(content: &str) -> Result<String> {
    let pattern = placeholder_pattern()?;
    Ok(pattern
        .replace_all(content, |caps: &regex::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned())
}

/// `${VAR_NAME}`, compiled once.
fn placeholder_pattern() -> Result<&'static Regex> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    if let Some(pattern) = PATTERN.get() {
        return Ok(pattern);
    }
    let pattern = Regex::new(r"\$\{(\w+)\}")?;
    Ok(PATTERN.get_or_init(|| pattern))
}
