mod parser;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub use parser::*;

use crate::errors::Error;

/// Main application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AppConfig {
    /// Completion provider settings
    #[serde(default)]
    pub llm: LlmConfig,
    /// Path of the SQLite file holding interaction history
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Port of the HTTP backend
    #[serde(default = "default_api_port")]
    pub api_port: u16,
    /// Directory for rolling log files when serving the API
    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            llm: LlmConfig::default(),
            database_path: default_database_path(),
            api_port: default_api_port(),
            log_dir: default_log_dir(),
        }
    }
}

/// Which OpenAI-compatible service to talk to
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    OpenRouter,
    GigaChat,
}

impl ProviderKind {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "https://openrouter.ai/api/v1/",
            ProviderKind::GigaChat => "https://gigachat.devices.sberbank.ru/api/v1/",
        }
    }

    pub fn default_model(&self) -> &'static str {
        match self {
            ProviderKind::OpenRouter => "meta-llama/llama-3.2-3b-instruct:free",
            ProviderKind::GigaChat => "GigaChat",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "openrouter" => Ok(ProviderKind::OpenRouter),
            "gigachat" => Ok(ProviderKind::GigaChat),
            other => Err(Error::Config(format!("unknown AI provider '{}'", other))),
        }
    }
}

/// When canned demo replies replace upstream output
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum DemoMode {
    /// Only authentication failures switch to demo replies
    #[default]
    Off,
    /// Any upstream failure is answered with a demo reply
    OnError,
    /// The provider is never called
    Always,
}

/// Completion provider configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LlmConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer credential; usually supplied through the environment
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// Request timeout in humantime notation, e.g. "60s"
    #[serde(default = "default_request_timeout")]
    pub request_timeout: String,
    /// GigaChat is commonly deployed behind a certificate chain not in the
    /// system store
    #[serde(default)]
    pub accept_invalid_certs: bool,
    #[serde(default)]
    pub demo_mode: DemoMode,
}

impl Default for LlmConfig {
    fn default() -> Self {
        LlmConfig {
            provider: ProviderKind::default(),
            model: default_model(),
            base_url: default_base_url(),
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout: default_request_timeout(),
            accept_invalid_certs: false,
            demo_mode: DemoMode::default(),
        }
    }
}

impl LlmConfig {
    pub fn request_timeout(&self) -> Result<Duration, Error> {
        humantime::parse_duration(&self.request_timeout).map_err(|e| {
            Error::Config(format!(
                "invalid request_timeout '{}': {}",
                self.request_timeout, e
            ))
        })
    }

    /// Switches provider, resetting model and base URL to that provider's
    /// defaults.
    pub fn use_provider(&mut self, provider: ProviderKind) {
        self.provider = provider;
        self.model = provider.default_model().to_string();
        self.base_url = provider.default_base_url().to_string();
        self.accept_invalid_certs = provider == ProviderKind::GigaChat;
    }
}

fn default_model() -> String {
    ProviderKind::OpenRouter.default_model().to_string()
}

fn default_base_url() -> String {
    ProviderKind::OpenRouter.default_base_url().to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    2048
}

fn default_request_timeout() -> String {
    "60s".to_string()
}

fn default_api_port() -> u16 {
    8000
}

fn default_log_dir() -> String {
    "logs".to_string()
}

/// `<data dir>/alfapilot/history.db`, or a file in the working directory when
/// the platform has no data dir.
fn default_database_path() -> String {
    dirs::data_local_dir()
        .map(|dir| dir.join("alfapilot").join("history.db"))
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_else(|| "alfapilot.db".to_string())
}
