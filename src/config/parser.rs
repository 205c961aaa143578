use super::{AppConfig, DemoMode, ProviderKind};
use crate::errors::Error;
use std::fs;

use tracing::info;

/// Loads the application configuration
///
/// Starts from the YAML file when one is given (defaults otherwise), then
/// applies overrides from the process environment.
///
/// # Arguments
///
/// * `file_path` - Optional path to a YAML configuration file
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed, or if an
/// environment override holds an invalid value
pub fn load_app_config(file_path: Option<&str>) -> Result<AppConfig, Error> {
    let mut config = match file_path {
        Some(path) => {
            let yaml_str = fs::read_to_string(path)
                .map_err(|e| Error::Config(format!("cannot read {}: {}", path, e)))?;
            let config: AppConfig = serde_yaml::from_str(&yaml_str)
                .map_err(|e| Error::Config(format!("cannot parse {}: {}", path, e)))?;
            info!("Loaded configuration from {}", path);
            config
        }
        None => AppConfig::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;
    config.llm.request_timeout()?;
    Ok(config)
}

/// Applies environment overrides using `lookup` to read variables
pub fn apply_env_overrides<F>(config: &mut AppConfig, lookup: F) -> Result<(), Error>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(provider) = lookup("AI_PROVIDER") {
        let provider: ProviderKind = provider.parse()?;
        if provider != config.llm.provider {
            config.llm.use_provider(provider);
        }
    }

    let key_var = match config.llm.provider {
        ProviderKind::OpenRouter => "OPENROUTER_API_KEY",
        ProviderKind::GigaChat => "GIGACHAT_ACCESS_TOKEN",
    };
    if let Some(key) = lookup(key_var) {
        config.llm.api_key = Some(key);
    }

    if config.llm.provider == ProviderKind::OpenRouter {
        if let Some(model) = lookup("OPENROUTER_MODEL") {
            config.llm.model = model;
        }
    }

    if let Some(demo) = lookup("DEMO_MODE") {
        config.llm.demo_mode = match demo.trim().to_lowercase().as_str() {
            "true" | "1" | "on_error" => DemoMode::OnError,
            "always" => DemoMode::Always,
            "false" | "0" | "off" | "" => DemoMode::Off,
            other => return Err(Error::Config(format!("invalid DEMO_MODE '{}'", other))),
        };
    }

    if let Some(timeout) = lookup("REQUEST_TIMEOUT") {
        config.llm.request_timeout = timeout;
    }

    if let Some(path) = lookup("DATABASE_PATH") {
        config.database_path = path;
    }

    if let Some(port) = lookup("API_PORT") {
        config.api_port = port
            .parse()
            .map_err(|_| Error::Config(format!("invalid API_PORT '{}'", port)))?;
    }

    Ok(())
}
