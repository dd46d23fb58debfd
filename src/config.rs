use std::env;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use crate::food::config::FoodConfig;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SCAN_OUTPUT_PATH: &str = "data/scan_output.json";
pub const DEFAULT_POLL_SECS: u64 = 5;
pub const MIN_POLL_SECS: u64 = 2;
pub const MAX_POLL_SECS: u64 = 30;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(String),
    #[error("{0} still holds a placeholder value")]
    Placeholder(String),
    #[error("{key} is not a valid URL: {reason}")]
    InvalidUrl { key: String, reason: String },
    #[error("{key} has an invalid value: {value}")]
    InvalidValue { key: String, value: String },
}

/// Values people leave behind from `.env.example` files.
pub fn is_placeholder(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    lower.is_empty()
        || lower.starts_with("your_")
        || lower.starts_with("your-")
        || lower.starts_with("xxx")
        || (lower.starts_with('<') && lower.ends_with('>'))
        || lower.contains("placeholder")
        || lower == "changeme"
        || lower == "change_me"
}

pub(crate) fn required<F>(lookup: &F, key: &str) -> Result<String, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(key).ok_or_else(|| ConfigError::Missing(key.to_string()))?;
    if is_placeholder(&value) {
        return Err(ConfigError::Placeholder(key.to_string()));
    }
    Ok(value.trim().to_string())
}

pub(crate) fn url_value(key: &str, value: String) -> Result<String, ConfigError> {
    Url::parse(&value).map_err(|e| ConfigError::InvalidUrl {
        key: key.to_string(),
        reason: e.to_string(),
    })?;
    Ok(value.trim_end_matches('/').to_string())
}

fn parsed<F, T>(lookup: &F, key: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
            key: key.to_string(),
            value: raw,
        }),
        None => Ok(default),
    }
}

/// Settings for the chat-completion service that writes recipes.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ProviderConfig {
    pub fn from_lookup<F>(provider: &str, lookup: &F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let prefix = provider.to_uppercase();

        let api_key = required(lookup, &format!("{}_API_KEY", prefix))?;
        let url_key = format!("{}_API_URL", prefix);
        let api_url = url_value(&url_key, required(lookup, &url_key)?)?;

        let model = lookup(&format!("{}_MODEL", prefix))
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| match provider {
                "nebius" => "deepseek-v3".to_string(),
                _ => "gpt-4o-mini".to_string(),
            });

        let temperature = parsed(lookup, &format!("{}_TEMPERATURE", prefix), 0.7)?;
        let max_tokens = parsed(lookup, &format!("{}_MAX_TOKENS", prefix), 1000)?;

        Ok(Self {
            api_key,
            api_url,
            model,
            temperature,
            max_tokens,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub output_path: PathBuf,
    pub capture_url: Option<String>,
    pub poll_interval: Duration,
}

/// Everything the service needs before it may accept a request.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub food: FoodConfig,
    pub generation: ProviderConfig,
    pub scan: ScanConfig,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let food = FoodConfig::from_lookup(&lookup)?;
        let generation = ProviderConfig::from_lookup("nebius", &lookup)?;

        let timeout_secs: u64 = parsed(&lookup, "REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS)?;
        if timeout_secs == 0 {
            return Err(ConfigError::InvalidValue {
                key: "REQUEST_TIMEOUT_SECS".to_string(),
                value: "0".to_string(),
            });
        }

        let capture_url = match lookup("CAPTURE_URL").filter(|u| !u.trim().is_empty()) {
            Some(url) => Some(url_value("CAPTURE_URL", url)?),
            None => None,
        };

        let poll_secs: u64 = parsed(&lookup, "SCAN_POLL_SECS", DEFAULT_POLL_SECS)?;

        Ok(Self {
            food,
            generation,
            scan: ScanConfig {
                output_path: lookup("SCAN_OUTPUT_PATH")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_SCAN_OUTPUT_PATH)),
                capture_url,
                poll_interval: clamp_poll_interval(poll_secs),
            },
            request_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

pub fn clamp_poll_interval(secs: u64) -> Duration {
    Duration::from_secs(secs.clamp(MIN_POLL_SECS, MAX_POLL_SECS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn base_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("NUTRITIONIX_APP_ID", "app-123"),
            ("NUTRITIONIX_APP_KEY", "key-456"),
            ("NEBIUS_API_KEY", "nb-secret"),
            ("NEBIUS_API_URL", "https://api.studio.nebius.ai/v1/chat/completions"),
        ])
    }

    fn load(env: &HashMap<&'static str, &'static str>) -> Result<AppConfig, ConfigError> {
        AppConfig::from_lookup(|key| env.get(key).map(|v| v.to_string()))
    }

    #[test]
    fn loads_defaults() {
        let config = load(&base_env()).unwrap();
        assert_eq!(config.generation.model, "deepseek-v3");
        assert_eq!(config.generation.max_tokens, 1000);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.food.api_url, "https://trackapi.nutritionix.com/v2");
        assert_eq!(config.scan.poll_interval, Duration::from_secs(5));
        assert!(config.scan.capture_url.is_none());
    }

    #[test]
    fn missing_credentials_fail_fast() {
        let mut env = base_env();
        env.remove("NUTRITIONIX_APP_KEY");
        assert_eq!(
            load(&env).unwrap_err(),
            ConfigError::Missing("NUTRITIONIX_APP_KEY".to_string())
        );
    }

    #[test]
    fn placeholder_credentials_are_rejected() {
        let mut env = base_env();
        env.insert("NEBIUS_API_KEY", "your_nebius_api_key");
        assert_eq!(
            load(&env).unwrap_err(),
            ConfigError::Placeholder("NEBIUS_API_KEY".to_string())
        );
    }

    #[test]
    fn invalid_base_url_is_rejected() {
        let mut env = base_env();
        env.insert("NEBIUS_API_URL", "not a url");
        assert!(matches!(load(&env), Err(ConfigError::InvalidUrl { .. })));
    }

    #[test]
    fn poll_interval_is_clamped() {
        assert_eq!(clamp_poll_interval(1), Duration::from_secs(2));
        assert_eq!(clamp_poll_interval(120), Duration::from_secs(30));
        assert_eq!(clamp_poll_interval(10), Duration::from_secs(10));
    }

    #[test]
    fn detects_placeholders() {
        assert!(is_placeholder(""));
        assert!(is_placeholder("<app id>"));
        assert!(is_placeholder("CHANGEME"));
        assert!(is_placeholder("xxxxxxxx"));
        assert!(!is_placeholder("a1b2c3"));
    }
}
