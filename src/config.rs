//! Configuration types.

use std::path::PathBuf;
use std::time::Duration;

use secrecy::SecretString;

use crate::error::ConfigError;

/// Path served by the local development backend.
pub const DEVELOPMENT_PATH: &str = "/api/assistant/query";

/// Path of the deployed serverless function.
pub const DEPLOYED_PATH: &str = "/.netlify/functions/assistant";

const DEFAULT_BASE_URL: &str = "http://localhost:5173";

/// Where the assistant endpoint lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Deployed,
}

impl Environment {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" | "local" => Some(Self::Development),
            "deployed" | "production" | "prod" => Some(Self::Deployed),
            _ => None,
        }
    }

    /// Endpoint path for this environment.
    pub fn path(self) -> &'static str {
        match self {
            Self::Development => DEVELOPMENT_PATH,
            Self::Deployed => DEPLOYED_PATH,
        }
    }
}

/// Assistant endpoint configuration.
#[derive(Debug, Clone)]
pub struct AssistantConfig {
    /// Development or deployed endpoint path.
    pub environment: Environment,
    /// Scheme + host (+ port) the endpoint path is appended to.
    pub base_url: String,
    /// Full URL override; wins over `base_url` + environment path.
    pub endpoint_override: Option<String>,
    /// Optional bearer token sent with every request.
    pub api_token: Option<SecretString>,
    /// Transport timeout. `None` leaves reqwest's default (no timeout).
    pub timeout: Option<Duration>,
    /// JSON file with the case list. `None` uses the bundled demo cases.
    pub cases_path: Option<PathBuf>,
}

impl Default for AssistantConfig {
    fn default() -> Self {
        Self {
            environment: Environment::Development,
            base_url: DEFAULT_BASE_URL.to_string(),
            endpoint_override: None,
            api_token: None,
            timeout: None,
            cases_path: None,
        }
    }
}

impl AssistantConfig {
    /// Build from `CASE_COPILOT_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(env) = lookup("CASE_COPILOT_ENV") {
            config.environment =
                Environment::parse(&env).ok_or_else(|| ConfigError::InvalidValue {
                    key: "CASE_COPILOT_ENV".into(),
                    message: format!("expected development or deployed, got {env:?}"),
                })?;
        }

        if let Some(base) = lookup("CASE_COPILOT_BASE_URL") {
            let base = base.trim().trim_end_matches('/').to_string();
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(ConfigError::InvalidValue {
                    key: "CASE_COPILOT_BASE_URL".into(),
                    message: format!("expected an http(s) URL, got {base:?}"),
                });
            }
            config.base_url = base;
        }

        config.endpoint_override = lookup("CASE_COPILOT_ENDPOINT")
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        config.api_token = lookup("CASE_COPILOT_API_TOKEN")
            .filter(|s| !s.trim().is_empty())
            .map(SecretString::from);

        if let Some(secs) = lookup("CASE_COPILOT_TIMEOUT_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|_| ConfigError::InvalidValue {
                key: "CASE_COPILOT_TIMEOUT_SECS".into(),
                message: format!("expected a whole number of seconds, got {secs:?}"),
            })?;
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }

        config.cases_path = lookup("CASE_COPILOT_CASES")
            .filter(|s| !s.trim().is_empty())
            .map(PathBuf::from);

        Ok(config)
    }

    /// The URL queries are POSTed to.
    pub fn endpoint_url(&self) -> String {
        match &self.endpoint_override {
            Some(url) => url.clone(),
            None => format!("{}{}", self.base_url, self.environment.path()),
        }
    }
}
