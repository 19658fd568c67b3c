use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config_env::{
    optional_trimmed_env, parse_bool_env, parse_optional_u64_env, parse_u32_env,
    require_non_empty_env,
};
use crate::llm::prompts::{
    DEFAULT_CHAT_MODEL, DEFAULT_IMAGE_MODEL, DEFAULT_PLAN_MODEL, DEFAULT_SEARCH_MODEL,
    MAX_THINKING_BUDGET,
};

pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required env var {0}")]
    MissingVar(String),
    #[error("invalid integer in env var {key}: {value}")]
    ParseInt { key: String, value: String },
    #[error("invalid boolean in env var {0}")]
    ParseBool(String),
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed to build gemini http client: {0}")]
    HttpClient(String),
    #[error("failed to load .env file: {0}")]
    Dotenv(String),
}

/// Loads `.env` from the working directory. A missing file is fine; a file
/// that cannot be read or parsed is an error.
pub fn load_dotenv() -> Result<(), ConfigError> {
    dotenv_outcome(dotenvy::dotenv().map(|_| ()))
}

fn dotenv_outcome(result: Result<(), dotenvy::Error>) -> Result<(), ConfigError> {
    match result {
        Ok(()) => Ok(()),
        Err(err) if err.not_found() => Ok(()),
        Err(err) => Err(ConfigError::Dotenv(err.to_string())),
    }
}

/// Connection settings for the hosted generative-language API.
#[derive(Debug, Clone)]
pub struct GeminiGatewayConfig {
    pub api_base_url: String,
    pub api_key: String,
    /// Calls run to completion unless `GEMINI_TIMEOUT_MS` sets a limit.
    pub timeout_ms: Option<u64>,
}

impl GeminiGatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let api_key = require_non_empty_env("GEMINI_API_KEY")
            .or_else(|_| require_non_empty_env("API_KEY"))
            .map_err(|_| ConfigError::MissingVar("GEMINI_API_KEY".to_string()))?;
        let api_base_url = optional_trimmed_env("GEMINI_API_BASE_URL")
            .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string());
        validate_base_url(&api_base_url)?;

        Ok(Self {
            api_base_url: api_base_url.trim_end_matches('/').to_string(),
            api_key,
            timeout_ms: parse_optional_u64_env("GEMINI_TIMEOUT_MS")?,
        })
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }
}

/// Model selectors per operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRoutes {
    pub chat: String,
    pub plan: String,
    pub search: String,
    pub image_edit: String,
}

impl Default for ModelRoutes {
    fn default() -> Self {
        Self {
            chat: DEFAULT_CHAT_MODEL.to_string(),
            plan: DEFAULT_PLAN_MODEL.to_string(),
            search: DEFAULT_SEARCH_MODEL.to_string(),
            image_edit: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LearnlyConfig {
    pub gateway: GeminiGatewayConfig,
    pub models: ModelRoutes,
    pub thinking_budget: u32,
    pub include_greeting_in_history: bool,
}

impl LearnlyConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = ModelRoutes::default();
        let thinking_budget = parse_u32_env("LEARNLY_THINKING_BUDGET", MAX_THINKING_BUDGET)?;
        if thinking_budget == 0 {
            return Err(ConfigError::InvalidConfiguration(
                "LEARNLY_THINKING_BUDGET must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            gateway: GeminiGatewayConfig::from_env()?,
            models: ModelRoutes {
                chat: optional_trimmed_env("LEARNLY_CHAT_MODEL").unwrap_or(defaults.chat),
                plan: optional_trimmed_env("LEARNLY_PLAN_MODEL").unwrap_or(defaults.plan),
                search: optional_trimmed_env("LEARNLY_SEARCH_MODEL").unwrap_or(defaults.search),
                image_edit: optional_trimmed_env("LEARNLY_IMAGE_MODEL")
                    .unwrap_or(defaults.image_edit),
            },
            thinking_budget,
            include_greeting_in_history: parse_bool_env("LEARNLY_INCLUDE_GREETING", true)?,
        })
    }
}

fn validate_base_url(raw: &str) -> Result<(), ConfigError> {
    let parsed = Url::parse(raw).map_err(|err| {
        ConfigError::InvalidConfiguration(format!("GEMINI_API_BASE_URL is not a valid url: {err}"))
    })?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(ConfigError::InvalidConfiguration(
            "GEMINI_API_BASE_URL must start with http:// or https://".to_string(),
        ));
    }
    Ok(())
}
