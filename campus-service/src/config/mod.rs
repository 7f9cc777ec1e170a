use secrecy::Secret;
use service_core::config::{self as core_config, get_env, get_optional_env, parse_env, Environment};
use service_core::error::AppError;

use crate::services::providers::openai::OpenAiConfig;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-3.5-turbo-instruct";
const DEFAULT_TEMPERATURE: f32 = 0.5;
const DEFAULT_MAX_TOKENS: u32 = 256;
const DEFAULT_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Clone)]
pub struct CampusConfig {
    pub common: core_config::Config,
    pub environment: Environment,
    pub log_level: String,
    pub otlp_endpoint: Option<String>,
    pub provider: ProviderKind,
    /// Sampling temperature sent with every completion.
    pub temperature: f32,
    pub openai: OpenAiConfig,
}

/// Which completion backend serves requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    OpenAi,
    Mock,
}

impl std::str::FromStr for ProviderKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "mock" => Ok(ProviderKind::Mock),
            other => Err(AppError::ConfigError(anyhow::anyhow!(
                "Unknown completion provider '{}', expected 'openai' or 'mock'",
                other
            ))),
        }
    }
}

impl CampusConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let environment = Environment::from_env()?;
        let is_prod = environment.is_prod();

        // The key is optional even in production: without it every completion
        // call fails, but the service still starts.
        let api_key = get_optional_env("OPENAI_API_KEY").map(Secret::new);

        Ok(CampusConfig {
            common: common_config,
            environment,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            otlp_endpoint: get_optional_env("OTLP_ENDPOINT"),
            provider: get_env("COMPLETION_PROVIDER", Some("openai"), is_prod)?.parse()?,
            temperature: parse_env("OPENAI_TEMPERATURE", DEFAULT_TEMPERATURE, is_prod)?,
            openai: OpenAiConfig {
                api_key,
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), is_prod)?,
                model: get_env("OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), is_prod)?,
                max_tokens: parse_env("OPENAI_MAX_TOKENS", DEFAULT_MAX_TOKENS, is_prod)?,
                timeout_secs: parse_env("OPENAI_TIMEOUT_SECS", DEFAULT_TIMEOUT_SECS, is_prod)?,
            },
        })
    }

    /// Configuration for tests and local runs: mock provider, ephemeral port.
    pub fn for_tests() -> Self {
        CampusConfig {
            common: core_config::Config { port: 0 },
            environment: Environment::Dev,
            log_level: "error".to_string(),
            otlp_endpoint: None,
            provider: ProviderKind::Mock,
            temperature: DEFAULT_TEMPERATURE,
            openai: OpenAiConfig {
                api_key: None,
                base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
                model: DEFAULT_OPENAI_MODEL.to_string(),
                max_tokens: DEFAULT_MAX_TOKENS,
                timeout_secs: DEFAULT_TIMEOUT_SECS,
            },
        }
    }
}
