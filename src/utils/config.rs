use crate::config::chains::ChainConfig;
use crate::error::{ConfigError, Result};
use crate::utils::rpc::RetryPolicy;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_MARKETS_FILE: &str = "config/markets.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub rpc_url: String,
    pub network: String,
    pub markets_file: PathBuf,
    pub deployments_file: Option<PathBuf>,
    pub rate_model_names_file: Option<PathBuf>,
    pub retry: RetryPolicy,
}

fn validate_http_url(name: &str, raw: &str) -> std::result::Result<(), ConfigError> {
    let parsed = raw.parse::<reqwest::Url>().map_err(|e| {
        ConfigError::Invalid(format!("{name} must be a valid URL, got `{raw}`: {e}"))
    })?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(ConfigError::Invalid(format!(
            "{name} must use http(s) scheme, got `{other}`"
        ))),
    }
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn parse_or<T: std::str::FromStr>(
    name: &str,
    raw: Option<String>,
    default: T,
) -> std::result::Result<T, ConfigError> {
    match non_empty(raw) {
        None => Ok(default),
        Some(raw) => raw.parse::<T>().map_err(|_| {
            ConfigError::Invalid(format!("{name} must be an integer, got `{raw}`"))
        }),
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `load` reads the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let rpc_url = non_empty(lookup("RPC_URL"))
            .ok_or_else(|| ConfigError::Missing("RPC_URL must be set".to_string()))?;
        validate_http_url("RPC_URL", &rpc_url)?;

        let network = non_empty(lookup("NETWORK"))
            .ok_or_else(|| ConfigError::Missing("NETWORK must be set".to_string()))?;
        // Market tables are keyed by the canonical lowercase name.
        let network = ChainConfig::get(&network)?.network;

        let markets_file: PathBuf = non_empty(lookup("MARKETS_FILE"))
            .unwrap_or_else(|| DEFAULT_MARKETS_FILE.to_string())
            .into();
        let deployments_file = non_empty(lookup("DEPLOYMENTS_FILE")).map(PathBuf::from);
        let rate_model_names_file = non_empty(lookup("RATE_MODEL_NAMES_FILE")).map(PathBuf::from);

        let defaults = RetryPolicy::default();
        let timeout_ms = parse_or(
            "RPC_CALL_TIMEOUT_MS",
            lookup("RPC_CALL_TIMEOUT_MS"),
            defaults.timeout_ms,
        )?;
        let attempts = parse_or("RPC_RETRIES", lookup("RPC_RETRIES"), defaults.attempts)?;

        Ok(Self {
            rpc_url,
            network,
            markets_file,
            deployments_file,
            rate_model_names_file,
            retry: RetryPolicy::new(attempts, timeout_ms)?,
        })
    }
}
