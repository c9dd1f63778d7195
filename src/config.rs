use std::net::IpAddr;
use std::time::Duration;

use thiserror::Error;

use crate::models::{ChangeBaseline, SignalStrategy};

pub const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com";
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Yahoo,
    Mock,
}

/// Outbound price API settings.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub base_url: String,
    pub user_agent: String,
    /// No timeout unless one is configured.
    pub timeout: Option<Duration>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

/// Defaults applied to every analysis request.
#[derive(Debug, Clone)]
pub struct AnalysisConfig {
    pub history_days: u32,
    pub strategy: SignalStrategy,
    pub baseline: ChangeBaseline,
    /// Series shorter than this are rejected. 0 accepts any non-empty series.
    pub min_history: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            history_days: 365,
            strategy: SignalStrategy::default(),
            baseline: ChangeBaseline::default(),
            min_history: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    pub provider: ProviderKind,
    pub upstream: UpstreamConfig,
    pub analysis: AnalysisConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr = parse_or(get("BIND_ADDR"), "BIND_ADDR", IpAddr::from([0, 0, 0, 0]))?;
        let port = parse_or(get("PORT"), "PORT", 3001_u16)?;

        let provider = match get("PRICE_PROVIDER")
            .unwrap_or_else(|| "yahoo".to_string())
            .to_lowercase()
            .as_str()
        {
            "yahoo" => ProviderKind::Yahoo,
            "mock" => ProviderKind::Mock,
            other => {
                return Err(ConfigError::Invalid {
                    key: "PRICE_PROVIDER",
                    message: format!("{}. Must be 'yahoo' or 'mock'", other),
                })
            }
        };

        let timeout = match get("PRICE_API_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = parse_or(Some(raw), "PRICE_API_TIMEOUT_SECS", 0)?;
                (secs > 0).then(|| Duration::from_secs(secs))
            }
            None => None,
        };

        let upstream = UpstreamConfig {
            base_url: get("PRICE_API_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: get("PRICE_API_USER_AGENT").unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            timeout,
        };
        url::Url::parse(&upstream.base_url).map_err(|e| ConfigError::Invalid {
            key: "PRICE_API_BASE_URL",
            message: e.to_string(),
        })?;

        let history_days = parse_or(get("HISTORY_DAYS"), "HISTORY_DAYS", 365_u32)?;
        if history_days == 0 {
            return Err(ConfigError::Invalid {
                key: "HISTORY_DAYS",
                message: "must be positive".to_string(),
            });
        }

        let analysis = AnalysisConfig {
            history_days,
            strategy: parse_or(get("SIGNAL_STRATEGY"), "SIGNAL_STRATEGY", SignalStrategy::default())?,
            baseline: parse_or(get("CHANGE_BASELINE"), "CHANGE_BASELINE", ChangeBaseline::default())?,
            min_history: parse_or(get("MIN_HISTORY"), "MIN_HISTORY", 0_usize)?,
        };

        Ok(Self {
            bind_addr,
            port,
            provider,
            upstream,
            analysis,
        })
    }
}

fn parse_or<T>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            message: e.to_string(),
        }),
        None => Ok(default),
    }
}
