use crate::error::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section is optional in the file; omitted sections fall back to
/// their `Default` implementations.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: Server,
    #[serde(default)]
    pub auth: Auth,
    #[serde(default)]
    pub analysis: Analysis,
    #[serde(default)]
    pub seed: Seed,
    #[serde(default)]
    pub logging: Logging,
}

/// Where the HTTP server listens.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub host: IpAddr,
    pub port: u16,
}

/// Bearer tokens accepted by the API. An empty list disables authentication.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Auth {
    pub tokens: Vec<String>,
}

/// Defaults applied by the query layer.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Analysis {
    /// Moving average window used when a trend request omits `window`.
    pub default_window: usize,
    /// Decimal places kept in every numeric response field.
    pub display_precision: u32,
}

/// Synthetic datasets registered at startup.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Seed {
    pub enabled: bool,
    pub seed: u64,
    pub days: u32,
    pub start_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Logging {
    /// An `EnvFilter` directive such as `info` or `web_server=debug,info`.
    /// `RUST_LOG` takes precedence when set.
    pub level: String,
    /// When set, logs are also written to a daily rolling file in this directory.
    pub directory: Option<PathBuf>,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3000,
        }
    }
}

impl Default for Analysis {
    fn default() -> Self {
        Self {
            default_window: 7,
            display_precision: 6,
        }
    }
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            enabled: true,
            seed: 42,
            days: 365,
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default(),
        }
    }
}

impl Default for Logging {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            directory: None,
        }
    }
}

impl Server {
    pub fn addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

impl Config {
    /// Checks the invariants the rest of the application relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.default_window == 0 {
            return Err(ConfigError::ValidationError(
                "analysis.default_window must be at least 1".to_string(),
            ));
        }
        if self.analysis.display_precision > 15 {
            return Err(ConfigError::ValidationError(format!(
                "analysis.display_precision must be at most 15, got {}",
                self.analysis.display_precision
            )));
        }
        if self.seed.enabled && self.seed.days == 0 {
            return Err(ConfigError::ValidationError(
                "seed.days must be at least 1 when seeding is enabled".to_string(),
            ));
        }
        if self.auth.tokens.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "auth.tokens must not contain blank tokens".to_string(),
            ));
        }
        Ok(())
    }
}
