use std::path::PathBuf;

use serde::Deserialize;

use crate::utils::constants::DEFAULT_FRESHNESS_WINDOW_SECS;

/// ================================
/// Root of the YAML config file
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub auth: AuthConfig,
    #[serde(default)]
    pub settings: SettingsConfig,
}

/// ================================
/// Provider token identity and key
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    /// becomes `iss`
    pub team_id: String,
    /// becomes `kid`
    pub key_id: String,
    /// PKCS#8 private key, PEM (`.p8`) or DER
    pub key_path: PathBuf,
    /// invariant: 0 < freshness_window_seconds < 3600
    #[serde(default = "default_freshness_window_seconds")]
    pub freshness_window_seconds: u64,
}

/// ================================
/// Global service-wide settings
/// ================================
#[derive(Debug, Deserialize, Clone, Default)]
pub struct SettingsConfig {
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

/// Counters are always recorded in-process. `is_enabled` only controls
/// whether the CLI prints the registry to stderr after issuing a token.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct MetricsConfig {
    #[serde(default)]
    pub is_enabled: bool,
}

/// ================================
/// Logging
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String, // allowed: trace, debug, info, warn, error
    pub format: LogFormat,
}

impl LoggingConfig {
    pub fn new(level: String, format: LogFormat) -> Self {
        Self { level, format }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::new("info".to_owned(), LogFormat::Compact)
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Json,
    Compact,
}

fn default_freshness_window_seconds() -> u64 {
    DEFAULT_FRESHNESS_WINDOW_SECS
}
