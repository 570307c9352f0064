use std::path::Path;

use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::settings::ServiceConfig;
use crate::utils::constants::TOKEN_HARD_EXPIRY_SECS;

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| anyhow!("cannot read config '{}': {}", path.display(), e))?;
    parse_config(&expand_env_vars(&content))
}

pub fn parse_config(content: &str) -> Result<ServiceConfig> {
    let service_config: ServiceConfig = serde_yaml::from_str(content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    debug!("validation config ...");
    validate_service_config(&service_config).map_err(|errors| anyhow!(errors.join("; ")))?;
    Ok(service_config)
}

/// Returns Ok(()) or every problem found, not just the first.
pub fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();
    let auth = &cfg.auth;

    if auth.team_id.trim().is_empty() {
        errors.push("auth.team_id must not be empty".to_string());
    }
    if auth.key_id.trim().is_empty() {
        errors.push("auth.key_id must not be empty".to_string());
    }
    if auth.key_path.as_os_str().is_empty() {
        errors.push("auth.key_path must not be empty".to_string());
    }
    if auth.freshness_window_seconds == 0 {
        errors.push("auth.freshness_window_seconds must be > 0".to_string());
    } else if auth.freshness_window_seconds >= TOKEN_HARD_EXPIRY_SECS {
        errors.push(format!(
            "auth.freshness_window_seconds ({}) must be below the token hard expiry ({}s)",
            auth.freshness_window_seconds, TOKEN_HARD_EXPIRY_SECS
        ));
    }

    if let Some(logging) = &cfg.settings.logging {
        let allowed = ["trace", "debug", "info", "warn", "error"];
        if !allowed.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' is not one of {:?}",
                logging.level, allowed
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        for e in &errors {
            error!("config: {}", e);
        }
        Err(errors)
    }
}

/// Replace `${VAR}` and `${VAR:default}` with environment values.
pub fn expand_env_vars(input: &str) -> String {
    let Ok(re) = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}") else {
        return input.to_owned();
    };
    re.replace_all(input, |caps: &regex::Captures| {
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(&caps[1]).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
