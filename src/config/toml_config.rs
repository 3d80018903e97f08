use crate::config::settings::Settings;
use crate::utils::error::{CheckError, Result};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// File form of the runner configuration. Every key is optional; missing keys
/// keep whatever the caller already resolved.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    pub target: Option<TargetConfig>,
    pub content: Option<ContentConfig>,
    pub rate_limit: Option<RateLimitConfig>,
    pub runner: Option<RunnerConfig>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub host: Option<String>,
    pub content_port: Option<u16>,
    pub error_port: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentConfig {
    pub marker: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RateLimitConfig {
    pub requests: Option<usize>,
    pub workers: Option<usize>,
    pub limit_status: Option<u16>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunnerConfig {
    pub startup_delay_secs: Option<u64>,
    pub request_timeout_secs: Option<u64>,
}

impl TomlConfig {
    /// Reads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(CheckError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Parses TOML text after `${VAR}` substitution.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| CheckError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expands `${VAR}` from the environment; unset variables are kept as written.
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| CheckError::ConfigError {
            message: format!("Invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// Overlays the keys present in the file onto `settings`.
    pub fn apply_to(&self, settings: &mut Settings) {
        if let Some(target) = &self.target {
            if let Some(host) = &target.host {
                settings.host = host.clone();
            }
            if let Some(port) = target.content_port {
                settings.content_port = port;
            }
            if let Some(port) = target.error_port {
                settings.error_port = port;
            }
        }

        if let Some(marker) = self.content.as_ref().and_then(|c| c.marker.as_ref()) {
            settings.marker = marker.clone();
        }

        if let Some(rate_limit) = &self.rate_limit {
            if let Some(requests) = rate_limit.requests {
                settings.burst.requests = requests;
            }
            if let Some(workers) = rate_limit.workers {
                settings.burst.workers = workers;
            }
            if let Some(status) = rate_limit.limit_status {
                settings.burst.limit_status = status;
            }
        }

        if let Some(runner) = &self.runner {
            if let Some(secs) = runner.startup_delay_secs {
                settings.startup_delay = Duration::from_secs(secs);
            }
            if let Some(secs) = runner.request_timeout_secs {
                settings.request_timeout = Some(Duration::from_secs(secs));
            }
        }
    }
}
