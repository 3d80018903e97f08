use crate::domain::model::BurstPlan;
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_host, validate_non_empty_string, validate_port, validate_range, Validate,
};
use std::time::Duration;
use tokio::sync::Semaphore;

pub const DEFAULT_HOST: &str = "http://nginx";
pub const DEFAULT_CONTENT_PORT: u16 = 8080;
pub const DEFAULT_ERROR_PORT: u16 = 8081;
pub const DEFAULT_STARTUP_DELAY_SECS: u64 = 3;
pub const DEFAULT_MARKER: &str = "Nginx is running";
/// Upper bound on a burst; each request is its own task and connection.
pub const MAX_BURST_REQUESTS: usize = 10_000;

/// Fully resolved runner configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub host: String,
    pub content_port: u16,
    pub error_port: u16,
    pub startup_delay: Duration,
    pub marker: String,
    pub burst: BurstPlan,
    pub request_timeout: Option<Duration>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            content_port: DEFAULT_CONTENT_PORT,
            error_port: DEFAULT_ERROR_PORT,
            startup_delay: Duration::from_secs(DEFAULT_STARTUP_DELAY_SECS),
            marker: DEFAULT_MARKER.to_string(),
            burst: BurstPlan::default(),
            request_timeout: None,
        }
    }
}

impl ConfigProvider for Settings {
    fn host(&self) -> &str {
        &self.host
    }

    fn content_port(&self) -> u16 {
        self.content_port
    }

    fn error_port(&self) -> u16 {
        self.error_port
    }

    fn startup_delay(&self) -> Duration {
        self.startup_delay
    }

    fn marker(&self) -> &str {
        &self.marker
    }

    fn burst_plan(&self) -> BurstPlan {
        self.burst
    }

    fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_host("host", &self.host)?;
        validate_port("content_port", self.content_port)?;
        validate_port("error_port", self.error_port)?;
        validate_non_empty_string("marker", &self.marker)?;
        validate_range("rate_limit.requests", self.burst.requests, 1, MAX_BURST_REQUESTS)?;
        validate_range(
            "rate_limit.workers",
            self.burst.workers,
            1,
            Semaphore::MAX_PERMITS,
        )?;
        validate_range("rate_limit.limit_status", self.burst.limit_status, 100, 599)?;

        if let Some(timeout) = self.request_timeout {
            validate_range("request_timeout_secs", timeout.as_secs(), 1, u64::MAX)?;
        }

        Ok(())
    }
}
