use crate::config::settings::Settings;
use crate::config::toml_config::TomlConfig;
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use clap::Parser;
use std::path::PathBuf;
use std::time::Duration;

/// Command line surface. Flags override the TOML file, which overrides the
/// built-in defaults.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "nginx-smoke")]
#[command(about = "Smoke tests an nginx deployment: content, error page and rate limiting")]
pub struct CliConfig {
    #[arg(long, help = "Target base URL, e.g. http://nginx")]
    pub host: Option<String>,

    #[arg(long, help = "Port serving static content")]
    pub content_port: Option<u16>,

    #[arg(long, help = "Port that always answers 500")]
    pub error_port: Option<u16>,

    #[arg(long, help = "Seconds to wait before the first check")]
    pub startup_delay_secs: Option<u64>,

    #[arg(long, help = "Substring the content page must contain")]
    pub marker: Option<String>,

    #[arg(long, help = "Concurrent requests fired at the content port")]
    pub burst_requests: Option<usize>,

    #[arg(long, help = "Upper bound on requests in flight")]
    pub burst_workers: Option<usize>,

    #[arg(long, help = "Per-request timeout in seconds (none by default)")]
    pub request_timeout_secs: Option<u64>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

impl CliConfig {
    /// Layers defaults, the optional file and the flags into validated settings.
    pub fn resolve(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(path) = &self.config {
            tracing::debug!("Loading configuration from {}", path.display());
            TomlConfig::from_file(path)?.apply_to(&mut settings);
        }

        self.apply_to(&mut settings);
        settings.validate()?;
        Ok(settings)
    }

    fn apply_to(&self, settings: &mut Settings) {
        if let Some(host) = &self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.content_port {
            settings.content_port = port;
        }
        if let Some(port) = self.error_port {
            settings.error_port = port;
        }
        if let Some(secs) = self.startup_delay_secs {
            settings.startup_delay = Duration::from_secs(secs);
        }
        if let Some(marker) = &self.marker {
            settings.marker = marker.clone();
        }
        if let Some(requests) = self.burst_requests {
            settings.burst.requests = requests;
        }
        if let Some(workers) = self.burst_workers {
            settings.burst.workers = workers;
        }
        if let Some(secs) = self.request_timeout_secs {
            settings.request_timeout = Some(Duration::from_secs(secs));
        }
    }
}
