use crate::core::checks;
use crate::domain::model::{CheckKind, CheckReport, SuiteReport};
use crate::domain::ports::{ConfigProvider, HttpProbe};
use crate::utils::error::{CheckError, Result};
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// The check that stopped a run, and why.
#[derive(Error, Debug)]
#[error("{error}")]
pub struct SuiteFailure {
    pub check: CheckKind,
    #[source]
    pub error: CheckError,
}

impl SuiteFailure {
    /// A failing check always exits 1, whatever the kind of error behind it.
    pub fn exit_code(&self) -> u8 {
        1
    }
}

/// Runs every check in order and stops at the first failure.
pub struct SuiteRunner<C: ConfigProvider> {
    probe: Arc<dyn HttpProbe>,
    config: C,
}

impl<C: ConfigProvider> SuiteRunner<C> {
    pub fn new(probe: Arc<dyn HttpProbe>, config: C) -> Self {
        Self { probe, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }

    pub async fn run(&self) -> std::result::Result<SuiteReport, SuiteFailure> {
        let delay = self.config.startup_delay();
        if !delay.is_zero() {
            tracing::info!("Waiting {:?} for the target to start", delay);
            tokio::time::sleep(delay).await;
        }

        let mut report = SuiteReport::default();

        for check in CheckKind::ALL {
            let started = Instant::now();
            tracing::debug!("Running {}", check);

            if let Err(error) = self.run_check(check).await {
                tracing::error!(
                    "❌ {} failed: {} (Category: {:?})",
                    check,
                    error,
                    error.category()
                );
                tracing::error!("💡 Suggestion: {}", error.recovery_suggestion());
                return Err(SuiteFailure { check, error });
            }

            let elapsed = started.elapsed();
            tracing::info!("✅ {} passed in {:?}", check, elapsed);
            println!("[OK] {}", check.success_message());
            report.checks.push(CheckReport { check, elapsed });
        }

        Ok(report)
    }

    pub async fn run_check(&self, check: CheckKind) -> Result<()> {
        match check {
            CheckKind::HtmlServer => {
                checks::test_html_server(
                    self.probe.as_ref(),
                    &self.config.content_url(),
                    self.config.marker(),
                )
                .await
            }
            CheckKind::ErrorServer => {
                checks::test_error_server(self.probe.as_ref(), &self.config.error_url()).await
            }
            CheckKind::RateLimit => {
                checks::test_rate_limit(
                    Arc::clone(&self.probe),
                    &self.config.content_url(),
                    self.config.burst_plan(),
                )
                .await
            }
        }
    }
}
