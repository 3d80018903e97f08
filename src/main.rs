use anyhow::Context;
use clap::Parser;
use nginx_smoke::core::ConfigProvider;
use nginx_smoke::utils::logger;
use nginx_smoke::{CheckError, CliConfig, ReqwestProbe, SuiteRunner};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose, cli.json_logs);
    tracing::info!("Starting nginx-smoke");

    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            // errors reaching here happened before any check ran
            let check_error = e.downcast_ref::<CheckError>();
            tracing::error!("❌ {:#}", e);
            if let Some(err) = check_error {
                tracing::error!("💡 Suggestion: {}", err.recovery_suggestion());
            }
            eprintln!("❌ {:#}", e);
            ExitCode::from(check_error.map_or(2, CheckError::exit_code))
        }
    }
}

async fn run(cli: CliConfig) -> anyhow::Result<ExitCode> {
    let settings = cli
        .resolve()
        .context("Configuration validation failed")?;
    tracing::debug!("Resolved settings: {:?}", settings);

    let probe = ReqwestProbe::with_timeout(settings.request_timeout())
        .context("Failed to prepare the HTTP client")?;

    tracing::info!(
        "🎯 Target: content {} / error {}",
        settings.content_url(),
        settings.error_url()
    );

    let runner = SuiteRunner::new(Arc::new(probe), settings);

    match runner.run().await {
        Ok(report) => {
            tracing::info!(
                "{} checks passed in {:?}",
                report.checks.len(),
                report.total_elapsed()
            );
            println!("\nAll tests passed ✔");
            Ok(ExitCode::SUCCESS)
        }
        Err(failure) => {
            println!("[FAIL] {}", failure);
            Ok(ExitCode::from(failure.exit_code()))
        }
    }
}
