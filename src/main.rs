use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use kudoctl::{
    cli::{Cli, Commands, LogFormat},
    config::{OperatorConfig, Settings},
    k8s::{KubeExecutor, KubeLocator},
    operator::run_operator,
};

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(cli.log_format)?;

    let Commands::Operator(args) = &cli.command;

    let config = match Settings::load().and_then(|settings| OperatorConfig::resolve(settings, args)) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Failed to load configuration");
            return Ok(ExitCode::FAILURE);
        }
    };
    tracing::debug!(?config, "Configuration loaded");

    match run_operator(&config, &KubeLocator, &KubeExecutor).await {
        Ok(outcome) => Ok(ExitCode::from(outcome.exit_code())),
        Err(e) => {
            tracing::error!(error = %e, "Operator command failed");
            Ok(ExitCode::FAILURE)
        }
    }
}

/// Logs go to stderr so relayed remote output owns stdout.
fn init_tracing(format: LogFormat) -> Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let registry = tracing_subscriber::registry().with(filter);

    match format {
        LogFormat::Text => registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .try_init()?,
    }

    Ok(())
}
