//! Entry point for the translation fragment merger.

use std::process::ExitCode;

use clap::Parser;
use i18n_merge::cli::{
    self,
    CliArgs,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse();
    match cli::run(args).await {
        Ok(report) => {
            tracing::info!(
                fragments = report.fragments,
                locales = report.locales,
                keys = report.keys,
                conflicts = report.conflicts.len(),
                "Merge complete"
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}
