//! Command-line surface and top-level wiring.

use std::path::PathBuf;

use clap::Parser;
use thiserror::Error;

use crate::config::{
    self,
    ConfigError,
};
use crate::discover::{
    self,
    DiscoverError,
};
use crate::merge::{
    self,
    MergeError,
    MergeReport,
};

/// Merge translation fragment files into one consolidated document.
#[derive(Debug, Parser)]
#[command(name = "i18n-merge", version, about)]
pub struct CliArgs {
    /// Fragment files, merged in the order given. Later fragments win
    /// conflicts.
    #[arg(required_unless_present = "parts_dir", conflicts_with = "parts_dir")]
    pub fragments: Vec<PathBuf>,

    /// Path of the consolidated output document.
    #[arg(short, long)]
    pub output: PathBuf,

    /// Discover fragments under this directory instead of listing them.
    /// Matching files are merged in lexicographic path order.
    #[arg(long)]
    pub parts_dir: Option<PathBuf>,

    /// Settings file to use instead of `./.i18n-merge.json`.
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Errors surfaced at the CLI entry point.
#[derive(Error, Debug)]
pub enum CliError {
    /// Settings could not be loaded or validated.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// Fragment discovery failed.
    #[error(transparent)]
    Discover(#[from] DiscoverError),
    /// The merge itself failed.
    #[error(transparent)]
    Merge(#[from] MergeError),
}

/// Resolve settings and the fragment order, then run the merge pipeline.
///
/// # Errors
/// Returns an error if settings loading, fragment discovery, or the merge
/// fails.
pub async fn run(args: CliArgs) -> Result<MergeReport, CliError> {
    let settings = config::load_settings(args.config.as_deref())?;

    let fragments = match &args.parts_dir {
        Some(dir) => discover::find_fragments(dir, &settings.fragment_pattern)?,
        None => args.fragments,
    };

    let report = merge::merge_files(&fragments, &args.output, &settings).await?;
    Ok(report)
}
