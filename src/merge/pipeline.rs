//! The merge pipeline: parallel reads, ordered fold, atomic write.

use std::path::{
    Path,
    PathBuf,
};

use futures::{
    StreamExt,
    TryStreamExt,
};
use thiserror::Error;

use crate::config::MergeSettings;
use crate::input::{
    self,
    Fragment,
    FragmentError,
};

use super::fold::{
    Conflict,
    ConsolidatedTable,
};
use super::output;

/// Summary of a completed merge.
#[derive(Debug)]
pub struct MergeReport {
    /// Number of fragments folded.
    pub fragments: usize,
    /// Number of locales in the output.
    pub locales: usize,
    /// Number of leaf keys in the output.
    pub keys: usize,
    /// Conflicts resolved by last-write-wins.
    pub conflicts: Vec<Conflict>,
}

/// Fatal merge failures.
#[derive(Error, Debug)]
pub enum MergeError {
    /// No fragment paths were supplied or discovered.
    #[error("no fragment files to merge")]
    NoFragments,
    /// The output path is also listed as a fragment.
    #[error("output path '{}' is also a merge input", .path.display())]
    OutputIsInput { path: PathBuf },
    /// A fragment failed to load.
    #[error(transparent)]
    Fragment(#[from] FragmentError),
    /// The consolidated document could not be written.
    #[error("failed to write output '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Merge `fragment_paths` in order into `output_path`.
///
/// Fragments are read concurrently but folded strictly in the given order,
/// so the last-write-wins result is reproducible. Conflicts are logged as
/// warnings and returned in the report; they never abort the merge.
///
/// # Errors
/// See [`MergeError`]. No partial output is committed on failure.
pub async fn merge_files(
    fragment_paths: &[PathBuf],
    output_path: &Path,
    settings: &MergeSettings,
) -> Result<MergeReport, MergeError> {
    if fragment_paths.is_empty() {
        return Err(MergeError::NoFragments);
    }
    if fragment_paths.iter().any(|p| p == output_path) {
        return Err(MergeError::OutputIsInput { path: output_path.to_path_buf() });
    }

    let concurrency = settings.indexing.effective_threads();
    tracing::debug!(fragments = fragment_paths.len(), concurrency, "Loading fragments");

    let fragments: Vec<Fragment> = futures::stream::iter(
        fragment_paths.iter().map(|path| input::load_fragment(path, settings.strict_locales)),
    )
    .buffered(concurrency)
    .try_collect()
    .await?;

    let mut table = ConsolidatedTable::new(settings.key_separator.clone());
    let mut conflicts = Vec::new();
    for fragment in &fragments {
        conflicts.extend(table.fold_fragment(fragment));
    }

    for conflict in &conflicts {
        tracing::warn!(
            locale = %conflict.locale,
            key = %conflict.key,
            earlier = %conflict.earlier.display(),
            later = %conflict.later.display(),
            "Conflicting values, keeping the later fragment's"
        );
    }

    let report = MergeReport {
        fragments: fragments.len(),
        locales: table.locale_count(),
        keys: table.key_count(),
        conflicts,
    };

    let document = table.into_document();
    output::write_document(&document, output_path)
        .map_err(|source| MergeError::Write { path: output_path.to_path_buf(), source })?;

    tracing::debug!(output = %output_path.display(), "Wrote consolidated document");

    Ok(report)
}
