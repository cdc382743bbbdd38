//! Fragment discovery for parts directories.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;
use thiserror::Error;

/// Errors raised while scanning a parts directory.
#[derive(Error, Debug)]
pub enum DiscoverError {
    /// The configured fragment glob does not compile.
    #[error("invalid fragment pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// Find fragment files under `parts_dir` matching `pattern`.
///
/// Results are sorted by path so the merge order, and therefore
/// last-write-wins, does not depend on directory iteration order.
///
/// # Errors
/// Returns `DiscoverError::Pattern` if `pattern` is not a valid glob.
pub fn find_fragments(parts_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoverError> {
    let matcher = build_matcher(pattern)?;

    let mut found = Vec::new();
    for result in WalkBuilder::new(parts_dir)
        .hidden(false)
        .git_ignore(true)
        .git_global(true)
        .git_exclude(true)
        .follow_links(false)
        .build()
    {
        let entry = match result {
            Ok(entry) => entry,
            Err(err) => {
                tracing::debug!(?err, "Failed to read directory entry");
                continue;
            }
        };

        if !entry.file_type().is_some_and(|ft| ft.is_file()) {
            continue;
        }

        let path = entry.path();
        let Ok(relative_path) = path.strip_prefix(parts_dir) else {
            continue;
        };
        if !matcher.is_match(relative_path) {
            continue;
        }

        found.push(path.to_path_buf());
    }

    found.sort();
    tracing::debug!(parts_dir = %parts_dir.display(), count = found.len(), "Discovered fragments");

    Ok(found)
}

/// Compile the fragment glob into a matcher.
fn build_matcher(pattern: &str) -> Result<GlobSet, DiscoverError> {
    let glob = Glob::new(pattern).map_err(|e| DiscoverError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let mut builder = GlobSetBuilder::new();
    builder.add(glob);
    builder.build().map_err(|e| DiscoverError::Pattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })
}
