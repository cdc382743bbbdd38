//! Settings file loading.

use std::path::Path;

use super::{
    ConfigError,
    MergeSettings,
};

/// Settings file name looked up in the working directory.
const SETTINGS_FILE_NAME: &str = ".i18n-merge.json";

/// Load and validate settings.
///
/// An explicit path must exist and parse; without one, `./.i18n-merge.json`
/// is used when present and defaults apply otherwise.
///
/// # Errors
/// - File read error
/// - JSON parse error
/// - Settings validation error
pub fn load_settings(explicit_path: Option<&Path>) -> Result<MergeSettings, ConfigError> {
    let settings = match explicit_path {
        Some(path) => Some(read_settings_file(path)?),
        None => load_from_dir(Path::new("."))?,
    }
    .unwrap_or_default();

    settings.validate().map_err(ConfigError::ValidationErrors)?;

    Ok(settings)
}

/// Load settings from a directory's `.i18n-merge.json`.
///
/// # Returns
/// - `Ok(Some(settings))`: the file exists and parsed
/// - `Ok(None)`: no settings file in `dir`
/// - `Err(ConfigError)`: read or parse error
fn load_from_dir(dir: &Path) -> Result<Option<MergeSettings>, ConfigError> {
    let settings_path = dir.join(SETTINGS_FILE_NAME);

    if !settings_path.exists() {
        tracing::debug!("Settings file not found: {:?}", settings_path);
        return Ok(None);
    }

    Ok(Some(read_settings_file(&settings_path)?))
}

/// Read and parse one settings file.
fn read_settings_file(path: &Path) -> Result<MergeSettings, ConfigError> {
    tracing::debug!("Loading settings from: {:?}", path);

    let content = std::fs::read_to_string(path)?;
    let settings: MergeSettings = serde_json::from_str(&content)?;

    Ok(settings)
}
