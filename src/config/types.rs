use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Configuration error in '{field_path}': {message}")]
pub struct ValidationError {
    /// JSON path to the field (e.g., "fragmentPattern")
    pub field_path: String,
    /// Human-readable description of the failed check.
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for `field_path`.
    #[must_use]
    pub fn new(field_path: impl Into<String>, message: impl Into<String>) -> Self {
        Self { field_path: field_path.into(), message: message.into() }
    }
}

/// Errors raised while loading or validating settings.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more settings failed validation.
    #[error("Configuration validation failed:\n{}", format_validation_errors(.0))]
    ValidationErrors(Vec<ValidationError>),

    /// The settings file could not be read.
    #[error("Failed to load configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// The settings file is not valid JSON.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Render validation errors as a numbered list.
fn format_validation_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .enumerate()
        .map(|(i, err)| format!("  {}. {} - {}", i + 1, err.field_path, err.message))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Settings controlling how fragments are parsed, merged, and reported.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MergeSettings {
    /// Separator used when rendering nested key paths in conflict reports.
    pub key_separator: String,

    /// Reject fragments whose top-level keys are not well-formed locale
    /// codes, instead of warning about them.
    pub strict_locales: bool,

    /// Glob selecting fragment files when merging a parts directory.
    pub fragment_pattern: String,

    pub indexing: IndexingConfig,
}

/// Parallelism settings for fragment reading.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct IndexingConfig {
    /// Concurrent fragment reads.
    /// Default: 80% of CPU cores (minimum 1).
    pub num_threads: Option<usize>,
}

impl IndexingConfig {
    /// Effective read concurrency.
    #[must_use]
    pub fn effective_threads(&self) -> usize {
        self.num_threads.unwrap_or_else(|| (num_cpus::get() * 4 / 5).max(1))
    }
}

impl MergeSettings {
    /// # Errors
    /// - Required field is empty
    /// - Invalid glob pattern
    pub fn validate(&self) -> Result<(), Vec<ValidationError>> {
        let mut errors = Vec::new();

        if self.key_separator.is_empty() {
            errors.push(ValidationError::new(
                "keySeparator",
                "The separator cannot be empty. Please specify a separator, for example: \".\" (dot)",
            ));
        }

        if self.fragment_pattern.is_empty() {
            errors.push(ValidationError::new(
                "fragmentPattern",
                "The pattern cannot be empty. Example: \"**/*.json\"",
            ));
        } else if let Err(e) = globset::Glob::new(&self.fragment_pattern) {
            errors.push(ValidationError::new(
                "fragmentPattern",
                format!("Invalid glob pattern '{}': {e}", self.fragment_pattern),
            ));
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

impl Default for MergeSettings {
    fn default() -> Self {
        Self {
            key_separator: ".".to_string(),
            strict_locales: false,
            fragment_pattern: "**/*.json".to_string(),
            indexing: IndexingConfig::default(),
        }
    }
}
