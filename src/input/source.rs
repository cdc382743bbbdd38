//! Fragment file loading.

use std::collections::HashSet;
use std::path::{
    Path,
    PathBuf,
};

use jsonc_parser::ParseOptions;
use serde_json::{
    Map,
    Value,
};
use thiserror::Error;

use super::locale::{
    is_well_formed_locale,
    normalize_locale_code,
};

/// Errors raised while loading a single fragment file.
#[derive(Error, Debug)]
pub enum FragmentError {
    /// The fragment file could not be read.
    #[error("failed to read fragment '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The fragment content is not a well-formed locale-keyed document.
    #[error("failed to parse fragment '{}': {message}", .path.display())]
    Parse { path: PathBuf, message: String },
    /// A top-level key is not a locale code (strict mode only).
    #[error("fragment '{}' has a top-level key that is not a locale code: '{code}'", .path.display())]
    Locale { path: PathBuf, code: String },
}

/// One parsed translation fragment.
///
/// The top level maps locale codes to translation tables. Tables may nest;
/// their leaves are the translated values.
#[derive(Debug, Clone)]
pub struct Fragment {
    /// Path the fragment was read from.
    pub path: PathBuf,
    /// Locale code → translation table.
    pub locales: Map<String, Value>,
}

/// Read and parse one fragment file.
///
/// Comments and trailing commas are accepted; hand-maintained locale files
/// routinely carry both.
///
/// # Errors
/// - `FragmentError::Read` if the file cannot be read
/// - `FragmentError::Parse` if the content is not a locale-keyed JSON object
/// - `FragmentError::Locale` for an ill-formed locale key in strict mode
pub async fn load_fragment(path: &Path, strict_locales: bool) -> Result<Fragment, FragmentError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| FragmentError::Read { path: path.to_path_buf(), source })?;

    parse_fragment(path, &content, strict_locales)
}

/// Parse fragment text into a locale-keyed table.
fn parse_fragment(
    path: &Path,
    content: &str,
    strict_locales: bool,
) -> Result<Fragment, FragmentError> {
    let value = jsonc_parser::parse_to_serde_value(content, &ParseOptions::default())
        .map_err(|e| FragmentError::Parse { path: path.to_path_buf(), message: e.to_string() })?;

    let Some(Value::Object(locales)) = value else {
        return Err(FragmentError::Parse {
            path: path.to_path_buf(),
            message: "expected a top-level object keyed by locale".to_string(),
        });
    };

    check_locales(path, &locales, strict_locales)?;

    Ok(Fragment { path: path.to_path_buf(), locales })
}

/// Verify every locale maps to a table and looks like a locale code.
///
/// Ill-formed codes are warnings unless `strict_locales` is set. Codes that
/// collide after normalization ("en-US" and "en_US") are warned about, since
/// they merge as distinct locales.
fn check_locales(
    path: &Path,
    locales: &Map<String, Value>,
    strict_locales: bool,
) -> Result<(), FragmentError> {
    let mut normalized = HashSet::new();

    for (code, table) in locales {
        if !table.is_object() {
            return Err(FragmentError::Parse {
                path: path.to_path_buf(),
                message: format!("locale '{code}' does not map to a translation table"),
            });
        }

        if !is_well_formed_locale(code) {
            if strict_locales {
                return Err(FragmentError::Locale {
                    path: path.to_path_buf(),
                    code: code.clone(),
                });
            }
            tracing::warn!(
                fragment = %path.display(),
                code,
                "Top-level key does not look like a locale code"
            );
        }

        if !normalized.insert(normalize_locale_code(code)) {
            tracing::warn!(
                fragment = %path.display(),
                code,
                "Locale appears twice with different spellings, the tables will not merge"
            );
        }
    }

    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[googletest::test]
    fn test_parse_fragment_simple() {
        let content = r#"{"en": {"hello": "Hello"}, "fr": {"hello": "Bonjour"}}"#;

        let fragment = parse_fragment(Path::new("/a.json"), content, false).unwrap();

        expect_that!(fragment.locales.len(), eq(2));
        expect_that!(
            fragment.locales.get("en").and_then(|t| t.get("hello")),
            some(eq(&serde_json::json!("Hello")))
        );
        expect_that!(fragment.path, eq(Path::new("/a.json")));
    }

    #[googletest::test]
    fn test_parse_fragment_accepts_comments_and_trailing_commas() {
        let content = r#"{
  // base greetings
  "en": {
    "hello": "Hello",
  },
}"#;

        let fragment = parse_fragment(Path::new("/a.json"), content, false).unwrap();

        expect_that!(fragment.locales.len(), eq(1));
        expect_that!(
            fragment.locales.get("en").and_then(|t| t.get("hello")),
            some(eq(&serde_json::json!("Hello")))
        );
    }

    #[googletest::test]
    fn test_parse_fragment_rejects_malformed_json() {
        let content = r#"{"en": {"hello" "Hello"}}"#;

        let result = parse_fragment(Path::new("/a.json"), content, false);

        assert_that!(result, err(pat!(FragmentError::Parse { .. })));
    }

    #[rstest]
    #[case::top_level_array(r#"[{"en": {}}]"#)]
    #[case::top_level_string(r#""en""#)]
    #[case::empty_document("")]
    fn test_parse_fragment_rejects_non_object_top_level(#[case] content: &str) {
        let result = parse_fragment(Path::new("/a.json"), content, false);

        assert!(matches!(result, Err(FragmentError::Parse { .. })));
    }

    #[googletest::test]
    fn test_parse_fragment_rejects_scalar_locale_value() {
        let content = r#"{"en": "not a table"}"#;

        let result = parse_fragment(Path::new("/a.json"), content, false);

        assert_that!(
            result,
            err(pat!(FragmentError::Parse {
                message: contains_substring("does not map to a translation table"),
                ..
            }))
        );
    }

    #[googletest::test]
    fn test_parse_fragment_ill_formed_locale_warns_by_default() {
        let content = r#"{"english": {"hello": "Hello"}}"#;

        let result = parse_fragment(Path::new("/a.json"), content, false);

        assert_that!(result, ok(anything()));
    }

    #[googletest::test]
    fn test_parse_fragment_ill_formed_locale_fails_in_strict_mode() {
        let content = r#"{"english": {"hello": "Hello"}}"#;

        let result = parse_fragment(Path::new("/a.json"), content, true);

        assert_that!(result, err(pat!(FragmentError::Locale { code: eq("english"), .. })));
    }

    #[googletest::test]
    fn test_load_fragment_missing_file() {
        let result = tokio_test::block_on(load_fragment(
            Path::new("/definitely/not/here.json"),
            false,
        ));

        assert_that!(result, err(pat!(FragmentError::Read { .. })));
    }
}
