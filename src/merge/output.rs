//! Deterministic serialization and atomic output writing.

use std::io::Write;
use std::path::Path;

use serde_json::Value;
use tempfile::NamedTempFile;

/// Serialize `document` and atomically replace `output_path`.
///
/// The document is rendered with sorted object keys (the natural order of
/// `serde_json` maps), two-space indentation, and a trailing newline, so
/// the same document always produces the same bytes. It is written to a
/// temporary file in the output's directory and renamed over the target;
/// a failed run never leaves partial output behind.
///
/// # Errors
/// Returns the underlying IO error if the temporary file cannot be
/// created, written, or persisted.
pub(super) fn write_document(document: &Value, output_path: &Path) -> std::io::Result<()> {
    let dir = output_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));

    let rendered = render_document(document)?;

    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(rendered.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(output_path).map_err(|e| e.error)?;

    Ok(())
}

/// Render the document as pretty JSON with a trailing newline.
fn render_document(document: &Value) -> std::io::Result<String> {
    let mut rendered = serde_json::to_string_pretty(document).map_err(std::io::Error::other)?;
    rendered.push('\n');
    Ok(rendered)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::expect_used, clippy::panic)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[googletest::test]
    fn test_write_document_creates_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("merged.json");

        write_document(&json!({"en": {"hello": "Hello"}}), &output).unwrap();

        let written: Value =
            serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
        expect_that!(written, eq(&json!({"en": {"hello": "Hello"}})));
    }

    #[googletest::test]
    fn test_write_document_replaces_existing_output() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("merged.json");
        std::fs::write(&output, "stale").unwrap();

        write_document(&json!({"en": {}}), &output).unwrap();

        let content = std::fs::read_to_string(&output).unwrap();
        expect_that!(content, not(contains_substring("stale")));
    }

    #[googletest::test]
    fn test_write_document_leaves_no_temp_files_behind() {
        let temp_dir = TempDir::new().unwrap();
        let output = temp_dir.path().join("merged.json");

        write_document(&json!({"en": {}}), &output).unwrap();

        let entries: Vec<_> = std::fs::read_dir(temp_dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name())
            .collect();
        expect_that!(entries, elements_are![eq("merged.json")]);
    }

    #[rstest]
    fn test_render_document_is_deterministic_and_newline_terminated() {
        let document = json!({"fr": {"b": "2", "a": "1"}, "en": {"z": "26"}});

        let first = render_document(&document).unwrap();
        let second = render_document(&document).unwrap();

        assert_eq!(first, second);
        assert!(first.ends_with('\n'));
        // Object keys render in sorted order.
        let a = first.find("\"a\"").unwrap();
        let b = first.find("\"b\"").unwrap();
        let en = first.find("\"en\"").unwrap();
        let fr = first.find("\"fr\"").unwrap();
        assert!(en < fr);
        assert!(a < b);
    }
}
