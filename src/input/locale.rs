//! Locale code heuristics.
//!
//! Fragment documents key their top level by locale. Codes are checked
//! structurally against RFC 5646 shape rather than a fixed list, so region
//! and script variants (e.g. "pt-BR", "zh-Hant-TW") pass without
//! enumeration.

/// Normalize a locale code (lowercase and replace - with _).
#[must_use]
pub fn normalize_locale_code(code: &str) -> String {
    code.to_lowercase().replace('-', "_")
}

/// Check whether `code` has the shape of an RFC 5646 language tag.
///
/// Accepted subtags, separated by `-` or `_`:
/// - primary language: 2-3 ASCII letters
/// - optional script: 4 ASCII letters
/// - optional region: 2 ASCII letters or 3 ASCII digits
///
/// # Examples
/// - `en`, `en-US`, `en_US` → well-formed
/// - `zh-Hant-TW`, `es-419` → well-formed
/// - `english`, `e`, `en-` → not well-formed
#[must_use]
pub fn is_well_formed_locale(code: &str) -> bool {
    let mut subtags = code.split(['-', '_']);

    let Some(primary) = subtags.next() else {
        return false;
    };
    if !(2..=3).contains(&primary.len()) || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }

    let mut saw_script = false;
    let mut saw_region = false;
    for subtag in subtags {
        if is_script_subtag(subtag) && !saw_script && !saw_region {
            saw_script = true;
        } else if is_region_subtag(subtag) && !saw_region {
            saw_region = true;
        } else {
            return false;
        }
    }

    true
}

/// Script subtag: 4 letters (e.g. "Hant").
fn is_script_subtag(subtag: &str) -> bool {
    subtag.len() == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic())
}

/// Region subtag: 2 letters or 3 digits (e.g. "US", "419").
fn is_region_subtag(subtag: &str) -> bool {
    (subtag.len() == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
        || (subtag.len() == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
}
