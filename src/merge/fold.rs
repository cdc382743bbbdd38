//! Folding fragments into a consolidated table.

use std::collections::HashMap;
use std::path::{
    Path,
    PathBuf,
};

use serde_json::{
    Map,
    Value,
};

use crate::input::Fragment;

/// Two fragments wrote different values to the same leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Locale the conflicting key belongs to.
    pub locale: String,
    /// Key path of the overwritten leaf (nested keys joined by the
    /// configured separator).
    pub key: String,
    /// Fragment that wrote the losing value.
    pub earlier: PathBuf,
    /// Fragment that wrote the winning value.
    pub later: PathBuf,
}

/// (locale, key path) → fragment that last wrote the leaf.
type Provenance = HashMap<(String, String), PathBuf>;

/// Locale code → translation table, built by folding fragments in order.
///
/// Later fragments win conflicts (last-write-wins). Every leaf's last
/// writer is tracked so conflicts can name both sources.
#[derive(Debug)]
pub struct ConsolidatedTable {
    /// Separator for rendering nested key paths in conflicts.
    separator: String,
    /// Merged locale tables.
    locales: Map<String, Value>,
    /// Last writer of each leaf.
    provenance: Provenance,
}

/// Per-fragment context threaded through the recursive fold.
struct FoldCx<'a> {
    /// Locale being folded.
    locale: &'a str,
    /// Key path separator.
    separator: &'a str,
    /// Fragment currently being folded.
    source: &'a Path,
}

impl ConsolidatedTable {
    /// Create an empty table.
    #[must_use]
    pub fn new(separator: impl Into<String>) -> Self {
        Self { separator: separator.into(), locales: Map::new(), provenance: HashMap::new() }
    }

    /// Fold one fragment into the table, returning the conflicts it caused.
    ///
    /// Tables merge per leaf: objects recurse, anything else (strings,
    /// numbers, arrays) replaces the existing value wholesale. An overwrite
    /// with a different value records one conflict per destroyed leaf.
    pub fn fold_fragment(&mut self, fragment: &Fragment) -> Vec<Conflict> {
        let mut conflicts = Vec::new();

        for (locale, incoming) in &fragment.locales {
            let cx = FoldCx {
                locale,
                separator: &self.separator,
                source: &fragment.path,
            };
            let slot = self
                .locales
                .entry(locale.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            merge_value(slot, incoming, &cx, None, &mut self.provenance, &mut conflicts);
        }

        conflicts
    }

    /// Number of locales currently in the table.
    #[must_use]
    pub fn locale_count(&self) -> usize {
        self.locales.len()
    }

    /// Number of leaf values across all locales.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.locales.values().map(count_leaves).sum()
    }

    /// Consume the table, yielding the consolidated document.
    #[must_use]
    pub fn into_document(self) -> Value {
        Value::Object(self.locales)
    }
}

/// Merge `incoming` into `existing` at `path`, recording provenance and
/// conflicts.
fn merge_value(
    existing: &mut Value,
    incoming: &Value,
    cx: &FoldCx<'_>,
    path: Option<&str>,
    provenance: &mut Provenance,
    conflicts: &mut Vec<Conflict>,
) {
    match (existing, incoming) {
        (Value::Object(old), Value::Object(new)) => {
            for (key, value) in new {
                let child_path = join_path(path, key, cx.separator);
                if let Some(slot) = old.get_mut(key) {
                    merge_value(slot, value, cx, Some(&child_path), provenance, conflicts);
                } else {
                    record_leaves(value, cx, Some(&child_path), provenance);
                    old.insert(key.clone(), value.clone());
                }
            }
        }
        (existing, incoming) => {
            if *existing != *incoming {
                report_overwrite(existing, cx, path, provenance, conflicts);
            }
            clear_leaves(existing, cx, path, provenance);
            record_leaves(incoming, cx, path, provenance);
            *existing = incoming.clone();
        }
    }
}

/// Extend `path` with `key`.
fn join_path(path: Option<&str>, key: &str, separator: &str) -> String {
    path.map_or_else(|| key.to_string(), |p| format!("{p}{separator}{key}"))
}

/// Record one conflict per leaf destroyed by an overwrite.
fn report_overwrite(
    existing: &Value,
    cx: &FoldCx<'_>,
    path: Option<&str>,
    provenance: &Provenance,
    conflicts: &mut Vec<Conflict>,
) {
    match existing {
        Value::Object(old) => {
            for (key, value) in old {
                let child_path = join_path(path, key, cx.separator);
                report_overwrite(value, cx, Some(&child_path), provenance, conflicts);
            }
        }
        _ => {
            let key = path.unwrap_or_default().to_string();
            let earlier = provenance
                .get(&(cx.locale.to_string(), key.clone()))
                .cloned()
                .unwrap_or_else(|| cx.source.to_path_buf());
            conflicts.push(Conflict {
                locale: cx.locale.to_string(),
                key,
                earlier,
                later: cx.source.to_path_buf(),
            });
        }
    }
}

/// Record `cx.source` as the last writer of every leaf under `value`.
fn record_leaves(value: &Value, cx: &FoldCx<'_>, path: Option<&str>, provenance: &mut Provenance) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = join_path(path, key, cx.separator);
                record_leaves(child, cx, Some(&child_path), provenance);
            }
        }
        _ => {
            let key = path.unwrap_or_default().to_string();
            provenance.insert((cx.locale.to_string(), key), cx.source.to_path_buf());
        }
    }
}

/// Drop provenance entries for every leaf under `value` before it is
/// replaced, so stale writers are never reported.
fn clear_leaves(value: &Value, cx: &FoldCx<'_>, path: Option<&str>, provenance: &mut Provenance) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let child_path = join_path(path, key, cx.separator);
                clear_leaves(child, cx, Some(&child_path), provenance);
            }
        }
        _ => {
            let key = path.unwrap_or_default().to_string();
            provenance.remove(&(cx.locale.to_string(), key));
        }
    }
}

/// Count leaf values under `value`.
fn count_leaves(value: &Value) -> usize {
    match value {
        Value::Object(map) => map.values().map(count_leaves).sum(),
        _ => 1,
    }
}
