//! Column-name normalization.
//!
//! A normalized name is lowercase and contains no `' '` or `'/'` characters; both are replaced
//! with `_`. Normalization is total and preserves column order and count. Two source names may
//! normalize to the same string; such duplicates are passed through unchanged.
//!
//! ```rust
//! use column_normalizer::normalize::normalize_column_names;
//!
//! let out = normalize_column_names(&["User Name", "Sign Up/Date", "AGE"]);
//! assert_eq!(out, vec!["user_name", "sign_up_date", "age"]);
//! ```

use std::collections::HashMap;

use crate::types::DataSet;

/// Normalize a single column name.
pub fn normalize_column_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_").replace('/', "_")
}

/// Normalize every name in `names`, preserving order and length.
pub fn normalize_column_names<S: AsRef<str>>(names: &[S]) -> Vec<String> {
    names
        .iter()
        .map(|n| normalize_column_name(n.as_ref()))
        .collect()
}

/// Return `dataset` with every column renamed by [`normalize_column_name`].
///
/// Types and rows are untouched.
pub fn normalize_columns(dataset: DataSet) -> DataSet {
    let names = normalize_column_names(&dataset.column_names());
    dataset.with_column_names(names)
}

/// Names that occur more than once in `names`, in first-seen order.
///
/// Diagnostic only: nothing in the job renames or drops duplicates.
pub fn duplicate_column_names(names: &[String]) -> Vec<String> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for n in names {
        *counts.entry(n.as_str()).or_default() += 1;
    }
    let mut out: Vec<String> = Vec::new();
    for n in names {
        if counts.get(n.as_str()).copied().unwrap_or(0) > 1 && !out.contains(n) {
            out.push(n.clone());
        }
    }
    out
}
