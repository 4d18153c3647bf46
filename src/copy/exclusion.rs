//! Exclusion set normalization and matching

use crate::error::{DeployError, Result};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Paths under the input root that are skipped together with their subtree
///
/// Entries are relative to the input root and may use either `/` or `\`
/// as separator. Matching is exact: a path is excluded only if the
/// traversal reaches that very path, never by prefix or pattern.
#[derive(Debug, Clone, Default)]
pub struct ExclusionSet {
    /// Normalized paths, in the order they were given
    ordered: Vec<PathBuf>,

    /// Same paths, for lookup
    lookup: HashSet<PathBuf>,
}

impl ExclusionSet {
    /// Build the set by joining every entry onto `input_root`
    pub fn new<S: AsRef<str>>(input_root: &Path, entries: &[S]) -> Result<Self> {
        let mut set = Self::default();

        for entry in entries {
            let path = normalize_entry(input_root, entry.as_ref())?;
            if set.lookup.insert(path.clone()) {
                set.ordered.push(path);
            }
        }

        Ok(set)
    }

    /// Whether `path` is exactly one of the excluded paths
    pub fn contains(&self, path: &Path) -> bool {
        self.lookup.contains(path)
    }

    /// Excluded paths in the order they were given
    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.ordered.iter().map(PathBuf::as_path)
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }
}

/// Turn one relative entry into a path under `input_root`
///
/// `.` and empty segments are dropped; absolute entries and `..` segments
/// are rejected because they cannot name anything below the root.
fn normalize_entry(input_root: &Path, entry: &str) -> Result<PathBuf> {
    if entry.starts_with('/') || entry.starts_with('\\') || Path::new(entry).is_absolute() {
        return Err(DeployError::config(format!(
            "Exclusion must be relative to the input root: {entry:?}"
        )));
    }

    let mut path = input_root.to_path_buf();
    let mut segments = 0;

    for segment in entry.split(['/', '\\']) {
        match segment {
            "" | "." => continue,
            ".." => {
                return Err(DeployError::config(format!(
                    "Exclusion may not leave the input root: {entry:?}"
                )));
            }
            name => {
                path.push(name);
                segments += 1;
            }
        }
    }

    if segments == 0 {
        return Err(DeployError::config(format!(
            "Exclusion does not name a path: {entry:?}"
        )));
    }

    Ok(path)
}
