//! Filename keyed aphid counts for the reference photos used in demos.

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::errors::{PestGuardError, Result};

/// Counts for the bundled reference photos.
///
/// `RW_S_24.jpg` is an alias for `RW S (24).jpg` after a space-free rename.
const DEMO_COUNTS: &[(&str, u32)] = &[
    ("RW S (15).jpg", 15),
    ("RW S (18).jpg", 15),
    ("RW S (19).jpg", 15),
    ("RW S (10).jpg", 10),
    ("RW S (24).jpg", 10),
    ("RW_S_24.jpg", 10),
];

static BUILTIN: LazyLock<LookupTable> =
    LazyLock::new(|| DEMO_COUNTS.iter().copied().collect());

/// Immutable mapping from an image base name to a known aphid count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LookupTable {
    entries: HashMap<String, u32>,
}

impl LookupTable {
    /// The process-wide table of reference photo counts.
    pub fn builtin() -> &'static LookupTable {
        &BUILTIN
    }

    /// Load a table from a JSON object of `"file name": count` pairs.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| PestGuardError::FileSystem {
            path: path.to_path_buf(),
            operation: "read lookup table".to_string(),
            source: e,
        })?;
        let table: Self =
            serde_json::from_str(&raw).map_err(|e| PestGuardError::LookupTable {
                path: path.to_path_buf(),
                source: e,
            })?;
        tracing::debug!(entries = table.len(), path = %path.display(), "loaded lookup table");
        Ok(table)
    }

    /// Exact match on the base name of `filename`.
    pub fn get(&self, filename: &str) -> Option<u32> {
        self.entries.get(base_name(filename)).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> FromIterator<(&'a str, u32)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, u32)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(name, count)| (name.to_string(), count))
                .collect(),
        }
    }
}

/// Strip any directory part, accepting both `/` and `\` separators so a
/// name typed from a Windows path still matches.
pub fn base_name(filename: &str) -> &str {
    filename
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filename)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    type TestResult = std::result::Result<(), Box<dyn std::error::Error>>;

    #[test]
    fn test_builtin_entries() {
        let table = LookupTable::builtin();
        assert_eq!(table.len(), 6);
        assert_eq!(table.get("RW S (15).jpg"), Some(15));
        assert_eq!(table.get("RW S (18).jpg"), Some(15));
        assert_eq!(table.get("RW S (10).jpg"), Some(10));
        assert_eq!(table.get("RW S (24).jpg"), Some(10));
        assert_eq!(table.get("RW_S_24.jpg"), Some(10));
    }

    #[test]
    fn test_match_is_exact() {
        let table = LookupTable::builtin();
        assert_eq!(table.get("rw s (15).jpg"), None);
        assert_eq!(table.get("RW S (15).png"), None);
        assert_eq!(table.get(""), None);
    }

    #[test]
    fn test_directory_is_stripped() {
        let table = LookupTable::builtin();
        assert_eq!(table.get("/tmp/uploads/RW S (24).jpg"), Some(10));
        assert_eq!(table.get(r"C:\Users\me\RW S (19).jpg"), Some(15));
    }

    #[test]
    fn test_base_name() {
        assert_eq!(base_name("a/b/c.jpg"), "c.jpg");
        assert_eq!(base_name(r"a\b\c.jpg"), "c.jpg");
        assert_eq!(base_name("c.jpg"), "c.jpg");
        assert_eq!(base_name("dir/"), "");
    }

    #[test]
    fn test_from_json_file() -> TestResult {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"leaf_a.png": 42, "leaf b.jpg": 0}}"#)?;

        let table = LookupTable::from_json_file(file.path())?;
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("leaf_a.png"), Some(42));
        assert_eq!(table.get("leaf b.jpg"), Some(0));
        assert_eq!(table.get("RW S (24).jpg"), None);
        Ok(())
    }

    #[test]
    fn test_from_json_file_rejects_negative_counts() -> TestResult {
        let mut file = NamedTempFile::new()?;
        write!(file, r#"{{"leaf.png": -3}}"#)?;

        let err = LookupTable::from_json_file(file.path()).unwrap_err();
        assert!(matches!(err, PestGuardError::LookupTable { .. }));
        Ok(())
    }

    #[test]
    fn test_from_json_file_missing() {
        let err = LookupTable::from_json_file(Path::new("/nonexistent/table.json")).unwrap_err();
        assert!(matches!(err, PestGuardError::FileSystem { .. }));
    }
}
