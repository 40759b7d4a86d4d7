//! Helpers for generating unique names so tests never share a database file.

use std::path::{Path, PathBuf};

use ulid::Ulid;

/// Generate a unique string with the given prefix
///
/// # Examples
/// ```
/// use lab_test_support::unique_helpers::unique_str;
///
/// let id1 = unique_str("run");
/// let id2 = unique_str("run");
/// assert_ne!(id1, id2);
/// assert!(id1.starts_with("run-"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{}-{}", prefix, Ulid::new())
}

/// Unique SQLite file path inside `dir`.
///
/// # Examples
/// ```
/// use std::path::Path;
/// use lab_test_support::unique_helpers::unique_sqlite_path;
///
/// let path = unique_sqlite_path(Path::new("/tmp"), "lab");
/// assert!(path.starts_with("/tmp"));
/// assert_eq!(path.extension().unwrap(), "sqlite3");
/// ```
pub fn unique_sqlite_path(dir: &Path, prefix: &str) -> PathBuf {
    dir.join(format!("{}.sqlite3", unique_str(prefix)))
}
