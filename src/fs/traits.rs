//! File-system trait definition

use std::io;
use std::path::{Path, PathBuf};

/// File-system capabilities needed by a deploy - allows swapping between
/// real disk and an in-memory tree
pub trait FileSystem {
    /// Whether anything exists at `path`
    fn exists(&self, path: &Path) -> bool;

    /// Whether `path` is a directory
    fn is_dir(&self, path: &Path) -> bool;

    /// Whether `path` itself is a symbolic link (the link is not followed)
    fn is_symlink(&self, _path: &Path) -> bool {
        false
    }

    /// Absolute form of an existing path with links and `..` resolved
    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf>;

    /// Immediate children of a directory, sorted by path
    fn list_children(&self, path: &Path) -> io::Result<Vec<PathBuf>>;

    /// Read a whole file
    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Create or truncate a file with `data`. The parent must exist.
    fn write_bytes(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Create a directory and all missing parents
    fn create_dir_all(&self, path: &Path) -> io::Result<()>;
}
