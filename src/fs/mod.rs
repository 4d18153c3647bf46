//! File-system access layer
//!
//! The copier talks to the file system only through the [`FileSystem`]
//! trait, so deploys can run against real disk or an in-memory tree.

mod disk;
mod memory;
mod traits;

pub use disk::DiskFs;
pub use memory::MemoryFs;
pub use traits::FileSystem;

use std::path::{Component, Path, PathBuf};

/// Drop `.` segments and fold `..` into the preceding segment, without
/// touching the file system
pub fn normalize_lexically(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            other => normalized.push(other.as_os_str()),
        }
    }

    normalized
}
