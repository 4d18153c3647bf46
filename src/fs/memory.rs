//! In-memory implementation for tests and dry experiments

use super::normalize_lexically;
use super::traits::FileSystem;
use std::cell::RefCell;
use std::collections::{BTreeMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
enum Node {
    Dir,
    File(Vec<u8>),
    Symlink(PathBuf),
}

/// File system held entirely in memory
///
/// Records every path that was listed or read, and can be told to fail
/// on chosen paths, so traversal behavior can be asserted without disk.
#[derive(Debug, Default)]
pub struct MemoryFs {
    nodes: RefCell<BTreeMap<PathBuf, Node>>,
    accessed: RefCell<Vec<PathBuf>>,
    failing: HashSet<PathBuf>,
}

impl MemoryFs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, creating its parent directories
    pub fn with_file(self, path: impl AsRef<Path>, data: impl Into<Vec<u8>>) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.insert_dirs(parent);
        }
        self.nodes
            .borrow_mut()
            .insert(path.to_path_buf(), Node::File(data.into()));
        self
    }

    /// Add an (empty) directory and its parents
    pub fn with_dir(self, path: impl AsRef<Path>) -> Self {
        self.insert_dirs(path.as_ref());
        self
    }

    /// Add a symbolic link pointing at `target`; links are never followed
    pub fn with_symlink(self, path: impl AsRef<Path>, target: impl Into<PathBuf>) -> Self {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            self.insert_dirs(parent);
        }
        self.nodes
            .borrow_mut()
            .insert(path.to_path_buf(), Node::Symlink(target.into()));
        self
    }

    /// Make every access to `path` fail with `PermissionDenied`
    pub fn fail_on(mut self, path: impl Into<PathBuf>) -> Self {
        self.failing.insert(path.into());
        self
    }

    /// Contents of a file, if present
    pub fn file(&self, path: impl AsRef<Path>) -> Option<Vec<u8>> {
        match self.nodes.borrow().get(path.as_ref()) {
            Some(Node::File(data)) => Some(data.clone()),
            _ => None,
        }
    }

    /// All files and directories strictly below `root`
    pub fn paths_under(&self, root: impl AsRef<Path>) -> Vec<PathBuf> {
        let root = root.as_ref();
        self.nodes
            .borrow()
            .keys()
            .filter(|p| p.as_path() != root && p.starts_with(root))
            .cloned()
            .collect()
    }

    /// Paths listed or read so far, in access order
    pub fn accessed(&self) -> Vec<PathBuf> {
        self.accessed.borrow().clone()
    }

    fn insert_dirs(&self, path: &Path) {
        let mut nodes = self.nodes.borrow_mut();
        for ancestor in path.ancestors() {
            if ancestor.as_os_str().is_empty() {
                continue;
            }
            nodes.entry(ancestor.to_path_buf()).or_insert(Node::Dir);
        }
    }

    fn check(&self, path: &Path) -> io::Result<()> {
        if self.failing.contains(path) {
            return Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                format!("access denied: {}", path.display()),
            ));
        }
        Ok(())
    }

    fn not_found(path: &Path) -> io::Error {
        io::Error::new(
            io::ErrorKind::NotFound,
            format!("no such file or directory: {}", path.display()),
        )
    }
}

impl FileSystem for MemoryFs {
    fn exists(&self, path: &Path) -> bool {
        self.nodes.borrow().contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        matches!(self.nodes.borrow().get(path), Some(Node::Dir))
    }

    fn is_symlink(&self, path: &Path) -> bool {
        matches!(self.nodes.borrow().get(path), Some(Node::Symlink(_)))
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        let normalized = normalize_lexically(path);
        if normalized.as_os_str().is_empty() || self.exists(&normalized) {
            Ok(normalized)
        } else {
            Err(Self::not_found(path))
        }
    }

    fn list_children(&self, path: &Path) -> io::Result<Vec<PathBuf>> {
        self.accessed.borrow_mut().push(path.to_path_buf());
        self.check(path)?;

        let nodes = self.nodes.borrow();
        match nodes.get(path) {
            Some(Node::Dir) => Ok(nodes
                .keys()
                .filter(|p| p.parent() == Some(path))
                .cloned()
                .collect()),
            Some(Node::File(_)) | Some(Node::Symlink(_)) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("not a directory: {}", path.display()),
            )),
            None => Err(Self::not_found(path)),
        }
    }

    fn read_bytes(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.accessed.borrow_mut().push(path.to_path_buf());
        self.check(path)?;

        match self.nodes.borrow().get(path) {
            Some(Node::File(data)) => Ok(data.clone()),
            Some(Node::Dir) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("is a directory: {}", path.display()),
            )),
            Some(Node::Symlink(target)) => Err(io::Error::new(
                io::ErrorKind::Other,
                format!("symlink not followed: {} -> {}", path.display(), target.display()),
            )),
            None => Err(Self::not_found(path)),
        }
    }

    fn write_bytes(&self, path: &Path, data: &[u8]) -> io::Result<()> {
        self.check(path)?;

        let mut nodes = self.nodes.borrow_mut();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !matches!(nodes.get(parent), Some(Node::Dir)) {
                return Err(Self::not_found(parent));
            }
        }
        if matches!(nodes.get(path), Some(Node::Dir)) {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("is a directory: {}", path.display()),
            ));
        }
        nodes.insert(path.to_path_buf(), Node::File(data.to_vec()));
        Ok(())
    }

    fn create_dir_all(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;

        for ancestor in path.ancestors() {
            if let Some(Node::File(_) | Node::Symlink(_)) = self.nodes.borrow().get(ancestor) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("file exists: {}", ancestor.display()),
                ));
            }
        }
        self.insert_dirs(path);
        Ok(())
    }
}
