//! Depth-first copier

use super::exclusion::ExclusionSet;
use super::report::CopyReport;
use crate::error::{DeployError, Result};
use crate::fs::{normalize_lexically, FileSystem};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// What to do when the output already has a file at the mirrored path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Replace the existing file with the input file
    #[default]
    Overwrite,

    /// Keep the existing file
    Skip,
}

/// Copy behavior switches
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyOptions {
    pub overwrite: OverwritePolicy,

    /// Log what would be copied without touching the output tree
    pub dry_run: bool,
}

/// Mirrors an input tree under an output root, skipping excluded subtrees
pub struct Copier<'a, F: FileSystem> {
    fs: &'a F,
    input_root: PathBuf,
    output_root: PathBuf,
    exclusions: ExclusionSet,
    options: CopyOptions,
}

impl<'a, F: FileSystem> Copier<'a, F> {
    /// Create a copier, normalizing `excludes` against `input_root`
    pub fn new<S: AsRef<str>>(
        fs: &'a F,
        input_root: impl Into<PathBuf>,
        output_root: impl Into<PathBuf>,
        excludes: &[S],
    ) -> Result<Self> {
        let input_root = input_root.into();
        let exclusions = ExclusionSet::new(&input_root, excludes)?;

        Ok(Self {
            fs,
            input_root,
            output_root: output_root.into(),
            exclusions,
            options: CopyOptions::default(),
        })
    }

    pub fn with_options(mut self, options: CopyOptions) -> Self {
        self.options = options;
        self
    }

    pub fn fs(&self) -> &'a F {
        self.fs
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    pub fn exclusions(&self) -> &ExclusionSet {
        &self.exclusions
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        self.exclusions.contains(path)
    }

    /// Run the copy once over the whole input tree
    pub fn copy(&self) -> Result<CopyReport> {
        for path in self.exclusions.iter() {
            log::info!("Excluding: {}", path.display());
        }

        self.validate_roots()?;

        let mut report = CopyReport::new(self.options.dry_run);
        self.copy_recursive(&self.input_root, &mut report)?;

        log::info!("{}", report);
        Ok(report)
    }

    fn copy_recursive(&self, path: &Path, report: &mut CopyReport) -> Result<()> {
        // checked before listing so excluded directories are never entered
        if self.is_excluded(path) {
            log::debug!("Skipping excluded: {}", path.display());
            report.excluded += 1;
            return Ok(());
        }

        // links below the root are never followed, so a link back up the
        // tree cannot make the walk revisit its ancestors
        if path != self.input_root && self.fs.is_symlink(path) {
            log::warn!("Skipping symlink: {}", path.display());
            report.symlinks_skipped += 1;
            return Ok(());
        }

        if !self.fs.is_dir(path) {
            return self.copy_file(path, report);
        }

        log::debug!("Entering: {}", path.display());
        self.ensure_dir(&self.output_path(path), report)?;

        let children = self
            .fs
            .list_children(path)
            .map_err(|e| DeployError::io(path, e))?;

        for child in children {
            self.copy_recursive(&child, report)?;
        }

        Ok(())
    }

    fn copy_file(&self, source: &Path, report: &mut CopyReport) -> Result<()> {
        let dest = self.output_path(source);
        log::info!("Copying: {}", source.display());

        if self.fs.is_dir(&dest) {
            return Err(DeployError::Mismatch {
                path: dest,
                reason: "a directory occupies the destination of a file".to_string(),
            });
        }

        if self.fs.exists(&dest) && self.options.overwrite == OverwritePolicy::Skip {
            log::debug!("Keeping existing: {}", dest.display());
            report.skipped_existing += 1;
            return Ok(());
        }

        if self.options.dry_run {
            report.files_copied += 1;
            return Ok(());
        }

        if let Some(parent) = dest.parent() {
            self.ensure_dir(parent, report)?;
        }

        let data = self
            .fs
            .read_bytes(source)
            .map_err(|e| DeployError::io(source, e))?;
        self.fs
            .write_bytes(&dest, &data)
            .map_err(|e| DeployError::io(&dest, e))?;

        log::debug!("Copied to: {}", dest.display());
        report.files_copied += 1;
        report.bytes_copied += data.len() as u64;
        Ok(())
    }

    fn ensure_dir(&self, dir: &Path, report: &mut CopyReport) -> Result<()> {
        if self.options.dry_run || dir.as_os_str().is_empty() || self.fs.is_dir(dir) {
            return Ok(());
        }

        self.fs
            .create_dir_all(dir)
            .map_err(|e| DeployError::io(dir, e))?;
        report.dirs_created += 1;
        Ok(())
    }

    /// Mirrored location of an input path under the output root
    ///
    /// A file given as the input root lands directly inside the output root.
    pub fn output_path(&self, path: &Path) -> PathBuf {
        match path.strip_prefix(&self.input_root) {
            Ok(relative) if relative.as_os_str().is_empty() => {
                if self.fs.is_dir(path) {
                    self.output_root.clone()
                } else {
                    match path.file_name() {
                        Some(name) => self.output_root.join(name),
                        None => self.output_root.clone(),
                    }
                }
            }
            Ok(relative) => self.output_root.join(relative),
            Err(_) => self.output_root.join(path.file_name().unwrap_or(path.as_os_str())),
        }
    }

    fn validate_roots(&self) -> Result<()> {
        if !self.fs.exists(&self.input_root) {
            return Err(DeployError::config(format!(
                "Input root does not exist: {}",
                self.input_root.display()
            )));
        }

        // writing inside the walked tree would feed the copy its own output
        let output_inside_input = self.fs.is_dir(&self.input_root) && {
            let input = self.resolve(&self.input_root)?;
            let output = self.resolve(&self.output_root)?;
            match output.strip_prefix(&input) {
                Ok(relative) => !self.excluded_below_root(relative),
                Err(_) => false,
            }
        };

        if output_inside_input {
            return Err(DeployError::config(format!(
                "Output root {} lies inside input root {}",
                self.output_root.display(),
                self.input_root.display()
            )));
        }

        Ok(())
    }

    /// Whether `relative` (below the input root) or one of its ancestors
    /// below the root is excluded
    fn excluded_below_root(&self, relative: &Path) -> bool {
        let mut path = self.input_root.clone();
        relative.components().any(|component| {
            path.push(component.as_os_str());
            self.is_excluded(&path)
        })
    }

    /// Canonical form of `path`, resolved through its nearest existing
    /// ancestor when the path itself does not exist yet
    fn resolve(&self, path: &Path) -> Result<PathBuf> {
        let components: Vec<Component> = path.components().collect();

        for split in (0..=components.len()).rev() {
            let head: PathBuf = components[..split].iter().collect();
            let head = if head.as_os_str().is_empty() {
                PathBuf::from(".")
            } else {
                head
            };
            if split > 0 && !self.fs.exists(&head) {
                continue;
            }

            let mut resolved = self
                .fs
                .canonicalize(&head)
                .map_err(|e| DeployError::io(&head, e))?;
            for component in &components[split..] {
                resolved.push(component.as_os_str());
            }
            return Ok(normalize_lexically(&resolved));
        }

        Ok(normalize_lexically(path))
    }
}
