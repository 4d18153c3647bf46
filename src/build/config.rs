//! Build configuration

use crate::copy::{CopyOptions, OverwritePolicy};
use crate::error::{DeployError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_INPUT_PATH: &str = "web/dev";
pub const DEFAULT_OUTPUT_PATH: &str = "web/deploy";

/// Paths under the input root left out of the deploy
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "js",
    "test",
    "test.html",
    // html head scripts are rewritten by hand
    "index.html",
];

/// Script sources meant to be concatenated into one bundle
pub const DEFAULT_BUNDLE: &[&str] = &[
    "Backbone.CollectionBinder.min.js",
    "Backbone.ModelBinder.min.js",
    "backbone-min.js",
    "bootstrap.min.js",
    "jquery-2.0.3.min.js",
    "music.js",
    "timbre.min.js",
    "underscore-min.js",
];

/// Configuration for one deploy run
///
/// Can be read from a JSON file; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Root of the source tree
    pub input_path: PathBuf,

    /// Root the source tree is mirrored under
    pub output_path: PathBuf,

    /// Paths relative to `input_path` to skip, with their subtree
    pub exclude: Vec<String>,

    /// Ordered script file names for the bundle (not consumed by the copy)
    pub bundle: Vec<String>,

    /// Policy for files already present in the output
    pub overwrite: OverwritePolicy,

    /// Log the copy without writing anything
    pub dry_run: bool,

    /// Re-check the output tree after copying
    pub verify: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            exclude: DEFAULT_EXCLUDES.iter().map(|s| s.to_string()).collect(),
            bundle: DEFAULT_BUNDLE.iter().map(|s| s.to_string()).collect(),
            overwrite: OverwritePolicy::default(),
            dry_run: false,
            verify: true,
        }
    }
}

impl BuildConfig {
    /// Create a configuration for the given roots with default lists
    pub fn new(input_path: PathBuf, output_path: PathBuf) -> Self {
        Self {
            input_path,
            output_path,
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|e| {
            DeployError::config(format!("Cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_json(&text)
            .map_err(|e| DeployError::config(format!("{} ({})", e, path.display())))
    }

    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text)
            .map_err(|e| DeployError::config(format!("Invalid config file: {}", e)))
    }

    /// Replace the exclusion list
    pub fn with_excludes(mut self, exclude: Vec<String>) -> Self {
        self.exclude = exclude;
        self
    }

    /// Replace the bundle file list
    pub fn with_bundle(mut self, bundle: Vec<String>) -> Self {
        self.bundle = bundle;
        self
    }

    pub fn with_overwrite(mut self, overwrite: OverwritePolicy) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_verify(mut self, verify: bool) -> Self {
        self.verify = verify;
        self
    }

    /// Copier switches derived from this configuration
    pub fn copy_options(&self) -> CopyOptions {
        CopyOptions {
            overwrite: self.overwrite,
            dry_run: self.dry_run,
        }
    }
}
