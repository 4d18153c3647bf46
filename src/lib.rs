//! Web Deployer - static site deploy helper
//!
//! This library mirrors a static site's source tree into a deploy tree,
//! skipping an exclusion list of files and whole subdirectories.

pub mod build;
pub mod copy;
pub mod error;
pub mod fs;
pub mod validation;

pub use build::config::BuildConfig;
pub use build::pipeline::{BuildPipeline, BuildReport};
pub use copy::{Copier, CopyReport, OverwritePolicy};
pub use error::DeployError;
