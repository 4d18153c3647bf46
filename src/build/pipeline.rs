//! Deploy pipeline orchestration

use super::config::BuildConfig;
use crate::copy::{Copier, CopyReport, OverwritePolicy};
use crate::fs::FileSystem;
use crate::validation::verify_deploy;
use anyhow::{Context, Result};

/// Outcome of one pipeline run
#[derive(Debug, Clone)]
pub struct BuildReport {
    pub copy: CopyReport,

    /// Files verified after the copy (None when verification did not run)
    pub verified: Option<usize>,
}

/// Main deploy pipeline
pub struct BuildPipeline<F: FileSystem> {
    config: BuildConfig,
    fs: F,
}

impl<F: FileSystem> BuildPipeline<F> {
    /// Create a new deploy pipeline
    pub fn new(config: BuildConfig, fs: F) -> Self {
        Self { config, fs }
    }

    pub fn config(&self) -> &BuildConfig {
        &self.config
    }

    pub fn fs(&self) -> &F {
        &self.fs
    }

    /// Run the copy once, then verify the output if configured
    pub fn run(&self) -> Result<BuildReport> {
        log::info!("Starting deploy");
        log::info!(
            "Source: {:?} -> Target: {:?}",
            self.config.input_path,
            self.config.output_path
        );

        self.log_bundle();

        let copier = Copier::new(
            &self.fs,
            self.config.input_path.clone(),
            self.config.output_path.clone(),
            &self.config.exclude,
        )
        .context("Failed to set up copier")?
        .with_options(self.config.copy_options());

        let copy = copier.copy().with_context(|| {
            format!(
                "Failed to copy {:?} to {:?}",
                self.config.input_path, self.config.output_path
            )
        })?;

        let verified = if !self.config.verify {
            None
        } else if self.config.dry_run {
            log::info!("Dry run - skipping verification");
            None
        } else if self.config.overwrite == OverwritePolicy::Skip {
            log::info!("Existing files were kept - skipping verification");
            None
        } else {
            Some(verify_deploy(&copier).context("Deploy verification failed")?)
        };

        log::info!("Deploy complete!");
        Ok(BuildReport { copy, verified })
    }

    fn log_bundle(&self) {
        if self.config.bundle.is_empty() {
            return;
        }

        log::info!("Bundle list: {} source(s)", self.config.bundle.len());
        for (i, name) in self.config.bundle.iter().enumerate() {
            log::debug!("  [{}/{}] {}", i + 1, self.config.bundle.len(), name);
        }
    }
}
