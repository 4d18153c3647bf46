//! Error types for deploy operations

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while copying or verifying a deploy tree
#[derive(Debug, Error)]
pub enum DeployError {
    /// Read, write or listing failure on a specific path
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Invalid roots, exclusion entries or config file
    #[error("Invalid configuration: {message}")]
    Config { message: String },

    /// Output tree does not mirror the input tree
    #[error("Deploy mismatch at {path}: {reason}")]
    Mismatch { path: PathBuf, reason: String },
}

impl DeployError {
    /// Create an I/O error with path context
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config { .. } => 2,
            Self::Io { .. } | Self::Mismatch { .. } => 1,
        }
    }
}

pub type Result<T> = std::result::Result<T, DeployError>;
