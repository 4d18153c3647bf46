//! Build driver: configuration and the single copy run

pub mod config;
pub mod pipeline;

pub use config::BuildConfig;
pub use pipeline::{BuildPipeline, BuildReport};
