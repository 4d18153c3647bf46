//! Exclusion-aware tree copy

mod copier;
mod exclusion;
mod report;

pub use copier::{CopyOptions, Copier, OverwritePolicy};
pub use exclusion::ExclusionSet;
pub use report::CopyReport;
