//! Copy run report

use std::fmt;

/// Counters for one copy run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CopyReport {
    /// Files copied (or, in a dry run, that would have been copied)
    pub files_copied: u64,

    /// Bytes written to the output tree
    pub bytes_copied: u64,

    /// Output directories created
    pub dirs_created: u64,

    /// Files left alone because the output already had them
    pub skipped_existing: u64,

    /// Excluded paths reached during traversal
    pub excluded: u64,

    /// Symbolic links left out (links are not followed)
    pub symlinks_skipped: u64,

    /// Whether nothing was written
    pub dry_run: bool,
}

impl CopyReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            ..Self::default()
        }
    }

    /// Human-readable one-line summary
    pub fn format(&self, prefix: &str) -> String {
        let mode = if self.dry_run { " (dry run)" } else { "" };
        format!(
            "{prefix}{mode} copied={} bytes={} dirs={} skipped={} excluded={} symlinks={}",
            self.files_copied,
            self.bytes_copied,
            self.dirs_created,
            self.skipped_existing,
            self.excluded,
            self.symlinks_skipped
        )
    }
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format("[COPY]"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_format() {
        let report = CopyReport {
            files_copied: 3,
            bytes_copied: 120,
            dirs_created: 2,
            skipped_existing: 1,
            excluded: 4,
            symlinks_skipped: 1,
            dry_run: false,
        };

        assert_eq!(
            report.to_string(),
            "[COPY] copied=3 bytes=120 dirs=2 skipped=1 excluded=4 symlinks=1"
        );
    }

    #[test]
    fn test_dry_run_marked() {
        let report = CopyReport::new(true);
        assert_eq!(
            report.format("[DEPLOY]"),
            "[DEPLOY] (dry run) copied=0 bytes=0 dirs=0 skipped=0 excluded=0 symlinks=0"
        );
    }
}
