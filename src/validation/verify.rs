//! Post-deploy verification

use crate::copy::Copier;
use crate::error::{DeployError, Result};
use crate::fs::FileSystem;
use std::path::Path;

/// Check that every non-excluded input file has an identical mirror
///
/// Walks the input tree with the copier's exclusion set and compares each
/// file byte-for-byte with its mirrored output path.
///
/// # Returns
/// The number of files verified, or the first mismatch found
pub fn verify_deploy<F: FileSystem>(copier: &Copier<'_, F>) -> Result<usize> {
    log::info!(
        "Verifying deploy: {} -> {}",
        copier.input_root().display(),
        copier.output_root().display()
    );

    let verified = verify_recursive(copier, copier.input_root())?;

    log::info!("Verified {} file(s)", verified);
    Ok(verified)
}

fn verify_recursive<F: FileSystem>(copier: &Copier<'_, F>, path: &Path) -> Result<usize> {
    let fs = copier.fs();

    // same skip rules as the copy
    if copier.is_excluded(path) || (path != copier.input_root() && fs.is_symlink(path)) {
        return Ok(0);
    }

    let dest = copier.output_path(path);

    if fs.is_dir(path) {
        if !fs.is_dir(&dest) {
            return Err(DeployError::Mismatch {
                path: dest,
                reason: "directory missing from output".to_string(),
            });
        }

        let mut verified = 0;
        for child in fs.list_children(path).map_err(|e| DeployError::io(path, e))? {
            verified += verify_recursive(copier, &child)?;
        }
        return Ok(verified);
    }

    if !fs.exists(&dest) {
        return Err(DeployError::Mismatch {
            path: dest,
            reason: "file missing from output".to_string(),
        });
    }

    let expected = fs.read_bytes(path).map_err(|e| DeployError::io(path, e))?;
    let actual = fs.read_bytes(&dest).map_err(|e| DeployError::io(&dest, e))?;
    if expected != actual {
        return Err(DeployError::Mismatch {
            path: dest,
            reason: format!(
                "contents differ ({} bytes in input, {} in output)",
                expected.len(),
                actual.len()
            ),
        });
    }

    log::debug!("Verified: {}", dest.display());
    Ok(1)
}
