//! Mask array store: CSV depth arrays in, CSV 0/1 masks out.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::result::Result;
use crate::{array, mask, naming};

/// Threshold every depth CSV in `depth_folder` and write one mask CSV per
/// input into `masks_<original folder name>`, created next to
/// `depth_folder` if absent. The threshold fraction applies uniformly to
/// the whole batch; each cutoff is relative to that file's own peak.
///
/// Returns the written paths in processing order.
pub fn run(depth_folder: &Path, threshold: f32) -> Result<Vec<PathBuf>> {
    let files = super::list_files(depth_folder, &["csv"])?;
    let output_dir = naming::mask_folder(depth_folder)?;
    fs::create_dir_all(&output_dir)?;

    let mut written = Vec::with_capacity(files.len());
    for path in files {
        let depth = array::read(&path)?;
        let binary = mask::create_mask(&depth, threshold)?;

        let target = output_dir.join(naming::mask_file(super::file_name(&path)?));
        array::write(&target, &binary)?;
        info!(depth = %path.display(), mask = %target.display(), "wrote mask");
        written.push(target);
    }
    Ok(written)
}
