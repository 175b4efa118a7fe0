//! Batch drivers. Each scans one input folder, applies a per-item
//! operation, and persists one output file per item. Processing is
//! sequential and fail-fast: the first error aborts the run, leaving
//! already-written files in place. Re-running overwrites them, since
//! output names derive deterministically from input names.

pub mod depth;
pub mod mask;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::result::{Error, Result};

/// Files in `folder` whose extension case-insensitively matches one of
/// `extensions`, sorted by path for a deterministic processing order.
fn list_files(folder: &Path, extensions: &[&str]) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(Error::FolderNotFound(folder.to_path_buf()));
    }

    let mut files: Vec<PathBuf> = fs::read_dir(folder)?
        .collect::<io::Result<Vec<_>>>()?
        .into_iter()
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|want| ext.eq_ignore_ascii_case(want)))
        })
        .collect();
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> Result<&str> {
    path.file_name().and_then(|name| name.to_str()).ok_or_else(|| {
        Error::InvalidInput(format!("file path {} has no usable name", path.display()))
    })
}
