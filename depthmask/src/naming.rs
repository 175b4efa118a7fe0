//! File and folder name derivations linking the three pipeline stages.
//!
//! The scheme is lexical: prefixes are attached with underscores and later
//! stripped by splitting on them. Stripping keeps only the *last*
//! underscore-delimited token, so it only round-trips for image file names
//! that contain no underscores themselves; `my_cat.png` comes back out as
//! `mask_cat.png.csv`. This truncation is long-standing observable behavior
//! and is kept for compatibility rather than silently repaired.

use std::path::{Path, PathBuf};

use crate::result::{Error, Result};

/// `depth_map_<model>_<image>.csv`
pub fn depth_file(image_name: &str, model_name: &str) -> String {
    format!("depth_map_{model_name}_{image_name}.csv")
}

/// Output folder for depth arrays, a sibling of the source folder named
/// `depth_maps_<source folder name>`.
pub fn depth_folder(source: &Path) -> Result<PathBuf> {
    let name = folder_name(source)?;
    Ok(sibling(source, format!("depth_maps_{name}")))
}

/// `mask_<last underscore token of the depth file name>`
pub fn mask_file(depth_file_name: &str) -> String {
    let original = last_token(depth_file_name);
    format!("mask_{original}")
}

/// Output folder for masks, a sibling of the depth folder named
/// `masks_<last underscore token of the depth folder name>`.
pub fn mask_folder(depth_folder: &Path) -> Result<PathBuf> {
    let name = folder_name(depth_folder)?;
    Ok(sibling(depth_folder, format!("masks_{}", last_token(&name))))
}

fn last_token(name: &str) -> &str {
    name.rsplit('_').next().unwrap_or(name)
}

fn folder_name(folder: &Path) -> Result<String> {
    folder
        .file_name()
        .and_then(|name| name.to_str())
        .map(str::to_string)
        .ok_or_else(|| {
            Error::InvalidInput(format!(
                "folder path {} has no usable name",
                folder.display()
            ))
        })
}

fn sibling(folder: &Path, name: String) -> PathBuf {
    match folder.parent() {
        Some(parent) => parent.join(name),
        None => PathBuf::from(name),
    }
}
