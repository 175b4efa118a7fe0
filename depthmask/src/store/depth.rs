//! Depth array store: images in, CSV inverse-depth arrays out.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use midas::Midas;
use ndarray::Array2;
use tracing::info;

use crate::result::Result;
use crate::{array, naming};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png"];

/// Estimate depth for every image in `source` and write one CSV per image
/// into `depth_maps_<source folder name>`, created next to `source` if
/// absent. The adapter is constructed once by the caller and reused across
/// the whole batch; model loading dominates the cost of a run.
///
/// Returns the written paths in processing order.
pub fn run(source: &Path, model: &mut Midas) -> Result<Vec<PathBuf>> {
    let model_name = model.model().name();
    run_with(source, model_name, |path| {
        let image = midas::open_image(path)?;
        Ok(model.inference(&image)?)
    })
}

/// Batch mechanics behind [`run`]: enumeration, output-folder creation,
/// name derivation and persistence, with the per-image depth computation
/// supplied by `infer`.
pub fn run_with<F>(source: &Path, model_name: &str, mut infer: F) -> Result<Vec<PathBuf>>
where
    F: FnMut(&Path) -> Result<Array2<f32>>,
{
    let images = super::list_files(source, IMAGE_EXTENSIONS)?;
    let output_dir = naming::depth_folder(source)?;
    fs::create_dir_all(&output_dir)?;

    let mut written = Vec::with_capacity(images.len());
    for path in images {
        written.push(write_one(&path, model_name, &mut infer, &output_dir)?);
    }
    Ok(written)
}

/// Single-image variant: writes the depth CSV into the current directory.
pub fn run_single(image: &Path, model: &mut Midas) -> Result<PathBuf> {
    let model_name = model.model().name();
    let output_dir = env::current_dir()?;
    write_one(
        image,
        model_name,
        &mut |path| {
            let image = midas::open_image(path)?;
            Ok(model.inference(&image)?)
        },
        &output_dir,
    )
}

fn write_one<F>(path: &Path, model_name: &str, infer: &mut F, output_dir: &Path) -> Result<PathBuf>
where
    F: FnMut(&Path) -> Result<Array2<f32>>,
{
    let name = super::file_name(path)?;
    let depth = infer(path)?;

    let target = output_dir.join(naming::depth_file(name, model_name));
    array::write(&target, &depth)?;
    info!(image = %path.display(), depth = %target.display(), "wrote depth map");
    Ok(target)
}
