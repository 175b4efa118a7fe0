//! Monocular inverse-depth estimation with the MiDaS model family.
//!
//! The model is an opaque ONNX graph fetched from Hugging Face. [`Midas`]
//! wraps a single runtime session: image in, inverse-depth map at the
//! image's own resolution out. Larger values mean nearer surfaces; the
//! scale is model-relative and not normalized.

use std::path::{Path, PathBuf};

use anyhow::Context;
use hf_hub::api::sync::Api;
use image::{DynamicImage, GenericImageView, ImageBuffer, Luma, imageops};
use ndarray::{Array2, Array4};
use ort::{
    execution_providers::CUDAExecutionProvider,
    inputs,
    session::{Session, builder::GraphOptimizationLevel},
    value::TensorRef,
};
use strum::EnumProperty as _;
use tracing::{info, instrument};

const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];
const DPT_MEAN: [f32; 3] = [0.5, 0.5, 0.5];
const DPT_STD: [f32; 3] = [0.5, 0.5, 0.5];

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The weights could not be fetched or the runtime session could not
    /// be built.
    #[error("depth model unavailable")]
    ModelUnavailable(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to decode image {path}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("depth inference failed")]
    Inference(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Supported model variants, from most to least accurate. Accuracy trades
/// against inference latency; `MidasSmall` is the usual default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum, strum::EnumProperty)]
pub enum Model {
    #[strum(props(
        name = "DPT_Large",
        repo = "Xenova/dpt-large",
        filename = "onnx/model.onnx"
    ))]
    DptLarge,
    #[strum(props(
        name = "DPT_Hybrid",
        repo = "Xenova/dpt-hybrid-midas",
        filename = "onnx/model.onnx"
    ))]
    DptHybrid,
    #[strum(props(
        name = "MiDaS_small",
        repo = "Xenova/midas-v2",
        filename = "onnx/model.onnx"
    ))]
    MidasSmall,
}

impl Model {
    /// Canonical variant name as it appears in derived file names.
    pub fn name(&self) -> &'static str {
        self.get_str("name").expect("name property")
    }

    fn repo(&self) -> &'static str {
        self.get_str("repo").expect("repo property")
    }

    fn weights_file(&self) -> &'static str {
        self.get_str("filename").expect("filename property")
    }

    /// Side length of the square input the graph expects.
    fn input_size(&self) -> u32 {
        match self {
            Model::DptLarge | Model::DptHybrid => 384,
            Model::MidasSmall => 256,
        }
    }

    fn normalization(&self) -> ([f32; 3], [f32; 3]) {
        match self {
            Model::DptLarge | Model::DptHybrid => (DPT_MEAN, DPT_STD),
            Model::MidasSmall => (IMAGENET_MEAN, IMAGENET_STD),
        }
    }
}

pub struct Midas {
    session: Session,
    model: Model,
}

impl Midas {
    /// Fetch the weights and build a session. The compute device is picked
    /// here, once: CUDA when available, otherwise CPU.
    pub fn new(model: Model) -> Result<Self> {
        let session = build_session(model).map_err(|e| Error::ModelUnavailable(e.into()))?;
        info!(model = model.name(), "loaded depth model");
        Ok(Self { session, model })
    }

    pub fn model(&self) -> Model {
        self.model
    }

    /// Estimate inverse depth for `image`. The returned array has the
    /// image's exact height and width; values are raw model output.
    #[instrument(level = "debug", skip_all)]
    pub fn inference(&mut self, image: &DynamicImage) -> Result<Array2<f32>> {
        let (width, height) = image.dimensions();
        let input = preprocess(image, self.model);
        let prediction = self.forward(&input).map_err(|e| Error::Inference(e.into()))?;
        upsample(prediction, width, height).map_err(|e| Error::Inference(e.into()))
    }

    fn forward(&mut self, input: &Array4<f32>) -> anyhow::Result<Array2<f32>> {
        let output_name = self
            .session
            .outputs
            .first()
            .context("model has no outputs")?
            .name
            .clone();
        let outputs = self
            .session
            .run(inputs![TensorRef::from_array_view(input.view())?])?;
        let prediction = outputs[output_name.as_str()].try_extract_array::<f32>()?;

        // DPT exports predict (1, h, w); some exports keep a channel axis.
        let (h, w) = match prediction.shape() {
            &[1, h, w] | &[1, 1, h, w] => (h, w),
            other => anyhow::bail!("unexpected prediction shape {other:?}"),
        };
        let data: Vec<f32> = prediction.iter().copied().collect();
        Ok(Array2::from_shape_vec((h, w), data)?)
    }
}

/// Open and decode an image file.
pub fn open_image(path: &Path) -> Result<DynamicImage> {
    image::open(path).map_err(|source| Error::Decode {
        path: path.to_path_buf(),
        source,
    })
}

fn build_session(model: Model) -> anyhow::Result<Session> {
    let api = Api::new()?;
    let repo = api.model(model.repo().to_string());
    let weights = repo.get(model.weights_file())?;

    let session = Session::builder()?
        .with_execution_providers([CUDAExecutionProvider::default().build()])?
        .with_optimization_level(GraphOptimizationLevel::Level3)?
        .commit_from_file(weights)?;

    Ok(session)
}

/// Resize to the model's square input and normalize into an NCHW tensor.
fn preprocess(image: &DynamicImage, model: Model) -> Array4<f32> {
    let side = model.input_size();
    let resized = imageops::resize(
        &image.to_rgb8(),
        side,
        side,
        imageops::FilterType::CatmullRom,
    );
    let (mean, std) = model.normalization();

    let side = side as usize;
    let mut tensor = Array4::zeros((1, 3, side, side));
    for (x, y, pixel) in resized.enumerate_pixels() {
        for c in 0..3 {
            tensor[[0, c, y as usize, x as usize]] = (pixel[c] as f32 / 255.0 - mean[c]) / std[c];
        }
    }
    tensor
}

/// Bicubic-resample the raw prediction up to the source resolution.
///
/// `imageops` clamps float samples to [0, 1], while raw inverse depth is
/// unbounded, so the resize runs in normalized space and is mapped back.
fn upsample(prediction: Array2<f32>, width: u32, height: u32) -> anyhow::Result<Array2<f32>> {
    let (h, w) = prediction.dim();
    if (w as u32, h as u32) == (width, height) {
        return Ok(prediction);
    }

    let lo = prediction.iter().copied().fold(f32::INFINITY, f32::min);
    let hi = prediction.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let range = hi - lo;
    if !(range > 0.0) {
        // Flat prediction, nothing to interpolate.
        return Ok(Array2::from_elem(
            (height as usize, width as usize),
            lo,
        ));
    }

    let (data, _) = prediction.mapv(|v| (v - lo) / range).into_raw_vec_and_offset();
    let map: ImageBuffer<Luma<f32>, Vec<f32>> = ImageBuffer::from_raw(w as u32, h as u32, data)
        .ok_or_else(|| anyhow::anyhow!("prediction buffer does not match its shape"))?;
    let resized = imageops::resize(&map, width, height, imageops::FilterType::CatmullRom);

    Ok(Array2::from_shape_vec(
        (height as usize, width as usize),
        resized.into_raw(),
    )?
    .mapv(|v| v * range + lo))
}
