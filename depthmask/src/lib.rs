//! Batch pipeline turning folders of images into binary masks via
//! monocular depth estimates.
//!
//! The pipeline has two independent stages that communicate only through
//! the filesystem: [`store::depth`] writes one CSV inverse-depth array per
//! image, [`store::mask`] thresholds those arrays into 0/1 masks.

pub mod array;
pub mod mask;
pub mod naming;
pub mod result;
pub mod store;

pub use result::{Error, Result};
