//! Binarization of inverse-depth maps.

use ndarray::Array2;

use crate::result::{Error, Result};

/// Threshold `depth` against a fraction of its own peak.
///
/// `cutoff = threshold * max(depth)`; elements `>= cutoff` (near surfaces)
/// become 0, the rest become 1. The comparison is `>=`, so the peak itself
/// is always classified near, and a depth map of all-equal values yields an
/// all-zero mask. Downstream consumers depend on this exact polarity.
pub fn create_mask(depth: &Array2<f32>, threshold: f32) -> Result<Array2<u8>> {
    if depth.is_empty() {
        return Err(Error::InvalidInput("empty depth map".to_string()));
    }
    if !threshold.is_finite() {
        return Err(Error::InvalidInput(format!(
            "threshold {threshold} is not a finite number"
        )));
    }

    let peak = depth.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let cutoff = threshold * peak;
    Ok(depth.mapv(|value| if value >= cutoff { 0 } else { 1 }))
}
