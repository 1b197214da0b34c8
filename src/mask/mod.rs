//! Raster mask loading and decomposition.
//!
//! A dataset stores either one color-coded mask per image (every instance
//! painted a distinct RGB color on black) or one binary mask per instance.
//! [`decompose`] splits the former into per-instance [`BinaryMask`]s keyed
//! by [`ColorKey`].

mod binary;
mod color;

pub use binary::BinaryMask;
pub use color::{ColorKey, ParseColorKeyError};

use std::collections::BTreeMap;
use std::path::Path;

use image::RgbImage;
use thiserror::Error;

use crate::error::MaskcocoError;

/// Error returned when a mask holds no instance pixels at all.
///
/// Recoverable: the caller treats it as "no annotations for this image",
/// not as a failure of the whole run.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
#[error("mask contains no non-background pixels")]
pub struct EmptyMaskError;

/// Splits a color-coded mask into one binary sub-mask per distinct
/// non-background color.
///
/// Pure over its input; pixels equal to [`ColorKey::BACKGROUND`] belong to
/// no instance. Sub-masks keep the source dimensions — the contour tracer
/// applies its own border padding, so callers always see image-frame
/// coordinates.
pub fn decompose(mask: &RgbImage) -> Result<BTreeMap<ColorKey, BinaryMask>, EmptyMaskError> {
    let (width, height) = mask.dimensions();
    let mut isolated: BTreeMap<ColorKey, BinaryMask> = BTreeMap::new();

    for (x, y, pixel) in mask.enumerate_pixels() {
        let [r, g, b] = pixel.0;
        let key = ColorKey::new(r, g, b);
        if key.is_background() {
            continue;
        }
        isolated
            .entry(key)
            .or_insert_with(|| BinaryMask::new(width, height))
            .set(x, y, true);
    }

    if isolated.is_empty() {
        return Err(EmptyMaskError);
    }
    Ok(isolated)
}

/// Loads a color-coded mask file as RGB pixels.
///
/// The file handle is released as soon as decoding finishes.
pub fn load_color_mask(path: &Path) -> Result<RgbImage, MaskcocoError> {
    let img = image::open(path).map_err(|source| MaskcocoError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(img.to_rgb8())
}

/// Loads a single-instance mask file as a binary mask, thresholding
/// grayscale values at the midpoint.
pub fn load_binary_mask(path: &Path) -> Result<BinaryMask, MaskcocoError> {
    let img = image::open(path).map_err(|source| MaskcocoError::ImageDecode {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(BinaryMask::from_gray(&img.to_luma8()))
}
