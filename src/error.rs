use std::path::PathBuf;
use thiserror::Error;

use crate::mask::EmptyMaskError;

/// The main error type for maskcoco operations.
///
/// Configuration and I/O failures are fatal for the whole run: no output
/// document is written and the CLI exits non-zero. Per-instance anomalies
/// never surface here; they are collected in the assembly report instead.
#[derive(Debug, Error)]
pub enum MaskcocoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("mask definition file was not found: {path}")]
    MissingMaskDefinition { path: PathBuf },

    #[error("dataset info file was not found: {path}")]
    MissingDatasetInfo { path: PathBuf },

    #[error("Failed to parse mask definition JSON from {path}: {source}")]
    MaskDefinitionParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse dataset info JSON from {path}: {source}")]
    DatasetInfoParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("dataset info JSON was missing \"{key}\" ({path})")]
    MissingDatasetInfoKey { path: PathBuf, key: &'static str },

    #[error("invalid color key '{key}' in mask definition for {mask}")]
    BadColorKey { key: String, mask: String },

    #[error("color {color} is assigned to category '{name}', which is not listed under super_categories")]
    UnknownCategory { color: String, name: String },

    #[error(
        "image and mask directories hold different entry counts: \
         {image_dir} has {images}, {mask_dir} has {masks}"
    )]
    CountMismatch {
        image_dir: PathBuf,
        mask_dir: PathBuf,
        images: usize,
        masks: usize,
    },

    #[error("no images found in {path}")]
    NoImages { path: PathBuf },

    #[error("Failed to decode image {path}: {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("Failed to read dimensions of {path}: {source}")]
    ImageDimensions {
        path: PathBuf,
        #[source]
        source: imagesize::ImageError,
    },

    #[error("Failed to write scaffold JSON to {path}: {source}")]
    ScaffoldWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to parse COCO JSON from {path}: {source}")]
    CocoJsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write COCO JSON to {path}: {source}")]
    CocoJsonWrite {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("no image with id {0} in the document")]
    UnknownImageId(u64),

    #[error(transparent)]
    EmptyMask(#[from] EmptyMaskError),
}
