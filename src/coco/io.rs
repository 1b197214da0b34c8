//! COCO JSON reading and writing.
//!
//! The writer emits the document exactly as assembled; ids are already
//! sequential in generation order, so the output is deterministic for
//! identical inputs.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use super::model::CocoDocument;
use crate::error::MaskcocoError;

/// Reads a COCO document from a JSON file.
pub fn read_coco_json(path: &Path) -> Result<CocoDocument, MaskcocoError> {
    let file = File::open(path).map_err(MaskcocoError::Io)?;
    let reader = BufReader::new(file);

    serde_json::from_reader(reader).map_err(|source| MaskcocoError::CocoJsonParse {
        path: path.to_path_buf(),
        source,
    })
}

/// Writes a COCO document to a JSON file.
pub fn write_coco_json(path: &Path, doc: &CocoDocument) -> Result<(), MaskcocoError> {
    let file = File::create(path).map_err(MaskcocoError::Io)?;
    let writer = BufWriter::new(file);

    serde_json::to_writer_pretty(writer, doc).map_err(|source| MaskcocoError::CocoJsonWrite {
        path: path.to_path_buf(),
        source,
    })
}

/// Reads a COCO document from a JSON string.
///
/// Useful for testing without file I/O.
pub fn from_coco_str(json: &str) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_str(json)
}

/// Reads a COCO document from a byte slice.
///
/// Useful for fuzzing and processing raw bytes without UTF-8 validation
/// overhead.
pub fn from_coco_slice(bytes: &[u8]) -> Result<CocoDocument, serde_json::Error> {
    serde_json::from_slice(bytes)
}

/// Writes a COCO document to a JSON string.
pub fn to_coco_string(doc: &CocoDocument) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(doc)
}
