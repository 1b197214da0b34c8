//! Scaffolding of the two input documents from a raw directory pair.
//!
//! Datasets often arrive as bare `images/` and `masks/` folders. The
//! scaffolder walks the pair, verifies the counts line up, and writes a
//! starter `mask_definition.json` (one uniform color category per image)
//! plus a `dataset_info.json` that the convert step can consume directly.
//! Both files are plain JSON and meant to be hand-edited afterwards.

use std::fs;
use std::path::{Path, PathBuf};

use super::pairs::matched_pairs;
use super::{ColorCategory, DatasetInfoDoc, MaskDefinitions, MaskEntry};
use crate::coco::{CocoInfo, CocoLicense};
use crate::error::MaskcocoError;
use crate::mask::ColorKey;

/// Settings for generated definitions and dataset info.
#[derive(Clone, Debug)]
pub struct ScaffoldOptions {
    /// Paint color every mask is assumed to use.
    pub color: ColorKey,
    /// Category name assigned to that color.
    pub category: String,
    /// Supercategory grouping the category.
    pub super_category: String,
    /// Free-form dataset description for the `info` block.
    pub description: String,
    /// Contributor recorded in the `info` block.
    pub contributor: String,
    /// Dataset year, when known.
    pub year: Option<u32>,
}

impl Default for ScaffoldOptions {
    fn default() -> Self {
        Self {
            color: ColorKey::new(100, 100, 100),
            category: "object".to_string(),
            super_category: "things".to_string(),
            description: "COCO instance dataset".to_string(),
            contributor: String::new(),
            year: None,
        }
    }
}

/// Builds a mask definition document from matched image/mask pairs.
///
/// The count-mismatch check runs inside the pair matching, so a lopsided
/// directory pair fails here before anything is written. Keys are built as
/// `<dir-name>/<file-name>` relative to the dataset root.
pub fn scaffold_definitions(
    image_dir: &Path,
    mask_dir: &Path,
    opts: &ScaffoldOptions,
) -> Result<MaskDefinitions, MaskcocoError> {
    let pairs = matched_pairs(image_dir, mask_dir)?;

    let image_prefix = dir_name(image_dir);
    let mask_prefix = dir_name(mask_dir);

    let mut defs = MaskDefinitions::default();
    defs.super_categories
        .insert(opts.super_category.clone(), vec![opts.category.clone()]);

    for pair in pairs {
        // An image without any matching mask keeps the image's own file
        // name as the mask name, the same guess a human would pencil in.
        let mask_name = pair
            .masks
            .first()
            .unwrap_or(&pair.image)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let image_name = pair
            .image
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut color_categories = std::collections::BTreeMap::new();
        color_categories.insert(
            opts.color.to_string(),
            ColorCategory {
                category: opts.category.clone(),
                super_category: Some(opts.super_category.clone()),
            },
        );

        defs.masks.insert(
            format!("{image_prefix}/{image_name}"),
            MaskEntry {
                mask: format!("{mask_prefix}/{mask_name}"),
                color_categories,
            },
        );
    }

    Ok(defs)
}

/// Builds a default dataset info document for generated datasets.
pub fn default_dataset_info(opts: &ScaffoldOptions) -> DatasetInfoDoc {
    DatasetInfoDoc {
        info: CocoInfo {
            description: Some(opts.description.clone()),
            url: Some("http://cocodataset.org".to_string()),
            version: Some("1.0".to_string()),
            year: opts.year,
            contributor: (!opts.contributor.is_empty()).then(|| opts.contributor.clone()),
            date_created: None,
        },
        license: CocoLicense::new(1u64, "Attribution-NonCommercial-ShareAlike License")
            .with_url("http://creativecommons.org/licenses/by-nc-sa/2.0/"),
    }
}

/// Writes `mask_definition.json` and `dataset_info.json` under
/// `dataset_dir`, creating the directory when needed. Returns both paths.
pub fn write_scaffold(
    dataset_dir: &Path,
    image_dir: &Path,
    mask_dir: &Path,
    opts: &ScaffoldOptions,
) -> Result<(PathBuf, PathBuf), MaskcocoError> {
    let defs = scaffold_definitions(image_dir, mask_dir, opts)?;
    let info = default_dataset_info(opts);

    fs::create_dir_all(dataset_dir)?;

    let defs_path = dataset_dir.join("mask_definition.json");
    let defs_json =
        serde_json::to_string_pretty(&defs).map_err(|source| MaskcocoError::ScaffoldWrite {
            path: defs_path.clone(),
            source,
        })?;
    fs::write(&defs_path, defs_json)?;

    let info_path = dataset_dir.join("dataset_info.json");
    let info_json =
        serde_json::to_string_pretty(&info).map_err(|source| MaskcocoError::ScaffoldWrite {
            path: info_path.clone(),
            source,
        })?;
    fs::write(&info_path, info_json)?;

    Ok((defs_path, info_path))
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed_pair_dirs(root: &Path, names: &[&str]) -> (PathBuf, PathBuf) {
        let images = root.join("images");
        let masks = root.join("masks");
        fs::create_dir_all(&images).unwrap();
        fs::create_dir_all(&masks).unwrap();
        for name in names {
            fs::write(images.join(name), b"x").unwrap();
            fs::write(masks.join(name), b"x").unwrap();
        }
        (images, masks)
    }

    #[test]
    fn scaffold_covers_every_pair() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (images, masks) = seed_pair_dirs(dir.path(), &["a.png", "b.png"]);

        let defs =
            scaffold_definitions(&images, &masks, &ScaffoldOptions::default()).expect("scaffold");
        assert_eq!(defs.masks.len(), 2);

        let entry = &defs.masks["images/a.png"];
        assert_eq!(entry.mask, "masks/a.png");
        let assignment = &entry.color_categories["(100, 100, 100)"];
        assert_eq!(assignment.category, "object");
        assert_eq!(defs.super_categories["things"], vec!["object"]);
    }

    #[test]
    fn scaffold_fails_on_count_mismatch() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (images, masks) = seed_pair_dirs(dir.path(), &["a.png"]);
        fs::write(images.join("extra.png"), b"x").unwrap();

        let err = scaffold_definitions(&images, &masks, &ScaffoldOptions::default()).unwrap_err();
        assert!(matches!(err, MaskcocoError::CountMismatch { .. }));
    }

    #[test]
    fn written_scaffold_loads_back() {
        let dir = tempfile::tempdir().expect("tempdir");
        let (images, masks) = seed_pair_dirs(dir.path(), &["a.png"]);
        let dataset_dir = dir.path().join("dataset");

        let (defs_path, info_path) =
            write_scaffold(&dataset_dir, &images, &masks, &ScaffoldOptions::default())
                .expect("write scaffold");

        let defs = super::super::load_mask_definitions(&defs_path).expect("reload definitions");
        assert_eq!(defs.masks.len(), 1);

        let info = super::super::load_dataset_info(&info_path).expect("reload info");
        assert_eq!(info.license.id.as_u64(), 1);
        assert!(info.info.description.is_some());
    }

    #[test]
    fn default_info_has_both_required_blocks() {
        let info = default_dataset_info(&ScaffoldOptions::default());
        assert!(info.info.version.is_some());
        assert!(!info.license.name.is_empty());
    }
}
