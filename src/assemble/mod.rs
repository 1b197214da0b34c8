//! Dataset assembly: mask definitions in, COCO document out.
//!
//! The assembler consumes two JSON documents - the mask definition mapping
//! image files to mask files and color categories, and the dataset info
//! document carrying the COCO `info`/`license` blocks - then runs every
//! mask through decomposition and annotation building, accumulating the
//! final document plus a report of everything that was skipped.
//!
//! Processing is single-threaded and batch oriented: a run either completes
//! and yields one document, or fails before anything is written. Each mask
//! file is opened, decoded and dropped within one loop iteration.

pub mod pairs;
pub mod report;
pub mod scaffold;

pub use pairs::{matched_pairs, ImageMaskPair};
pub use report::{
    AssemblyCounts, AssemblyIssue, AssemblyIssueCode, AssemblyReport, AssemblySeverity,
};

use std::collections::BTreeMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::annotate::{build_annotation, BuildOptions};
use crate::coco::{
    AnnotationId, CategoryId, CocoCategory, CocoDocument, CocoImage, CocoInfo, CocoLicense,
    ImageId,
};
use crate::error::MaskcocoError;
use crate::mask::{self, ColorKey};

// ============================================================================
// Input documents
// ============================================================================

/// The mask definition document.
///
/// Maps dataset-relative image file names to their mask file and per-color
/// category assignments, and declares the category taxonomy. Both maps are
/// ordered, so image ids assigned in iteration order are reproducible
/// run-to-run.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MaskDefinitions {
    pub masks: BTreeMap<String, MaskEntry>,
    pub super_categories: BTreeMap<String, Vec<String>>,
}

/// One image's entry in the mask definition document.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaskEntry {
    /// Dataset-relative path of the color-coded mask file.
    pub mask: String,
    /// Category assignment per paint color, keyed by `"(r, g, b)"`.
    pub color_categories: BTreeMap<String, ColorCategory>,
}

/// A category assignment for one mask color.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorCategory {
    pub category: String,

    #[serde(
        default,
        alias = "super_categories",
        skip_serializing_if = "Option::is_none"
    )]
    pub super_category: Option<String>,
}

/// The dataset info document: COCO `info` block plus the license every
/// image in the run references.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DatasetInfoDoc {
    pub info: CocoInfo,
    pub license: CocoLicense,
}

/// Loads and validates the mask definition document.
pub fn load_mask_definitions(path: &Path) -> Result<MaskDefinitions, MaskcocoError> {
    if !path.is_file() {
        return Err(MaskcocoError::MissingMaskDefinition {
            path: path.to_path_buf(),
        });
    }
    let file = File::open(path).map_err(MaskcocoError::Io)?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        MaskcocoError::MaskDefinitionParse {
            path: path.to_path_buf(),
            source,
        }
    })
}

/// Loads the dataset info document, failing before any processing when the
/// top-level `info` or `license` key is absent.
pub fn load_dataset_info(path: &Path) -> Result<DatasetInfoDoc, MaskcocoError> {
    if !path.is_file() {
        return Err(MaskcocoError::MissingDatasetInfo {
            path: path.to_path_buf(),
        });
    }

    #[derive(Deserialize)]
    struct RawDatasetInfo {
        info: Option<CocoInfo>,
        license: Option<CocoLicense>,
    }

    let file = File::open(path).map_err(MaskcocoError::Io)?;
    let raw: RawDatasetInfo = serde_json::from_reader(BufReader::new(file)).map_err(|source| {
        MaskcocoError::DatasetInfoParse {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let info = raw.info.ok_or(MaskcocoError::MissingDatasetInfoKey {
        path: path.to_path_buf(),
        key: "info",
    })?;
    let license = raw.license.ok_or(MaskcocoError::MissingDatasetInfoKey {
        path: path.to_path_buf(),
        key: "license",
    })?;

    Ok(DatasetInfoDoc { info, license })
}

// ============================================================================
// Assembly
// ============================================================================

/// Immutable configuration for one assembly run.
#[derive(Clone, Debug, PartialEq)]
pub struct AssembleOptions {
    /// Polygon simplification tolerance in pixels.
    pub tolerance: f64,
    /// Emit RLE crowd annotations instead of polygons.
    pub is_crowd: bool,
    /// Resample masks (and report image dimensions) at this size.
    pub resize: Option<(u32, u32)>,
    /// Keep images whose masks yielded zero annotations. The default
    /// policy excludes them from `images[]`; either way the choice applies
    /// uniformly to the whole run and is surfaced in the report.
    pub keep_empty_images: bool,
    /// First annotation id of the run.
    pub annotation_id_base: u64,
}

impl Default for AssembleOptions {
    fn default() -> Self {
        Self {
            tolerance: 2.0,
            is_crowd: false,
            resize: None,
            keep_empty_images: false,
            annotation_id_base: 1,
        }
    }
}

/// Builds the category list from the taxonomy, assigning ids from 1 in
/// iteration order (0 is reserved for the background), and returns the
/// name -> id lookup used to resolve color assignments.
pub fn build_categories(
    defs: &MaskDefinitions,
) -> (Vec<CocoCategory>, BTreeMap<String, CategoryId>) {
    let mut categories = Vec::new();
    let mut by_name = BTreeMap::new();
    let mut next = 1u64;

    for (super_category, names) in &defs.super_categories {
        for name in names {
            categories.push(
                CocoCategory::new(next, name.clone()).with_supercategory(super_category.clone()),
            );
            by_name.insert(name.clone(), CategoryId::new(next));
            next += 1;
        }
    }

    (categories, by_name)
}

/// Runs the full conversion and returns the document plus its report.
///
/// Image ids run sequentially from 1 in definition order; annotation ids
/// run from `annotation_id_base` and advance once per emitted annotation,
/// so the emitted sequence is gapless. I/O or decode failure on any mask
/// file aborts the run: a partially annotated document is never returned.
pub fn assemble(
    dataset_dir: &Path,
    defs: &MaskDefinitions,
    dataset_info: &DatasetInfoDoc,
    opts: &AssembleOptions,
) -> Result<(CocoDocument, AssemblyReport), MaskcocoError> {
    let (categories, ids_by_name) = build_categories(defs);
    let mut report = AssemblyReport::new();
    let mut images = Vec::new();
    let mut annotations = Vec::new();

    let license_id = dataset_info.license.id;
    let mut next_annotation_id = opts.annotation_id_base;

    let build_opts = BuildOptions {
        tolerance: opts.tolerance,
        target_size: opts.resize,
    };

    for (index, (file_name, entry)) in defs.masks.iter().enumerate() {
        let image_id = ImageId::new(index as u64 + 1);
        let image_path = dataset_dir.join(file_name);
        let mask_path = dataset_dir.join(&entry.mask);

        let category_map = resolve_color_categories(entry, &ids_by_name)?;

        let (width, height) = match opts.resize {
            Some(size) => size,
            None => probe_dimensions(&image_path)?,
        };
        let image_entry = CocoImage::new(image_id, file_name.clone(), width, height)
            .with_license(license_id);

        // The raster lives only for this iteration; the handle is released
        // as soon as decoding finishes.
        let raster = mask::load_color_mask(&mask_path)?;

        report.counts.images_in += 1;
        let mut emitted = 0usize;

        match mask::decompose(&raster) {
            Ok(instances) => {
                for (color, instance) in &instances {
                    let Some(&category_id) = category_map.get(color) else {
                        // Permissive by policy: stray anti-aliased colors are
                        // common in hand-painted masks.
                        report.counts.skipped_instances += 1;
                        report.add(AssemblyIssue::warning(
                            AssemblyIssueCode::UnknownMaskColor,
                            format!(
                                "color {color} in {} has no category; check for a missing \
                                 category or antialiasing",
                                entry.mask
                            ),
                        ));
                        continue;
                    };

                    match build_annotation(
                        instance,
                        image_id,
                        AnnotationId::new(next_annotation_id),
                        category_id,
                        opts.is_crowd,
                        &build_opts,
                    ) {
                        Some(annotation) => {
                            annotations.push(annotation);
                            next_annotation_id += 1;
                            emitted += 1;
                        }
                        None => {
                            report.counts.skipped_instances += 1;
                            report.add(AssemblyIssue::warning(
                                AssemblyIssueCode::InvisibleInstance,
                                format!(
                                    "instance {color} in {} produced no visible geometry",
                                    entry.mask
                                ),
                            ));
                        }
                    }
                }
            }
            Err(_) => {
                report.add(AssemblyIssue::warning(
                    AssemblyIssueCode::EmptyMask,
                    format!("mask {} contains no instances", entry.mask),
                ));
            }
        }

        if emitted > 0 {
            images.push(image_entry);
        } else if opts.keep_empty_images {
            images.push(image_entry);
            report.add(AssemblyIssue::info(
                AssemblyIssueCode::EmptyImageKept,
                format!("image {file_name} kept with no annotations"),
            ));
        } else {
            report.add(AssemblyIssue::warning(
                AssemblyIssueCode::EmptyImageExcluded,
                format!("image {file_name} excluded: no annotations"),
            ));
        }
    }

    report.counts.images_out = images.len();
    report.counts.annotations = annotations.len();

    let doc = CocoDocument {
        info: dataset_info.info.clone(),
        licenses: vec![dataset_info.license.clone()],
        images,
        annotations,
        categories,
    };

    Ok((doc, report))
}

/// Resolves one entry's color assignments against the taxonomy.
///
/// A malformed color key or a category name missing from
/// `super_categories` is a configuration error, fatal before any pixel of
/// this mask is processed.
fn resolve_color_categories(
    entry: &MaskEntry,
    ids_by_name: &BTreeMap<String, CategoryId>,
) -> Result<BTreeMap<ColorKey, CategoryId>, MaskcocoError> {
    let mut map = BTreeMap::new();
    for (key, assignment) in &entry.color_categories {
        let color: ColorKey = key.parse().map_err(|_| MaskcocoError::BadColorKey {
            key: key.clone(),
            mask: entry.mask.clone(),
        })?;
        let category_id = ids_by_name
            .get(&assignment.category)
            .copied()
            .ok_or_else(|| MaskcocoError::UnknownCategory {
                color: color.to_string(),
                name: assignment.category.clone(),
            })?;
        map.insert(color, category_id);
    }
    Ok(map)
}

fn probe_dimensions(path: &Path) -> Result<(u32, u32), MaskcocoError> {
    let size = imagesize::size(path).map_err(|source| MaskcocoError::ImageDimensions {
        path: path.to_path_buf(),
        source,
    })?;
    Ok((size.width as u32, size.height as u32))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn taxonomy() -> MaskDefinitions {
        let defs = r#"{
            "masks": {},
            "super_categories": {
                "vegetation": ["fern", "moss"],
                "animal": ["owl"]
            }
        }"#;
        serde_json::from_str(defs).expect("parse definitions")
    }

    #[test]
    fn categories_assigned_from_one_in_order() {
        let (categories, by_name) = build_categories(&taxonomy());
        assert_eq!(categories.len(), 3);
        // BTreeMap iteration: animal before vegetation.
        assert_eq!(categories[0].name, "owl");
        assert_eq!(categories[0].id, CategoryId(1));
        assert_eq!(categories[0].supercategory.as_deref(), Some("animal"));
        assert_eq!(categories[1].name, "fern");
        assert_eq!(categories[2].name, "moss");
        assert_eq!(by_name["moss"], CategoryId(3));
    }

    #[test]
    fn color_resolution_rejects_unknown_category() {
        let (_, by_name) = build_categories(&taxonomy());
        let entry: MaskEntry = serde_json::from_str(
            r#"{
                "mask": "masks/a.png",
                "color_categories": {"(10, 20, 30)": {"category": "dragon"}}
            }"#,
        )
        .unwrap();

        let err = resolve_color_categories(&entry, &by_name).unwrap_err();
        assert!(matches!(err, MaskcocoError::UnknownCategory { .. }));
    }

    #[test]
    fn color_resolution_rejects_malformed_key() {
        let (_, by_name) = build_categories(&taxonomy());
        let entry: MaskEntry = serde_json::from_str(
            r#"{
                "mask": "masks/a.png",
                "color_categories": {"10-20-30": {"category": "owl"}}
            }"#,
        )
        .unwrap();

        let err = resolve_color_categories(&entry, &by_name).unwrap_err();
        assert!(matches!(err, MaskcocoError::BadColorKey { .. }));
    }

    #[test]
    fn definition_document_roundtrips_with_super_category_alias() {
        let json = r#"{
            "masks": {
                "images/a.png": {
                    "mask": "masks/a.png",
                    "color_categories": {
                        "(100, 100, 100)": {
                            "category": "fern",
                            "super_categories": "vegetation"
                        }
                    }
                }
            },
            "super_categories": {"vegetation": ["fern"]}
        }"#;
        let defs: MaskDefinitions = serde_json::from_str(json).expect("parse definitions");
        let entry = &defs.masks["images/a.png"];
        let assignment = &entry.color_categories["(100, 100, 100)"];
        assert_eq!(assignment.category, "fern");
        assert_eq!(assignment.super_category.as_deref(), Some("vegetation"));
    }

    #[test]
    fn dataset_info_requires_info_and_license() {
        let dir = tempfile::tempdir().expect("tempdir");

        let no_license = dir.path().join("no_license.json");
        std::fs::write(&no_license, r#"{"info": {"description": "d"}}"#).unwrap();
        let err = load_dataset_info(&no_license).unwrap_err();
        assert!(matches!(
            err,
            MaskcocoError::MissingDatasetInfoKey { key: "license", .. }
        ));

        let no_info = dir.path().join("no_info.json");
        std::fs::write(&no_info, r#"{"license": {"id": 1, "name": "CC0"}}"#).unwrap();
        let err = load_dataset_info(&no_info).unwrap_err();
        assert!(matches!(
            err,
            MaskcocoError::MissingDatasetInfoKey { key: "info", .. }
        ));
    }

    #[test]
    fn missing_definition_file_is_descriptive() {
        let err = load_mask_definitions(Path::new("nope/mask_definition.json")).unwrap_err();
        assert!(matches!(err, MaskcocoError::MissingMaskDefinition { .. }));
    }
}
