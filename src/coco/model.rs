//! COCO 2017 instance-segmentation schema types.
//!
//! Field names and nesting match the published COCO format exactly so the
//! generated JSON interoperates with training frameworks and evaluation
//! tools. These are plain data structs: everything that computes geometry
//! lives in `geometry`, `rle` and `annotate`.

use serde::{Deserialize, Serialize};

use super::ids::{AnnotationId, CategoryId, ImageId, LicenseId};

/// A complete COCO document: `{info, licenses, images, annotations,
/// categories}`.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CocoDocument {
    #[serde(default)]
    pub info: CocoInfo,

    #[serde(default)]
    pub licenses: Vec<CocoLicense>,

    pub images: Vec<CocoImage>,

    pub annotations: Vec<CocoAnnotation>,

    pub categories: Vec<CocoCategory>,
}

/// The COCO `info` block.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CocoInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contributor: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_created: Option<String>,
}

/// A COCO license entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CocoLicense {
    pub id: LicenseId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl CocoLicense {
    /// Creates a new license entry.
    pub fn new(id: impl Into<LicenseId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            url: None,
        }
    }

    /// Sets the license URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// A COCO image entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: ImageId,
    pub width: u32,
    pub height: u32,
    pub file_name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<LicenseId>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_captured: Option<String>,
}

impl CocoImage {
    /// Creates a new image entry.
    pub fn new(
        id: impl Into<ImageId>,
        file_name: impl Into<String>,
        width: u32,
        height: u32,
    ) -> Self {
        Self {
            id: id.into(),
            file_name: file_name.into(),
            width,
            height,
            license: None,
            date_captured: None,
        }
    }

    /// Sets the license reference.
    pub fn with_license(mut self, license: impl Into<LicenseId>) -> Self {
        self.license = Some(license.into());
        self
    }

    /// Sets the capture date.
    pub fn with_date_captured(mut self, date: impl Into<String>) -> Self {
        self.date_captured = Some(date.into());
        self
    }
}

/// A COCO category entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: CategoryId,
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercategory: Option<String>,
}

impl CocoCategory {
    /// Creates a new category entry.
    pub fn new(id: impl Into<CategoryId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            supercategory: None,
        }
    }

    /// Sets the supercategory.
    pub fn with_supercategory(mut self, supercategory: impl Into<String>) -> Self {
        self.supercategory = Some(supercategory.into());
        self
    }
}

/// A COCO instance annotation.
///
/// `bbox` is `[x, y, width, height]` in the pixel coordinates of the
/// annotation's own frame. `area`, `bbox` and `segmentation` are always
/// derived from the same encoded representation: polygons when
/// `iscrowd == 0`, RLE when `iscrowd == 1`.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: AnnotationId,
    pub image_id: ImageId,
    pub category_id: CategoryId,
    pub iscrowd: u8,
    pub area: f64,
    pub bbox: [f64; 4],
    pub segmentation: Segmentation,
}

/// Segmentation geometry of one annotation.
///
/// COCO overloads the `segmentation` field: a list of flat polygon rings
/// for ordinary instances, an RLE object for crowds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Segmentation {
    Polygons(Vec<Vec<f64>>),
    Rle(SegmentationRle),
}

/// The COCO RLE segmentation object: `{counts, size: [height, width]}`.
///
/// Counts are kept signed on this boundary type because third-party files
/// occasionally carry negative runs; `Rle::from_raw_counts` clamps them and
/// reports the anomaly when the geometry is decoded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentationRle {
    pub counts: Vec<i64>,
    pub size: [u32; 2],
}

impl From<crate::rle::Rle> for SegmentationRle {
    fn from(rle: crate::rle::Rle) -> Self {
        Self {
            counts: rle.counts.iter().map(|&c| c as i64).collect(),
            size: [rle.h, rle.w],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_serializes_all_top_level_keys() {
        let doc = CocoDocument {
            images: vec![CocoImage::new(1u64, "img.png", 10, 10).with_license(1u64)],
            categories: vec![CocoCategory::new(1u64, "plant").with_supercategory("vegetation")],
            annotations: vec![],
            licenses: vec![CocoLicense::new(1u64, "CC BY 4.0")],
            ..Default::default()
        };
        let json = serde_json::to_value(&doc).unwrap();
        for key in ["info", "licenses", "images", "annotations", "categories"] {
            assert!(json.get(key).is_some(), "missing key {key}");
        }
        assert_eq!(json["images"][0]["file_name"], "img.png");
        assert_eq!(json["categories"][0]["supercategory"], "vegetation");
    }

    #[test]
    fn polygon_segmentation_serializes_as_nested_list() {
        let ann = CocoAnnotation {
            id: AnnotationId(1),
            image_id: ImageId(1),
            category_id: CategoryId(1),
            iscrowd: 0,
            area: 9.0,
            bbox: [2.0, 2.0, 3.0, 3.0],
            segmentation: Segmentation::Polygons(vec![vec![2.0, 2.0, 5.0, 2.0, 5.0, 5.0]]),
        };
        let json = serde_json::to_value(&ann).unwrap();
        assert_eq!(json["segmentation"][0][2], 5.0);
        assert_eq!(json["iscrowd"], 0);
    }

    #[test]
    fn rle_segmentation_serializes_as_object() {
        let ann = CocoAnnotation {
            id: AnnotationId(2),
            image_id: ImageId(1),
            category_id: CategoryId(1),
            iscrowd: 1,
            area: 9.0,
            bbox: [2.0, 2.0, 3.0, 3.0],
            segmentation: Segmentation::Rle(SegmentationRle {
                counts: vec![22, 3, 7, 3, 7, 3, 55],
                size: [10, 10],
            }),
        };
        let json = serde_json::to_value(&ann).unwrap();
        assert_eq!(json["segmentation"]["size"][0], 10);
        assert_eq!(json["segmentation"]["counts"][1], 3);
    }

    #[test]
    fn untagged_segmentation_deserializes_both_shapes() {
        let poly: Segmentation = serde_json::from_str("[[1.0, 2.0, 3.0, 4.0]]").unwrap();
        assert!(matches!(poly, Segmentation::Polygons(_)));

        let rle: Segmentation =
            serde_json::from_str(r#"{"counts": [5, -1, 4], "size": [5, 2]}"#).unwrap();
        match rle {
            Segmentation::Rle(rle) => {
                assert_eq!(rle.counts, vec![5, -1, 4]);
                assert_eq!(rle.size, [5, 2]);
            }
            Segmentation::Polygons(_) => panic!("expected RLE"),
        }
    }
}
