//! Read-only per-image view over an assembled document.
//!
//! Visualization and inspection collaborators only ever read annotations;
//! this index gives them, per image, the ordered annotation records plus
//! the decoded geometry in image pixel coordinates. It never mutates the
//! underlying document.

use std::collections::BTreeMap;

use super::ids::ImageId;
use super::model::{CocoAnnotation, CocoDocument, Segmentation};
use crate::geometry::Polygon;
use crate::mask::BinaryMask;
use crate::rle::{self, Rle};

/// Decoded segmentation geometry of one annotation.
#[derive(Clone, Debug)]
pub enum InstanceGeometry {
    /// Polygon rings in image pixel coordinates (`iscrowd == 0`).
    Polygons(Vec<Polygon>),
    /// Decoded binary mask (`iscrowd == 1`).
    Mask(BinaryMask),
}

/// Result of decoding one annotation's geometry.
#[derive(Clone, Debug)]
pub struct DecodedGeometry {
    pub geometry: InstanceGeometry,
    /// Number of negative RLE counts clamped to zero during decoding.
    /// Non-zero values indicate corrupt or third-party data and should be
    /// surfaced as a recoverable anomaly, not an error.
    pub clamped_counts: usize,
}

/// An index of a document's annotations grouped by image.
pub struct AnnotationIndex<'a> {
    by_image: BTreeMap<ImageId, Vec<&'a CocoAnnotation>>,
}

impl<'a> AnnotationIndex<'a> {
    /// Groups the document's annotations by `image_id`, preserving document
    /// order within each image.
    pub fn new(doc: &'a CocoDocument) -> Self {
        let mut by_image: BTreeMap<ImageId, Vec<&'a CocoAnnotation>> = BTreeMap::new();
        for ann in &doc.annotations {
            by_image.entry(ann.image_id).or_default().push(ann);
        }
        Self { by_image }
    }

    /// The ordered annotations of one image; empty when the image has none.
    pub fn for_image(&self, image_id: ImageId) -> &[&'a CocoAnnotation] {
        self.by_image
            .get(&image_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Image ids that carry at least one annotation, ascending.
    pub fn annotated_images(&self) -> impl Iterator<Item = ImageId> + '_ {
        self.by_image.keys().copied()
    }
}

/// Decodes an annotation's segmentation into pixel-space geometry.
pub fn decode_geometry(ann: &CocoAnnotation) -> DecodedGeometry {
    match &ann.segmentation {
        Segmentation::Polygons(rings) => DecodedGeometry {
            geometry: InstanceGeometry::Polygons(
                rings.iter().map(|flat| Polygon::from_flat(flat)).collect(),
            ),
            clamped_counts: 0,
        },
        Segmentation::Rle(seg) => {
            let [h, w] = seg.size;
            let (rle, clamped_counts): (Rle, usize) = Rle::from_raw_counts(&seg.counts, h, w);
            DecodedGeometry {
                geometry: InstanceGeometry::Mask(rle::decode(&rle)),
                clamped_counts,
            }
        }
    }
}
