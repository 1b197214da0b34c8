//! Per-instance annotation building.
//!
//! One call of [`build_annotation`] turns one binary instance mask into one
//! COCO annotation record, or into nothing when the instance is too small
//! to be visible. All sizing and tolerance state is carried in an explicit
//! [`BuildOptions`] value, so calls are independent and the step can be
//! mapped over instances in any order.

use crate::coco::{AnnotationId, CategoryId, CocoAnnotation, ImageId, Segmentation};
use crate::geometry::{trace_polygons, Polygon};
use crate::mask::BinaryMask;
use crate::rle;

/// Immutable configuration for one annotation build.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BuildOptions {
    /// Polygon simplification tolerance in pixels; 0 keeps raw contours.
    pub tolerance: f64,
    /// Coordinate frame of the stored image, when it differs from the
    /// mask's native resolution. The mask is resampled to this size before
    /// any geometry or RLE extraction so bboxes and areas are reported in
    /// the space of the final image.
    pub target_size: Option<(u32, u32)>,
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            tolerance: 2.0,
            target_size: None,
        }
    }
}

/// Builds a COCO annotation for one instance mask.
///
/// Returns `None` when the instance is invisible: fewer than one square
/// pixel of foreground after resampling, or no polygon survives tracing
/// and simplification in non-crowd mode. Callers treat `None` as a
/// recoverable skip, not an error.
///
/// `is_crowd` selects the segmentation encoding, and with it the source of
/// `bbox` and `area`: crowds report RLE-derived values, ordinary instances
/// polygon-derived values. The two are never mixed within one record.
pub fn build_annotation(
    instance_mask: &BinaryMask,
    image_id: ImageId,
    annotation_id: AnnotationId,
    category_id: CategoryId,
    is_crowd: bool,
    opts: &BuildOptions,
) -> Option<CocoAnnotation> {
    let resized;
    let mask = match opts.target_size {
        Some((w, h)) if (w, h) != instance_mask.dimensions() => {
            resized = instance_mask.resized(w, h);
            &resized
        }
        _ => instance_mask,
    };

    // Resampling can shrink an instance out of existence.
    if mask.pixel_count() < 1 {
        return None;
    }

    let (segmentation, bbox, area) = if is_crowd {
        let encoded = rle::encode(mask);
        let bbox = rle::to_bbox(&encoded);
        let area = rle::area(&encoded) as f64;
        (Segmentation::Rle(encoded.into()), bbox, area)
    } else {
        let polygons = trace_polygons(mask, opts.tolerance);
        if polygons.is_empty() {
            return None;
        }
        let bbox = combined_bbox(&polygons);
        let area = polygons.iter().map(Polygon::area).sum();
        let rings = polygons.iter().map(Polygon::flatten).collect();
        (Segmentation::Polygons(rings), bbox, area)
    };

    Some(CocoAnnotation {
        id: annotation_id,
        image_id,
        category_id,
        iscrowd: is_crowd as u8,
        area,
        bbox,
        segmentation,
    })
}

/// Bounding box over every ring of a multi-polygon instance.
fn combined_bbox(polygons: &[Polygon]) -> [f64; 4] {
    let mut min_x = f64::INFINITY;
    let mut min_y = f64::INFINITY;
    let mut max_x = f64::NEG_INFINITY;
    let mut max_y = f64::NEG_INFINITY;
    for poly in polygons {
        let [x, y, w, h] = poly.bbox();
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x + w);
        max_y = max_y.max(y + h);
    }
    [min_x, min_y, max_x - min_x, max_y - min_y]
}
