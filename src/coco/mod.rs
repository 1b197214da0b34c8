//! COCO document model, JSON I/O and read-only views.
//!
//! The schema structs mirror the COCO 2017 instance-segmentation format
//! field for field. [`index`] provides the read-only accessor that
//! visualization collaborators use; nothing in this module mutates an
//! assembled document.

mod ids;
pub mod index;
pub mod io;
mod model;

pub use ids::{AnnotationId, CategoryId, ImageId, LicenseId};
pub use index::{decode_geometry, AnnotationIndex, DecodedGeometry, InstanceGeometry};
pub use model::{
    CocoAnnotation, CocoCategory, CocoDocument, CocoImage, CocoInfo, CocoLicense, Segmentation,
    SegmentationRle,
};
