//! Newtype IDs for the COCO document entities.
//!
//! Newtypes keep the four COCO ID spaces apart at compile time; a run-scoped
//! annotation counter can never be handed off as an image reference. All of
//! them serialize as bare JSON numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! coco_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            /// Creates a new ID.
            #[inline]
            pub fn new(id: u64) -> Self {
                Self(id)
            }

            /// Returns the underlying u64 value.
            #[inline]
            pub fn as_u64(&self) -> u64 {
                self.0
            }
        }

        impl From<u64> for $name {
            fn from(id: u64) -> Self {
                Self(id)
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!(stringify!($name), "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

coco_id! {
    /// Identifier of an image within one generated document.
    ImageId
}

coco_id! {
    /// Identifier of an annotation. Run-scoped and sequential, not a
    /// globally unique key.
    AnnotationId
}

coco_id! {
    /// Identifier of a category.
    CategoryId
}

coco_id! {
    /// Identifier of a license entry.
    LicenseId
}
