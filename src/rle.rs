//! COCO run-length encoding of binary masks.
//!
//! COCO RLE scans the mask in column-major (Fortran) order and records
//! alternating run lengths, always starting with a background run: a mask
//! whose first pixel is foreground gets a leading zero-length run so that
//! even-indexed counts are background and odd-indexed counts foreground.
//! The counts of a valid RLE always sum to `height * width`.

use crate::mask::BinaryMask;

/// An uncompressed run-length encoded binary mask.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Rle {
    /// Mask height in pixels.
    pub h: u32,
    /// Mask width in pixels.
    pub w: u32,
    /// Alternating background/foreground run lengths, column-major.
    pub counts: Vec<u32>,
}

impl Rle {
    /// Sum of all run lengths; `h * w` for a well-formed encoding.
    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| c as u64).sum()
    }

    /// Builds an RLE from externally supplied counts, e.g. parsed from a
    /// third-party COCO file.
    ///
    /// Negative counts are clamped to zero; the number of clamped runs is
    /// returned alongside so callers can surface the anomaly. Counts beyond
    /// `u32::MAX` are saturated.
    pub fn from_raw_counts(counts: &[i64], h: u32, w: u32) -> (Rle, usize) {
        let mut clamped = 0;
        let counts = counts
            .iter()
            .map(|&c| {
                if c < 0 {
                    clamped += 1;
                    0
                } else {
                    u32::try_from(c).unwrap_or(u32::MAX)
                }
            })
            .collect();
        (Rle { h, w, counts }, clamped)
    }
}

/// Encodes a binary mask as column-major RLE.
pub fn encode(mask: &BinaryMask) -> Rle {
    let (w, h) = mask.dimensions();

    let mut counts = Vec::new();
    let mut prev: u8 = 0;
    let mut run: u32 = 0;

    for x in 0..w {
        for y in 0..h {
            let v = mask.get(x, y);
            if v != prev {
                counts.push(run);
                run = 0;
                prev = v;
            }
            run += 1;
        }
    }
    counts.push(run);

    Rle { h, w, counts }
}

/// Decodes an RLE back to a binary mask of size `h * w`.
///
/// Runs past the end of the mask are truncated rather than trusted.
pub fn decode(rle: &Rle) -> BinaryMask {
    let mut mask = BinaryMask::new(rle.w, rle.h);
    let n = (rle.h as u64) * (rle.w as u64);

    let mut idx: u64 = 0;
    let mut v = false;
    for &c in &rle.counts {
        if v {
            let end = (idx + c as u64).min(n);
            for i in idx..end {
                // Column-major index i maps to column i / h, row i % h.
                let x = (i / rle.h as u64) as u32;
                let y = (i % rle.h as u64) as u32;
                mask.set(x, y, true);
            }
        }
        idx += c as u64;
        v = !v;
    }
    mask
}

/// Foreground pixel count of an RLE mask (sum of the odd-indexed runs).
pub fn area(rle: &Rle) -> u64 {
    rle.counts
        .iter()
        .enumerate()
        .filter(|(i, _)| i % 2 == 1)
        .map(|(_, &c)| c as u64)
        .sum()
}

/// Bounding box `[x, y, width, height]` of an RLE mask, computed from the
/// run positions without decoding.
pub fn to_bbox(rle: &Rle) -> [f64; 4] {
    let h = rle.h as u64;
    if h == 0 || rle.w == 0 || rle.counts.is_empty() {
        return [0.0, 0.0, 0.0, 0.0];
    }

    let mut xs = rle.w as u64;
    let mut xe: u64 = 0;
    let mut ys = h;
    let mut ye: u64 = 0;
    let mut any = false;

    let mut offset: u64 = 0;
    for (i, &c) in rle.counts.iter().enumerate() {
        let c = c as u64;
        if i % 2 == 1 && c > 0 {
            any = true;
            let x1 = offset / h;
            let y1 = offset % h;
            let last = offset + c - 1;
            let x2 = last / h;
            let y2 = last % h;

            xs = xs.min(x1);
            xe = xe.max(x2 + 1);
            ys = ys.min(y1);
            ye = ye.max(y2 + 1);
            // A run spanning several columns covers whole columns in between.
            if x1 != x2 {
                ys = 0;
                ye = h;
            }
        }
        offset += c;
    }

    if !any {
        return [0.0, 0.0, 0.0, 0.0];
    }

    [xs as f64, ys as f64, (xe - xs) as f64, (ye - ys) as f64]
}
