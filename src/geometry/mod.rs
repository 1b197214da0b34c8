//! Contour extraction from binary instance masks.
//!
//! The tracer walks a marching-squares pass over the mask at the 0/1
//! midpoint iso-level, so every contour point lies on the midline between a
//! foreground and a background pixel. The mask is padded with one pixel of
//! background on every edge before tracing (and the padding subtracted from
//! every output coordinate), which lets shapes that bleed up to the image
//! border close into proper rings.

mod polygon;
mod simplify;

pub use polygon::{Point, Polygon};

use std::collections::HashMap;

use crate::mask::BinaryMask;

/// Rings enclosing less area than this are discarded as tracing noise.
pub const MIN_POLYGON_AREA: f64 = 0.1;

/// Traces the contours of a binary mask and reduces them to simplified
/// polygons in the mask's own pixel coordinates.
///
/// Per ring, in order:
/// - simplify with `tolerance` (0 keeps the raw midline ring);
/// - drop rings left with fewer than 3 points;
/// - collapse rings that fold into disjoint lobes (self-intersection after
///   simplification) to the convex hull of their points;
/// - drop rings enclosing no more than [`MIN_POLYGON_AREA`].
///
/// A mask without foreground yields an empty list, not an error.
pub fn trace_polygons(mask: &BinaryMask, tolerance: f64) -> Vec<Polygon> {
    trace_rings(mask)
        .into_iter()
        .filter_map(|ring| {
            let simplified = ring.simplify(tolerance);
            if simplified.len() < 3 {
                return None;
            }
            let poly = if simplified.is_self_intersecting() {
                simplified.convex_hull()
            } else {
                simplified
            };
            (poly.area() > MIN_POLYGON_AREA).then_some(poly)
        })
        .collect()
}

/// A contour segment endpoint.
///
/// Nodes sit on pixel-edge midpoints of the padded grid; coordinates are
/// stored doubled so they stay integral and hashable.
type Node = (u32, u32);

/// Marching squares over the (virtually) padded mask.
///
/// Returns closed rings of raw midline points, already shifted back into
/// the unpadded coordinate frame with (row, col) swapped to (x, y). Border
/// contact would produce -0.5 coordinates after the shift; those clamp to 0.
fn trace_rings(mask: &BinaryMask) -> Vec<Polygon> {
    let (width, height) = mask.dimensions();
    // Padded grid dimensions; cell (r, c) spans padded rows r..r+1, cols c..c+1.
    let rows = height + 2;
    let cols = width + 2;

    // Reads the padded grid without materializing it.
    let at = |r: u32, c: u32| -> u8 {
        if r == 0 || c == 0 || r + 1 >= rows || c + 1 >= cols {
            0
        } else {
            mask.get(c - 1, r - 1)
        }
    };

    let mut segments: Vec<(Node, Node)> = Vec::new();
    let mut touching: HashMap<Node, [usize; 2]> = HashMap::new();

    fn link(
        touching: &mut HashMap<Node, [usize; 2]>,
        segments: &mut Vec<(Node, Node)>,
        a: Node,
        b: Node,
    ) {
        let id = segments.len();
        segments.push((a, b));
        for node in [a, b] {
            let slots = touching.entry(node).or_insert([usize::MAX; 2]);
            if slots[0] == usize::MAX {
                slots[0] = id;
            } else {
                slots[1] = id;
            }
        }
    }

    for r in 0..rows - 1 {
        for c in 0..cols - 1 {
            let tl = at(r, c);
            let tr = at(r, c + 1);
            let br = at(r + 1, c + 1);
            let bl = at(r + 1, c);
            let case = (tl << 3) | (tr << 2) | (br << 1) | bl;
            if case == 0 || case == 15 {
                continue;
            }

            // Edge midpoints of this cell, in doubled (row, col) units.
            let top = (2 * r, 2 * c + 1);
            let right = (2 * r + 1, 2 * c + 2);
            let bottom = (2 * r + 2, 2 * c + 1);
            let left = (2 * r + 1, 2 * c);

            match case {
                1 | 14 => link(&mut touching, &mut segments, left, bottom),
                2 | 13 => link(&mut touching, &mut segments, bottom, right),
                3 | 12 => link(&mut touching, &mut segments, left, right),
                4 | 11 => link(&mut touching, &mut segments, top, right),
                6 | 9 => link(&mut touching, &mut segments, top, bottom),
                7 | 8 => link(&mut touching, &mut segments, top, left),
                // Saddles: keep the two foreground corners disconnected,
                // matching the midline convention for binary data.
                5 => {
                    link(&mut touching, &mut segments, top, right);
                    link(&mut touching, &mut segments, bottom, left);
                }
                10 => {
                    link(&mut touching, &mut segments, top, left);
                    link(&mut touching, &mut segments, bottom, right);
                }
                _ => unreachable!("cell case is masked to 4 bits"),
            }
        }
    }

    // Chain segments into closed rings. Every node has exactly two incident
    // segments (the padding guarantees no contour exits the grid), so each
    // walk returns to its starting node.
    let mut visited = vec![false; segments.len()];
    let mut rings = Vec::new();

    for start in 0..segments.len() {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let (origin, mut current) = segments[start];
        let mut prev = start;
        let mut nodes = vec![origin];

        while current != origin {
            nodes.push(current);
            let slots = touching[&current];
            let next = if slots[0] == prev { slots[1] } else { slots[0] };
            visited[next] = true;
            let (a, b) = segments[next];
            current = if a == current { b } else { a };
            prev = next;
        }

        let points = nodes
            .into_iter()
            .map(|(r2, c2)| {
                // Halve back to padded coordinates, subtract the padding,
                // swap (row, col) to (x, y), clamp border underflow.
                let y = (r2 as f64 / 2.0 - 1.0).max(0.0);
                let x = (c2 as f64 / 2.0 - 1.0).max(0.0);
                Point::new(x, y)
            })
            .collect();
        rings.push(Polygon::new(points));
    }

    rings
}
