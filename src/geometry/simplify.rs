//! Tolerance-bounded polyline simplification (Ramer-Douglas-Peucker).

use super::polygon::Point;

/// Simplifies a point chain, keeping every point whose perpendicular
/// deviation from the kept chain exceeds `tolerance`.
///
/// The first and last points are always kept, so a closed ring (first ==
/// last) stays closed. `tolerance <= 0` returns the chain unchanged.
pub(crate) fn douglas_peucker(points: &[Point], tolerance: f64) -> Vec<Point> {
    if tolerance <= 0.0 || points.len() <= 2 {
        return points.to_vec();
    }

    let mut keep = vec![0];
    split(points, 0, points.len() - 1, tolerance, &mut keep);
    keep.sort_unstable();
    keep.dedup();

    keep.into_iter().map(|i| points[i]).collect()
}

/// Recursive half of the algorithm: finds the point farthest from the
/// chord `points[start]..points[end]` and splits there if it deviates
/// more than the tolerance, otherwise keeps only the chord end.
fn split(points: &[Point], start: usize, end: usize, tolerance: f64, keep: &mut Vec<usize>) {
    if end <= start + 1 {
        keep.push(end);
        return;
    }

    let mut max_dist = 0.0;
    let mut max_idx = start;
    for i in (start + 1)..end {
        let dist = chord_distance(points[i], points[start], points[end]);
        if dist > max_dist {
            max_dist = dist;
            max_idx = i;
        }
    }

    if max_dist > tolerance {
        split(points, start, max_idx, tolerance, keep);
        split(points, max_idx, end, tolerance, keep);
    } else {
        keep.push(end);
    }
}

/// Perpendicular distance from `p` to the line through `a` and `b`.
///
/// For a closed ring the outermost chord is degenerate (a == b); the
/// distance to that single point is used instead.
fn chord_distance(p: Point, a: Point, b: Point) -> f64 {
    let dx = b.x - a.x;
    let dy = b.y - a.y;
    let len = dx.hypot(dy);
    if len == 0.0 {
        return p.distance_to(a);
    }
    ((p.x - a.x) * dy - (p.y - a.y) * dx).abs() / len
}
