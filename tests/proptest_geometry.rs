//! Property tests for contour tracing and simplification.

use maskcoco::geometry::trace_polygons;
use maskcoco::mask::BinaryMask;
use proptest::prelude::*;

/// A single solid rectangle placed strictly inside a 20x20 mask; border
/// contact is exercised separately because the midline clamp changes the
/// enclosed area there.
fn arb_rect_mask() -> impl Strategy<Value = BinaryMask> {
    (1u32..14, 1u32..14, 2u32..=6, 2u32..=6).prop_map(|(x0, y0, w, h)| {
        BinaryMask::from_fn(20, 20, |x, y| {
            x >= x0 && x < x0 + w && y >= y0 && y < y0 + h
        })
    })
}

proptest! {
    #[test]
    fn raw_rings_are_closed(mask in arb_rect_mask()) {
        for poly in trace_polygons(&mask, 0.0) {
            prop_assert_eq!(poly.points().first(), poly.points().last());
        }
    }

    #[test]
    fn simplified_area_change_is_bounded(mask in arb_rect_mask(), tolerance in 0.0f64..1.0) {
        // Douglas-Peucker moves the boundary by at most `tolerance`, so the
        // enclosed area can shift by no more than tolerance x perimeter.
        let raw = trace_polygons(&mask, 0.0);
        let simplified = trace_polygons(&mask, tolerance);
        prop_assume!(raw.len() == 1 && simplified.len() == 1);

        let bound = tolerance * raw[0].perimeter() + 1e-9;
        let delta = (raw[0].area() - simplified[0].area()).abs();
        prop_assert!(delta <= bound, "area moved {delta} > bound {bound}");
    }

    #[test]
    fn zero_tolerance_keeps_raw_area_exact(mask in arb_rect_mask()) {
        let polys = trace_polygons(&mask, 0.0);
        prop_assert_eq!(polys.len(), 1);
        // A w x h pixel block traced on the midline encloses w*h minus the
        // four chamfered corners.
        let expected = mask.pixel_count() as f64 - 0.5;
        prop_assert!((polys[0].area() - expected).abs() < 1e-9);
    }

    #[test]
    fn shifting_a_shape_away_from_the_border_changes_area_only_by_the_clamp(
        side in 2u32..=5,
    ) {
        // The padding lets border-flush shapes close; the only area
        // difference against an interior placement is the clamped midline
        // overhang of the flush edge (half a pixel per flush unit).
        let flush = BinaryMask::from_fn(12, 12, |x, y| x < side && y >= 4 && y < 4 + side);
        let shifted = BinaryMask::from_fn(12, 12, |x, y| {
            x >= 3 && x < 3 + side && y >= 4 && y < 4 + side
        });

        let flush_polys = trace_polygons(&flush, 0.0);
        let shifted_polys = trace_polygons(&shifted, 0.0);
        prop_assert_eq!(flush_polys.len(), 1);
        prop_assert_eq!(shifted_polys.len(), 1);
        prop_assert_eq!(
            flush_polys[0].points().first(),
            flush_polys[0].points().last()
        );

        let max_loss = 0.5 * side as f64 + 0.5;
        let delta = (shifted_polys[0].area() - flush_polys[0].area()).abs();
        prop_assert!(delta <= max_loss, "delta {delta} > {max_loss}");
    }
}
