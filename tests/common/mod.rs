use std::path::Path;

use image::{Rgb, RgbImage};

/// Writes a PNG mask of the given size with a list of colored rectangles:
/// `(x, y, width, height, [r, g, b])` on a black background.
pub fn write_mask_png(path: &Path, width: u32, height: u32, rects: &[(u32, u32, u32, u32, [u8; 3])]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create parent dir");
    }
    let mut img = RgbImage::new(width, height);
    for &(x0, y0, w, h, rgb) in rects {
        for y in y0..(y0 + h).min(height) {
            for x in x0..(x0 + w).min(width) {
                img.put_pixel(x, y, Rgb(rgb));
            }
        }
    }
    img.save(path).expect("write png mask");
}

/// Writes a plain black PNG, used both as a stand-in photo (so dimension
/// probing works) and as an all-background mask.
pub fn write_blank_png(path: &Path, width: u32, height: u32) {
    write_mask_png(path, width, height, &[]);
}
