//! Image/mask pair matching.
//!
//! The assembler never globs on its own; this collaborator walks the two
//! directories, verifies their entry counts agree, and hands back matched
//! (image, mask) path pairs. Matching is by file stem: a mask belongs to an
//! image when the mask's stem starts with the image's stem, so
//! `plant_007.png` picks up `plant_007.png` as well as `plant_007_a.png`.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::error::MaskcocoError;

/// File extensions recognized as raster images, compared case-insensitively.
const IMAGE_EXTENSIONS: &[&str] = &["jpeg", "jpg", "png", "bmp"];

/// One image together with its matching mask files.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageMaskPair {
    pub image: PathBuf,
    pub masks: Vec<PathBuf>,
}

/// Walks both directories and pairs every image with its masks.
///
/// Fails with [`MaskcocoError::CountMismatch`] when the directories hold
/// different numbers of image entries, and with [`MaskcocoError::NoImages`]
/// when the image directory is empty; both checks run before any pairing
/// so a half-processed run cannot slip through. Results are sorted by
/// image path for reproducible iteration order.
pub fn matched_pairs(image_dir: &Path, mask_dir: &Path) -> Result<Vec<ImageMaskPair>, MaskcocoError> {
    let images = image_files(image_dir);
    let masks = image_files(mask_dir);

    if images.is_empty() {
        return Err(MaskcocoError::NoImages {
            path: image_dir.to_path_buf(),
        });
    }
    if images.len() != masks.len() {
        return Err(MaskcocoError::CountMismatch {
            image_dir: image_dir.to_path_buf(),
            mask_dir: mask_dir.to_path_buf(),
            images: images.len(),
            masks: masks.len(),
        });
    }

    let pairs = images
        .into_iter()
        .map(|image| {
            let stem = file_stem(&image);
            let matching = masks
                .iter()
                .filter(|m| file_stem(m).starts_with(&stem))
                .cloned()
                .collect();
            ImageMaskPair {
                image,
                masks: matching,
            }
        })
        .collect();

    Ok(pairs)
}

/// All recognized image files directly under `dir`, sorted by path.
pub fn image_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| has_image_extension(path))
        .collect();
    files.sort();
    files
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn touch(path: &Path) {
        fs::write(path, b"x").expect("write file");
    }

    #[test]
    fn pairs_match_by_stem_prefix() {
        let dir = tempfile::tempdir().expect("tempdir");
        let images = dir.path().join("images");
        let masks = dir.path().join("masks");
        fs::create_dir_all(&images).unwrap();
        fs::create_dir_all(&masks).unwrap();

        touch(&images.join("plant_001.jpg"));
        touch(&images.join("plant_002.jpg"));
        touch(&masks.join("plant_001.png"));
        touch(&masks.join("plant_002_crowd.png"));

        let pairs = matched_pairs(&images, &masks).expect("pairs");
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].masks, vec![masks.join("plant_001.png")]);
        assert_eq!(pairs[1].masks, vec![masks.join("plant_002_crowd.png")]);
    }

    #[test]
    fn count_mismatch_is_fatal_and_reports_both_counts() {
        let dir = tempfile::tempdir().expect("tempdir");
        let images = dir.path().join("images");
        let masks = dir.path().join("masks");
        fs::create_dir_all(&images).unwrap();
        fs::create_dir_all(&masks).unwrap();

        touch(&images.join("a.png"));
        touch(&images.join("b.png"));
        touch(&masks.join("a.png"));

        let err = matched_pairs(&images, &masks).unwrap_err();
        match err {
            MaskcocoError::CountMismatch { images, masks, .. } => {
                assert_eq!(images, 2);
                assert_eq!(masks, 1);
            }
            other => panic!("expected CountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn empty_image_dir_is_fatal() {
        let dir = tempfile::tempdir().expect("tempdir");
        let images = dir.path().join("images");
        let masks = dir.path().join("masks");
        fs::create_dir_all(&images).unwrap();
        fs::create_dir_all(&masks).unwrap();

        assert!(matches!(
            matched_pairs(&images, &masks),
            Err(MaskcocoError::NoImages { .. })
        ));
    }

    #[test]
    fn non_image_files_are_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("b.JPG"));
        touch(&dir.path().join("notes.txt"));
        touch(&dir.path().join("no_extension"));

        let files = image_files(dir.path());
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn listing_is_sorted() {
        let dir = tempfile::tempdir().expect("tempdir");
        touch(&dir.path().join("c.png"));
        touch(&dir.path().join("a.png"));
        touch(&dir.path().join("b.png"));

        let names: Vec<String> = image_files(dir.path())
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.png", "b.png", "c.png"]);
    }
}
