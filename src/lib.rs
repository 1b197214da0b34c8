//! Maskcoco: segmentation masks in, COCO annotations out.
//!
//! Maskcoco converts pixel-level segmentation masks - one color-coded mask
//! per image, every instance painted a distinct RGB color - into the COCO
//! instance-segmentation JSON format: traced polygons or run-length
//! encoded crowds, with bounding boxes and areas derived from the same
//! representation as the segmentation itself.
//!
//! # Modules
//!
//! - [`mask`]: raster mask loading, color keys, per-instance decomposition
//! - [`geometry`]: contour tracing and polygon simplification
//! - [`rle`]: COCO column-major run-length encoding
//! - [`annotate`]: per-instance annotation building
//! - [`assemble`]: dataset assembly, pair matching, scaffolding, reports
//! - [`coco`]: COCO schema types, JSON I/O and read-only views
//! - [`error`]: error types for maskcoco operations

pub mod annotate;
pub mod assemble;
pub mod coco;
pub mod error;
pub mod geometry;
pub mod mask;
pub mod rle;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

pub use error::MaskcocoError;

use assemble::scaffold::{write_scaffold, ScaffoldOptions};
use assemble::{assemble, load_dataset_info, load_mask_definitions, AssembleOptions};
use coco::{decode_geometry, AnnotationIndex, ImageId, InstanceGeometry};
use mask::ColorKey;

/// The maskcoco CLI application.
#[derive(Parser)]
#[command(name = "maskcoco")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Convert mask files into one COCO instance annotation document.
    Convert(ConvertArgs),

    /// Generate starter mask definition and dataset info documents from an
    /// images/masks directory pair.
    Scaffold(ScaffoldArgs),

    /// Summarize a COCO document image by image.
    Inspect(InspectArgs),
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Dataset root directory; mask definition paths resolve against it.
    dataset_dir: PathBuf,

    /// Mask definition JSON, relative to the dataset dir unless absolute.
    #[arg(long, default_value = "mask_definition.json")]
    mask_definition: PathBuf,

    /// Dataset info JSON, relative to the dataset dir unless absolute.
    #[arg(long, default_value = "dataset_info.json")]
    dataset_info: PathBuf,

    /// Output COCO JSON, relative to the dataset dir unless absolute.
    #[arg(long, default_value = "coco_instances.json")]
    output: PathBuf,

    /// Polygon simplification tolerance in pixels (0 keeps raw contours).
    #[arg(long, default_value_t = 2.0)]
    tolerance: f64,

    /// Emit RLE crowd annotations instead of polygons.
    #[arg(long)]
    crowd: bool,

    /// Resample masks to WIDTHxHEIGHT before annotating, e.g. '640x896'.
    #[arg(long, value_parser = parse_size)]
    resize: Option<(u32, u32)>,

    /// Keep images whose masks produced zero annotations.
    #[arg(long)]
    keep_empty_images: bool,

    /// First annotation id of the run.
    #[arg(long, default_value_t = 1)]
    annotation_id_base: u64,

    /// Suppress the assembly report.
    #[arg(long)]
    quiet: bool,
}

/// Arguments for the scaffold subcommand.
#[derive(clap::Args)]
struct ScaffoldArgs {
    /// Directory the generated documents are written into.
    dataset_dir: PathBuf,

    /// Image directory, relative to the dataset dir unless absolute.
    #[arg(long, default_value = "images")]
    images: PathBuf,

    /// Mask directory, relative to the dataset dir unless absolute.
    #[arg(long, default_value = "masks")]
    masks: PathBuf,

    /// Paint color assumed for every mask, as '(r, g, b)'.
    #[arg(long, default_value = "(100, 100, 100)", value_parser = parse_color)]
    color: ColorKey,

    /// Category name assigned to that color.
    #[arg(long, default_value = "object")]
    category: String,

    /// Supercategory grouping the category.
    #[arg(long, default_value = "things")]
    super_category: String,

    /// Dataset description for the info block.
    #[arg(long, default_value = "COCO instance dataset")]
    description: String,

    /// Contributor recorded in the info block.
    #[arg(long, default_value = "")]
    contributor: String,

    /// Dataset year.
    #[arg(long)]
    year: Option<u32>,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// COCO JSON document to inspect.
    input: PathBuf,

    /// Only show this image id.
    #[arg(long)]
    image_id: Option<u64>,
}

/// Run the maskcoco CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), MaskcocoError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Convert(args)) => run_convert(args),
        Some(Commands::Scaffold(args)) => run_scaffold(args),
        Some(Commands::Inspect(args)) => run_inspect(args),
        None => {
            println!("maskcoco {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Convert segmentation masks into COCO instance annotations.");
            println!();
            println!("Run 'maskcoco --help' for usage information.");
            Ok(())
        }
    }
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), MaskcocoError> {
    let definition_path = resolve(&args.dataset_dir, &args.mask_definition);
    let info_path = resolve(&args.dataset_dir, &args.dataset_info);
    let output_path = resolve(&args.dataset_dir, &args.output);

    let definitions = load_mask_definitions(&definition_path)?;
    let dataset_info = load_dataset_info(&info_path)?;

    let opts = AssembleOptions {
        tolerance: args.tolerance,
        is_crowd: args.crowd,
        resize: args.resize,
        keep_empty_images: args.keep_empty_images,
        annotation_id_base: args.annotation_id_base,
    };

    let (doc, report) = assemble(&args.dataset_dir, &definitions, &dataset_info, &opts)?;
    coco::io::write_coco_json(&output_path, &doc)?;

    if !args.quiet {
        println!("Wrote {}", output_path.display());
        print!("{report}");
    }

    Ok(())
}

/// Execute the scaffold subcommand.
fn run_scaffold(args: ScaffoldArgs) -> Result<(), MaskcocoError> {
    let image_dir = resolve(&args.dataset_dir, &args.images);
    let mask_dir = resolve(&args.dataset_dir, &args.masks);

    let opts = ScaffoldOptions {
        color: args.color,
        category: args.category,
        super_category: args.super_category,
        description: args.description,
        contributor: args.contributor,
        year: args.year,
    };

    let (defs_path, info_path) = write_scaffold(&args.dataset_dir, &image_dir, &mask_dir, &opts)?;
    println!("Wrote {}", defs_path.display());
    println!("Wrote {}", info_path.display());

    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), MaskcocoError> {
    let doc = coco::io::read_coco_json(&args.input)?;
    let index = AnnotationIndex::new(&doc);

    let selected: Vec<&coco::CocoImage> = match args.image_id {
        Some(id) => {
            let image = doc
                .images
                .iter()
                .find(|img| img.id == ImageId(id))
                .ok_or(MaskcocoError::UnknownImageId(id))?;
            vec![image]
        }
        None => doc.images.iter().collect(),
    };

    for image in selected {
        let annotations = index.for_image(image.id);
        println!(
            "image {} ({}, {}x{}): {} annotation(s)",
            image.id,
            image.file_name,
            image.width,
            image.height,
            annotations.len()
        );

        for &ann in annotations {
            let decoded = decode_geometry(ann);
            let shape = match &decoded.geometry {
                InstanceGeometry::Polygons(polys) => format!("{} polygon ring(s)", polys.len()),
                InstanceGeometry::Mask(mask) => {
                    format!("rle mask, {} px foreground", mask.pixel_count())
                }
            };
            println!(
                "  #{} category={} iscrowd={} area={:.2} bbox=[{:.1}, {:.1}, {:.1}, {:.1}] {}",
                ann.id,
                ann.category_id,
                ann.iscrowd,
                ann.area,
                ann.bbox[0],
                ann.bbox[1],
                ann.bbox[2],
                ann.bbox[3],
                shape
            );
            if decoded.clamped_counts > 0 {
                println!(
                    "    warning: {} negative RLE count(s) clamped to zero",
                    decoded.clamped_counts
                );
            }
        }
    }

    Ok(())
}

/// Resolves `path` against `base` unless it is already absolute.
fn resolve(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn parse_size(value: &str) -> Result<(u32, u32), String> {
    let (w, h) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{value}'"))?;
    let width = w
        .trim()
        .parse()
        .map_err(|_| format!("invalid width '{w}'"))?;
    let height = h
        .trim()
        .parse()
        .map_err(|_| format!("invalid height '{h}'"))?;
    Ok((width, height))
}

fn parse_color(value: &str) -> Result<ColorKey, String> {
    value.parse().map_err(|e| format!("{e}"))
}
