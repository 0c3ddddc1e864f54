//! Imagetxt: reader and writer for line-oriented multi-label image
//! annotations.
//!
//! Imagetxt decodes and encodes plain-text annotation directories in which
//! each subset is one `.txt` file mapping image identifiers to sets of
//! integer label ids, and an ordered labels file (`synsets.txt` by default)
//! assigns meaning to each id by position.
//!
//! # Modules
//!
//! - [`dataset`]: the in-memory model (catalog, items, subsets) and the
//!   txt format codec
//! - [`format`]: the format plugin surface used by the CLI
//! - [`error`]: error types for imagetxt operations

pub mod dataset;
pub mod error;
pub mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde::Serialize;

use dataset::io_txt::{read_txt_dir_with_config, TxtConfig};
use dataset::Dataset;

pub use error::ImagetxtError;

/// The imagetxt CLI application.
#[derive(Parser)]
#[command(name = "imagetxt")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Decode a dataset root and report its contents.
    Inspect(InspectArgs),

    /// Decode a dataset root and re-encode it into another directory.
    Convert(ConvertArgs),
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Dataset root directory.
    input: PathBuf,

    /// Labels file name or path (default 'synsets.txt').
    #[arg(long)]
    labels_file: Option<PathBuf>,

    /// Image subdirectory name (default 'images').
    #[arg(long)]
    image_dir: Option<String>,

    /// Output format for the report ('text' or 'json').
    #[arg(long, default_value = "text")]
    output: String,
}

/// Arguments for the convert subcommand.
#[derive(clap::Args)]
struct ConvertArgs {
    /// Input dataset root directory.
    input: PathBuf,

    /// Output dataset root directory.
    output: PathBuf,

    /// Input format.
    #[arg(long, default_value = "imagenet-txt")]
    from: String,

    /// Output format.
    #[arg(long, default_value = "imagenet-txt")]
    to: String,

    /// Labels file name or path (default 'synsets.txt').
    #[arg(long)]
    labels_file: Option<PathBuf>,

    /// Image subdirectory name (default 'images').
    #[arg(long)]
    image_dir: Option<String>,

    /// Extension used when an item carries no image data (default '.jpg').
    #[arg(long)]
    default_image_ext: Option<String>,

    /// Persist attached image bytes under the image subdirectory.
    #[arg(long)]
    save_images: bool,
}

/// Run the imagetxt CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), ImagetxtError> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Inspect(args)) => run_inspect(args),
        Some(Commands::Convert(args)) => run_convert(args),
        None => {
            println!("imagetxt {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Reader and writer for line-oriented multi-label image annotations.");
            println!();
            println!("Run 'imagetxt --help' for usage information.");
            Ok(())
        }
    }
}

fn txt_config(
    labels_file: Option<PathBuf>,
    image_dir: Option<String>,
    default_image_ext: Option<String>,
    save_images: bool,
) -> TxtConfig {
    let mut config = TxtConfig::default().with_save_images(save_images);
    if let Some(labels_file) = labels_file {
        config = config.with_labels_file(labels_file);
    }
    if let Some(image_dir) = image_dir {
        config = config.with_image_dir(image_dir);
    }
    if let Some(ext) = default_image_ext {
        config = config.with_default_image_ext(ext);
    }
    config
}

/// Summary of one decoded dataset, for the inspect report.
#[derive(Serialize)]
struct InspectReport {
    subsets: Vec<SubsetSummary>,
    labels: Vec<LabelSummary>,
}

#[derive(Serialize)]
struct SubsetSummary {
    name: String,
    items: usize,
    annotations: usize,
}

#[derive(Serialize)]
struct LabelSummary {
    id: usize,
    name: String,
    annotations: usize,
}

impl InspectReport {
    fn from_dataset(dataset: &Dataset) -> Self {
        let mut label_counts = vec![0usize; dataset.catalog.len()];
        let mut subsets = Vec::with_capacity(dataset.subsets.len());

        for subset in &dataset.subsets {
            let mut annotations = 0;
            for item in subset {
                annotations += item.labels.len();
                for label in &item.labels {
                    label_counts[label.as_usize()] += 1;
                }
            }
            subsets.push(SubsetSummary {
                name: subset.name().to_string(),
                items: subset.len(),
                annotations,
            });
        }

        let labels = dataset
            .catalog
            .iter()
            .zip(label_counts)
            .enumerate()
            .map(|(id, (name, annotations))| LabelSummary {
                id,
                name: name.to_string(),
                annotations,
            })
            .collect();

        Self { subsets, labels }
    }
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), ImagetxtError> {
    let config = txt_config(args.labels_file, args.image_dir, None, false);
    let dataset = read_txt_dir_with_config(&args.input, &config)?;
    let report = InspectReport::from_dataset(&dataset);

    match args.output.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&report)?),
        _ => {
            println!(
                "{} subset(s), {} item(s), {} label(s) in catalog",
                dataset.subsets.len(),
                dataset.item_count(),
                dataset.catalog.len()
            );
            for subset in &report.subsets {
                println!(
                    "  {}: {} item(s), {} annotation(s)",
                    subset.name, subset.items, subset.annotations
                );
            }
            println!("labels:");
            for label in &report.labels {
                println!(
                    "  {:>4} {} ({} annotation(s))",
                    label.id, label.name, label.annotations
                );
            }
        }
    }

    Ok(())
}

/// Execute the convert subcommand.
fn run_convert(args: ConvertArgs) -> Result<(), ImagetxtError> {
    let config = txt_config(
        args.labels_file,
        args.image_dir,
        args.default_image_ext,
        args.save_images,
    );
    let reader = format::resolve_format(&args.from, &config)?;
    let writer = format::resolve_format(&args.to, &config)?;

    let dataset = reader.read_dir(&args.input)?;
    writer.write_dir(&args.output, &dataset)?;

    println!(
        "converted {} subset(s), {} item(s) ({} -> {})",
        dataset.subsets.len(),
        dataset.item_count(),
        reader.name(),
        writer.name()
    );

    Ok(())
}
