//! Line-oriented `.txt` annotation reader and writer.
//!
//! This module handles directory-based datasets where each subset is one
//! annotation file mapping image identifiers to label ids, next to an
//! ordered labels file that gives the ids meaning.
//!
//! # Format Reference
//!
//! Each annotation line is either unquoted or quoted:
//!
//! ```text
//! cat_0001.jpg 0 3          item id 'cat_0001', image 'cat_0001.jpg'
//! "my cat".jpg 0 1          item id 'my cat', image 'my cat.jpg'
//! ```
//!
//! The unquoted form derives the item id by stripping the image file name's
//! final extension. The quoted form carries the id verbatim between two
//! double quotes and appends the following token (normally an extension)
//! directly to it to form the image file name. Any other quote count on a
//! line is an error. Remaining whitespace-separated tokens are label ids,
//! which must fall inside the labels file's numbering space.
//!
//! The labels file (default `synsets.txt`) holds one label name per line;
//! the line number, starting at zero, is the label id.
//!
//! # Format Limitations
//!
//! The format has no escape mechanism: an item id containing a literal `"`
//! cannot be represented losslessly, and the writer makes no attempt to
//! invent one. Decoding keeps duplicate label ids as-is; encoding collapses
//! them to a set, so decoding and re-encoding preserves label sets rather
//! than label lists.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::catalog::LabelCatalog;
use super::ids::LabelId;
use super::model::{Dataset, ImageRef, Item, Subset};
use crate::error::ImagetxtError;

const ANNOTATION_EXTENSION: &str = "txt";

/// Configuration for the txt format reader and writer.
#[derive(Clone, Debug)]
pub struct TxtConfig {
    /// Labels file name, or an explicit path to it. The basename is what
    /// discovery excludes from the subset files.
    pub labels_file: PathBuf,

    /// Name of the image subdirectory next to each annotation file.
    pub image_dir: String,

    /// Extension used on encode when an item carries no image data.
    pub default_image_ext: String,

    /// Whether the writer persists attached image bytes.
    pub save_images: bool,
}

impl TxtConfig {
    pub const DEFAULT_LABELS_FILE: &'static str = "synsets.txt";
    pub const DEFAULT_IMAGE_DIR: &'static str = "images";
    pub const DEFAULT_IMAGE_EXT: &'static str = ".jpg";

    pub fn with_labels_file(mut self, labels_file: impl Into<PathBuf>) -> Self {
        self.labels_file = labels_file.into();
        self
    }

    pub fn with_image_dir(mut self, image_dir: impl Into<String>) -> Self {
        self.image_dir = image_dir.into();
        self
    }

    pub fn with_default_image_ext(mut self, ext: impl Into<String>) -> Self {
        self.default_image_ext = ext.into();
        self
    }

    pub fn with_save_images(mut self, save_images: bool) -> Self {
        self.save_images = save_images;
        self
    }

    /// Basename of the labels file, used for discovery exclusion and as the
    /// output file name on encode.
    pub fn labels_file_name(&self) -> &str {
        self.labels_file
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(Self::DEFAULT_LABELS_FILE)
    }
}

impl Default for TxtConfig {
    fn default() -> Self {
        Self {
            labels_file: PathBuf::from(Self::DEFAULT_LABELS_FILE),
            image_dir: Self::DEFAULT_IMAGE_DIR.to_string(),
            default_image_ext: Self::DEFAULT_IMAGE_EXT.to_string(),
            save_images: false,
        }
    }
}

#[derive(Debug, PartialEq)]
struct AnnotationRow {
    item_id: String,
    image_file: String,
    labels: Vec<LabelId>,
}

/// Parse one annotation line against `catalog`.
///
/// Returns `Ok(None)` for blank lines so a trailing newline in the file is
/// harmless. Quote-count dispatch: no quotes is the unquoted form, exactly
/// two quotes is the quoted form, anything else is an error.
fn parse_annotation_line(
    line: &str,
    catalog: &LabelCatalog,
    file_path: &Path,
    line_num: usize,
) -> Result<Option<AnnotationRow>, ImagetxtError> {
    if line.trim().is_empty() {
        return Ok(None);
    }

    let pieces: Vec<&str> = line.split('"').collect();
    let (item_id, image_file, label_tokens) = match pieces.len() {
        1 => {
            let mut tokens = line.split_whitespace();
            let image_file = tokens.next().expect("non-blank line has a first token");
            (
                strip_extension(image_file).to_string(),
                image_file.to_string(),
                tokens.collect::<Vec<_>>(),
            )
        }
        // Exactly two quotes: pieces[1] is the id, pieces[2] starts with the
        // extension token. Anything before the first quote is ignored.
        3 => {
            let item_id = pieces[1].to_string();
            let mut tokens = pieces[2].split_whitespace();
            let Some(ext) = tokens.next() else {
                return Err(ImagetxtError::MalformedLine {
                    path: file_path.to_path_buf(),
                    line: line_num,
                    message: format!("missing extension after quoted identifier: '{line}'"),
                });
            };
            let image_file = format!("{item_id}{ext}");
            (item_id, image_file, tokens.collect::<Vec<_>>())
        }
        _ => {
            return Err(ImagetxtError::MalformedLine {
                path: file_path.to_path_buf(),
                line: line_num,
                message: format!("unexpected number of quotes in filename: '{line}'"),
            });
        }
    };

    let mut labels = Vec::with_capacity(label_tokens.len());
    for token in label_tokens {
        let raw: i64 = token
            .parse()
            .map_err(|_| ImagetxtError::MalformedInteger {
                path: file_path.to_path_buf(),
                line: line_num,
                token: token.to_string(),
            })?;

        if raw < 0 || raw as usize >= catalog.len() {
            return Err(ImagetxtError::InvalidLabelId {
                item_id: item_id.clone(),
                label_id: raw,
                catalog_len: catalog.len(),
            });
        }
        labels.push(LabelId::new(raw as usize));
    }

    Ok(Some(AnnotationRow {
        item_id,
        image_file,
        labels,
    }))
}

/// Render one annotation line.
///
/// The id is quoted iff it contains whitespace; `image_ext` is appended
/// directly to the (possibly quoted) id. Label ids collapse to their first
/// occurrence. The single space after the filename token is emitted even
/// when there are no labels, matching what the parser accepts.
fn encode_annotation_line(item_id: &str, image_ext: &str, labels: &[LabelId]) -> String {
    let token = if item_id.contains(char::is_whitespace) {
        format!("\"{item_id}\"{image_ext}")
    } else {
        format!("{item_id}{image_ext}")
    };

    let mut seen = HashSet::with_capacity(labels.len());
    let ids: Vec<String> = labels
        .iter()
        .filter(|label| seen.insert(**label))
        .map(LabelId::to_string)
        .collect();

    format!("{} {}\n", token, ids.join(" "))
}

/// Strip the final extension from a file name.
///
/// The last `.` only counts as an extension separator when a non-dot
/// character precedes it, so hidden-file style names keep their leading dot.
fn strip_extension(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(dot) if file_name[..dot].bytes().any(|b| b != b'.') => &file_name[..dot],
        _ => file_name,
    }
}

fn subset_name_of(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or_default()
        .to_string()
}

fn parse_subset(
    text: &str,
    name: &str,
    catalog: &LabelCatalog,
    image_root: &Path,
    source: &Path,
) -> Result<Subset, ImagetxtError> {
    let mut subset = Subset::new(name);

    for (line_idx, line) in text.lines().enumerate() {
        let Some(row) = parse_annotation_line(line, catalog, source, line_idx + 1)? else {
            continue;
        };

        subset.insert(
            Item::new(row.item_id)
                .with_image(ImageRef::new(image_root.join(&row.image_file)))
                .with_labels(row.labels),
        );
    }

    Ok(subset)
}

/// Parse one subset's annotation text against `catalog`.
///
/// Image paths are `<image dir>/<file name>`, relative; use
/// [`read_txt_subset`] to anchor them next to an annotation file on disk.
pub fn from_txt_str(
    text: &str,
    subset_name: &str,
    catalog: &LabelCatalog,
    config: &TxtConfig,
) -> Result<Subset, ImagetxtError> {
    parse_subset(
        text,
        subset_name,
        catalog,
        Path::new(&config.image_dir),
        Path::new("<string>"),
    )
}

/// Read one annotation file as a subset named after its file stem.
pub fn read_txt_subset(
    path: &Path,
    catalog: &LabelCatalog,
    config: &TxtConfig,
) -> Result<Subset, ImagetxtError> {
    let text = fs::read_to_string(path).map_err(|source| ImagetxtError::MissingResource {
        path: path.to_path_buf(),
        source,
    })?;

    let image_root = path
        .parent()
        .unwrap_or_else(|| Path::new(""))
        .join(&config.image_dir);

    parse_subset(&text, &subset_name_of(path), catalog, &image_root, path)
}

/// Render one subset as annotation text, items in iteration order.
pub fn to_txt_string(subset: &Subset, config: &TxtConfig) -> String {
    let mut out = String::new();
    for item in subset {
        let ext = resolve_image_ext(item, config);
        out.push_str(&encode_annotation_line(&item.id, &ext, &item.labels));
    }
    out
}

/// The extension encoded for an item: its image's actual extension when
/// bytes are attached, else the configured default.
fn resolve_image_ext(item: &Item, config: &TxtConfig) -> String {
    item.image
        .as_ref()
        .filter(|image| image.has_data())
        .and_then(ImageRef::extension)
        .unwrap_or_else(|| config.default_image_ext.clone())
}

/// Read a labels file into a catalog.
pub fn read_labels_file(path: &Path) -> Result<LabelCatalog, ImagetxtError> {
    let text = fs::read_to_string(path).map_err(|source| ImagetxtError::MissingResource {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(LabelCatalog::from_txt_str(&text))
}

/// Write a catalog as a labels file.
pub fn write_labels_file(path: &Path, catalog: &LabelCatalog) -> Result<(), ImagetxtError> {
    fs::write(path, catalog.to_txt_string()).map_err(ImagetxtError::Io)
}

/// List subset annotation files directly under `root`.
///
/// Every regular `.txt` file except the labels file is one subset; the
/// subset name is the file stem. Results are sorted by name so downstream
/// ordering is deterministic.
pub fn discover_subset_files(
    root: &Path,
    config: &TxtConfig,
) -> Result<Vec<(String, PathBuf)>, ImagetxtError> {
    if !root.is_dir() {
        return Err(ImagetxtError::InvalidLayout {
            path: root.to_path_buf(),
            message: "input must be a directory".to_string(),
        });
    }

    let labels_name = config.labels_file_name();
    let mut sources = Vec::new();

    for entry in WalkDir::new(root)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = entry.map_err(|source| ImagetxtError::InvalidLayout {
            path: root.to_path_buf(),
            message: format!("failed while traversing directory: {source}"),
        })?;

        if !entry.file_type().is_file() || !has_extension(entry.path(), ANNOTATION_EXTENSION) {
            continue;
        }
        if entry.file_name().to_str() == Some(labels_name) {
            continue;
        }

        sources.push((subset_name_of(entry.path()), entry.path().to_path_buf()));
    }

    sources.sort();
    Ok(sources)
}

fn has_extension(path: &Path, allowed: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.eq_ignore_ascii_case(allowed))
        .unwrap_or(false)
}

/// Read a dataset root: labels file plus every subset annotation file.
pub fn read_txt_dir(path: &Path) -> Result<Dataset, ImagetxtError> {
    read_txt_dir_with_config(path, &TxtConfig::default())
}

/// Read a dataset root with explicit configuration.
pub fn read_txt_dir_with_config(
    path: &Path,
    config: &TxtConfig,
) -> Result<Dataset, ImagetxtError> {
    let labels_path = if config.labels_file.is_absolute() {
        config.labels_file.clone()
    } else {
        path.join(&config.labels_file)
    };

    let mut dataset = Dataset::new(read_labels_file(&labels_path)?);

    for (name, file) in discover_subset_files(path, config)? {
        let text = fs::read_to_string(&file).map_err(|source| ImagetxtError::MissingResource {
            path: file.clone(),
            source,
        })?;
        let image_root = file
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&config.image_dir);

        let subset = parse_subset(&text, &name, &dataset.catalog, &image_root, &file)?;
        dataset.subsets.push(subset);
    }

    Ok(dataset)
}

/// Image byte persistence, delegated by the writer.
pub trait ImageWriter {
    fn write_image(&mut self, file_name: &str, data: &[u8]) -> Result<(), ImagetxtError>;
}

/// Writes image bytes under a directory, creating parents as needed.
pub struct DirImageWriter {
    root: PathBuf,
}

impl DirImageWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

impl ImageWriter for DirImageWriter {
    fn write_image(&mut self, file_name: &str, data: &[u8]) -> Result<(), ImagetxtError> {
        let path = self.root.join(file_name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(ImagetxtError::Io)?;
        }
        fs::write(&path, data).map_err(ImagetxtError::Io)
    }
}

/// Write a dataset as a directory of annotation files plus the labels file.
pub fn write_txt_dir(path: &Path, dataset: &Dataset) -> Result<(), ImagetxtError> {
    write_txt_dir_with_config(path, dataset, &TxtConfig::default())
}

/// Write a dataset with explicit configuration.
///
/// Each subset becomes `<subset>.txt`; the catalog becomes the labels file.
/// With `save_images` set, attached image bytes are handed to a
/// [`DirImageWriter`] rooted at the image subdirectory.
pub fn write_txt_dir_with_config(
    path: &Path,
    dataset: &Dataset,
    config: &TxtConfig,
) -> Result<(), ImagetxtError> {
    fs::create_dir_all(path).map_err(ImagetxtError::Io)?;

    let mut image_writer = config
        .save_images
        .then(|| DirImageWriter::new(path.join(&config.image_dir)));

    for subset in &dataset.subsets {
        let annotation_path = path.join(format!("{}.txt", subset.name()));
        fs::write(&annotation_path, to_txt_string(subset, config)).map_err(ImagetxtError::Io)?;

        if let Some(writer) = image_writer.as_mut() {
            save_subset_images(subset, writer)?;
        }
    }

    write_labels_file(&path.join(config.labels_file_name()), &dataset.catalog)
}

fn save_subset_images(subset: &Subset, writer: &mut dyn ImageWriter) -> Result<(), ImagetxtError> {
    for item in subset {
        let Some(image) = item.image.as_ref() else {
            continue;
        };
        let (Some(data), Some(file_name)) = (image.data.as_deref(), image.file_name()) else {
            continue;
        };
        writer.write_image(file_name, data)?;
    }
    Ok(())
}

/// Fuzz-only entrypoint for single-line parsing.
#[cfg(feature = "fuzzing")]
pub fn fuzz_parse_annotation_line(input: &str) -> Result<(), ImagetxtError> {
    let catalog = LabelCatalog::from_names(["class_0", "class_1", "class_2"]);
    let _ = parse_annotation_line(input, &catalog, Path::new("<fuzz>"), 1)?;
    Ok(())
}
