//! Format plugin surface.
//!
//! A format is a capability pair: decode a dataset root into the in-memory
//! model, and encode the model back into a directory tree. The CLI resolves
//! format names through [`resolve_format`], so alternative formats can be
//! added without touching the codec itself. This mirrors the CLI's format
//! strings but is decoupled from clap.

use std::path::Path;

use crate::dataset::io_txt::{read_txt_dir_with_config, write_txt_dir_with_config, TxtConfig};
use crate::dataset::Dataset;
use crate::error::ImagetxtError;

/// A bidirectional annotation format.
pub trait AnnotationFormat: std::fmt::Debug {
    /// Stable name used for CLI resolution.
    fn name(&self) -> &'static str;

    /// Decode a dataset root directory.
    fn read_dir(&self, path: &Path) -> Result<Dataset, ImagetxtError>;

    /// Encode a dataset into a root directory.
    fn write_dir(&self, path: &Path, dataset: &Dataset) -> Result<(), ImagetxtError>;
}

/// The line-oriented txt annotation format.
#[derive(Debug)]
pub struct TxtFormat {
    config: TxtConfig,
}

impl TxtFormat {
    pub fn new(config: TxtConfig) -> Self {
        Self { config }
    }
}

impl Default for TxtFormat {
    fn default() -> Self {
        Self::new(TxtConfig::default())
    }
}

impl AnnotationFormat for TxtFormat {
    fn name(&self) -> &'static str {
        "imagenet-txt"
    }

    fn read_dir(&self, path: &Path) -> Result<Dataset, ImagetxtError> {
        read_txt_dir_with_config(path, &self.config)
    }

    fn write_dir(&self, path: &Path, dataset: &Dataset) -> Result<(), ImagetxtError> {
        write_txt_dir_with_config(path, dataset, &self.config)
    }
}

/// Resolve a format name to its plugin.
pub fn resolve_format(
    name: &str,
    config: &TxtConfig,
) -> Result<Box<dyn AnnotationFormat>, ImagetxtError> {
    match name {
        "imagenet-txt" | "txt" => Ok(Box::new(TxtFormat::new(config.clone()))),
        other => Err(ImagetxtError::UnsupportedFormat(format!(
            "'{}' (supported: imagenet-txt)",
            other
        ))),
    }
}
