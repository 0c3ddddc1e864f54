use std::path::PathBuf;
use thiserror::Error;

/// The main error type for imagetxt operations.
///
/// Every variant carries enough context (file identity, line content, or
/// item id) to diagnose a failure without re-reading the source. Errors
/// abort the decode or encode of the single file or subset in which they
/// occur and are never retried.
#[derive(Debug, Error)]
pub enum ImagetxtError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("cannot read {path}: {source}")]
    MissingResource {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed annotation line {path}:{line}: {message}")]
    MalformedLine {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("invalid label token '{token}' at {path}:{line}: expected base-10 integer")]
    MalformedInteger {
        path: PathBuf,
        line: usize,
        token: String,
    },

    #[error("item '{item_id}': unknown label id {label_id} (catalog has {catalog_len} label(s))")]
    InvalidLabelId {
        item_id: String,
        label_id: i64,
        catalog_len: usize,
    },

    #[error("label id {label_id} is out of range for catalog with {catalog_len} label(s)")]
    UnknownLabelId {
        label_id: usize,
        catalog_len: usize,
    },

    #[error("invalid dataset layout at {path}: {message}")]
    InvalidLayout { path: PathBuf, message: String },

    #[error("failed to render JSON report: {0}")]
    ReportJson(#[from] serde_json::Error),

    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),
}
