use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

#[derive(Debug, Error)]
pub enum ScrapeError {
    /// Field sequences for one page disagree on the number of items.
    #[error("extraction mismatch: `{field}` has {found} items, expected {expected}")]
    ExtractionMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },

    /// A required page fragment could not be located.
    #[error("field absent: {field}{}", item_suffix(.index))]
    FieldAbsent {
        field: &'static str,
        index: Option<usize>,
    },

    #[error("summary file {path:?} does not carry the channel summary header")]
    SchemaMismatch { path: PathBuf },

    #[error("failed to load page {url}: {reason}")]
    Load { url: String, reason: String },

    #[error("export to {path:?} failed: {source}")]
    ExportIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading {path:?} failed: {source}")]
    ReadIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("reading {path:?} failed: {source}")]
    CsvRead {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Terminal I/O while prompting.
    #[error(transparent)]
    Io(#[from] io::Error),

    #[error(transparent)]
    Config(#[from] ::config::ConfigError),
}

fn item_suffix(index: &Option<usize>) -> String {
    index.map(|i| format!(" (item {})", i)).unwrap_or_default()
}

impl ScrapeError {
    pub fn absent(field: &'static str) -> Self {
        ScrapeError::FieldAbsent { field, index: None }
    }

    pub fn absent_at(field: &'static str, index: usize) -> Self {
        ScrapeError::FieldAbsent {
            field,
            index: Some(index),
        }
    }

    pub fn export_io(path: &Path, source: impl Into<io::Error>) -> Self {
        ScrapeError::ExportIo {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }

    pub fn read_io(path: &Path, source: io::Error) -> Self {
        ScrapeError::ReadIo {
            path: path.to_path_buf(),
            source,
        }
    }
}
