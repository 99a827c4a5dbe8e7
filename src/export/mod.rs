mod delimited;
mod json;
mod xlsx;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::Format;
use crate::error::{Result, ScrapeError};
use crate::record::{ContentRecord, ContentVariant, Tabular};

pub use delimited::read_csv;

/// Directory the merger scans, and the CSV snapshots it reads.
pub const SUMMARY_DIR: &str = "summary_channels";
pub const SUMMARY_SUFFIX: &str = "_summary.csv";
pub const SUMMARY_AGGREGATE_STEM: &str = "summary_all_channels";

/// Header plus string rows; every writer works from this one shape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: &[&str]) -> Self {
        Table {
            columns: columns.iter().map(|c| c.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    pub fn from_records(variant: ContentVariant, records: &[ContentRecord]) -> Self {
        let mut table = Table::new(variant.columns());
        for r in records {
            debug_assert_eq!(r.variant().columns(), variant.columns());
            table.rows.push(r.cells());
        }
        table
    }

    pub fn from_rows<R: Tabular>(rows: &[R]) -> Self {
        let mut table = Table::new(R::COLUMNS);
        table.rows.extend(rows.iter().map(Tabular::cells));
        table
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Where one set of export files lands.
#[derive(Debug, Clone, Copy)]
pub enum ExportTarget<'a> {
    /// `<root>/<channel>/<channel>_<variant>_<ts>.<ext>`
    Channel {
        root: &'a Path,
        channel: &'a str,
        timestamp: &'a str,
    },
    /// `<root>/all_<variant>_channels/all_<variant>_eagle_eye_<ts>.<ext>`
    Combined { root: &'a Path, timestamp: &'a str },
    /// `<dir>/<stem>.<ext>`
    Fixed { dir: &'a Path, stem: &'a str },
}

impl ExportTarget<'_> {
    pub fn dir(&self, variant: ContentVariant) -> PathBuf {
        match *self {
            ExportTarget::Channel { root, channel, .. } => root.join(file_safe(channel)),
            ExportTarget::Combined { root, .. } => root.join(format!("all_{}_channels", variant)),
            ExportTarget::Fixed { dir, .. } => dir.to_path_buf(),
        }
    }

    pub fn path(&self, variant: ContentVariant, format: Format) -> PathBuf {
        let name = match *self {
            ExportTarget::Channel { channel, timestamp, .. } => {
                format!("{}_{}_{}.{}", file_safe(channel), variant, timestamp, format.ext())
            }
            ExportTarget::Combined { timestamp, .. } => {
                format!("all_{}_eagle_eye_{}.{}", variant, timestamp, format.ext())
            }
            ExportTarget::Fixed { stem, .. } => format!("{}.{}", stem, format.ext()),
        };
        self.dir(variant).join(name)
    }
}

/// Write one channel's records in each requested format.
pub fn export(
    records: &[ContentRecord],
    variant: ContentVariant,
    formats: &[Format],
    channel_name: &str,
    run_timestamp: &str,
    output_root: &Path,
) -> Result<Vec<PathBuf>> {
    let target = ExportTarget::Channel {
        root: output_root,
        channel: channel_name,
        timestamp: run_timestamp,
    };
    write_table(&Table::from_records(variant, records), variant, formats, target)
}

/// Serialize a table once per format. Stops at the first failing write; files
/// already written stay on disk.
pub fn write_table(
    table: &Table,
    variant: ContentVariant,
    formats: &[Format],
    target: ExportTarget<'_>,
) -> Result<Vec<PathBuf>> {
    ensure_dir(&target.dir(variant))?;

    let mut written = Vec::with_capacity(formats.len());
    for &format in formats {
        let path = target.path(variant, format);
        match format {
            Format::Csv => delimited::write(table, &path, b',')?,
            Format::Txt => delimited::write(table, &path, b'\t')?,
            Format::Xlsx => xlsx::write(table, &path)?,
            Format::Json => json::write(table, &path)?,
        }
        info!(path = %path.display(), rows = table.len(), "saved {} export", format);
        written.push(path);
    }
    Ok(written)
}

/// Create a directory tree; an existing one is fine.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| ScrapeError::ExportIo {
        path: dir.to_path_buf(),
        source,
    })
}

/// Stem of a channel's snapshot under `summary_channels/`; pairs with
/// `SUMMARY_SUFFIX` once the `.csv` extension is added.
pub fn summary_stem(handle: &str) -> String {
    format!("{}_summary", file_safe(handle))
}

/// Keep a display handle usable as a single path component.
fn file_safe(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c => c,
        })
        .collect()
}
