use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::config::Format;
use crate::error::{Result, ScrapeError};
use crate::export::{self, read_csv, ExportTarget, Table, SUMMARY_AGGREGATE_STEM, SUMMARY_SUFFIX};
use crate::record::{ChannelSummaryRecord, ContentVariant, Tabular};

/// Result of folding per-channel summaries into one aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOutcome {
    pub sources: Vec<PathBuf>,
    pub rows: usize,
    pub written: Vec<PathBuf>,
}

/// Concatenate every `*_summary.csv` in `folder` into
/// `summary_all_channels.{csv,txt,xlsx,json}` next to them.
///
/// Sources are visited in file-name order and their rows kept in file order.
/// The folder is rescanned on every call and earlier aggregates are
/// overwritten. `Ok(None)` means nothing matched and nothing was written.
pub fn merge(folder: &Path) -> Result<Option<MergeOutcome>> {
    let sources = summary_files(folder)?;
    if sources.is_empty() {
        info!(folder = %folder.display(), "no summary files found for merging");
        return Ok(None);
    }

    let mut merged = Table::new(ChannelSummaryRecord::COLUMNS);
    for path in &sources {
        let table = read_csv(path)?;
        if table.columns != merged.columns {
            return Err(ScrapeError::SchemaMismatch { path: path.clone() });
        }
        debug!(path = %path.display(), rows = table.len(), "merging summary file");
        merged.rows.extend(table.rows);
    }

    let target = ExportTarget::Fixed {
        dir: folder,
        stem: SUMMARY_AGGREGATE_STEM,
    };
    let written = export::write_table(&merged, ContentVariant::Summary, &Format::ALL, target)?;
    info!(files = sources.len(), rows = merged.len(), "summary files merged");

    Ok(Some(MergeOutcome {
        rows: merged.len(),
        sources,
        written,
    }))
}

fn summary_files(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    let read_err = |e| ScrapeError::read_io(folder, e);
    for entry in fs::read_dir(folder).map_err(read_err)? {
        let path = entry.map_err(read_err)?.path();
        let is_summary = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.ends_with(SUMMARY_SUFFIX));
        if is_summary {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
