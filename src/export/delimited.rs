use std::path::Path;

use super::Table;
use crate::error::{Result, ScrapeError};

/// CSV and TXT share this writer; only the delimiter differs.
pub(super) fn write(table: &Table, path: &Path, delimiter: u8) -> Result<()> {
    write_rows(table, path, delimiter).map_err(|e| ScrapeError::export_io(path, e))
}

fn write_rows(table: &Table, path: &Path, delimiter: u8) -> csv::Result<()> {
    let mut w = csv::WriterBuilder::new().delimiter(delimiter).from_path(path)?;
    w.write_record(&table.columns)?;
    for row in &table.rows {
        w.write_record(row)?;
    }
    w.flush()?;
    Ok(())
}

/// Read a comma-separated export back into a table (header + rows).
pub fn read_csv(path: &Path) -> Result<Table> {
    read_rows(path).map_err(|source| ScrapeError::CsvRead {
        path: path.to_path_buf(),
        source,
    })
}

fn read_rows(path: &Path) -> csv::Result<Table> {
    let mut r = csv::ReaderBuilder::new().has_headers(true).from_path(path)?;
    let columns = r.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in r.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok(Table { columns, rows })
}
