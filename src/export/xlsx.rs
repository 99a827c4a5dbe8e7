use std::io;
use std::path::Path;

use rust_xlsxwriter::{Workbook, XlsxError};

use super::Table;
use crate::error::{Result, ScrapeError};

/// Single unstyled sheet: header row, then one row per record.
pub(super) fn write(table: &Table, path: &Path) -> Result<()> {
    write_sheet(table, path).map_err(|e| match e {
        XlsxError::IoError(source) => ScrapeError::export_io(path, source),
        other => ScrapeError::export_io(path, io::Error::other(other.to_string())),
    })
}

fn write_sheet(table: &Table, path: &Path) -> std::result::Result<(), XlsxError> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name.as_str())?;
    }
    for (i, row) in table.rows.iter().enumerate() {
        let r = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            sheet.write_string(r, col as u16, cell.as_str())?;
        }
    }

    workbook.save(path)?;
    Ok(())
}
