use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};

use super::Table;
use crate::error::{Result, ScrapeError};

/// Array of objects keyed by column name, in column order, 4-space indent.
/// Non-ASCII text is written as-is.
pub(super) fn write(table: &Table, path: &Path) -> Result<()> {
    let objects: Vec<Value> = table
        .rows
        .iter()
        .map(|row| {
            let obj: Map<String, Value> = table
                .columns
                .iter()
                .zip(row)
                .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                .collect();
            Value::Object(obj)
        })
        .collect();

    let io_err = |source| ScrapeError::ExportIo {
        path: path.to_path_buf(),
        source,
    };
    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);
    let fmt = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut out, fmt);
    objects.serialize(&mut ser).map_err(|e| ScrapeError::export_io(path, e))?;
    out.flush().map_err(io_err)?;
    Ok(())
}
