use std::path::Path;

use crate::persist::atomic_write;
use crate::types::{NormalizedTable, SinkLocation, WriteError};

/// Write the table as delimited text: header row first, cells stringified,
/// nulls as empty fields. The file is replaced atomically.
pub fn write_csv(table: &NormalizedTable, path: &Path) -> Result<SinkLocation, WriteError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|cell| cell.display_string()))?;
    }
    let buffer = writer
        .into_inner()
        .map_err(|err| WriteError::Io(err.into_error()))?;

    atomic_write(path, &buffer)?;
    Ok(SinkLocation::File(path.to_path_buf()))
}
