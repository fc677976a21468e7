use std::path::Path;

use rust_xlsxwriter::Workbook;

use crate::persist::ensure_parent_dir;
use crate::types::{Cell, NormalizedTable, SinkLocation, WriteError};

/// Write the table to a single worksheet named `orders`: header row first,
/// numeric cells as numbers, text as strings, nulls left blank.
pub fn write_xlsx(table: &NormalizedTable, path: &Path) -> Result<SinkLocation, WriteError> {
    ensure_parent_dir(path)?;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name("orders")?;

    for (col, header) in table.headers.iter().enumerate() {
        sheet.write_string(0, col as u16, header)?;
    }
    for (row_index, row) in table.rows.iter().enumerate() {
        let xlsx_row = (row_index + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Null => {}
                Cell::Int(value) => {
                    sheet.write_number(xlsx_row, col, *value as f64)?;
                }
                Cell::Float(value) => {
                    sheet.write_number(xlsx_row, col, *value)?;
                }
                Cell::Text(value) => {
                    sheet.write_string(xlsx_row, col, value)?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(SinkLocation::File(path.to_path_buf()))
}
