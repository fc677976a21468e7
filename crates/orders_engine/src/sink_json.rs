use std::path::Path;

use serde_json::{Map, Number, Value};

use crate::persist::atomic_write;
use crate::types::{Cell, NormalizedTable, SinkLocation, WriteError};

/// Write the table as a JSON array of objects keyed by header name, with
/// typed values (numbers stay numbers, nulls stay null).
pub fn write_json(table: &NormalizedTable, path: &Path) -> Result<SinkLocation, WriteError> {
    let records = table
        .rows
        .iter()
        .map(|row| {
            let mut object = Map::with_capacity(table.column_count());
            for (header, cell) in table.headers.iter().zip(row) {
                object.insert(header.clone(), cell_value(cell));
            }
            Value::Object(object)
        })
        .collect::<Vec<_>>();

    let mut buffer = serde_json::to_vec_pretty(&Value::Array(records))?;
    buffer.push(b'\n');
    atomic_write(path, &buffer)?;
    Ok(SinkLocation::File(path.to_path_buf()))
}

fn cell_value(cell: &Cell) -> Value {
    match cell {
        Cell::Null => Value::Null,
        Cell::Int(v) => Value::Number((*v).into()),
        Cell::Float(v) => Number::from_f64(*v)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Cell::Text(v) => Value::String(v.clone()),
    }
}
