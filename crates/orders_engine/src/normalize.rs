use std::collections::HashSet;

use crate::extract::RawTable;
use crate::types::{Cell, NormalizedTable};

/// Turn a raw table into the canonical form: unique trimmed headers, typed
/// cells, and every row exactly as wide as the header.
///
/// Row-shape policy: short rows are padded with nulls on the right, excess
/// cells are dropped. Row order is preserved; nothing is sorted, deduplicated
/// or filtered.
pub fn normalize(raw: RawTable) -> NormalizedTable {
    let headers = dedupe_headers(raw.headers);
    let width = headers.len();

    let rows = raw
        .rows
        .into_iter()
        .map(|cells| {
            let mut row: Vec<Cell> = cells.into_iter().take(width).map(coerce_cell).collect();
            row.resize(width, Cell::Null);
            row
        })
        .collect();

    NormalizedTable { headers, rows }
}

/// Make header names unique and non-empty. A repeated name gets its
/// occurrence count appended (`Total`, `Total_2`, `Total_3`); an empty name
/// becomes `column_<position>`.
fn dedupe_headers(headers: Vec<String>) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    let mut result = Vec::with_capacity(headers.len());
    for (index, name) in headers.into_iter().enumerate() {
        let base = if name.is_empty() {
            format!("column_{}", index + 1)
        } else {
            name
        };
        let mut occurrence = 1usize;
        let mut candidate = base.clone();
        while !used.insert(candidate.clone()) {
            occurrence += 1;
            candidate = format!("{base}_{occurrence}");
        }
        result.push(candidate);
    }
    result
}

/// Best-effort typing of one cell: empty becomes null, then integer, then
/// float, else the text stays as-is. Values with leading zeros (`007`) are
/// kept as text so identifiers survive the round trip.
fn coerce_cell(text: String) -> Cell {
    if text.is_empty() {
        return Cell::Null;
    }
    if has_identifier_leading_zero(&text) {
        return Cell::Text(text);
    }
    if let Ok(int) = text.parse::<i64>() {
        return Cell::Int(int);
    }
    if looks_numeric(&text) {
        if let Ok(float) = text.parse::<f64>() {
            if float.is_finite() {
                return Cell::Float(float);
            }
        }
    }
    Cell::Text(text)
}

fn has_identifier_leading_zero(text: &str) -> bool {
    let digits = text.strip_prefix('-').unwrap_or(text);
    let mut chars = digits.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('0'), Some(second)) if second.is_ascii_digit()
    ) && !digits.contains('.')
}

/// Reject words that `f64::from_str` would happily accept ("NaN", "inf").
fn looks_numeric(text: &str) -> bool {
    text.chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'))
}
