use log::debug;
use scraper::{ElementRef, Html, Selector};

use crate::types::ExtractError;

/// Candidate selectors for the orders table, tried in order; the first match
/// wins. Matches the known id, the known class, and the site's generic
/// striped-table styling, in that order of specificity.
const TABLE_SELECTORS: &[&str] = &["table#orders", "table.orders", "table.table.table-striped"];

/// Cell text straight out of the matched table, trimmed but untyped. The
/// first row is taken as the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

/// Locate the orders table in `html` using the selector fallback chain.
///
/// Fails with `TableNotFound` when no candidate matches, which is also the
/// expected outcome on pages that render their data with client-side
/// scripting.
pub fn find_orders_table(html: &str) -> Result<RawTable, ExtractError> {
    let doc = Html::parse_document(html);

    for candidate in TABLE_SELECTORS {
        let Ok(selector) = Selector::parse(candidate) else {
            continue;
        };
        if let Some(table) = doc.select(&selector).next() {
            debug!("orders table matched selector {candidate}");
            return Ok(read_table(table));
        }
    }

    Err(ExtractError::TableNotFound)
}

fn read_table(table: ElementRef<'_>) -> RawTable {
    let (Ok(row_sel), Ok(cell_sel)) = (Selector::parse("tr"), Selector::parse("th, td")) else {
        return RawTable {
            headers: Vec::new(),
            rows: Vec::new(),
        };
    };

    let mut rows_iter = table.select(&row_sel);
    let headers = rows_iter
        .next()
        .map(|row| read_cells(row, &cell_sel))
        .unwrap_or_default();
    let rows = rows_iter
        .map(|row| read_cells(row, &cell_sel))
        .collect::<Vec<_>>();

    RawTable { headers, rows }
}

fn read_cells(row: ElementRef<'_>, cell_sel: &Selector) -> Vec<String> {
    row.select(cell_sel)
        .map(|cell| collapse_whitespace(&cell.text().collect::<String>()))
        .collect()
}

/// Trim and fold any internal whitespace run (including newlines from
/// pretty-printed markup) into a single space.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
