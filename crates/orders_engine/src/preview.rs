use crate::types::NormalizedTable;

/// Upper bound on preview rows. A read-only projection for display; never
/// persisted.
pub const MAX_PREVIEW_ROWS: usize = 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Preview {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub total_rows: usize,
}

/// Project the first `MAX_PREVIEW_ROWS` rows, stringified, in source column
/// order.
pub fn build_preview(table: &NormalizedTable) -> Preview {
    let rows = table
        .rows
        .iter()
        .take(MAX_PREVIEW_ROWS)
        .map(|row| row.iter().map(|cell| cell.display_string()).collect())
        .collect();
    Preview {
        headers: table.headers.clone(),
        rows,
        total_rows: table.row_count(),
    }
}

impl Preview {
    /// Plain-text rendering with padded columns, for terminal display.
    pub fn render(&self) -> String {
        let mut widths: Vec<usize> = self.headers.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (index, cell) in row.iter().enumerate() {
                if let Some(width) = widths.get_mut(index) {
                    *width = (*width).max(cell.chars().count());
                }
            }
        }

        let mut out = String::new();
        push_row(&mut out, &self.headers, &widths);
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        push_row(&mut out, &rule, &widths);
        for row in &self.rows {
            push_row(&mut out, row, &widths);
        }
        if self.total_rows > self.rows.len() {
            out.push_str(&format!(
                "... {} more rows not shown\n",
                self.total_rows - self.rows.len()
            ));
        }
        out
    }
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let mut first = true;
    for (cell, width) in cells.iter().zip(widths) {
        if !first {
            out.push_str("  ");
        }
        first = false;
        out.push_str(cell);
        for _ in cell.chars().count()..*width {
            out.push(' ');
        }
    }
    // Trim the padding on the last column.
    while out.ends_with(' ') {
        out.pop();
    }
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::{build_preview, MAX_PREVIEW_ROWS};
    use crate::types::{Cell, NormalizedTable};

    fn table_with_rows(count: usize) -> NormalizedTable {
        NormalizedTable {
            headers: vec!["id".to_string(), "total".to_string()],
            rows: (0..count)
                .map(|i| vec![Cell::Int(i as i64), Cell::Float(1.5)])
                .collect(),
        }
    }

    #[test]
    fn small_table_previews_in_full() {
        let preview = build_preview(&table_with_rows(3));
        assert_eq!(preview.rows.len(), 3);
        assert_eq!(preview.total_rows, 3);
        assert_eq!(preview.rows[0], vec!["0", "1.5"]);
    }

    #[test]
    fn preview_is_bounded_at_twenty_rows() {
        let preview = build_preview(&table_with_rows(50));
        assert_eq!(preview.rows.len(), MAX_PREVIEW_ROWS);
        assert_eq!(preview.total_rows, 50);
    }

    #[test]
    fn render_mentions_hidden_rows() {
        let preview = build_preview(&table_with_rows(25));
        let text = preview.render();
        assert!(text.contains("id"));
        assert!(text.contains("5 more rows not shown"));
    }
}
