pub mod cell;
pub mod record;

pub use cell::Cell;
pub use record::{DefectRecord, CANONICAL_COLUMNS, DOP_COLUMNS};

/// Rectangular table produced by normalizing one upload: named columns plus
/// rows of cells. Workbook-variant tables carry exactly the canonical
/// columns; CSV-variant tables carry whatever header the file declared.
#[derive(Debug, Default)]
pub struct NormalizedTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl NormalizedTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }
}

/// Fixed-width text preview of merged records for terminal display.
pub fn render_preview(records: &[DefectRecord], limit: usize) -> String {
    const MAX_CELL: usize = 20;

    let shown = &records[..records.len().min(limit)];
    let rendered: Vec<Vec<String>> = shown
        .iter()
        .map(|r| r.cells().iter().map(|c| clip(&c.to_string(), MAX_CELL)).collect())
        .collect();

    let mut widths: Vec<usize> = CANONICAL_COLUMNS.iter().map(|c| c.len()).collect();
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            widths[i] = widths[i].max(cell.chars().count());
        }
    }

    let mut out = String::new();
    for (i, column) in CANONICAL_COLUMNS.iter().enumerate() {
        if i > 0 {
            out.push_str("  ");
        }
        out.push_str(&format!("{:w$}", column, w = widths[i]));
    }
    out.push('\n');
    for row in &rendered {
        for (i, cell) in row.iter().enumerate() {
            if i > 0 {
                out.push_str("  ");
            }
            out.push_str(&format!("{:w$}", cell, w = widths[i]));
        }
        out.push('\n');
    }
    if records.len() > shown.len() {
        out.push_str(&format!("({} more rows)\n", records.len() - shown.len()));
    }
    out
}

fn clip(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut clipped: String = s.chars().take(max - 1).collect();
        clipped.push('~');
        clipped
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preview_shows_header_and_truncation_note() {
        let records: Vec<DefectRecord> = (0..5)
            .map(|i| {
                let mut cells: [Cell; 17] = std::array::from_fn(|_| Cell::Empty);
                cells[0] = Cell::Number(i as f64);
                cells[6] = Cell::Text(format!("model-{i}"));
                DefectRecord::from_cells(cells)
            })
            .collect();

        let preview = render_preview(&records, 3);
        let mut lines = preview.lines();
        let header = lines.next().unwrap();
        assert!(header.starts_with("DD"));
        assert!(header.contains("dop_total"));
        // header + 3 rows + truncation note
        assert_eq!(preview.lines().count(), 5);
        assert!(preview.ends_with("(2 more rows)\n"));
    }
}
