//! Post-projection cleanup. The two passes run in a fixed order: sentinel
//! substitution first, then blank-row elision, so a row whose only content
//! was sentinel zeros ends up removed.

use tracing::debug;

use crate::table::{Cell, NormalizedTable, DOP_COLUMNS};

/// Replace a literal numeric 0 in the time-of-problem columns with absence.
pub fn replace_zero_sentinels(table: &mut NormalizedTable) {
    let targets: Vec<usize> = DOP_COLUMNS
        .iter()
        .filter_map(|c| table.column_index(c))
        .collect();

    let mut replaced = 0usize;
    for row in &mut table.rows {
        for &i in &targets {
            if matches!(row[i], Cell::Number(n) if n == 0.0) {
                row[i] = Cell::Empty;
                replaced += 1;
            }
        }
    }
    if replaced > 0 {
        debug!(replaced, "zero sentinels cleared");
    }
}

/// Drop rows with no value in any column.
pub fn drop_blank_rows(table: &mut NormalizedTable) {
    let before = table.rows.len();
    table.rows.retain(|row| row.iter().any(|c| !c.is_empty()));
    let dropped = before - table.rows.len();
    if dropped > 0 {
        debug!(dropped, "blank rows removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::CANONICAL_COLUMNS;

    fn canonical_table(rows: Vec<Vec<Cell>>) -> NormalizedTable {
        let mut table =
            NormalizedTable::new(CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect());
        table.rows = rows;
        table
    }

    fn row(week: Cell, dop_repair: Cell) -> Vec<Cell> {
        let mut cells = vec![Cell::Empty; CANONICAL_COLUMNS.len()];
        cells[3] = week;
        cells[14] = dop_repair;
        cells
    }

    #[test]
    fn zero_only_clears_dop_columns() {
        let mut table = canonical_table(vec![row(Cell::Number(0.0), Cell::Number(0.0))]);
        replace_zero_sentinels(&mut table);
        // week keeps its zero, dop_repair loses it
        assert_eq!(table.rows[0][3], Cell::Number(0.0));
        assert_eq!(table.rows[0][14], Cell::Empty);
    }

    #[test]
    fn nonzero_dop_values_survive() {
        let mut table = canonical_table(vec![row(Cell::Empty, Cell::Number(2.5))]);
        replace_zero_sentinels(&mut table);
        assert_eq!(table.rows[0][14], Cell::Number(2.5));
    }

    #[test]
    fn sentinel_then_blank_elision_removes_zero_only_rows() {
        let mut table = canonical_table(vec![
            row(Cell::Empty, Cell::Number(0.0)),
            row(Cell::Number(7.0), Cell::Number(0.0)),
        ]);
        replace_zero_sentinels(&mut table);
        drop_blank_rows(&mut table);
        assert_eq!(table.rows.len(), 1);
        assert_eq!(table.rows[0][3], Cell::Number(7.0));
    }
}
