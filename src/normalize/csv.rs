use csv::ReaderBuilder;

use crate::error::Result;
use crate::table::{Cell, NormalizedTable};

/// Parse a CSV upload. The header row's columns are used as-is; schema
/// compatibility is resolved by name when the accumulator merges tables.
/// Ragged data rows are padded or truncated to the header width.
pub fn normalize_csv(bytes: &[u8]) -> Result<NormalizedTable> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let columns: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let width = columns.len();
    let mut table = NormalizedTable::new(columns);

    for record in reader.records() {
        let record = record?;
        let mut row: Vec<Cell> = record.iter().map(Cell::from_csv_field).collect();
        row.resize(width, Cell::Empty);
        table.rows.push(row);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_and_values_pass_through_unchanged() {
        let input = b"DD,MM,part_name\n3,12,bracket\n4,12,housing\n";
        let table = normalize_csv(input).unwrap();
        assert_eq!(table.columns, vec!["DD", "MM", "part_name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0][0], Cell::Number(3.0));
        assert_eq!(table.rows[1][2], Cell::Text("housing".into()));
    }

    #[test]
    fn ragged_rows_are_padded_to_header_width() {
        let input = b"a,b,c\n1,2\n1,2,3,4\n";
        let table = normalize_csv(input).unwrap();
        assert_eq!(table.rows[0], vec![Cell::Number(1.0), Cell::Number(2.0), Cell::Empty]);
        assert_eq!(table.rows[1].len(), 3);
    }

    #[test]
    fn empty_fields_become_absent() {
        let input = b"a,b\n,x\n";
        let table = normalize_csv(input).unwrap();
        assert_eq!(table.rows[0][0], Cell::Empty);
        assert_eq!(table.rows[0][1], Cell::Text("x".into()));
    }
}
