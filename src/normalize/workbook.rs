use std::io::Cursor;

use calamine::{Data, Range, Reader, Xlsx};
use tracing::debug;

use crate::error::{CombineError, Result};
use crate::normalize::clean;
use crate::normalize::mapping::{
    resolve_header, HEADER_SKIP_ROWS, SHEET_ROW_CAP, SHEET_TAG_COLUMN,
};
use crate::table::{Cell, NormalizedTable, CANONICAL_COLUMNS};

/// One sheet below the skip offset: resolved header names plus capped data
/// rows, tagged with the sheet name. Discarded once folded into the
/// combined table.
struct SheetTable {
    name: String,
    header: Vec<String>,
    rows: Vec<Vec<Cell>>,
}

/// Normalize a multi-sheet workbook upload: per sheet skip the metadata
/// rows, cap the data rows, tag with the sheet name; then concatenate,
/// project to the canonical schema, and run the cleanup passes.
pub fn normalize_workbook(file: &str, bytes: &[u8]) -> Result<NormalizedTable> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let names: Vec<String> = workbook.sheet_names().to_vec();

    let mut sheets = Vec::with_capacity(names.len());
    for name in names {
        let range = workbook.worksheet_range(&name)?;
        sheets.push(read_sheet(&name, &range)?);
    }

    let combined = concat_sheets(&sheets);
    let mut table = project_canonical(file, combined)?;
    clean::replace_zero_sentinels(&mut table);
    clean::drop_blank_rows(&mut table);
    Ok(table)
}

fn read_sheet(name: &str, range: &Range<Data>) -> Result<SheetTable> {
    // The used range may not start at column A; positions in the rename
    // table are absolute sheet columns.
    let start_col = range.start().map(|(_, c)| c as usize).unwrap_or(0);

    let mut rows = range.rows().skip(HEADER_SKIP_ROWS);
    let header_row = rows.next().ok_or_else(|| CombineError::SchemaMismatch {
        context: name.to_string(),
        detail: format!("no header row below the {HEADER_SKIP_ROWS} leading metadata rows"),
    })?;

    let header: Vec<String> = header_row
        .iter()
        .enumerate()
        .map(|(pos, cell)| resolve_header(start_col + pos, &header_label(cell)))
        .collect();

    let data: Vec<Vec<Cell>> = rows
        .take(SHEET_ROW_CAP)
        .map(|row| {
            let mut cells: Vec<Cell> = row.iter().map(cell_value).collect();
            cells.resize(header.len(), Cell::Empty);
            cells
        })
        .collect();

    debug!(sheet = name, rows = data.len(), "sheet read");
    Ok(SheetTable {
        name: name.to_string(),
        header,
        rows: data,
    })
}

fn header_label(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn cell_value(value: &Data) -> Cell {
    match value {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(trimmed.to_string())
            }
        }
        Data::Float(f) => Cell::Number(*f),
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Bool(b) => Cell::Text(b.to_string()),
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
    }
}

/// Union the sheets' columns by resolved name (first-seen order), append the
/// sheet tag column, and stack all rows in sheet-then-row order.
fn concat_sheets(sheets: &[SheetTable]) -> NormalizedTable {
    let mut columns: Vec<String> = Vec::new();
    for sheet in sheets {
        for name in &sheet.header {
            if !columns.iter().any(|c| c == name) {
                columns.push(name.clone());
            }
        }
    }
    let data_width = columns.len();
    columns.push(SHEET_TAG_COLUMN.to_string());

    let mut table = NormalizedTable::new(columns);
    for sheet in sheets {
        let index: Vec<Option<usize>> = table.columns[..data_width]
            .iter()
            .map(|c| sheet.header.iter().position(|h| h == c))
            .collect();
        for row in &sheet.rows {
            let mut cells: Vec<Cell> = index
                .iter()
                .map(|slot| slot.and_then(|i| row.get(i)).cloned().unwrap_or(Cell::Empty))
                .collect();
            cells.push(Cell::Text(sheet.name.clone()));
            table.rows.push(cells);
        }
    }
    table
}

/// Keep exactly the canonical columns, in canonical order. Everything else
/// (the `no` counter, the sheet tag, stray columns) is dropped; a missing
/// required column is an error, never silently filled.
fn project_canonical(file: &str, table: NormalizedTable) -> Result<NormalizedTable> {
    let mut indices = Vec::with_capacity(CANONICAL_COLUMNS.len());
    for column in CANONICAL_COLUMNS {
        let i = table
            .column_index(column)
            .ok_or_else(|| CombineError::SchemaMismatch {
                context: file.to_string(),
                detail: format!("required column `{column}` is missing after positional mapping"),
            })?;
        indices.push(i);
    }

    let mut out = NormalizedTable::new(CANONICAL_COLUMNS.iter().map(|c| c.to_string()).collect());
    out.rows = table
        .rows
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();
    Ok(out)
}
