pub mod export;

pub use export::{artifact_name, Exporter, OutputArtifact, ARTIFACT_MIME};

use std::collections::HashSet;

use tracing::debug;

use crate::table::{Cell, DefectRecord, NormalizedTable, CANONICAL_COLUMNS};

/// Running union of all normalized tables in one run. Rows are kept in
/// file-processing order then within-file order; `finish` dedups once.
#[derive(Debug, Default)]
pub struct Accumulator {
    records: Vec<DefectRecord>,
}

impl Accumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a table, aligning its columns to the canonical schema by NAME
    /// (not position): missing columns contribute absence, extra columns are
    /// ignored. Rows blank across all 17 columns are never admitted.
    /// Returns the number of rows admitted.
    pub fn append(&mut self, table: &NormalizedTable) -> usize {
        let index: Vec<Option<usize>> = CANONICAL_COLUMNS
            .iter()
            .map(|c| table.column_index(c))
            .collect();

        let mut admitted = 0usize;
        for row in &table.rows {
            let cells: [Cell; CANONICAL_COLUMNS.len()] = std::array::from_fn(|k| {
                index[k]
                    .and_then(|i| row.get(i))
                    .cloned()
                    .unwrap_or(Cell::Empty)
            });
            let record = DefectRecord::from_cells(cells);
            if record.is_blank() {
                continue;
            }
            self.records.push(record);
            admitted += 1;
        }
        debug!(admitted, "rows appended to accumulator");
        admitted
    }

    /// Finalize: drop every row that is a value-for-value duplicate of an
    /// earlier one, keeping first occurrences in order.
    pub fn finish(self) -> Vec<DefectRecord> {
        let mut seen: HashSet<DefectRecord> = HashSet::with_capacity(self.records.len());
        let mut kept = Vec::with_capacity(self.records.len());
        for record in self.records {
            if seen.insert(record.clone()) {
                kept.push(record);
            }
        }
        kept
    }
}
