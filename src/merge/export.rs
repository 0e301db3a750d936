use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Local};
use rust_xlsxwriter::Workbook;
use tracing::info;

use crate::error::{CombineError, Result};
use crate::table::{Cell, DefectRecord, CANONICAL_COLUMNS};

/// MIME type of the output artifact.
pub const ARTIFACT_MIME: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// The merged dataset, stored under the output directory and mirrored as an
/// in-memory buffer for download. Both hold identical bytes; immutable once
/// created.
#[derive(Debug, Clone)]
pub struct OutputArtifact {
    pub path: PathBuf,
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// Writes run artifacts under one explicitly configured output directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    out_dir: PathBuf,
}

impl Exporter {
    /// The directory is created here, once, so later export calls only fail
    /// on real storage trouble.
    pub fn new(out_dir: impl Into<PathBuf>) -> Result<Self> {
        let out_dir = out_dir.into();
        fs::create_dir_all(&out_dir).map_err(|source| CombineError::StorageWriteFailure {
            path: out_dir.clone(),
            source,
        })?;
        Ok(Self { out_dir })
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Serialize the merged records once to a buffer, persist that same
    /// buffer under a timestamp-derived name, and return both. The stored
    /// file and the download buffer cannot drift apart.
    pub fn export(
        &self,
        records: &[DefectRecord],
        at: DateTime<Local>,
    ) -> Result<OutputArtifact> {
        let file_name = artifact_name(at);
        let bytes = serialize_workbook(records)?;
        let path = self.out_dir.join(&file_name);
        fs::write(&path, &bytes).map_err(|source| CombineError::StorageWriteFailure {
            path: path.clone(),
            source,
        })?;
        info!(path = %path.display(), rows = records.len(), "artifact written");
        Ok(OutputArtifact {
            path,
            file_name,
            bytes,
        })
    }
}

/// `Combined_Data_<YYYYMMDD_HHMMSS>.xlsx`. Uniqueness is best-effort at
/// second granularity; two runs in the same second share a name.
pub fn artifact_name(at: DateTime<Local>) -> String {
    format!("Combined_Data_{}.xlsx", at.format("%Y%m%d_%H%M%S"))
}

fn serialize_workbook(records: &[DefectRecord]) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in CANONICAL_COLUMNS.iter().enumerate() {
        sheet.write_string(0, col as u16, *name)?;
    }
    for (row, record) in records.iter().enumerate() {
        let row = row as u32 + 1;
        for (col, cell) in record.cells().into_iter().enumerate() {
            let col = col as u16;
            match cell {
                Cell::Empty => {}
                Cell::Text(text) => {
                    sheet.write_string(row, col, text)?;
                }
                Cell::Number(n) => {
                    sheet.write_number(row, col, *n)?;
                }
            }
        }
    }
    Ok(workbook.save_to_buffer()?)
}
