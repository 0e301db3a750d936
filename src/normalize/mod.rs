pub mod clean;
pub mod csv;
pub mod mapping;
pub mod workbook;

use std::path::Path;

use tracing::info;

use crate::error::{CombineError, Result};
use crate::table::NormalizedTable;

/// One uploaded file. The name is used only to classify the format; the
/// bytes are consumed by exactly one normalization call.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    fn extension(&self) -> String {
        Path::new(&self.name)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase()
    }
}

/// Convert one upload into a table, dispatching on the file extension.
pub fn normalize(file: &UploadedFile) -> Result<NormalizedTable> {
    let table = match file.extension().as_str() {
        "csv" => csv::normalize_csv(&file.bytes)?,
        "xlsx" => workbook::normalize_workbook(&file.name, &file.bytes)?,
        other => {
            return Err(CombineError::UnsupportedFormat {
                file: file.name.clone(),
                extension: other.to_string(),
            })
        }
    };
    info!(file = %file.name, rows = table.rows.len(), "normalized");
    Ok(table)
}
