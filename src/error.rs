use std::{io, path::PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CombineError>;

/// Failures a combine run can produce. Per-file failures
/// (`UnsupportedFormat`, `SchemaMismatch`, parse errors) exclude that file
/// from the merge without aborting the batch; `NoValidTables` and
/// `StorageWriteFailure` are terminal for the run.
#[derive(Error, Debug)]
pub enum CombineError {
    #[error("unsupported format: `{file}` has extension `{extension}`, expected .csv or .xlsx")]
    UnsupportedFormat { file: String, extension: String },

    #[error("schema mismatch in `{context}`: {detail}")]
    SchemaMismatch { context: String, detail: String },

    #[error("failed to write output artifact `{path}`")]
    StorageWriteFailure {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("no uploaded file produced a valid table ({failed} of {total} rejected)")]
    NoValidTables { failed: usize, total: usize },

    #[error("CSV parse error: {0}")]
    CsvParse(#[from] csv::Error),

    #[error("workbook read error: {0}")]
    WorkbookRead(#[from] calamine::XlsxError),

    #[error("workbook write error: {0}")]
    WorkbookWrite(#[from] rust_xlsxwriter::XlsxError),
}
