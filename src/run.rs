use chrono::Local;
use serde::Serialize;
use tracing::{error, info};

use crate::error::{CombineError, Result};
use crate::merge::{Accumulator, Exporter, OutputArtifact, ARTIFACT_MIME};
use crate::normalize::{self, UploadedFile};
use crate::table::{self, DefectRecord};

/// Outcome of normalizing one uploaded file.
#[derive(Debug, Serialize)]
pub struct FileOutcome {
    pub file: String,
    /// Rows this file contributed to the accumulator (pre-dedup).
    pub rows: usize,
    /// Present when the file was rejected; a rejected file contributes
    /// nothing to the merge.
    pub error: Option<String>,
}

/// Summary of one completed run.
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<FileOutcome>,
    pub merged_rows: usize,
    pub duplicates_removed: usize,
    pub records: Vec<DefectRecord>,
    pub artifact: OutputArtifact,
}

impl RunReport {
    /// Machine-readable summary for the CLI's `--json` output.
    pub fn summary_json(&self) -> serde_json::Value {
        serde_json::json!({
            "stored_path": &self.artifact.path,
            "file_name": &self.artifact.file_name,
            "mime": ARTIFACT_MIME,
            "artifact_bytes": self.artifact.bytes.len(),
            "merged_rows": self.merged_rows,
            "duplicates_removed": self.duplicates_removed,
            "files": &self.outcomes,
        })
    }

    /// Text preview of the first `limit` merged rows.
    pub fn preview(&self, limit: usize) -> String {
        table::render_preview(&self.records, limit)
    }
}

/// Process one batch: normalize each file in input order (a bad file is
/// reported and skipped, never aborts the batch), merge, dedup, export
/// once. Fails with `NoValidTables` when nothing could be merged, which
/// keeps "no usable input" distinguishable from a storage write failure.
pub fn run_batch(files: &[UploadedFile], exporter: &Exporter) -> Result<RunReport> {
    let mut accumulator = Accumulator::new();
    let mut outcomes = Vec::with_capacity(files.len());
    let mut valid = 0usize;

    for file in files {
        match normalize::normalize(file) {
            Ok(table) => {
                let rows = accumulator.append(&table);
                valid += 1;
                outcomes.push(FileOutcome {
                    file: file.name.clone(),
                    rows,
                    error: None,
                });
            }
            Err(err) => {
                error!(file = %file.name, %err, "file rejected");
                outcomes.push(FileOutcome {
                    file: file.name.clone(),
                    rows: 0,
                    error: Some(err.to_string()),
                });
            }
        }
    }

    if valid == 0 {
        return Err(CombineError::NoValidTables {
            failed: outcomes.len(),
            total: files.len(),
        });
    }

    let appended = accumulator.len();
    let records = accumulator.finish();
    let duplicates_removed = appended - records.len();
    let artifact = exporter.export(&records, Local::now())?;
    info!(
        merged_rows = records.len(),
        duplicates_removed, "run complete"
    );

    Ok(RunReport {
        outcomes,
        merged_rows: records.len(),
        duplicates_removed,
        records,
        artifact,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Cell;

    fn exporter() -> (tempfile::TempDir, Exporter) {
        let dir = tempfile::tempdir().unwrap();
        let exporter = Exporter::new(dir.path()).unwrap();
        (dir, exporter)
    }

    #[test]
    fn duplicate_row_across_two_csvs_is_merged_once() {
        let (_dir, exporter) = exporter();
        let a = UploadedFile::new(
            "a.csv",
            b"DD,MM,part_name\n1,5,bracket\n2,5,housing\n".to_vec(),
        );
        let b = UploadedFile::new(
            "b.csv",
            b"DD,MM,part_name\n2,5,housing\n3,5,cover\n".to_vec(),
        );

        let report = run_batch(&[a, b], &exporter).unwrap();
        assert_eq!(report.merged_rows, 3);
        assert_eq!(report.duplicates_removed, 1);
        assert_eq!(report.records[1].part_name, Cell::Text("housing".into()));
    }

    #[test]
    fn unsupported_file_is_reported_without_aborting_the_batch() {
        let (_dir, exporter) = exporter();
        let good = UploadedFile::new("a.csv", b"DD,MM\n1,5\n".to_vec());
        let bad = UploadedFile::new("notes.txt", b"not a table".to_vec());

        let report = run_batch(&[bad, good], &exporter).unwrap();
        assert_eq!(report.merged_rows, 1);
        assert_eq!(report.outcomes.len(), 2);
        let rejected = &report.outcomes[0];
        assert_eq!(rejected.rows, 0);
        assert!(rejected.error.as_deref().unwrap().contains("unsupported format"));
        assert!(report.outcomes[1].error.is_none());
    }

    #[test]
    fn run_with_no_valid_table_fails_distinctly() {
        let (_dir, exporter) = exporter();
        let bad = UploadedFile::new("notes.txt", b"not a table".to_vec());
        let err = run_batch(&[bad], &exporter).unwrap_err();
        match err {
            CombineError::NoValidTables { failed, total } => {
                assert_eq!((failed, total), (1, 1));
            }
            other => panic!("expected NoValidTables, got {other:?}"),
        }
    }

    #[test]
    fn workbook_sheets_are_capped_then_merged() {
        use rust_xlsxwriter::{Workbook, Worksheet};

        fn sheet(name: &str, rows: usize, shift: f64) -> Worksheet {
            let mut s = Worksheet::new();
            s.set_name(name).unwrap();
            s.write_string(0, 0, "WEEKLY DEFECT TRACKING").unwrap();
            s.write_string(8, 1, "DD").unwrap();
            s.write_string(8, 2, "MM").unwrap();
            s.write_string(8, 3, "YY").unwrap();
            for i in 0..rows {
                let r = 9 + i as u32;
                s.write_number(r, 1, (i % 28) as f64 + 1.0).unwrap();
                s.write_number(r, 5, shift).unwrap();
                s.write_string(r, 8, format!("part-{i}")).unwrap();
                s.write_number(r, 17, 0.5 + i as f64).unwrap();
            }
            s
        }

        let mut workbook = Workbook::new();
        workbook.push_worksheet(sheet("Jan", 300, 1.0));
        workbook.push_worksheet(sheet("Feb", 300, 2.0));
        let bytes = workbook.save_to_buffer().unwrap();

        let (_dir, exporter) = exporter();
        let report =
            run_batch(&[UploadedFile::new("defects.xlsx", bytes)], &exporter).unwrap();
        // 2 sheets, 273-row cap each, no row repeated
        assert_eq!(report.merged_rows, 546);
        assert_eq!(report.duplicates_removed, 0);
        assert_eq!(report.outcomes[0].rows, 546);
    }

    #[test]
    fn report_serializes_with_per_file_outcomes() {
        let (_dir, exporter) = exporter();
        let good = UploadedFile::new("a.csv", b"DD\n1\n".to_vec());
        let report = run_batch(&[good], &exporter).unwrap();

        let json = report.summary_json();
        assert_eq!(json["merged_rows"], 1);
        assert_eq!(json["mime"], ARTIFACT_MIME);
        assert_eq!(json["files"][0]["file"], "a.csv");
        assert!(json["files"][0]["error"].is_null());
    }
}
