//! Merge heterogeneous defect-tracking uploads (CSV files and multi-sheet
//! xlsx workbooks) into one deduplicated dataset, exported as a single
//! timestamp-named xlsx artifact plus an identical download buffer.

pub mod error;
pub mod merge;
pub mod normalize;
pub mod run;
pub mod table;

pub use error::{CombineError, Result};
pub use merge::{Accumulator, Exporter, OutputArtifact, ARTIFACT_MIME};
pub use normalize::UploadedFile;
pub use run::{run_batch, FileOutcome, RunReport};
