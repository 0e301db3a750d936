use anyhow::{bail, Context, Result};
use defectmerge::{run_batch, Exporter, UploadedFile, ARTIFACT_MIME};
use std::{env, fs, path::Path};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();

    // ─── 2) parse args ───────────────────────────────────────────────
    let mut out_dir = String::from("output_files");
    let mut json = false;
    let mut paths: Vec<String> = Vec::new();
    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--out-dir" => {
                out_dir = args
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--out-dir needs a value"))?;
            }
            "--json" => json = true,
            _ => paths.push(arg),
        }
    }
    if paths.is_empty() {
        bail!("usage: defectmerge [--out-dir DIR] [--json] FILE...");
    }

    // ─── 3) load uploads ─────────────────────────────────────────────
    let mut files = Vec::with_capacity(paths.len());
    for path in &paths {
        let name = Path::new(path)
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.clone());
        let bytes = fs::read(path).with_context(|| format!("reading {path}"))?;
        files.push(UploadedFile::new(name, bytes));
    }
    info!(files = files.len(), out_dir = %out_dir, "starting run");

    // ─── 4) run the pipeline ─────────────────────────────────────────
    let exporter = Exporter::new(&out_dir)?;
    let report = run_batch(&files, &exporter)?;

    // ─── 5) report ───────────────────────────────────────────────────
    for outcome in &report.outcomes {
        match &outcome.error {
            None => info!(file = %outcome.file, rows = outcome.rows, "merged"),
            Some(err) => error!(file = %outcome.file, %err, "rejected"),
        }
    }
    info!(
        path = %report.artifact.path.display(),
        rows = report.merged_rows,
        deduped = report.duplicates_removed,
        mime = ARTIFACT_MIME,
        "combined data saved"
    );

    if json {
        println!("{}", serde_json::to_string_pretty(&report.summary_json())?);
    } else {
        println!("{}", report.preview(20));
    }

    Ok(())
}
