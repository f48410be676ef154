// src/report.rs
//! JSON run report
//!
//! A machine-readable record of one run for CI artifacts: per-status counts
//! plus every [`ProcessingResult`]. Contains no key material and no cell
//! values, only file names and stage markers.

use std::path::{Path, PathBuf};

use chrono::{SecondsFormat, Utc};
use serde_json::{json, Value};

use crate::consts::REPORT_FILE_NAME;
use crate::error::Result;
use crate::file_ops::write_artifact;
use crate::pipeline::{FileStatus, ProcessingResult};

pub const REPORT_FORMAT: &str = "csv-sentinel-report-v1";

pub fn build_report(results: &[ProcessingResult]) -> Value {
    let count = |status: FileStatus| results.iter().filter(|r| r.status() == status).count();

    json!({
        "report_format": REPORT_FORMAT,
        "generated_at": Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
        "generator_version": env!("CARGO_PKG_VERSION"),
        "total_files": results.len(),
        "counts": {
            "ok": count(FileStatus::Ok),
            "integrity_failed": count(FileStatus::IntegrityFailed),
            "skipped": count(FileStatus::Skipped),
            "error": count(FileStatus::Error),
        },
        "failed": results.iter().any(|r| r.status().is_failure()),
        "results": results,
    })
}

/// Write `pipeline_report.json` into `out_dir`
pub fn write_report(out_dir: &Path, results: &[ProcessingResult]) -> Result<PathBuf> {
    let path = out_dir.join(REPORT_FILE_NAME);
    let report = build_report(results);
    write_artifact(&path, serde_json::to_string_pretty(&report)?.as_bytes())?;
    Ok(path)
}
