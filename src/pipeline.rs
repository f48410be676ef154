// src/pipeline.rs
//! Batch orchestration: one pass over the input and output directories
//!
//! Per CSV file: verify → (key present) encrypt original + decrypt unmasked
//! copy → mask → fingerprint masked output. Per `.bin` payload: decrypt
//! unmasked → decrypt masked → fingerprint masked output.
//!
//! Every per-file failure becomes a [`ProcessingResult`]; only configuration
//! errors (a mandatory key that is missing) abort the run.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Serialize;
use tracing::{error, info, warn};
use walkdir::WalkDir;

use crate::config::Config;
use crate::consts::{CSV_EXT, ENCRYPTED_EXT};
use crate::error::{CoreError, Result};
use crate::file_ops::{
    decrypt_csv_output, decrypted_output_path, encrypt_csv_output, mask_sensitive_columns,
};
use crate::fingerprint::generate_checksum;
use crate::integrity::verify_file_integrity;
use crate::mask::Masker;
use crate::report::write_report;
use crate::store::{FingerprintStore, FsFingerprintStore};

pub const MARKER_INTEGRITY_VERIFIED: &str = "integrity_verified";
pub const MARKER_INTEGRITY_FAILED: &str = "integrity_verification_failed";
pub const MARKER_DECRYPTION_SKIPPED: &str = "decryption_skipped_no_key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Ok,
    IntegrityFailed,
    Skipped,
    Error,
}

impl FileStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileStatus::Ok => "ok",
            FileStatus::IntegrityFailed => "integrity_failed",
            FileStatus::Skipped => "skipped",
            FileStatus::Error => "error",
        }
    }

    /// Statuses that make the run exit non-zero
    pub fn is_failure(&self) -> bool {
        matches!(self, FileStatus::IntegrityFailed | FileStatus::Error)
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one file in one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessingResult {
    file: String,
    status: FileStatus,
    outputs: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl ProcessingResult {
    fn from_outcome(file: String, outputs: Vec<String>, outcome: Result<FileStatus>) -> Self {
        match outcome {
            Ok(status) => Self {
                file,
                status,
                outputs,
                error: None,
            },
            Err(err) => {
                error!(file = %file, error = %err, "error processing file");
                Self {
                    file,
                    status: FileStatus::Error,
                    outputs,
                    error: Some(err.to_string()),
                }
            }
        }
    }

    pub fn file(&self) -> &str {
        &self.file
    }

    pub fn status(&self) -> FileStatus {
        self.status
    }

    /// Produced artifacts and stage markers, in production order
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkKind {
    Csv,
    Encrypted,
}

/// A discovered file and how it will be processed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub path: PathBuf,
    pub kind: WorkKind,
}

/// All results of one run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub results: Vec<ProcessingResult>,
}

impl RunSummary {
    pub fn has_errors(&self) -> bool {
        self.results.iter().any(|r| r.status.is_failure())
    }

    pub fn count(&self, status: FileStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    pub fn exit_code(&self) -> i32 {
        i32::from(self.has_errors())
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Files directly inside `dir` with extension `ext` (case-insensitive), sorted
fn list_by_extension(dir: &Path, ext: &str) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.map_err(std::io::Error::from)?;
        let matches = entry.file_type().is_file()
            && entry
                .path()
                .extension()
                .and_then(|s| s.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(ext));
        if matches {
            found.push(entry.into_path());
        }
    }
    Ok(found)
}

pub struct Pipeline {
    config: Config,
    masker: Masker,
    store: Box<dyn FingerprintStore>,
}

impl Pipeline {
    /// Pipeline with sidecar records in the configured output directory
    pub fn new(config: Config) -> Self {
        let store = FsFingerprintStore::new(config.output_dir());
        Self::with_store(config, Box::new(store))
    }

    pub fn with_store(config: Config, store: Box<dyn FingerprintStore>) -> Self {
        let masker = config.masker();
        Self {
            config,
            masker,
            store,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Find work: CSV and `.bin` inputs, plus `.bin` payloads in the output
    /// directory that have not been decrypted yet. Creates both directories.
    pub fn discover(&self) -> Result<Vec<WorkItem>> {
        let input_dir = self.config.input_dir();
        let output_dir = self.config.output_dir();
        fs::create_dir_all(input_dir)?;
        fs::create_dir_all(output_dir)?;

        let csv_inputs = list_by_extension(input_dir, CSV_EXT)?;
        let bin_inputs = list_by_extension(input_dir, ENCRYPTED_EXT)?;
        let pending_outputs = list_by_extension(output_dir, ENCRYPTED_EXT)?
            .into_iter()
            .filter(|bin| !decrypted_output_path(output_dir, bin, false).exists());

        let items = csv_inputs
            .into_iter()
            .map(|path| WorkItem {
                path,
                kind: WorkKind::Csv,
            })
            .chain(
                bin_inputs
                    .into_iter()
                    .chain(pending_outputs)
                    .map(|path| WorkItem {
                        path,
                        kind: WorkKind::Encrypted,
                    }),
            )
            .collect();
        Ok(items)
    }

    pub fn process(&self, item: &WorkItem) -> ProcessingResult {
        match item.kind {
            WorkKind::Csv => self.process_csv_file(&item.path),
            WorkKind::Encrypted => self.process_encrypted_file(&item.path),
        }
    }

    pub fn process_csv_file(&self, csv_path: &Path) -> ProcessingResult {
        let mut outputs = Vec::new();
        let outcome = self.csv_stages(csv_path, &mut outputs);
        ProcessingResult::from_outcome(file_name(csv_path), outputs, outcome)
    }

    fn csv_stages(&self, csv_path: &Path, outputs: &mut Vec<String>) -> Result<FileStatus> {
        let output_dir = self.config.output_dir();

        if !verify_file_integrity(csv_path, self.store.as_ref())? {
            outputs.push(MARKER_INTEGRITY_FAILED.to_owned());
            return Ok(FileStatus::IntegrityFailed);
        }
        outputs.push(MARKER_INTEGRITY_VERIFIED.to_owned());

        if self.config.encryption_enabled() {
            match self.encryption_roundtrip(csv_path, outputs) {
                Err(err) if err.is_key_missing() => {
                    warn!(file = %csv_path.display(), "skipping encryption: {err}");
                }
                other => other?,
            }
        }

        let masked_path = mask_sensitive_columns(csv_path, output_dir, &self.masker)?;
        outputs.push(file_name(&masked_path));

        let record = generate_checksum(&masked_path, self.store.as_ref())?;
        outputs.push(record.name);

        Ok(FileStatus::Ok)
    }

    /// Encrypt the original bytes, then decrypt an unmasked copy back out
    fn encryption_roundtrip(&self, csv_path: &Path, outputs: &mut Vec<String>) -> Result<()> {
        let output_dir = self.config.output_dir();
        let key = self.config.key();

        let encrypted = encrypt_csv_output(csv_path, output_dir, key)?;
        outputs.push(file_name(&encrypted));

        let decrypted = decrypt_csv_output(&encrypted, output_dir, key, None)?;
        outputs.push(file_name(&decrypted));
        Ok(())
    }

    pub fn process_encrypted_file(&self, bin_path: &Path) -> ProcessingResult {
        let mut outputs = Vec::new();
        let outcome = self.encrypted_stages(bin_path, &mut outputs);
        ProcessingResult::from_outcome(file_name(bin_path), outputs, outcome)
    }

    fn encrypted_stages(&self, bin_path: &Path, outputs: &mut Vec<String>) -> Result<FileStatus> {
        if !self.config.encryption_enabled() {
            outputs.push(MARKER_DECRYPTION_SKIPPED.to_owned());
            return Ok(FileStatus::Skipped);
        }
        let output_dir = self.config.output_dir();
        let key = self.config.key();

        let unmasked = decrypt_csv_output(bin_path, output_dir, key, None)?;
        outputs.push(file_name(&unmasked));

        let masked = decrypt_csv_output(bin_path, output_dir, key, Some(&self.masker))?;
        outputs.push(file_name(&masked));

        let record = generate_checksum(&masked, self.store.as_ref())?;
        outputs.push(record.name);

        Ok(FileStatus::Ok)
    }

    /// Process every discovered file; results keep discovery order
    pub fn process_all(&self) -> Result<Vec<ProcessingResult>> {
        let items = self.discover()?;
        if items.is_empty() {
            info!("No CSV or .bin files found in input or output directory.");
            return Ok(Vec::new());
        }

        let workers = self.config.pipeline.workers;
        if workers <= 1 {
            return Ok(items.iter().map(|item| self.process(item)).collect());
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .build()
            .map_err(|e| CoreError::Config(format!("worker pool: {e}")))?;
        Ok(pool.install(|| items.par_iter().map(|item| self.process(item)).collect()))
    }

    /// Full run: policy check, processing, per-file log lines, optional report
    pub fn run(&self) -> Result<RunSummary> {
        if !self.config.encryption_enabled() {
            if self.config.require_encryption {
                error!(
                    "REQUIRE_ENCRYPTION is set but ENCRYPTION_KEY is missing. \
                     Configure ENCRYPTION_KEY before running. Aborting."
                );
                return Err(CoreError::KeyNotConfigured);
            }
            info!("ENCRYPTION_KEY not set - encryption/decryption will be skipped.");
        }

        let results = self.process_all()?;
        for r in &results {
            info!(file = %r.file, status = %r.status, outputs = ?r.outputs, "processed");
        }

        if self.config.pipeline.report {
            let path = write_report(self.config.output_dir(), &results)?;
            info!(report = %path.display(), "run report written");
        }

        Ok(RunSummary { results })
    }
}

/// Run the pipeline once with file-backed fingerprint records
pub fn run(config: Config) -> Result<RunSummary> {
    Pipeline::new(config).run()
}
