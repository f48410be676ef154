// src/bin/csv_sentinel.rs
//! Single-pass batch run over the configured input and output directories.
//!
//! Exit status is 1 if any file failed integrity or errored, or if
//! REQUIRE_ENCRYPTION is set without ENCRYPTION_KEY.

use std::process::ExitCode;

use anyhow::{Context, Result};
use csv_sentinel::{load_config, Pipeline};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run() {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<ExitCode> {
    let config = load_config().context("failed to load configuration")?;
    info!(
        input = %config.input_dir().display(),
        output = %config.output_dir().display(),
        workers = config.pipeline.workers,
        encryption = config.encryption_enabled(),
        "csv-sentinel starting"
    );

    let summary = Pipeline::new(config).run().context("pipeline aborted")?;

    info!(
        total = summary.results.len(),
        failed = summary.results.iter().filter(|r| r.status().is_failure()).count(),
        "run complete"
    );

    Ok(if summary.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
