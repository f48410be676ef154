// tests/common.rs
//! Shared test utilities: logging setup and sample data

#![allow(dead_code)] // each test binary uses a different subset

use std::fs;
use std::path::{Path, PathBuf};

#[cfg(feature = "logging")]
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

pub const SAMPLE_CSV: &str = "name,email,ssn,amount\n\
                              Alice,alice@example.com,123-45-6789,100\n\
                              Bob,bob@example.com,987-65-4321,200\n";

/// Initialize test-friendly logging; idempotent
pub fn setup() {
    #[cfg(feature = "logging")]
    tracing_subscriber::registry()
        .with(fmt::layer().with_test_writer())
        .with(EnvFilter::from_default_env())
        .try_init()
        .ok();

    #[cfg(not(feature = "logging"))]
    { /* no-op */ }
}

/// `input/` and `output/` under a fresh temp dir
pub struct Dirs {
    pub root: tempfile::TempDir,
    pub input: PathBuf,
    pub output: PathBuf,
}

impl Dirs {
    pub fn new() -> Self {
        setup();
        let root = tempfile::tempdir().unwrap();
        let input = root.path().join("input");
        let output = root.path().join("output");
        fs::create_dir_all(&input).unwrap();
        fs::create_dir_all(&output).unwrap();
        Self {
            root,
            input,
            output,
        }
    }

    pub fn write_input(&self, name: &str, content: &[u8]) -> PathBuf {
        let path = self.input.join(name);
        fs::write(&path, content).unwrap();
        path
    }

    pub fn write_sample(&self) -> PathBuf {
        self.write_input("sample.csv", SAMPLE_CSV.as_bytes())
    }

    pub fn output_file(&self, name: &str) -> PathBuf {
        self.output.join(name)
    }
}

pub fn read_string(path: &Path) -> String {
    fs::read_to_string(path).unwrap()
}
