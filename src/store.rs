// src/store.rs
//! Sidecar fingerprint records
//!
//! A record is a single `{base name → digest}` entry. The filesystem store
//! keeps one `<base>.checksum` file per tracked file in the output directory;
//! the in-memory store exists so the verifier can be exercised without disk.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::consts::CHECKSUM_EXT;
use crate::error::Result;

/// Read/write access to fingerprint records keyed by base name.
///
/// Distinct base names never contend, so implementations only need to be
/// safe for concurrent use on *different* keys.
pub trait FingerprintStore: Send + Sync {
    /// Stored digest for `base_name`, trimmed, or `None` if never recorded
    fn load(&self, base_name: &str) -> Result<Option<String>>;

    /// Persist `digest`, replacing any previous record. Returns the record's name.
    fn save(&self, base_name: &str, digest: &str) -> Result<String>;

    /// Name of the record for `base_name`
    fn record_name(&self, base_name: &str) -> String {
        format!("{base_name}.{CHECKSUM_EXT}")
    }
}

/// `<dir>/<base>.checksum` files containing the bare digest
#[derive(Debug, Clone)]
pub struct FsFingerprintStore {
    dir: PathBuf,
}

impl FsFingerprintStore {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn record_path(&self, base_name: &str) -> PathBuf {
        self.dir.join(self.record_name(base_name))
    }
}

impl FingerprintStore for FsFingerprintStore {
    fn load(&self, base_name: &str) -> Result<Option<String>> {
        let path = self.record_path(base_name);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        Ok(Some(content.trim().to_owned()))
    }

    fn save(&self, base_name: &str, digest: &str) -> Result<String> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.record_path(base_name), digest)?;
        Ok(self.record_name(base_name))
    }
}

/// Process-local store, used in tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryFingerprintStore {
    records: Mutex<HashMap<String, String>>,
}

impl MemoryFingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl FingerprintStore for MemoryFingerprintStore {
    fn load(&self, base_name: &str) -> Result<Option<String>> {
        let records = self.records.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(base_name).map(|d| d.trim().to_owned()))
    }

    fn save(&self, base_name: &str, digest: &str) -> Result<String> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(base_name.to_owned(), digest.to_owned());
        Ok(self.record_name(base_name))
    }
}
