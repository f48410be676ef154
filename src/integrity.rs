// src/integrity.rs
//! Integrity verification against stored fingerprints
//!
//! First sighting of a file bootstraps trust: its current fingerprint becomes
//! the baseline and verification passes. After that, a plain verify only
//! compares. It never rewrites the record, even on mismatch; only
//! [`generate_checksum`] does.

use std::path::Path;

use tracing::{info, warn};

use crate::error::{CoreError, Result};
use crate::fingerprint::{base_name, fingerprint_file, generate_checksum};
use crate::store::FingerprintStore;

/// Outcome of checking one file against its record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntegrityCheck {
    /// No record existed; one was written with this digest
    Bootstrapped { digest: String },
    /// Current content matches the stored digest
    Verified,
    /// Current content differs from the stored digest
    Mismatch { expected: String, actual: String },
}

impl IntegrityCheck {
    pub fn is_ok(&self) -> bool {
        !matches!(self, IntegrityCheck::Mismatch { .. })
    }
}

/// Check `path` against the record for its base name, bootstrapping if absent
pub fn check_integrity<P: AsRef<Path>>(
    path: P,
    store: &dyn FingerprintStore,
) -> Result<IntegrityCheck> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }

    let Some(expected) = store.load(&base_name(path))? else {
        let record = generate_checksum(path, store)?;
        info!(file = %path.display(), record = %record.name, "no stored checksum, baseline recorded");
        return Ok(IntegrityCheck::Bootstrapped {
            digest: record.digest,
        });
    };

    let actual = fingerprint_file(path)?;
    if actual == expected {
        Ok(IntegrityCheck::Verified)
    } else {
        warn!(
            file = %path.display(),
            %expected,
            %actual,
            "checksum mismatch"
        );
        Ok(IntegrityCheck::Mismatch { expected, actual })
    }
}

/// Verify a file's integrity; `true` on match or first sighting
pub fn verify_file_integrity<P: AsRef<Path>>(
    path: P,
    store: &dyn FingerprintStore,
) -> Result<bool> {
    check_integrity(path, store).map(|check| check.is_ok())
}
