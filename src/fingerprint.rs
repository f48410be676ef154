// src/fingerprint.rs
//! Content fingerprints: SHA-256 over line-ending-normalized bytes
//!
//! A file checked out as CRLF on one machine and LF on another must hash the
//! same, otherwise integrity verification fails spuriously across platforms.
//! Text that is not valid UTF-8 is treated as binary and hashed untouched.

use std::borrow::Cow;
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::error::{CoreError, Result};
use crate::store::FingerprintStore;

/// Length of a rendered fingerprint (SHA-256 → 64 hex chars)
pub const FINGERPRINT_HEX_LEN: usize = 64;

/// Rewrite `\r\n` and lone `\r` to `\n` when `data` is UTF-8 text.
pub fn normalize_for_hash(data: &[u8]) -> Cow<'_, [u8]> {
    match std::str::from_utf8(data) {
        Ok(text) if text.contains('\r') => {
            Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n").into_bytes())
        }
        _ => Cow::Borrowed(data),
    }
}

/// Compute the lowercase hex SHA-256 fingerprint of normalized content
pub fn fingerprint(data: &[u8]) -> String {
    let normalized = normalize_for_hash(data);
    hex::encode(Sha256::digest(normalized.as_ref()))
}

/// True if `s` looks like something [`fingerprint`] produced
pub fn is_fingerprint(s: &str) -> bool {
    s.len() == FINGERPRINT_HEX_LEN
        && s.bytes()
            .all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

/// Read a file and fingerprint its content
pub fn fingerprint_file<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(CoreError::NotFound(path.to_path_buf()));
    }
    let data = std::fs::read(path)?;
    Ok(fingerprint(&data))
}

/// Base name a file's sidecar record is keyed by (its stem)
pub fn base_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Where a fingerprint was stored, and what it was
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecksumRecord {
    pub name: String,
    pub digest: String,
}

/// Fingerprint a file and persist the digest under its base name.
///
/// Overwrites any record already stored for that base name.
pub fn generate_checksum<P: AsRef<Path>>(
    path: P,
    store: &dyn FingerprintStore,
) -> Result<ChecksumRecord> {
    let path = path.as_ref();
    let digest = fingerprint_file(path)?;
    let name = store.save(&base_name(path), &digest)?;
    debug!(file = %path.display(), record = %name, "checksum written");
    Ok(ChecksumRecord { name, digest })
}
