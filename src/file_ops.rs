// src/file_ops.rs
//! File-level operations
//!
//! Each function reads one source file, applies one primitive and writes the
//! named artifact into an output directory (created if absent). Artifact
//! names follow the source's base name:
//!
//! - `<base>_masked.csv`
//! - `<base>_encrypted.bin`
//! - `<base without _encrypted>_decrypted[_masked].csv`

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::aliases::EncryptionKey32;
use crate::cipher::{decrypt_to_vec, encrypt_to_vec};
use crate::consts::{
    CSV_EXT, DECRYPTED_MARKER, ENCRYPTED_EXT, ENCRYPTED_MARKER, MASKED_SUFFIX,
};
use crate::error::{CoreError, Result};
use crate::fingerprint::base_name;
use crate::mask::Masker;
use crate::table::Table;

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(CoreError::NotFound(path.to_path_buf()))
    }
}

/// Write an artifact, creating its directory first
pub fn write_artifact(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, data)?;
    debug!(artifact = %path.display(), bytes = data.len(), "artifact written");
    Ok(())
}

pub fn masked_output_path(out_dir: &Path, source: &Path) -> PathBuf {
    out_dir.join(format!("{}{MASKED_SUFFIX}.{CSV_EXT}", base_name(source)))
}

pub fn encrypted_output_path(out_dir: &Path, source: &Path) -> PathBuf {
    out_dir.join(format!(
        "{}{ENCRYPTED_MARKER}.{ENCRYPTED_EXT}",
        base_name(source)
    ))
}

pub fn decrypted_output_path(out_dir: &Path, encrypted: &Path, masked: bool) -> PathBuf {
    let stem = base_name(encrypted);
    let stem = stem.strip_suffix(ENCRYPTED_MARKER).unwrap_or(&stem);
    let suffix = if masked { MASKED_SUFFIX } else { "" };
    out_dir.join(format!("{stem}{DECRYPTED_MARKER}{suffix}.{CSV_EXT}"))
}

/// Encrypt a file on disk. Returns the plaintext size in bytes.
pub fn encrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    key: Option<&EncryptionKey32>,
) -> Result<u64> {
    let input_path = input_path.as_ref();
    ensure_exists(input_path)?;
    let key = key.ok_or(CoreError::KeyNotConfigured)?;

    let plaintext = fs::read(input_path)?;
    let ciphertext = encrypt_to_vec(&plaintext, Some(key))?;
    write_artifact(output_path.as_ref(), &ciphertext)?;
    Ok(plaintext.len() as u64)
}

/// Decrypt a payload on disk. Returns the plaintext size in bytes.
///
/// Nothing is written unless the payload authenticates.
pub fn decrypt_file<P: AsRef<Path>, Q: AsRef<Path>>(
    input_path: P,
    output_path: Q,
    key: Option<&EncryptionKey32>,
) -> Result<u64> {
    let plaintext = read_decrypted(input_path.as_ref(), key)?;
    write_artifact(output_path.as_ref(), &plaintext)?;
    Ok(plaintext.len() as u64)
}

fn read_decrypted(input_path: &Path, key: Option<&EncryptionKey32>) -> Result<Vec<u8>> {
    ensure_exists(input_path)?;
    let key = key.ok_or(CoreError::KeyNotConfigured)?;
    let ciphertext = fs::read(input_path)?;
    decrypt_to_vec(&ciphertext, Some(key))
}

/// Mask a CSV file into `<out_dir>/<base>_masked.csv`
pub fn mask_sensitive_columns<P: AsRef<Path>>(
    csv_file: P,
    out_dir: &Path,
    masker: &Masker,
) -> Result<PathBuf> {
    let csv_path = csv_file.as_ref();
    let table = Table::read_csv(csv_path)?;
    let masked = masker.mask_table(&table);

    let output_path = masked_output_path(out_dir, csv_path);
    write_artifact(&output_path, &masked.to_csv_bytes()?)?;
    Ok(output_path)
}

/// Encrypt a CSV file into `<out_dir>/<base>_encrypted.bin`
pub fn encrypt_csv_output<P: AsRef<Path>>(
    csv_file: P,
    out_dir: &Path,
    key: Option<&EncryptionKey32>,
) -> Result<PathBuf> {
    let csv_path = csv_file.as_ref();
    let output_path = encrypted_output_path(out_dir, csv_path);
    encrypt_file(csv_path, &output_path, key)?;
    Ok(output_path)
}

/// Decrypt a payload into `<out_dir>/<base>_decrypted[_masked].csv`.
///
/// With a masker, the plaintext is parsed as a table and masked before it
/// touches the disk.
pub fn decrypt_csv_output<P: AsRef<Path>>(
    encrypted_file: P,
    out_dir: &Path,
    key: Option<&EncryptionKey32>,
    masker: Option<&Masker>,
) -> Result<PathBuf> {
    let encrypted_path = encrypted_file.as_ref();
    let output_path = decrypted_output_path(out_dir, encrypted_path, masker.is_some());

    match masker {
        None => {
            decrypt_file(encrypted_path, &output_path, key)?;
        }
        Some(masker) => {
            let plaintext = read_decrypted(encrypted_path, key)?;
            let masked = masker.mask_table(&Table::from_csv_bytes(&plaintext)?);
            write_artifact(&output_path, &masked.to_csv_bytes()?)?;
        }
    }
    Ok(output_path)
}
