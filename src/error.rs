// src/error.rs
//! Public error type for the entire crate

use std::path::PathBuf;

use aescrypt_rs::AescryptError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("File not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("Encryption key not configured. Set ENCRYPTION_KEY environment variable.")]
    KeyNotConfigured,

    #[error("Invalid encryption key: {0}")]
    InvalidKey(String),

    #[error("Decryption failed. Invalid or wrong encryption key, or corrupted file.")]
    DecryptionFailed,

    #[error("Integrity verification failed for {0}")]
    IntegrityMismatch(String),

    #[error("Crypto operation failed: {0}")]
    Crypto(AescryptError),

    #[error("Table error: {0}")]
    Table(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<AescryptError> for CoreError {
    fn from(err: AescryptError) -> Self {
        CoreError::Crypto(err)
    }
}

impl From<toml::de::Error> for CoreError {
    fn from(err: toml::de::Error) -> Self {
        CoreError::Config(err.to_string())
    }
}

impl CoreError {
    /// True for the errors a caller can treat as "skip the cipher stage".
    pub fn is_key_missing(&self) -> bool {
        matches!(self, CoreError::KeyNotConfigured)
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
