// src/lib.rs
//! csv-sentinel: batch integrity, masking and at-rest encryption for CSV files
//!
//! Features:
//! - SHA-256 fingerprints with line-ending normalization
//! - Bootstrap-trust integrity verification against sidecar records
//! - Rule-table sensitive column detection and length-preserving masking
//! - AES Crypt v3 authenticated encryption of whole files

pub mod aliases;
pub mod cipher;
pub mod config;
pub mod consts;
pub mod error;
pub mod file_ops;
pub mod fingerprint;
pub mod integrity;
pub mod mask;
pub mod pipeline;
pub mod report;
pub mod store;
pub mod table;

// Re-export everything users need at the crate root
pub use aliases::EncryptionKey32;
pub use cipher::{decrypt_to_vec, encrypt_to_vec, generate_key, parse_key};
pub use config::{load as load_config, Config};
pub use error::{CoreError, Result as CoreResult};
pub use fingerprint::{fingerprint, generate_checksum};
pub use integrity::{check_integrity, verify_file_integrity, IntegrityCheck};
pub use mask::{is_sensitive_column, mask_table, mask_value, Masker, SensitivePatterns};
pub use pipeline::{run, FileStatus, Pipeline, ProcessingResult, RunSummary};
pub use store::{FingerprintStore, FsFingerprintStore, MemoryFingerprintStore};
pub use table::Table;
