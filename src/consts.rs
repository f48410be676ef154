// src/consts.rs
//! Shared constants: file naming, environment variables and crypto parameters

/// Extension of sidecar fingerprint records
pub const CHECKSUM_EXT: &str = "checksum";

/// Extension of tabular inputs and outputs
pub const CSV_EXT: &str = "csv";

/// Extension of encrypted payloads
pub const ENCRYPTED_EXT: &str = "bin";

pub const MASKED_SUFFIX: &str = "_masked";
pub const ENCRYPTED_MARKER: &str = "_encrypted";
pub const DECRYPTED_MARKER: &str = "_decrypted";

/// Default replacement character for masked cells
pub const DEFAULT_MASK_CHAR: char = '*';

/// PBKDF2 iterations written into each AES Crypt v3 header.
// Password input is the hex form of a 256-bit random key
pub const KEY_KDF_ITERATIONS: u32 = 10_000;

/// Header magic for AES-Crypt v3 payloads
pub const AESCRYPT_V3_HEADER: &[u8; 5] = b"AES\x03\x00";

/// Raw key length in bytes
pub const KEY_LEN: usize = 32;

pub const ENV_ENCRYPTION_KEY: &str = "ENCRYPTION_KEY";
pub const ENV_REQUIRE_ENCRYPTION: &str = "REQUIRE_ENCRYPTION";
pub const ENV_CONFIG_PATH: &str = "CSV_SENTINEL_CONFIG";
pub const ENV_INPUT_DIR: &str = "CSV_SENTINEL_INPUT_DIR";
pub const ENV_OUTPUT_DIR: &str = "CSV_SENTINEL_OUTPUT_DIR";
pub const ENV_WORKERS: &str = "CSV_SENTINEL_WORKERS";

pub const DEFAULT_CONFIG_FILE: &str = "csv-sentinel.toml";
pub const DEFAULT_INPUT_DIR: &str = "input";
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// File name of the optional JSON run report
pub const REPORT_FILE_NAME: &str = "pipeline_report.json";
