// src/config/app.rs
use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use super::defaults::*;
use crate::aliases::EncryptionKey32;
use crate::cipher::parse_key;
use crate::consts::{
    DEFAULT_CONFIG_FILE, ENV_CONFIG_PATH, ENV_ENCRYPTION_KEY, ENV_INPUT_DIR, ENV_OUTPUT_DIR,
    ENV_REQUIRE_ENCRYPTION, ENV_WORKERS,
};
use crate::error::{CoreError, Result};
use crate::mask::{Masker, SensitivePatterns};

/// Shape of the optional TOML file. The key is never read from it.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub paths: Paths,
    pub encryption: EncryptionSettings,
    pub masking: MaskingSettings,
    pub pipeline: PipelineSettings,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            paths: default_paths(),
            encryption: default_encryption(),
            masking: default_masking(),
            pipeline: default_pipeline(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Paths {
    pub input_dir: PathBuf,
    pub output_dir: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        default_paths()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EncryptionSettings {
    pub require_encryption: bool,
}

impl Default for EncryptionSettings {
    fn default() -> Self {
        default_encryption()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaskingSettings {
    pub mask_char: char,
    pub extra_patterns: Vec<String>,
}

impl Default for MaskingSettings {
    fn default() -> Self {
        default_masking()
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub workers: usize,
    pub report: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        default_pipeline()
    }
}

/// Resolved runtime configuration: TOML file + environment + key
pub struct Config {
    pub paths: Paths,
    pub masking: MaskingSettings,
    pub pipeline: PipelineSettings,
    pub require_encryption: bool,
    key: Option<EncryptionKey32>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("paths", &self.paths)
            .field("masking", &self.masking)
            .field("pipeline", &self.pipeline)
            .field("require_encryption", &self.require_encryption)
            .field("key", &self.key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_file_config(FileConfig::default())
    }
}

impl Config {
    pub fn from_file_config(file: FileConfig) -> Self {
        Self {
            paths: file.paths,
            masking: file.masking,
            pipeline: file.pipeline,
            require_encryption: file.encryption.require_encryption,
            key: None,
        }
    }

    /// Defaults with explicit input and output directories
    pub fn with_dirs<P: Into<PathBuf>, Q: Into<PathBuf>>(input_dir: P, output_dir: Q) -> Self {
        let mut conf = Self::default();
        conf.paths.input_dir = input_dir.into();
        conf.paths.output_dir = output_dir.into();
        conf
    }

    pub fn with_key(mut self, key: Option<EncryptionKey32>) -> Self {
        self.key = key;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.pipeline.workers = workers.max(1);
        self
    }

    pub fn key(&self) -> Option<&EncryptionKey32> {
        self.key.as_ref()
    }

    /// Encryption stages run only when a key is present
    pub fn encryption_enabled(&self) -> bool {
        self.key.is_some()
    }

    pub fn input_dir(&self) -> &Path {
        &self.paths.input_dir
    }

    pub fn output_dir(&self) -> &Path {
        &self.paths.output_dir
    }

    pub fn masker(&self) -> Masker {
        Masker::new(
            SensitivePatterns::with_extra(&self.masking.extra_patterns),
            self.masking.mask_char,
        )
    }
}

/// Parse the TOML config format
pub fn parse_file_config(content: &str) -> Result<FileConfig> {
    Ok(toml::from_str(content)?)
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}

/// Resolve configuration from a variable lookup.
///
/// The TOML file named by `CSV_SENTINEL_CONFIG` (default `csv-sentinel.toml`)
/// is optional unless the variable names it explicitly. Environment values
/// override file values.
pub fn load_from<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let explicit_path = lookup(ENV_CONFIG_PATH);
    let config_path = explicit_path
        .clone()
        .unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_owned());

    let file = if Path::new(&config_path).exists() {
        debug!(path = %config_path, "loading config file");
        parse_file_config(&std::fs::read_to_string(&config_path)?)?
    } else if explicit_path.is_some() {
        return Err(CoreError::Config(format!(
            "config file not found: {config_path}"
        )));
    } else {
        FileConfig::default()
    };

    let mut conf = Config::from_file_config(file);

    if let Some(dir) = lookup(ENV_INPUT_DIR).filter(|v| !v.trim().is_empty()) {
        conf.paths.input_dir = PathBuf::from(dir.trim());
    }
    if let Some(dir) = lookup(ENV_OUTPUT_DIR).filter(|v| !v.trim().is_empty()) {
        conf.paths.output_dir = PathBuf::from(dir.trim());
    }
    if let Some(workers) = lookup(ENV_WORKERS) {
        let workers: usize = workers
            .trim()
            .parse()
            .map_err(|_| CoreError::Config(format!("{ENV_WORKERS} must be a number")))?;
        conf.pipeline.workers = workers;
    }
    if let Some(flag) = lookup(ENV_REQUIRE_ENCRYPTION) {
        conf.require_encryption = is_truthy(&flag);
    }
    if conf.pipeline.workers == 0 {
        warn!("workers = 0 is not meaningful, using 1");
        conf.pipeline.workers = 1;
    }

    conf.key = match lookup(ENV_ENCRYPTION_KEY) {
        Some(text) if !text.trim().is_empty() => Some(parse_key(&text)?),
        _ => None,
    };

    Ok(conf)
}

/// Resolve configuration from the process environment
pub fn load() -> Result<Config> {
    load_from(|name| std::env::var(name).ok())
}
