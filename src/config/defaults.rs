// src/config/defaults.rs
use std::path::PathBuf;

use crate::config::app::{EncryptionSettings, MaskingSettings, Paths, PipelineSettings};
use crate::consts::{DEFAULT_INPUT_DIR, DEFAULT_MASK_CHAR, DEFAULT_OUTPUT_DIR};

pub fn default_paths() -> Paths {
    Paths {
        input_dir: PathBuf::from(DEFAULT_INPUT_DIR),
        output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
    }
}

pub fn default_encryption() -> EncryptionSettings {
    EncryptionSettings {
        require_encryption: false,
    }
}

pub fn default_masking() -> MaskingSettings {
    MaskingSettings {
        mask_char: DEFAULT_MASK_CHAR,
        extra_patterns: Vec::new(),
    }
}

pub fn default_pipeline() -> PipelineSettings {
    PipelineSettings {
        workers: 1,
        report: false,
    }
}
