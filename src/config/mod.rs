// src/config/mod.rs
//! Configuration system for csv-sentinel
//!
//! Optional TOML file + environment overrides. The encryption key only ever
//! comes from the environment.

pub use app::{
    load, load_from, parse_file_config, Config, EncryptionSettings, FileConfig, MaskingSettings,
    Paths, PipelineSettings,
};

mod app;
mod defaults;
