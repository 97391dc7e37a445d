//! Shake configuration loading and validation.
//!
//! This crate provides:
//! - Typed Rust structs for flush, motion, sweep, and output settings
//! - Config resolution (CLI → env → XDG → defaults, or a named preset)
//! - Semantic validation
//! - Configuration presets

pub mod flush;
pub mod motion;
pub mod preset;
pub mod resolve;
pub mod validate;

pub use flush::{FlushConfig, IsolationMode};
pub use motion::{MotionConfig, SweepConfig};
pub use preset::{get_preset, PresetName};
pub use resolve::{
    check_config, resolve_config, resolve_preset, ConfigError, ConfigSource, ResolvedConfig,
    ShakeConfig,
};
pub use validate::{validate, ValidationError, ValidationResult};

/// Schema version for configuration files.
pub const CONFIG_SCHEMA_VERSION: &str = "1.0.0";
