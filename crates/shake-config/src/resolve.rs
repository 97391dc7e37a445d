//! Config resolution: CLI path → `SHAKE_CONFIG` → XDG config file → defaults,
//! or a named preset in place of the file layers.
//!
//! Scalar environment overrides (`SHAKE_FLUSH_TIMEOUT_SECS`,
//! `SHAKE_OUTPUT_DIR`) are applied on top of whichever file was loaded.

use crate::flush::FlushConfig;
use crate::motion::{MotionConfig, SweepConfig};
use crate::preset::{get_preset, PresetName};
use crate::validate::{validate, ValidationError};
use crate::CONFIG_SCHEMA_VERSION;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

/// Environment variable naming an explicit config file.
pub const ENV_CONFIG_PATH: &str = "SHAKE_CONFIG";
/// Environment override for `flush.timeout_secs`.
pub const ENV_FLUSH_TIMEOUT: &str = "SHAKE_FLUSH_TIMEOUT_SECS";
/// Environment override for `output.dir`.
pub const ENV_OUTPUT_DIR: &str = "SHAKE_OUTPUT_DIR";

const CONFIG_DIR_NAME: &str = "shake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Errors from loading or resolving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error in {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value for {var}: {value}")]
    InvalidEnv { var: &'static str, value: String },

    #[error("configuration invalid: {}", format_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn format_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Where raw measurement files go and how they are named.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output directory. `None` means the platform data dir.
    pub dir: Option<PathBuf>,

    /// File name prefix, e.g. `resonances`.
    pub prefix: String,
}

impl OutputConfig {
    /// Directory to write into, falling back to `<data_local_dir>/shake/raw`
    /// and finally the current directory.
    pub fn resolved_dir(&self) -> PathBuf {
        if let Some(dir) = &self.dir {
            return dir.clone();
        }
        dirs::data_local_dir()
            .map(|d| d.join(CONFIG_DIR_NAME).join("raw"))
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: None,
            prefix: "resonances".to_string(),
        }
    }
}

/// Complete configuration document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShakeConfig {
    pub schema_version: String,
    pub flush: FlushConfig,
    pub motion: MotionConfig,
    pub sweep: SweepConfig,
    pub output: OutputConfig,
}

impl Default for ShakeConfig {
    fn default() -> Self {
        Self {
            schema_version: CONFIG_SCHEMA_VERSION.to_string(),
            flush: FlushConfig::default(),
            motion: MotionConfig::default(),
            sweep: SweepConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl ShakeConfig {
    /// Load a config file without validation.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Which layer the configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "from", rename_all = "snake_case")]
pub enum ConfigSource {
    Cli(PathBuf),
    Env(PathBuf),
    Xdg(PathBuf),
    Preset(PresetName),
    Defaults,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Cli(p) => write!(f, "cli ({})", p.display()),
            ConfigSource::Env(p) => write!(f, "env ({})", p.display()),
            ConfigSource::Xdg(p) => write!(f, "xdg ({})", p.display()),
            ConfigSource::Preset(name) => write!(f, "preset ({})", name.as_str()),
            ConfigSource::Defaults => write!(f, "built-in defaults"),
        }
    }
}

/// A validated configuration and its origin.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedConfig {
    pub config: ShakeConfig,
    pub source: ConfigSource,
    /// Validation warnings; each one was also logged.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

/// Validate `config`, logging every warning. Returns the warnings, or
/// `ConfigError::Invalid` when any field is rejected.
pub fn check_config(config: &ShakeConfig) -> Result<Vec<String>, ConfigError> {
    let result = validate(config);
    if !result.is_valid() {
        return Err(ConfigError::Invalid(result.errors));
    }
    for warning in &result.warnings {
        warn!(%warning, "configuration warning");
    }
    Ok(result.warnings)
}

/// Resolve configuration from the process environment.
pub fn resolve_config(cli_path: Option<&Path>) -> Result<ResolvedConfig, ConfigError> {
    let xdg = dirs::config_dir().map(|d| d.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME));
    resolve_with(cli_path, |var| std::env::var(var).ok(), xdg.as_deref())
}

/// Resolve configuration with an injected environment lookup and XDG path.
pub fn resolve_with<F>(
    cli_path: Option<&Path>,
    env: F,
    xdg_path: Option<&Path>,
) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let (config, source) = if let Some(path) = cli_path {
        (ShakeConfig::load_from_file(path)?, ConfigSource::Cli(path.to_path_buf()))
    } else if let Some(path) = env(ENV_CONFIG_PATH).filter(|p| !p.is_empty()) {
        let path = PathBuf::from(path);
        (ShakeConfig::load_from_file(&path)?, ConfigSource::Env(path))
    } else if let Some(path) = xdg_path.filter(|p| p.is_file()) {
        (ShakeConfig::load_from_file(path)?, ConfigSource::Xdg(path.to_path_buf()))
    } else {
        (ShakeConfig::default(), ConfigSource::Defaults)
    };
    apply_env(config, source, env)
}

/// Start from a built-in preset instead of a config file. Environment
/// overrides still apply.
pub fn resolve_preset(name: PresetName) -> Result<ResolvedConfig, ConfigError> {
    resolve_preset_with(name, |var| std::env::var(var).ok())
}

/// [`resolve_preset`] with an injected environment lookup.
pub fn resolve_preset_with<F>(name: PresetName, env: F) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    apply_env(get_preset(name), ConfigSource::Preset(name), env)
}

fn apply_env<F>(mut config: ShakeConfig, source: ConfigSource, env: F) -> Result<ResolvedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(value) = env(ENV_FLUSH_TIMEOUT) {
        config.flush.timeout_secs = value.trim().parse().map_err(|_| ConfigError::InvalidEnv {
            var: ENV_FLUSH_TIMEOUT,
            value: value.clone(),
        })?;
    }
    if let Some(value) = env(ENV_OUTPUT_DIR).filter(|v| !v.is_empty()) {
        config.output.dir = Some(PathBuf::from(value));
    }

    let warnings = check_config(&config)?;
    debug!(source = %source, "configuration resolved");

    Ok(ResolvedConfig {
        config,
        source,
        warnings,
    })
}
