// Configuration loading and validation (config/pitchside.toml).

use serde::Deserialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

use pitchside_core::market::{DEFAULT_MARKET_LIMIT, DEFAULT_MAX_PRICE};
use pitchside_gateway::{CacheSettings, GatewaySettings};

pub const CONFIG_FILE: &str = "pitchside.toml";
pub const CONFIG_DIR: &str = "config";
pub const DEFAULTS_DIR: &str = "defaults";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("pitchside config not found at {path}")]
    FileNotFound { path: PathBuf },

    #[error("{path} is not valid TOML: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error(
        "no defaults/ or config/ directory under {base}; \
         run pitchside from crates/pitchside-app or copy defaults/pitchside.toml there"
    )]
    NoConfigDir { base: PathBuf },

    #[error("failed to install default config at {path}: {source}")]
    DefaultsCopy {
        path: PathBuf,
        source: std::io::Error,
    },
}

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

/// The whole of `pitchside.toml`. Missing sections take their defaults.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub gateway: GatewaySettings,
    pub cache: CacheSettings,
    pub planner: PlannerConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Display budget in tenths. Never enforced.
    pub budget: u32,
    pub market_limit: usize,
    /// Market price ceiling in tenths.
    pub max_price: u32,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        PlannerConfig {
            budget: 1000,
            market_limit: DEFAULT_MARKET_LIMIT,
            max_price: DEFAULT_MAX_PRICE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            dir: "logs".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/pitchside.toml` relative to `base_dir`.
///
/// Does not copy defaults; prefer `load_config()`.
pub(crate) fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join(CONFIG_DIR).join(CONFIG_FILE);
    let text = read_file(&path)?;
    let config: Config = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    validate(&config)?;

    Ok(config)
}

/// Install any file from `defaults/` that `config/` lacks, leaving existing
/// files alone. `.example` templates are not installed. Returns the paths
/// written, sorted.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join(DEFAULTS_DIR);
    let config_dir = base_dir.join(CONFIG_DIR);

    if !defaults_dir.is_dir() {
        return if config_dir.is_dir() {
            Ok(Vec::new())
        } else {
            Err(ConfigError::NoConfigDir {
                base: base_dir.to_path_buf(),
            })
        };
    }

    std::fs::create_dir_all(&config_dir).map_err(copy_error(&config_dir))?;

    let mut installed = Vec::new();
    for entry in std::fs::read_dir(&defaults_dir).map_err(copy_error(&defaults_dir))? {
        let source = entry.map_err(copy_error(&defaults_dir))?.path();
        let Some(name) = source.file_name().filter(|_| source.is_file()) else {
            continue;
        };
        if Path::new(name).extension().is_some_and(|ext| ext == "example") {
            continue;
        }
        let target = config_dir.join(name);
        if install_default(&source, &target)? {
            installed.push(target);
        }
    }
    installed.sort();
    Ok(installed)
}

/// Copy `source` to `target` unless `target` already exists.
fn install_default(source: &Path, target: &Path) -> Result<bool, ConfigError> {
    let mut dest = match std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(target)
    {
        Ok(file) => file,
        // Never overwrite a user's edited config
        Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => return Ok(false),
        Err(e) => return Err(copy_error(target)(e)),
    };
    let content = std::fs::read(source).map_err(copy_error(source))?;
    dest.write_all(&content).map_err(copy_error(target))?;
    Ok(true)
}

fn copy_error(path: &Path) -> impl FnOnce(std::io::Error) -> ConfigError {
    let path = path.to_path_buf();
    move |source| ConfigError::DefaultsCopy { path, source }
}

/// Load config relative to the current working directory, copying defaults
/// first.
pub fn load_config() -> Result<Config, ConfigError> {
    let cwd = std::env::current_dir().map_err(copy_error(Path::new(".")))?;
    ensure_config_files(&cwd)?;
    load_config_from(&cwd)
}

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    let base_url = config.gateway.base_url.trim();
    if base_url.is_empty() {
        return Err(ConfigError::ValidationError {
            field: "gateway.base_url".into(),
            message: "must not be empty".into(),
        });
    }
    if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
        return Err(ConfigError::ValidationError {
            field: "gateway.base_url".into(),
            message: format!("must be an http(s) URL, got {base_url}"),
        });
    }

    if config.gateway.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "gateway.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.planner.market_limit == 0 {
        return Err(ConfigError::ValidationError {
            field: "planner.market_limit".into(),
            message: "must be greater than 0".into(),
        });
    }

    if config.planner.budget == 0 {
        return Err(ConfigError::ValidationError {
            field: "planner.budget".into(),
            message: "must be greater than 0".into(),
        });
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
