//! Config resolution: CLI path → `FT_CONFIG` env → XDG config dir → defaults.

use crate::thresholder::ThresholderConfig;
use crate::validate::{validate, ValidationError};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Environment variable naming a config file.
pub const CONFIG_ENV: &str = "FT_CONFIG";

/// Errors raised while loading a configuration file.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("config validation failed: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl From<ConfigError> for ft_common::Error {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Io { source, .. } => ft_common::Error::Io(source),
            ConfigError::Invalid(mut errors) if errors.len() == 1 => errors.remove(0).into(),
            other => ft_common::Error::Config(other.to_string()),
        }
    }
}

/// Where the effective configuration came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Cli(PathBuf),
    Env(PathBuf),
    Xdg(PathBuf),
    Defaults,
}

/// Candidate config locations, highest priority first.
#[derive(Debug, Clone, Default)]
pub struct ConfigPaths {
    pub cli: Option<PathBuf>,
    pub env: Option<PathBuf>,
    pub xdg: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover locations from the process environment.
    pub fn discover(cli: Option<PathBuf>) -> Self {
        Self {
            cli,
            env: std::env::var_os(CONFIG_ENV).map(PathBuf::from),
            xdg: dirs::config_dir().map(|d| d.join("facet-thresholds").join("config.toml")),
        }
    }
}

/// Resolve and validate the effective configuration.
///
/// Explicit CLI and env paths must exist; the XDG file is optional.
pub fn resolve_config(
    paths: &ConfigPaths,
) -> Result<(ThresholderConfig, ConfigSource), ConfigError> {
    let (config, source) = if let Some(path) = &paths.cli {
        (load_config_file(path)?, ConfigSource::Cli(path.clone()))
    } else if let Some(path) = &paths.env {
        (load_config_file(path)?, ConfigSource::Env(path.clone()))
    } else if let Some(path) = paths.xdg.as_ref().filter(|p| p.is_file()) {
        (load_config_file(path)?, ConfigSource::Xdg(path.clone()))
    } else {
        (ThresholderConfig::default(), ConfigSource::Defaults)
    };

    validate(&config).map_err(ConfigError::Invalid)?;

    tracing::debug!(
        target: "config.resolve",
        source = ?source,
        cost_ratio = config.cost_ratio,
        facets = config.facets.len(),
        "Resolved thresholder config"
    );
    Ok((config, source))
}

/// Load a config file, choosing JSON or TOML by extension (TOML otherwise).
pub fn load_config_file(path: &Path) -> Result<ThresholderConfig, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        toml::from_str(&raw).map_err(|source| ConfigError::Toml {
            path: path.to_path_buf(),
            source,
        })
    }
}
