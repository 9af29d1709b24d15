//! Sidecar configuration.
//!
//! Grading thresholds and fee amounts are read from a TOML file whose path
//! comes from `--config <path>` or the `SCHOOLD_CONFIG` environment variable.
//! Every field is optional; anything left out keeps the built-in default.

use crate::calc::GradingPolicy;
use crate::fees::FeeStructure;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const CONFIG_ENV: &str = "SCHOOLD_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchoolConfig {
    pub grading: GradingPolicy,
    pub fees: FeeStructure,
}

impl SchoolConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Config path from `--config <path>` / `--config=<path>`, else the environment.
pub fn config_path_from<I>(args: I, env_value: Option<String>) -> Option<PathBuf>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--config" {
            return args.next().map(PathBuf::from);
        }
        if let Some(v) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(v));
        }
    }
    env_value.filter(|v| !v.trim().is_empty()).map(PathBuf::from)
}
