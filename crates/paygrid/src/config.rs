//! Application-level configuration file.
//!
//! One document configures every behavior. Missing sections and fields fall
//! back to their defaults, so an empty file is a valid configuration:
//!
//! ```yaml
//! grid:
//!   row_height: 40
//!   export_file_name: transactions
//! idle:
//!   timeout_ms: 600000
//! reveal:
//!   one_time: true
//! upload:
//!   max_bytes: 10485760
//! ```

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use paygrid_console::{IdleConfig, RevealConfig, UploadConfig};
use paygrid_view::GridOptions;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaygridConfig {
    pub grid: GridOptions,
    pub idle: IdleConfig,
    pub reveal: RevealConfig,
    pub upload: UploadConfig,
}

/// Error loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document did not parse. `path` is set when loaded from a file.
    #[error("{}", ParseDisplay(path.as_deref(), message))]
    Parse {
        path: Option<PathBuf>,
        message: String,
    },

    #[error("Unsupported config format '{0}' (expected yaml, yml or json)")]
    UnsupportedFormat(String),
}

struct ParseDisplay<'a>(Option<&'a Path>, &'a str);

impl fmt::Display for ParseDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(path) => write!(f, "Failed to parse {}: {}", path.display(), self.1),
            None => write!(f, "Failed to parse config: {}", self.1),
        }
    }
}

impl ConfigError {
    fn with_path(self, path: &Path) -> Self {
        match self {
            ConfigError::Parse { message, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                message,
            },
            other => other,
        }
    }
}

impl PaygridConfig {
    pub fn from_yaml_str(text: &str) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as unit, not as an empty map.
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(text).map_err(|err| ConfigError::Parse {
            path: None,
            message: err.to_string(),
        })
    }

    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(text).map_err(|err| ConfigError::Parse {
            path: None,
            message: err.to_string(),
        })
    }

    /// Loads a `.yaml`, `.yml` or `.json` file, choosing the parser by
    /// extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let parse = match ext.as_str() {
            "yaml" | "yml" => Self::from_yaml_str,
            "json" => Self::from_json_str,
            _ => return Err(ConfigError::UnsupportedFormat(ext)),
        };
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = parse(&text).map_err(|err| err.with_path(path))?;
        tracing::debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }
}
