//! User configuration consumed by output management. Settings are read
//! fresh by every operation so that a change made while result documents
//! are open takes effect on the next request.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

/// How a new response should be displayed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseViewMode {
    /// Write to a temporary file and show it in a preview viewer.
    #[default]
    Preview,
    /// Replace the content of an already open result document.
    Reuse,
    /// Open a new untitled document every time.
    Open,
    /// Don't show responses at all.
    None,
}

/// Which rendering of the response a result document holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseViewContent {
    /// The body only.
    #[default]
    Body,
    /// The status line and response headers.
    Headers,
    /// The status line, response headers and body.
    Full,
    /// The request followed by the full response.
    Exchange,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub response_view_mode: ResponseViewMode,
    pub response_view_content: ResponseViewContent,
    pub response_view_pretty_print: bool,
    /// Specifiers for the summary lines shown above a result document,
    /// such as `Content-Type`, `timings.total` or `tests.failed`.
    pub response_view_header: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            response_view_mode: ResponseViewMode::default(),
            response_view_content: ResponseViewContent::default(),
            response_view_pretty_print: true,
            response_view_header: Vec::new(),
        }
    }
}

/// Settings belonging to the editing host rather than to us.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WorkbenchSettings {
    /// Whether the host allows documents to be opened as previews.
    pub enable_preview: bool,
}

impl Default for WorkbenchSettings {
    fn default() -> Self {
        WorkbenchSettings {
            enable_preview: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub settings: Settings,
    pub workbench: WorkbenchSettings,
}

impl Config {
    /// Interpret settings sent by the host. A null value gives the
    /// defaults.
    pub fn from_value(value: Value) -> Result<Config, ConfigError> {
        if value.is_null() {
            return Ok(Config::default());
        }
        serde_json::from_value(value).map_err(|error| ConfigError::Malformed {
            filename: None,
            details: error.to_string(),
        })
    }

    /// Read settings from a JSON file.
    pub fn load(filename: &Path) -> Result<Config, ConfigError> {
        let content = match std::fs::read_to_string(filename) {
            Ok(content) => content,
            Err(error) => {
                debug!(?error);
                return match error.kind() {
                    std::io::ErrorKind::NotFound => {
                        Err(ConfigError::NotFound(filename.to_path_buf()))
                    }
                    kind => Err(ConfigError::Unreadable(filename.to_path_buf(), kind)),
                };
            }
        };

        serde_json::from_str(&content).map_err(|error| ConfigError::Malformed {
            filename: Some(filename.to_path_buf()),
            details: error.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NotFound(PathBuf),
    Unreadable(PathBuf, std::io::ErrorKind),
    Malformed {
        filename: Option<PathBuf>,
        details: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NotFound(filename) => {
                write!(f, "Configuration file not found: {}", filename.display())
            }
            ConfigError::Unreadable(filename, kind) => {
                write!(f, "Failed reading {}: {}", filename.display(), kind)
            }
            ConfigError::Malformed {
                filename: Some(filename),
                details,
            } => write!(f, "Invalid configuration in {}: {}", filename.display(), details),
            ConfigError::Malformed {
                filename: None,
                details,
            } => write!(f, "Invalid configuration: {}", details),
        }
    }
}

impl std::error::Error for ConfigError {}
