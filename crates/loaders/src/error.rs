use std::path::Path;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Errors from the persisted configuration inputs. Malformed or missing
/// constraint/goal/budget files are fatal at startup; per-scenario record
/// problems surface later, when the scenario is looked up by id.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parsing {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("parsing {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("{0}")]
    Invalid(String),
}

impl ConfigError {
    pub(crate) fn io(path: &Path, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn json(path: &Path, source: serde_json::Error) -> Self {
        ConfigError::Json {
            path: path.display().to_string(),
            source,
        }
    }

    pub(crate) fn csv(path: &Path, source: csv::Error) -> Self {
        ConfigError::Csv {
            path: path.display().to_string(),
            source,
        }
    }
}
