//! Error types for preference storage, configuration and script rendering.
//!
//! Resolution itself never fails (unreadable storage counts as "unset", a
//! failed system query as "not dark"), so these errors only surface from
//! operations that write, load or render.

use std::io;
use std::path::PathBuf;

/// Errors returned by fallible `umbra` operations.
#[derive(Debug, thiserror::Error)]
pub enum UmbraError {
    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The preference file exists but is not a JSON object of strings.
    #[error("preference store {} is corrupt: {source}", .path.display())]
    CorruptStore {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A preference could not be encoded for the store.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The configuration file could not be parsed.
    #[error("failed to parse config: {0}")]
    ConfigParse(#[from] serde_yaml::Error),

    /// The configuration parsed but holds unusable values.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// The backing store rejected the operation.
    #[error("storage unavailable: {0}")]
    Storage(String),

    /// A preference name that is not `light`, `dark` or `system`.
    #[error("unknown theme preference '{0}' (expected light, dark or system)")]
    UnknownPreference(String),

    /// The bootstrap script template failed to render.
    #[error("template error: {0}")]
    Template(#[from] minijinja::Error),
}

impl UmbraError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
