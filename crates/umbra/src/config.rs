//! Configuration loaded from YAML.
//!
//! Every field has a default, so an empty file (or no file at all) gives the
//! standard setup: key `theme`, marker `dark`, plain encoding, and the store
//! in the user's data directory.
//!
//! ```yaml
//! storage_key: theme
//! marker: dark
//! codec: json
//! store_path: /var/lib/app/preferences.json
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::UmbraError;
use crate::preference::StorageCodec;
use crate::store::{FileStore, STORE_FILE_NAME};

/// Directory name under the platform config and data directories.
pub const APP_DIR_NAME: &str = "umbra";

pub const CONFIG_FILE_NAME: &str = "config.yaml";

pub const DEFAULT_STORAGE_KEY: &str = "theme";

pub const DEFAULT_MARKER: &str = "dark";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Key the preference is stored under.
    pub storage_key: String,
    /// Class added to the document root in dark mode.
    pub marker: String,
    pub codec: StorageCodec,
    /// Explicit store file; defaults to [`default_store_path`].
    pub store_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            codec: StorageCodec::default(),
            store_path: None,
        }
    }
}

impl Config {
    /// Parses and validates a YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, UmbraError> {
        // serde_yaml rejects an empty document for a struct.
        let config: Config = if yaml.trim().is_empty() {
            Config::default()
        } else {
            serde_yaml::from_str(yaml)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration.
    ///
    /// With an explicit `path` the file must exist. Without one, the default
    /// location is used if present, otherwise defaults apply.
    pub fn load(path: Option<&Path>) -> Result<Self, UmbraError> {
        match path {
            Some(path) => Self::from_file(path),
            None => match default_config_path() {
                Some(path) if path.is_file() => Self::from_file(&path),
                _ => {
                    tracing::debug!("no config file, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    fn from_file(path: &Path) -> Result<Self, UmbraError> {
        let content = fs::read_to_string(path).map_err(|e| UmbraError::io(path, e))?;
        let config = Self::from_yaml(&content)?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), UmbraError> {
        if self.storage_key.is_empty() {
            return Err(UmbraError::invalid_config("storage_key must not be empty"));
        }
        if self.marker.is_empty() {
            return Err(UmbraError::invalid_config("marker must not be empty"));
        }
        // classList.add throws on tokens containing whitespace.
        if self.marker.chars().any(char::is_whitespace) {
            return Err(UmbraError::invalid_config(format!(
                "marker '{}' must be a single class name",
                self.marker
            )));
        }
        Ok(())
    }

    /// The store file this configuration points at.
    pub fn resolved_store_path(&self) -> Result<PathBuf, UmbraError> {
        match &self.store_path {
            Some(path) => Ok(path.clone()),
            None => default_store_path().ok_or_else(|| {
                UmbraError::io(
                    STORE_FILE_NAME,
                    io::Error::new(io::ErrorKind::NotFound, "no data directory on this platform"),
                )
            }),
        }
    }

    pub fn file_store(&self) -> Result<FileStore, UmbraError> {
        self.resolved_store_path().map(FileStore::new)
    }
}

/// `<config_dir>/umbra/config.yaml`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
}

/// `<data_dir>/umbra/preferences.json`.
pub fn default_store_path() -> Option<PathBuf> {
    dirs::data_dir().map(|dir| dir.join(APP_DIR_NAME).join(STORE_FILE_NAME))
}
