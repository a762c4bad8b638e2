//! The stored theme preference and how it is encoded in the store.
//!
//! A preference is tri-state: an explicit [`Preference::Light`] or
//! [`Preference::Dark`], or [`Preference::System`] to follow the OS. An
//! absent entry means `System`. Anything the codec does not recognize is
//! treated as a non-dark override, the same as an explicit `light`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::UmbraError;
use crate::mode::ColorMode;

/// The user's theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Preference {
    Light,
    Dark,
    /// Follow the system color scheme.
    #[default]
    System,
}

impl Preference {
    pub const ALL: [Preference; 3] = [Preference::Light, Preference::Dark, Preference::System];

    /// Decodes a raw store entry.
    ///
    /// `None` (no entry) follows the system. A value the codec cannot decode
    /// resolves to `Light`.
    pub fn from_stored(raw: Option<&str>, codec: StorageCodec) -> Preference {
        match raw {
            None => Preference::System,
            Some(value) => codec.decode(value).unwrap_or_else(|| {
                tracing::debug!(value, ?codec, "unrecognized stored theme, treating as light");
                Preference::Light
            }),
        }
    }

    /// Whether this preference puts the page in dark mode.
    pub fn applies_dark(self, system_prefers_dark: bool) -> bool {
        match self {
            Preference::Dark => true,
            Preference::System => system_prefers_dark,
            Preference::Light => false,
        }
    }

    pub fn color_mode(self, system_prefers_dark: bool) -> ColorMode {
        ColorMode::from_dark(self.applies_dark(system_prefers_dark))
    }

    /// Lowercase name, also the plain storage encoding.
    pub fn as_str(self) -> &'static str {
        match self {
            Preference::Light => "light",
            Preference::Dark => "dark",
            Preference::System => "system",
        }
    }
}

impl fmt::Display for Preference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses user input, case-insensitively. Store entries go through
/// [`StorageCodec::decode`] instead, which is exact.
impl FromStr for Preference {
    type Err = UmbraError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Preference::Light),
            "dark" => Ok(Preference::Dark),
            "system" => Ok(Preference::System),
            _ => Err(UmbraError::UnknownPreference(s.to_string())),
        }
    }
}

/// How a [`Preference`] is written to the key-value store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageCodec {
    /// `light`, `dark`, `system`.
    #[default]
    Plain,
    /// JSON string of the variant name: `"Light"`, `"Dark"`, `"System"`.
    Json,
}

impl StorageCodec {
    pub fn encode(self, preference: Preference) -> Result<String, UmbraError> {
        match self {
            StorageCodec::Plain => Ok(preference.as_str().to_string()),
            StorageCodec::Json => Ok(serde_json::to_string(&preference)?),
        }
    }

    /// Exact decode; `None` for anything unrecognized.
    ///
    /// Only the exact encoded form matches, the same comparison the
    /// bootstrap script makes. Padded, escaped or otherwise re-shaped JSON
    /// that serde would accept does not.
    pub fn decode(self, raw: &str) -> Option<Preference> {
        Preference::ALL
            .into_iter()
            .find(|preference| self.encode(*preference).is_ok_and(|encoded| encoded == raw))
    }
}

/// The page-load decision on a raw plain-encoded entry.
///
/// Dark when the entry is `"dark"`, or when it is absent or `"system"` and
/// the system prefers dark.
pub fn should_apply_dark(stored: Option<&str>, system_prefers_dark: bool) -> bool {
    Preference::from_stored(stored, StorageCodec::Plain).applies_dark(system_prefers_dark)
}
