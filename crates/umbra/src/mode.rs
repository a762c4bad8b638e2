//! Color mode detection.
//!
//! [`detect_color_mode`] asks the OS for the user's preferred scheme through
//! the `dark-light` crate. The detector is process-wide and can be replaced
//! with [`set_theme_detector`], which is how tests pin a mode:
//!
//! ```rust
//! use umbra::{detect_color_mode, set_theme_detector, ColorMode};
//!
//! set_theme_detector(|| ColorMode::Dark);
//! assert_eq!(detect_color_mode(), ColorMode::Dark);
//! # umbra::reset_theme_detector();
//! ```

use std::fmt;
use std::sync::{Mutex, PoisonError};

use dark_light::{detect as detect_os_theme, Mode as OsThemeMode};
use once_cell::sync::Lazy;

/// A resolved color mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorMode {
    /// Light background, dark text. Also the fallback when nothing says dark.
    #[default]
    Light,
    /// Dark background, light text.
    Dark,
}

impl ColorMode {
    /// Maps a "prefers dark" flag to a mode.
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            ColorMode::Dark
        } else {
            ColorMode::Light
        }
    }

    pub fn is_dark(self) -> bool {
        self == ColorMode::Dark
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ColorMode::Light => "light",
            ColorMode::Dark => "dark",
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

type ThemeDetector = fn() -> ColorMode;

static THEME_DETECTOR: Lazy<Mutex<ThemeDetector>> = Lazy::new(|| Mutex::new(os_theme_detector));

/// Overrides the detector used to determine whether the user prefers a light or dark theme.
///
/// Useful in tests or to force a specific color mode for the whole process.
pub fn set_theme_detector(detector: ThemeDetector) {
    let mut guard = THEME_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    *guard = detector;
}

/// Restores OS detection after [`set_theme_detector`].
pub fn reset_theme_detector() {
    set_theme_detector(os_theme_detector);
}

/// Detects the user's preferred color mode.
///
/// Uses the configured detector (default: the OS via `dark-light`).
pub fn detect_color_mode() -> ColorMode {
    let detector = THEME_DETECTOR.lock().unwrap_or_else(PoisonError::into_inner);
    (*detector)()
}

fn os_theme_detector() -> ColorMode {
    match detect_os_theme() {
        Ok(OsThemeMode::Dark) => ColorMode::Dark,
        Ok(OsThemeMode::Light) => ColorMode::Light,
        Ok(OsThemeMode::Unspecified) => {
            tracing::debug!("system color scheme unspecified, assuming light");
            ColorMode::Light
        }
        Err(e) => {
            tracing::debug!(error = ?e, "system color scheme query failed, assuming light");
            ColorMode::Light
        }
    }
}
