//! # Umbra - Light/Dark Theme Resolution
//!
//! `umbra` decides whether a page (or any rendered document) should be shown
//! in dark mode, from a stored user preference and the system color scheme,
//! and marks the document root accordingly.
//!
//! ## Core Concepts
//!
//! - [`Preference`]: the stored choice, `light`, `dark` or `system`
//! - [`ColorMode`]: the resolved mode, light or dark
//! - [`ThemeResolver`]: reads the store, consults the system, applies the marker
//! - [`PreferenceStore`], [`SystemSignal`], [`DocumentRoot`]: the seams the
//!   resolver works through, with in-memory, file-backed and (feature `web`)
//!   browser implementations
//!
//! ## The Rule
//!
//! Dark applies when the stored value is `dark`, or when it is absent or
//! `system` and the system prefers dark. Any other value, `light` included,
//! keeps the page light.
//!
//! ```rust
//! use umbra::should_apply_dark;
//!
//! assert!(should_apply_dark(Some("dark"), false));
//! assert!(should_apply_dark(None, true));
//! assert!(should_apply_dark(Some("system"), true));
//! assert!(!should_apply_dark(Some("light"), true));
//! assert!(!should_apply_dark(None, false));
//! ```
//!
//! ## Resolving Against a Store
//!
//! ```rust
//! use umbra::{ClassList, DocumentRoot, MemoryStore, MockSignal, Preference, ThemeResolver};
//!
//! let resolver = ThemeResolver::new(MemoryStore::new(), MockSignal::light());
//! resolver.set_preference(Preference::Dark).unwrap();
//!
//! let mut root = ClassList::new();
//! resolver.apply_on_load(&mut root);
//! assert!(root.has_marker("dark"));
//! ```
//!
//! ## Server-Rendered Pages
//!
//! [`render_bootstrap_tag`] produces the inline `<script>` that applies the
//! same rule in the browser before first paint.
//!
//! ```rust
//! let tag = umbra::render_bootstrap_tag(&umbra::Config::default()).unwrap();
//! assert!(tag.contains(r#"classList.add("dark")"#));
//! ```

mod config;
pub mod env;
mod error;
mod mode;
mod preference;
mod resolver;
mod script;
mod store;

#[cfg(feature = "web")]
pub mod web;

pub use config::{
    default_config_path, default_store_path, Config, APP_DIR_NAME, CONFIG_FILE_NAME,
    DEFAULT_MARKER, DEFAULT_STORAGE_KEY,
};
pub use env::{
    ClassList, DocumentRoot, MemoryStore, MockSignal, OsSignal, PreferenceStore, SystemSignal,
    UnavailableStore,
};
pub use error::UmbraError;
pub use mode::{detect_color_mode, reset_theme_detector, set_theme_detector, ColorMode};
pub use preference::{should_apply_dark, Preference, StorageCodec};
pub use resolver::{ThemeListener, ThemeResolver};
pub use script::{render_bootstrap_script, render_bootstrap_tag};
pub use store::{FileStore, STORE_FILE_NAME};
