//! Theme resolution against a store and a system signal.
//!
//! [`ThemeResolver`] ties together the three environment seams: it reads the
//! stored preference, asks the system signal when the preference says to
//! follow it, and writes the dark marker on a [`DocumentRoot`].
//!
//! ```rust
//! use umbra::{ClassList, ColorMode, DocumentRoot, MemoryStore, MockSignal, ThemeResolver};
//!
//! let store = MemoryStore::new();
//! let resolver = ThemeResolver::new(store, MockSignal::dark());
//!
//! let mut root = ClassList::new();
//! assert_eq!(resolver.apply_on_load(&mut root), ColorMode::Dark);
//! assert!(root.has_marker("dark"));
//! ```
//!
//! Two ways to apply the result:
//!
//! - [`ThemeResolver::apply_on_load`] adds the marker when dark and never
//!   removes it. It is what runs once, before first paint, on a root that
//!   starts without the marker.
//! - [`ThemeResolver::sync`] also removes the marker when light, for a page
//!   that is already showing and whose preference or system scheme changed.

use crate::config::{Config, DEFAULT_MARKER, DEFAULT_STORAGE_KEY};
use crate::env::{DocumentRoot, OsSignal, PreferenceStore, SystemSignal};
use crate::error::UmbraError;
use crate::mode::ColorMode;
use crate::preference::{Preference, StorageCodec};
use crate::store::FileStore;

/// Resolves and applies the theme for one store/signal pair.
#[derive(Debug, Clone)]
pub struct ThemeResolver<S: PreferenceStore, Q: SystemSignal = OsSignal> {
    store: S,
    signal: Q,
    key: String,
    marker: String,
    codec: StorageCodec,
}

impl ThemeResolver<FileStore, OsSignal> {
    /// A resolver over the configured file store and the OS signal.
    pub fn from_config(config: &Config) -> Result<Self, UmbraError> {
        config.validate()?;
        Ok(Self::new(config.file_store()?, OsSignal).with_config(config))
    }
}

impl<S: PreferenceStore, Q: SystemSignal> ThemeResolver<S, Q> {
    /// Resolver with the default key (`theme`), marker (`dark`) and plain codec.
    pub fn new(store: S, signal: Q) -> Self {
        Self {
            store,
            signal,
            key: DEFAULT_STORAGE_KEY.to_string(),
            marker: DEFAULT_MARKER.to_string(),
            codec: StorageCodec::Plain,
        }
    }

    /// Takes key, marker and codec from `config`; the store is left as is.
    pub fn with_config(mut self, config: &Config) -> Self {
        self.key = config.storage_key.clone();
        self.marker = config.marker.clone();
        self.codec = config.codec;
        self
    }

    pub fn with_key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_codec(mut self, codec: StorageCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn marker(&self) -> &str {
        &self.marker
    }

    pub fn codec(&self) -> StorageCodec {
        self.codec
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The raw stored entry. A failing store reads as absent.
    pub fn stored(&self) -> Option<String> {
        match self.store.get(&self.key) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(key = %self.key, error = %e, "preference store unreadable, treating as unset");
                None
            }
        }
    }

    pub fn preference(&self) -> Preference {
        Preference::from_stored(self.stored().as_deref(), self.codec)
    }

    pub fn system_prefers_dark(&self) -> bool {
        self.signal.prefers_dark()
    }

    /// Resolves the mode. The system signal is only consulted when the
    /// preference follows it.
    pub fn color_mode(&self) -> ColorMode {
        let preference = self.preference();
        let dark = match preference {
            Preference::System => self.system_prefers_dark(),
            other => other.applies_dark(false),
        };
        ColorMode::from_dark(dark)
    }

    /// Adds the marker when the resolved mode is dark. Never removes it.
    pub fn apply_on_load<D: DocumentRoot + ?Sized>(&self, root: &mut D) -> ColorMode {
        let mode = self.color_mode();
        if mode.is_dark() {
            root.add_marker(&self.marker);
        }
        tracing::debug!(%mode, marker = %self.marker, "applied theme on load");
        mode
    }

    /// Makes the marker match the resolved mode, adding or removing it.
    pub fn sync<D: DocumentRoot + ?Sized>(&self, root: &mut D) -> ColorMode {
        let mode = self.color_mode();
        match mode {
            ColorMode::Dark => root.add_marker(&self.marker),
            ColorMode::Light => root.remove_marker(&self.marker),
        }
        mode
    }

    /// Persists `preference` with the configured codec.
    pub fn set_preference(&self, preference: Preference) -> Result<(), UmbraError> {
        self.store.set(&self.key, &self.codec.encode(preference)?)?;
        tracing::info!(%preference, key = %self.key, "theme preference saved");
        Ok(())
    }

    /// Removes the stored entry, returning to "follow system".
    pub fn clear_preference(&self) -> Result<(), UmbraError> {
        self.store.remove(&self.key)?;
        tracing::info!(key = %self.key, "theme preference cleared");
        Ok(())
    }
}

/// Re-syncs a root and reports mode changes.
///
/// Hosts call [`refresh`](ThemeListener::refresh) whenever the preference
/// or the system scheme may have changed; it returns the new mode only when
/// it differs from the one applied last.
#[derive(Debug, Clone, Default)]
pub struct ThemeListener {
    last: Option<ColorMode>,
}

impl ThemeListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mode applied by the last refresh, if any.
    pub fn current(&self) -> Option<ColorMode> {
        self.last
    }

    pub fn refresh<S, Q, D>(
        &mut self,
        resolver: &ThemeResolver<S, Q>,
        root: &mut D,
    ) -> Option<ColorMode>
    where
        S: PreferenceStore,
        Q: SystemSignal,
        D: DocumentRoot + ?Sized,
    {
        let mode = resolver.sync(root);
        if self.last == Some(mode) {
            return None;
        }
        tracing::debug!(%mode, previous = ?self.last, "theme changed");
        self.last = Some(mode);
        Some(mode)
    }
}
