//! Environment abstractions for testability.
//!
//! The resolver touches three things outside itself: the persisted
//! preference store, the system color-scheme signal, and the root of the
//! rendered document. Each is a trait here, with an in-process
//! implementation and, where it makes sense, a mock.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use crate::error::UmbraError;
use crate::mode::{detect_color_mode, ColorMode};

/// Durable string-keyed storage.
pub trait PreferenceStore: Send + Sync {
    /// Read the value under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<String>, UmbraError>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<(), UmbraError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> Result<(), UmbraError>;
}

/// Source of the system-level "prefers dark" signal.
pub trait SystemSignal: Send + Sync {
    fn prefers_dark(&self) -> bool;
}

/// The root element of the rendered document.
///
/// Markers behave like DOM class tokens: adding one twice leaves a single
/// token, removing a missing one is a no-op.
pub trait DocumentRoot {
    fn add_marker(&mut self, marker: &str);

    fn remove_marker(&mut self, marker: &str);

    fn has_marker(&self, marker: &str) -> bool;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for &S {
    fn get(&self, key: &str) -> Result<Option<String>, UmbraError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), UmbraError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), UmbraError> {
        (**self).remove(key)
    }
}

impl<Q: SystemSignal + ?Sized> SystemSignal for &Q {
    fn prefers_dark(&self) -> bool {
        (**self).prefers_dark()
    }
}

// === Real implementations ===

/// System signal backed by [`detect_color_mode`].
///
/// Follows [`set_theme_detector`](crate::set_theme_detector) overrides.
#[derive(Debug, Default, Clone, Copy)]
pub struct OsSignal;

impl SystemSignal for OsSignal {
    fn prefers_dark(&self) -> bool {
        detect_color_mode() == ColorMode::Dark
    }
}

/// In-memory store, for tests and for hosts without persistence.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an entry.
    pub fn with_entry(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), value.into());
        self
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl PreferenceStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, UmbraError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), UmbraError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), UmbraError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }
}

/// In-memory class list with DOM `classList` semantics.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassList {
    tokens: BTreeSet<String>,
}

impl ClassList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.tokens.insert(class.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tokens.iter().map(String::as_str)
    }
}

impl DocumentRoot for ClassList {
    fn add_marker(&mut self, marker: &str) {
        self.tokens.insert(marker.to_string());
    }

    fn remove_marker(&mut self, marker: &str) {
        self.tokens.remove(marker);
    }

    fn has_marker(&self, marker: &str) -> bool {
        self.tokens.contains(marker)
    }
}

// === Mock implementations for testing ===

/// Fixed system signal.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockSignal {
    dark: bool,
}

impl MockSignal {
    pub fn dark() -> Self {
        Self { dark: true }
    }

    pub fn light() -> Self {
        Self { dark: false }
    }
}

impl SystemSignal for MockSignal {
    fn prefers_dark(&self) -> bool {
        self.dark
    }
}

/// Store whose every operation fails, like storage blocked by the host.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableStore;

impl PreferenceStore for UnavailableStore {
    fn get(&self, _key: &str) -> Result<Option<String>, UmbraError> {
        Err(UmbraError::Storage("store unavailable".to_string()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<(), UmbraError> {
        Err(UmbraError::Storage("store unavailable".to_string()))
    }

    fn remove(&self, _key: &str) -> Result<(), UmbraError> {
        Err(UmbraError::Storage("store unavailable".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mode::{reset_theme_detector, set_theme_detector};
    use serial_test::serial;

    #[test]
    fn memory_store_round_trip() {
        let store = MemoryStore::new();
        assert_eq!(store.get("theme").unwrap(), None);

        store.set("theme", "dark").unwrap();
        assert_eq!(store.get("theme").unwrap(), Some("dark".to_string()));

        store.set("theme", "light").unwrap();
        assert_eq!(store.get("theme").unwrap(), Some("light".to_string()));
        assert_eq!(store.len(), 1);

        store.remove("theme").unwrap();
        assert!(store.is_empty());
        store.remove("theme").unwrap();
    }

    #[test]
    fn memory_store_seeded() {
        let store = MemoryStore::new().with_entry("theme", "system");
        assert_eq!(store.get("theme").unwrap(), Some("system".to_string()));
        assert_eq!(store.get("other").unwrap(), None);
    }

    #[test]
    fn class_list_behaves_like_token_set() {
        let mut root = ClassList::new().with_class("antialiased");
        root.add_marker("dark");
        root.add_marker("dark");
        assert!(root.has_marker("dark"));
        assert_eq!(root.iter().collect::<Vec<_>>(), vec!["antialiased", "dark"]);

        root.remove_marker("dark");
        root.remove_marker("dark");
        assert!(!root.has_marker("dark"));
        assert!(root.has_marker("antialiased"));
    }

    #[test]
    fn mock_signal() {
        assert!(MockSignal::dark().prefers_dark());
        assert!(!MockSignal::light().prefers_dark());
    }

    #[test]
    fn unavailable_store_errors() {
        assert!(matches!(
            UnavailableStore.get("theme"),
            Err(UmbraError::Storage(_))
        ));
        assert!(UnavailableStore.set("theme", "dark").is_err());
    }

    #[test]
    fn implementations_are_thread_safe() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStore>();
        assert_send_sync::<crate::store::FileStore>();
        assert_send_sync::<UnavailableStore>();
        assert_send_sync::<OsSignal>();
        assert_send_sync::<MockSignal>();
        assert_send_sync::<Box<dyn PreferenceStore>>();
        assert_send_sync::<Box<dyn SystemSignal>>();
    }

    #[test]
    #[serial]
    fn os_signal_follows_detector() {
        set_theme_detector(|| ColorMode::Dark);
        assert!(OsSignal.prefers_dark());

        set_theme_detector(|| ColorMode::Light);
        assert!(!OsSignal.prefers_dark());

        reset_theme_detector();
    }
}
