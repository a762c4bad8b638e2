//! Browser implementations of the environment seams (feature `web`).
//!
//! ```rust,ignore
//! use umbra::web::{DocumentElement, LocalStorage, MediaQuerySignal};
//! use umbra::ThemeResolver;
//!
//! let resolver = ThemeResolver::new(LocalStorage, MediaQuerySignal);
//! if let Some(mut root) = DocumentElement::current() {
//!     resolver.sync(&mut root);
//! }
//! ```

use crate::env::{DocumentRoot, PreferenceStore, SystemSignal};
use crate::error::UmbraError;

const DARK_QUERY: &str = "(prefers-color-scheme: dark)";

fn storage() -> Result<web_sys::Storage, UmbraError> {
    let window =
        web_sys::window().ok_or_else(|| UmbraError::Storage("no window".to_string()))?;
    window
        .local_storage()
        .map_err(|e| UmbraError::Storage(format!("{e:?}")))?
        .ok_or_else(|| UmbraError::Storage("local storage disabled".to_string()))
}

/// The page's `window.localStorage`.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalStorage;

impl PreferenceStore for LocalStorage {
    fn get(&self, key: &str) -> Result<Option<String>, UmbraError> {
        storage()?
            .get_item(key)
            .map_err(|e| UmbraError::Storage(format!("{e:?}")))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), UmbraError> {
        storage()?
            .set_item(key, value)
            .map_err(|e| UmbraError::Storage(format!("{e:?}")))
    }

    fn remove(&self, key: &str) -> Result<(), UmbraError> {
        storage()?
            .remove_item(key)
            .map_err(|e| UmbraError::Storage(format!("{e:?}")))
    }
}

/// `matchMedia("(prefers-color-scheme: dark)")`. Any failure reads as light.
#[derive(Debug, Default, Clone, Copy)]
pub struct MediaQuerySignal;

impl SystemSignal for MediaQuerySignal {
    fn prefers_dark(&self) -> bool {
        web_sys::window()
            .and_then(|window| window.match_media(DARK_QUERY).ok().flatten())
            .map(|media| media.matches())
            .unwrap_or_default()
    }
}

/// `document.documentElement`.
#[derive(Debug, Clone)]
pub struct DocumentElement {
    element: web_sys::Element,
}

impl DocumentElement {
    /// The current document's root element, if there is a document.
    pub fn current() -> Option<Self> {
        web_sys::window()
            .and_then(|window| window.document())
            .and_then(|document| document.document_element())
            .map(|element| Self { element })
    }
}

impl DocumentRoot for DocumentElement {
    fn add_marker(&mut self, marker: &str) {
        if let Err(e) = self.element.class_list().add_1(marker) {
            tracing::debug!(marker, error = ?e, "failed to add theme marker");
        }
    }

    fn remove_marker(&mut self, marker: &str) {
        if let Err(e) = self.element.class_list().remove_1(marker) {
            tracing::debug!(marker, error = ?e, "failed to remove theme marker");
        }
    }

    fn has_marker(&self, marker: &str) -> bool {
        self.element.class_list().contains(marker)
    }
}
