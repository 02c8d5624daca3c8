//! Local storage access for completion data and page preferences.

use crate::core::completion_store::KeyValueStorage;
use crate::core::popup::{POPUP_CLOSED_KEY, POPUP_TIME_KEY};
use crate::core::ui::{FONT_PREFERENCE_KEY, FontPreference};
use gloo::console;
use gloo::storage::{LocalStorage, Storage};

/// `localStorage` adapter storing raw strings (not JSON-encoded values), so the
/// blobs stay readable by earlier versions of the page.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct BrowserStorage;

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), String> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| format!("{err:?}"))
    }

    fn remove_item(&self, key: &str) {
        if LocalStorage::raw().remove_item(key).is_err() {
            console::error!("storage operation failed", "remove", key.to_string());
        }
    }
}

impl BrowserStorage {
    /// Write a value, logging failures instead of surfacing them.
    pub(crate) fn set_logged(self, key: &'static str, value: &str) {
        if let Err(detail) = self.set_item(key, value) {
            console::error!("storage operation failed", "set", key, detail);
        }
    }

    /// Persisted popup dismissal: (dismissed flag, dismissed time).
    pub(crate) fn popup_dismissal(self) -> (bool, Option<String>) {
        (
            self.get_item(POPUP_CLOSED_KEY).is_some_and(|v| !v.is_empty()),
            self.get_item(POPUP_TIME_KEY),
        )
    }

    /// Remember that the popup with `time` was dismissed.
    pub(crate) fn persist_popup_dismissal(self, time: &str) {
        self.set_logged(POPUP_CLOSED_KEY, "true");
        self.set_logged(POPUP_TIME_KEY, time);
    }

    /// Stored font preference.
    pub(crate) fn font_preference(self) -> FontPreference {
        FontPreference::from_stored(self.get_item(FONT_PREFERENCE_KEY).as_deref())
    }

    /// Persist the font preference.
    pub(crate) fn persist_font_preference(self, preference: FontPreference) {
        self.set_logged(FONT_PREFERENCE_KEY, preference.as_str());
    }
}
