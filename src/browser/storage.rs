//! `localStorage` as a [`KeyValueStore`]

use florafind_core::storage::{write_error, KeyValueStore};
use florafind_core::Result;

use super::js_reason;

/// Reminders and notes survive reloads here. Without `localStorage`
/// (private mode, sandboxed frames) reads are empty and writes fail.
pub struct BrowserStore {
    storage: Option<web_sys::Storage>,
}

impl BrowserStore {
    pub fn open() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            tracing::warn!("localStorage unavailable, reminders and notes will not persist");
        }
        Self { storage }
    }

    fn storage(&self, key: &str) -> Result<&web_sys::Storage> {
        self.storage
            .as_ref()
            .ok_or_else(|| write_error(key, "localStorage unavailable"))
    }
}

impl KeyValueStore for BrowserStore {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.as_ref()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.storage(key)?
            .set_item(key, value)
            .map_err(|e| write_error(key, js_reason(&e)))
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.storage(key)?
            .remove_item(key)
            .map_err(|e| write_error(key, js_reason(&e)))
    }
}
