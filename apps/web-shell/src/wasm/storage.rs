use convert_everything_core::{FlagStore, PortError};

use super::dom::js_error_message;

/// `localStorage`-backed flag store. Private browsing modes can deny storage
/// entirely; reads then fail and flags fall back to their defaults.
pub(super) struct LocalFlagStore {
    storage: Option<web_sys::Storage>,
}

impl LocalFlagStore {
    pub(super) fn from_window(window: &web_sys::Window) -> Self {
        let storage = window.local_storage().ok().flatten();
        if storage.is_none() {
            tracing::warn!("local storage is unavailable; flags will not persist");
        }
        Self { storage }
    }

    fn storage(&self) -> Result<&web_sys::Storage, PortError> {
        self.storage.as_ref().ok_or(PortError::StorageUnavailable)
    }
}

impl FlagStore for LocalFlagStore {
    fn read(&self, key: &str) -> Result<Option<String>, PortError> {
        self.storage()?
            .get_item(key)
            .map_err(|error| PortError::Storage {
                key: key.to_string(),
                message: js_error_message(&error),
            })
    }

    fn write(&mut self, key: &str, value: &str) -> Result<(), PortError> {
        self.storage()?
            .set_item(key, value)
            .map_err(|error| PortError::Storage {
                key: key.to_string(),
                message: js_error_message(&error),
            })
    }
}
