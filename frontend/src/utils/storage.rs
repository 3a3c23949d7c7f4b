use std::{cell::RefCell, collections::HashMap, rc::Rc};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
    #[error("Failed to encode session: {0}")]
    Encode(String),
}

impl StoreError {
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::Unavailable(_) => "STORAGE_UNAVAILABLE",
            StoreError::Encode(_) => "STORAGE_ENCODE",
        }
    }
}

/// String key/value storage with the shape of the Web Storage API.
pub trait KeyValueStorage {
    fn get_item(&self, key: &str) -> Option<String>;
    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove_item(&self, key: &str);
}

impl<T: KeyValueStorage + ?Sized> KeyValueStorage for Rc<T> {
    fn get_item(&self, key: &str) -> Option<String> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) {
        (**self).remove_item(key)
    }
}

#[derive(Debug, Default)]
pub struct MemoryStorage {
    items: RefCell<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.borrow().get(key).cloned()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.items
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) {
        self.items.borrow_mut().remove(key);
    }
}

/// `window.sessionStorage`, resolved on every access so a storage that
/// becomes unavailable (private mode, quota) surfaces as an error instead of
/// a stale handle.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

#[cfg(target_arch = "wasm32")]
fn session_storage() -> Result<web_sys::Storage, StoreError> {
    web_sys::window()
        .ok_or_else(|| StoreError::Unavailable("No window object".into()))?
        .session_storage()
        .map_err(|_| StoreError::Unavailable("No sessionStorage".into()))?
        .ok_or_else(|| StoreError::Unavailable("No sessionStorage".into()))
}

#[cfg(not(target_arch = "wasm32"))]
fn session_storage() -> Result<web_sys::Storage, StoreError> {
    Err(StoreError::Unavailable(
        "sessionStorage is only available in the browser".into(),
    ))
}

impl KeyValueStorage for BrowserStorage {
    fn get_item(&self, key: &str) -> Option<String> {
        session_storage().ok()?.get_item(key).ok().flatten()
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StoreError> {
        session_storage()?
            .set_item(key, value)
            .map_err(|_| StoreError::Unavailable(format!("Failed to store {key}")))
    }

    fn remove_item(&self, key: &str) {
        if let Ok(storage) = session_storage() {
            let _ = storage.remove_item(key);
        }
    }
}
