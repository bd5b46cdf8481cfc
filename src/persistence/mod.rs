//! Key-value persistence
//!
//! The leaderboard and settings are small JSON strings kept under fixed keys.
//! - `LocalStore`: `window.localStorage` (wasm only)
//! - `MemoryStore`: in-process map for native runs and tests

use std::collections::HashMap;

use crate::error::Result;

/// String key-value store
pub trait KeyValueStore {
    /// Read a value, `Ok(None)` when the key is absent
    fn get(&self, key: &str) -> Result<Option<String>>;
    /// Write a value, replacing any previous one
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// In-memory store
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    items: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.items.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.items.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use web::LocalStore;

#[cfg(target_arch = "wasm32")]
mod web {
    use super::KeyValueStore;
    use crate::error::{GameError, Result, js_message};

    /// `window.localStorage`
    pub struct LocalStore {
        storage: web_sys::Storage,
    }

    impl LocalStore {
        /// `None` when storage is disabled (private browsing, sandboxed frames)
        pub fn open() -> Option<Self> {
            let storage = web_sys::window()
                .and_then(|w| w.local_storage().ok())
                .flatten()?;
            Some(Self { storage })
        }
    }

    impl KeyValueStore for LocalStore {
        fn get(&self, key: &str) -> Result<Option<String>> {
            self.storage
                .get_item(key)
                .map_err(|e| GameError::Storage(js_message(&e)))
        }

        fn set(&mut self, key: &str, value: &str) -> Result<()> {
            self.storage
                .set_item(key, value)
                .map_err(|e| GameError::Storage(js_message(&e)))
        }
    }
}
