//! Persistent key/value storage for the session credential pair.
//!
//! SYSTEM CONTEXT
//! ==============
//! `access_token` and `user_info` live in browser `localStorage`. The route
//! guard reads the token directly, the HTTP client attaches it to requests,
//! and the session store is the only writer. The two keys are written and
//! erased together so the guard and the session never disagree.

#[cfg(test)]
#[path = "storage_test.rs"]
mod storage_test;

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use crate::net::types::UserProfile;

pub const ACCESS_TOKEN_KEY: &str = "access_token";
pub const USER_INFO_KEY: &str = "user_info";

/// Synchronous string storage. Reads are total: failures read as absent.
pub trait KeyValueStorage {
    fn get(&self, key: &str) -> Option<String>;

    /// # Errors
    ///
    /// Returns a description of the rejected write (quota, disabled storage).
    fn set(&self, key: &str, value: &str) -> Result<(), String>;

    fn remove(&self, key: &str);
}

/// `window.localStorage`, looked up on every call.
///
/// Outside the browser every read is absent and every write is dropped. In
/// the browser a missing or full `localStorage` rejects the write.
#[derive(Clone, Copy, Debug, Default)]
pub struct BrowserStorage;

#[cfg(feature = "hydrate")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window().and_then(|w| w.local_storage().ok().flatten())
}

impl KeyValueStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        #[cfg(feature = "hydrate")]
        {
            local_storage()?.get_item(key).ok().flatten()
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
            None
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        #[cfg(feature = "hydrate")]
        {
            let storage = local_storage().ok_or_else(|| "localStorage unavailable".to_owned())?;
            storage.set_item(key, value).map_err(|e| format!("localStorage write of {key} failed: {e:?}"))
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = (key, value);
            Ok(())
        }
    }

    fn remove(&self, key: &str) {
        #[cfg(feature = "hydrate")]
        {
            if let Some(storage) = local_storage() {
                let _ = storage.remove_item(key);
            }
        }
        #[cfg(not(feature = "hydrate"))]
        {
            let _ = key;
        }
    }
}

/// In-process storage for SSR and tests.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).remove(key);
    }
}

/// Outcome of reading the persisted credential pair.
#[derive(Clone, Debug, PartialEq)]
pub enum StoredSession {
    /// Neither key is present.
    Empty,
    /// Both keys present and the profile decodes.
    Complete { token: String, user: UserProfile },
    /// One key without the other, or an unreadable profile.
    Inconsistent,
}

/// The stored bearer token, ignoring blank values.
pub fn stored_credential<S: KeyValueStorage + ?Sized>(storage: &S) -> Option<String> {
    storage.get(ACCESS_TOKEN_KEY).filter(|token| !token.trim().is_empty())
}

pub fn has_credential<S: KeyValueStorage + ?Sized>(storage: &S) -> bool {
    stored_credential(storage).is_some()
}

/// Read both halves of the credential pair.
pub fn load_session<S: KeyValueStorage + ?Sized>(storage: &S) -> StoredSession {
    let token = stored_credential(storage);
    let user_info = storage.get(USER_INFO_KEY).filter(|raw| !raw.is_empty());
    match (token, user_info) {
        (None, None) => StoredSession::Empty,
        (Some(token), Some(raw)) => match serde_json::from_str::<UserProfile>(&raw) {
            Ok(user) => StoredSession::Complete { token, user },
            Err(_) => StoredSession::Inconsistent,
        },
        _ => StoredSession::Inconsistent,
    }
}

/// Persist the credential pair, or neither half of it.
///
/// If the profile write is rejected after the token was stored, the token is
/// removed again.
///
/// # Errors
///
/// Returns the serialization or storage error message.
pub fn save_session<S: KeyValueStorage + ?Sized>(
    storage: &S,
    token: &str,
    user: &UserProfile,
) -> Result<(), String> {
    let user_info = serde_json::to_string(user).map_err(|e| e.to_string())?;
    storage.set(ACCESS_TOKEN_KEY, token)?;
    if let Err(e) = storage.set(USER_INFO_KEY, &user_info) {
        storage.remove(ACCESS_TOKEN_KEY);
        return Err(e);
    }
    Ok(())
}

/// Replace the cached profile while keeping the token.
///
/// # Errors
///
/// Returns the serialization or storage error message. The previous
/// profile stays in place.
pub fn save_user_info<S: KeyValueStorage + ?Sized>(storage: &S, user: &UserProfile) -> Result<(), String> {
    let user_info = serde_json::to_string(user).map_err(|e| e.to_string())?;
    storage.set(USER_INFO_KEY, &user_info)
}

/// Erase both halves of the credential pair.
pub fn clear_session<S: KeyValueStorage + ?Sized>(storage: &S) {
    storage.remove(ACCESS_TOKEN_KEY);
    storage.remove(USER_INFO_KEY);
}
