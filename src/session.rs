//! Session Context
//!
//! Durable client-side state: the auth token, the per-list layout mode and
//! the info-dialog flag. Storage is injected so tests can run without a browser.

#[cfg(test)]
use std::collections::HashMap;
use std::sync::Arc;
#[cfg(test)]
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use crate::config::{HIDE_INFO_KEY, LAYOUT_MODE_KEY_PREFIX, TOKEN_KEY};
use crate::models::{parse_timestamp, AuthToken, LayoutMode};

/// String key/value storage with `localStorage` semantics
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`; every call is a no-op when storage is unavailable
pub struct BrowserStorage;

impl BrowserStorage {
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl KeyValueStore for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) {
        if let Some(storage) = Self::storage() {
            if storage.set_item(key, value).is_err() {
                log::warn!("[SESSION] could not write {}", key);
            }
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::storage() {
            let _ = storage.remove_item(key);
        }
    }
}

/// In-process storage
#[cfg(test)]
#[derive(Default)]
pub struct MemoryStorage(Mutex<HashMap<String, String>>);

#[cfg(test)]
impl KeyValueStore for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.0.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut map) = self.0.lock() {
            map.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut map) = self.0.lock() {
            map.remove(key);
        }
    }
}

#[derive(Clone)]
pub struct SessionContext {
    store: Arc<dyn KeyValueStore>,
}

impl SessionContext {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self { store: Arc::new(store) }
    }

    pub fn browser() -> Self {
        Self::new(BrowserStorage)
    }

    #[cfg(test)]
    pub fn in_memory() -> Self {
        Self::new(MemoryStorage::default())
    }

    // ========================
    // Auth token
    // ========================

    pub fn save_token(&self, token: &AuthToken) {
        match serde_json::to_string(token) {
            Ok(json) => self.store.set(TOKEN_KEY, &json),
            Err(e) => log::error!("[SESSION] could not serialize token: {}", e),
        }
    }

    /// Current unexpired token, if any
    pub fn token(&self) -> Option<AuthToken> {
        self.token_at(Utc::now())
    }

    /// Token as seen at `now`. An expired token is removed and never returned.
    pub fn token_at(&self, now: DateTime<Utc>) -> Option<AuthToken> {
        let raw = self.store.get(TOKEN_KEY)?;
        let token: AuthToken = match serde_json::from_str(&raw) {
            Ok(token) => token,
            Err(e) => {
                log::error!("[SESSION] unreadable token record: {}", e);
                return None;
            }
        };
        match parse_timestamp(&token.expires_at) {
            Some(expires_at) if expires_at >= now => Some(token),
            _ => {
                log::info!("[SESSION] token for list {} expired", token.list_id);
                self.remove_token();
                None
            }
        }
    }

    pub fn remove_token(&self) {
        self.store.remove(TOKEN_KEY);
    }

    /// Token scoped to `list_id`
    pub fn token_for_list(&self, list_id: i64) -> Option<AuthToken> {
        self.token().filter(|token| token.list_id == list_id)
    }

    pub fn has_access_to_list(&self, list_id: i64) -> bool {
        self.token_for_list(list_id).is_some()
    }

    // ========================
    // Layout mode
    // ========================

    fn layout_key(list_id: i64) -> String {
        format!("{}{}", LAYOUT_MODE_KEY_PREFIX, list_id)
    }

    pub fn layout_mode(&self, list_id: i64) -> Option<LayoutMode> {
        self.store
            .get(&Self::layout_key(list_id))
            .and_then(|value| LayoutMode::parse(&value))
    }

    /// Stored mode, or columnar (persisted) when nothing valid is stored
    pub fn layout_mode_or_default(&self, list_id: i64) -> LayoutMode {
        self.layout_mode(list_id).unwrap_or_else(|| {
            self.set_layout_mode(list_id, LayoutMode::default());
            LayoutMode::default()
        })
    }

    pub fn set_layout_mode(&self, list_id: i64, mode: LayoutMode) {
        self.store.set(&Self::layout_key(list_id), mode.as_str());
    }

    // ========================
    // Info dialog
    // ========================

    pub fn info_dismissed(&self) -> bool {
        self.store.get(HIDE_INFO_KEY).as_deref() == Some("true")
    }

    pub fn dismiss_info(&self) {
        self.store.set(HIDE_INFO_KEY, "true");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn token(list_id: i64, expires_at: &str) -> AuthToken {
        AuthToken {
            token: "abc".into(),
            expires_at: expires_at.into(),
            user_name: "Alice".into(),
            list_id,
        }
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_token_round_trip_before_expiry() {
        let session = SessionContext::in_memory();
        let saved = token(7, "2025-03-01T13:00:00Z");
        session.save_token(&saved);
        assert_eq!(session.token_at(noon()), Some(saved));
    }

    #[test]
    fn test_expired_token_is_removed() {
        let session = SessionContext::in_memory();
        session.save_token(&token(7, "2025-03-01T11:59:59Z"));
        assert_eq!(session.token_at(noon()), None);
        // Gone for good, even if the clock went backwards
        let earlier = Utc.with_ymd_and_hms(2025, 3, 1, 8, 0, 0).unwrap();
        assert_eq!(session.token_at(earlier), None);
    }

    #[test]
    fn test_unparsable_expiry_counts_as_expired() {
        let session = SessionContext::in_memory();
        session.save_token(&token(7, "soon"));
        assert_eq!(session.token_at(noon()), None);
    }

    #[test]
    fn test_token_scoped_to_list() {
        let session = SessionContext::in_memory();
        session.save_token(&token(7, "2999-01-01T00:00:00Z"));
        assert!(session.has_access_to_list(7));
        assert!(!session.has_access_to_list(8));
        session.remove_token();
        assert!(!session.has_access_to_list(7));
    }

    #[test]
    fn test_layout_mode_defaults_to_column_and_persists() {
        let session = SessionContext::in_memory();
        assert_eq!(session.layout_mode(3), None);
        assert_eq!(session.layout_mode_or_default(3), LayoutMode::Column);
        assert_eq!(session.layout_mode(3), Some(LayoutMode::Column));

        session.set_layout_mode(3, LayoutMode::Absolute);
        assert_eq!(session.layout_mode_or_default(3), LayoutMode::Absolute);
        assert_eq!(session.layout_mode(4), None);
    }

    #[test]
    fn test_info_flag() {
        let session = SessionContext::in_memory();
        assert!(!session.info_dismissed());
        session.dismiss_info();
        assert!(session.info_dismissed());
    }
}
