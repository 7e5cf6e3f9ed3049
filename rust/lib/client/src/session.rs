use std::sync::RwLock;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Storage key of the access token.
pub const ACCESS_TOKEN_KEY: &str = "access_token";
/// Storage key of the refresh token.
pub const REFRESH_TOKEN_KEY: &str = "refresh_token";

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Persisted client session. Either token may be absent.
///
/// A session holding an access token counts as authenticated for dispatch
/// purposes. Validity is decided by the server alone.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

impl Session {
    pub fn new(access: impl Into<String>, refresh: impl Into<String>) -> Self {
        Self {
            access_token: Some(access.into()),
            refresh_token: Some(refresh.into()),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.access_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Persistent key-value capability holding the session tokens.
///
/// `set` overwrites both tokens in one step; implementations should make the
/// write atomic so a reader never sees one new token next to one old one.
pub trait SessionStore: Send + Sync {
    /// Read both tokens. Missing tokens are not an error.
    fn get(&self) -> Result<Session, StoreError>;

    /// Replace both tokens.
    fn set(&self, session: &Session) -> Result<(), StoreError>;

    /// Remove both tokens.
    fn clear(&self) -> Result<(), StoreError>;
}

/// In-process session store.
#[derive(Debug, Default)]
pub struct MemoryStore {
    session: RwLock<Session>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }
}

impl SessionStore for MemoryStore {
    fn get(&self) -> Result<Session, StoreError> {
        let guard = self
            .session
            .read()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        Ok(guard.clone())
    }

    fn set(&self, session: &Session) -> Result<(), StoreError> {
        let mut guard = self
            .session
            .write()
            .map_err(|e| StoreError::Storage(e.to_string()))?;
        *guard = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.set(&Session::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_both_tokens() {
        let store = MemoryStore::new();
        store.set(&Session::new("a", "r")).unwrap();
        let got = store.get().unwrap();
        assert_eq!(got.access_token.as_deref(), Some("a"));
        assert_eq!(got.refresh_token.as_deref(), Some("r"));
    }

    #[test]
    fn clear_removes_both_tokens() {
        let store = MemoryStore::with_session(Session::new("a", "r"));
        store.clear().unwrap();
        assert_eq!(store.get().unwrap(), Session::default());
    }

    #[test]
    fn empty_access_token_is_not_authenticated() {
        let session = Session {
            access_token: Some(String::new()),
            refresh_token: None,
        };
        assert!(!session.is_authenticated());
        assert!(Session::new("a", "r").is_authenticated());
        assert!(!Session::default().is_authenticated());
    }

    #[test]
    fn serialized_keys_match_storage_keys() {
        let value = serde_json::to_value(Session::new("a", "r")).unwrap();
        assert_eq!(value[ACCESS_TOKEN_KEY], "a");
        assert_eq!(value[REFRESH_TOKEN_KEY], "r");
    }
}
