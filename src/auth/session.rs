use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::UserProfile;

use super::StorageError;

/// Storage slot holding the raw token string
pub const TOKEN_KEY: &str = "token";

/// Storage slot holding the JSON-encoded user profile
pub const USER_KEY: &str = "user";

/// Authenticated identity state held by the client after a successful login.
/// A non-empty token is the whole authentication invariant; there is no
/// expiry or refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,
    pub user: Option<UserProfile>,
}

impl Session {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            user: None,
        }
    }
}

/// String-keyed slot storage behind the session store. Implementations
/// must be durable for real use; tests inject `MemoryStorage`.
pub trait Storage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&mut self, key: &str) -> Result<(), StorageError>;
}

/// Durable storage keeping one file per slot under a data directory.
/// Survives restarts within the same profile.
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    fn slot_path(&self, key: &str) -> PathBuf {
        self.dir.join(key)
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(key);
        if path.exists() {
            Ok(Some(std::fs::read_to_string(path)?))
        } else {
            Ok(None)
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        std::fs::create_dir_all(&self.dir)?;
        std::fs::write(self.slot_path(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        let path = self.slot_path(key);
        if path.exists() {
            std::fs::remove_file(path)?;
        }
        Ok(())
    }
}

/// In-memory storage for tests and ephemeral sessions
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slots: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.slots.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.slots.remove(key);
        Ok(())
    }
}

/// Single source of truth for "is the current actor authenticated".
/// No in-memory flag is kept; every question goes to the backing storage.
pub struct SessionStore<S> {
    storage: S,
}

impl<S: Storage> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Persist a session, overwriting any prior one. The token and user
    /// slots are independent single-key writes with no transaction; both
    /// are regenerated together on the next login.
    pub fn save(&mut self, session: &Session) -> Result<(), StorageError> {
        self.storage.set(TOKEN_KEY, &session.token)?;
        match &session.user {
            Some(user) => {
                // UserProfile serialization cannot fail; guard anyway
                let encoded = serde_json::to_string(user)
                    .map_err(|e| StorageError::Io(std::io::Error::other(e)))?;
                self.storage.set(USER_KEY, &encoded)?;
            }
            None => self.storage.remove(USER_KEY)?,
        }
        Ok(())
    }

    /// Read the stored session. Yields `None` when no token is stored,
    /// the stored token is empty, the user slot holds invalid JSON, or
    /// any storage read fails.
    pub fn load(&self) -> Option<Session> {
        let token = match self.storage.get(TOKEN_KEY) {
            Ok(Some(token)) if !token.is_empty() => token,
            Ok(_) => return None,
            Err(e) => {
                warn!(error = %e, "Failed to read token slot, treating as unauthenticated");
                return None;
            }
        };

        let user = match self.storage.get(USER_KEY) {
            Ok(Some(raw)) => match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    warn!(error = %e, "Stored user profile is not valid JSON");
                    return None;
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!(error = %e, "Failed to read user slot, treating as unauthenticated");
                return None;
            }
        };

        Some(Session { token, user })
    }

    /// Remove both slots unconditionally. Idempotent; absent slots are
    /// not errors.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        self.storage.remove(TOKEN_KEY)?;
        self.storage.remove(USER_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn memory_store() -> SessionStore<MemoryStorage> {
        SessionStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_save_load_round_trip() {
        let mut store = memory_store();
        let session = Session {
            token: "abc123".to_string(),
            user: Some(UserProfile {
                username: "doctor".to_string(),
                display_name: Some("Doctor Ivanov".to_string()),
                role: Some("doctor".to_string()),
            }),
        };

        store.save(&session).unwrap();
        assert_eq!(store.load(), Some(session));
    }

    #[test]
    fn test_load_empty_store() {
        assert_eq!(memory_store().load(), None);
    }

    #[test]
    fn test_save_overwrites_prior_session() {
        let mut store = memory_store();
        let mut session = Session::new("first");
        session.user = Some(UserProfile {
            username: "doctor".to_string(),
            display_name: None,
            role: None,
        });
        store.save(&session).unwrap();

        // Second login with no profile must not leave the old one behind
        store.save(&Session::new("second")).unwrap();
        let loaded = store.load().unwrap();
        assert_eq!(loaded.token, "second");
        assert!(loaded.user.is_none());
    }

    #[test]
    fn test_clear_then_load_yields_nothing() {
        let mut store = memory_store();
        store.save(&Session::new("abc123")).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut store = memory_store();
        store.clear().unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
    }

    #[test]
    fn test_empty_token_reads_as_unauthenticated() {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "").unwrap();
        assert_eq!(SessionStore::new(storage).load(), None);
    }

    #[test]
    fn test_invalid_user_json_reads_as_unauthenticated() {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "abc123").unwrap();
        storage.set(USER_KEY, "not json").unwrap();
        assert_eq!(SessionStore::new(storage).load(), None);
    }

    #[test]
    fn test_token_without_user_slot() {
        let mut storage = MemoryStorage::new();
        storage.set(TOKEN_KEY, "abc123").unwrap();
        let loaded = SessionStore::new(storage).load().unwrap();
        assert_eq!(loaded.token, "abc123");
        assert!(loaded.user.is_none());
    }

    /// Storage whose reads always fail, as when the backing medium is gone
    struct FailingStorage;

    impl Storage for FailingStorage {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Err(StorageError::Io(std::io::Error::other(
                "backing store unavailable",
            )))
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other(
                "backing store unavailable",
            )))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Err(StorageError::Io(std::io::Error::other(
                "backing store unavailable",
            )))
        }
    }

    /// Storage with a readable token slot but an unreadable user slot
    struct BrokenUserSlot;

    impl Storage for BrokenUserSlot {
        fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
            if key == TOKEN_KEY {
                Ok(Some("abc123".to_string()))
            } else {
                Err(StorageError::Io(std::io::Error::other("slot unreadable")))
            }
        }

        fn set(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
            Ok(())
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_failed_token_read_loads_as_none() {
        assert_eq!(SessionStore::new(FailingStorage).load(), None);
    }

    #[test]
    fn test_failed_user_read_loads_as_none() {
        assert_eq!(SessionStore::new(BrokenUserSlot).load(), None);
    }

    #[test]
    fn test_file_storage_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = SessionStore::new(FileStorage::new(dir.path().to_path_buf()));
        let session = Session {
            token: "abc123".to_string(),
            user: Some(UserProfile {
                username: "doctor".to_string(),
                display_name: None,
                role: Some("doctor".to_string()),
            }),
        };
        store.save(&session).unwrap();

        // A fresh store over the same directory sees the same session
        let reopened = SessionStore::new(FileStorage::new(dir.path().to_path_buf()));
        assert_eq!(reopened.load(), Some(session));
    }

    #[test]
    fn test_file_storage_clear_removes_slot_files() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = SessionStore::new(FileStorage::new(dir.path().to_path_buf()));
        store.save(&Session::new("abc123")).unwrap();
        store.clear().unwrap();

        assert_eq!(store.load(), None);
        assert!(!dir.path().join(TOKEN_KEY).exists());
    }
}
