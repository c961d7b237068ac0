//! Persisted session keys.
//!
//! The session survives process restarts as two strings under fixed keys.
//! Absence of [`TOKEN_KEY`] means "logged out".

use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const TOKEN_KEY: &str = "token";
pub const EMAIL_KEY: &str = "userEmail";

const SESSION_FILE: &str = "session.json";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt session file: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("No config directory: {0}")]
    NoConfigDir(String),
}

/// Client-side persistent key/value storage.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Token and identity as read from storage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistedSession {
    pub token: Option<String>,
    pub email: Option<String>,
}

impl PersistedSession {
    pub fn read(store: &dyn KeyValueStore) -> Result<Self, StorageError> {
        Ok(Self {
            token: store.get(TOKEN_KEY)?,
            email: store.get(EMAIL_KEY)?,
        })
    }

    pub fn write(store: &dyn KeyValueStore, token: &str, email: &str) -> Result<(), StorageError> {
        store.set(TOKEN_KEY, token)?;
        store.set(EMAIL_KEY, email)
    }

    pub fn clear(store: &dyn KeyValueStore) -> Result<(), StorageError> {
        store.remove(TOKEN_KEY)?;
        store.remove(EMAIL_KEY)
    }

    pub fn is_logged_in(&self) -> bool {
        self.token.is_some()
    }
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.entries.lock().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entries.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.lock().remove(key);
        Ok(())
    }
}

/// JSON file in the CLI config directory.
///
/// Every operation re-reads the file so two processes sharing the directory
/// see each other's login/logout.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStore {
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(SESSION_FILE),
            lock: Mutex::new(()),
        }
    }

    /// Store rooted at [`config_dir`]
    pub fn open_default() -> Result<Self, StorageError> {
        Ok(Self::new(config_dir()?))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(entries)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let _guard = self.lock.lock();
        Ok(self.load()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let _guard = self.lock.lock();
        let mut entries = self.load()?;
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }
}

/// `$BAMBINO_CONFIG_DIR`, or `~/.config/bambino`
pub fn config_dir() -> Result<PathBuf, StorageError> {
    let dir = if let Ok(custom_dir) = std::env::var("BAMBINO_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| StorageError::NoConfigDir("HOME environment variable not set".to_string()))?;
        PathBuf::from(home).join(".config").join("bambino")
    };

    if !dir.exists() {
        fs::create_dir_all(&dir)?;
    }

    Ok(dir)
}
