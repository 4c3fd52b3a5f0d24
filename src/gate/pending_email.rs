use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use thiserror::Error;

/// Key under which the address awaiting a magic-link completion is kept.
pub const PENDING_EMAIL_KEY: &str = "emailForSignIn";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to access local storage: {0}")]
    Io(#[from] io::Error),
    #[error("local storage is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// Client-local persistent storage for the pending magic-link e-mail.
pub trait PendingEmailStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, StoreError>;
    fn save(&self, email: &str) -> Result<(), StoreError>;
    fn clear(&self) -> Result<(), StoreError>;
}

/// Keeps the pending e-mail in a small JSON key/value file, so it survives
/// the browser (or process) restart between sending and opening the link.
pub struct FileEmailStore {
    path: PathBuf,
}

impl FileEmailStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileEmailStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<BTreeMap<String, String>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) if raw.trim().is_empty() => Ok(BTreeMap::new()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_entries(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(entries)?)?;
        Ok(())
    }
}

impl PendingEmailStore for FileEmailStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.read_entries()?.remove(PENDING_EMAIL_KEY))
    }

    fn save(&self, email: &str) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        entries.insert(PENDING_EMAIL_KEY.to_string(), email.to_string());
        self.write_entries(&entries)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let mut entries = self.read_entries()?;
        if entries.remove(PENDING_EMAIL_KEY).is_some() {
            self.write_entries(&entries)?;
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemoryEmailStore {
    email: Mutex<Option<String>>,
}

impl MemoryEmailStore {
    fn slot(&self) -> std::sync::MutexGuard<'_, Option<String>> {
        self.email.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PendingEmailStore for MemoryEmailStore {
    fn load(&self) -> Result<Option<String>, StoreError> {
        Ok(self.slot().clone())
    }

    fn save(&self, email: &str) -> Result<(), StoreError> {
        *self.slot() = Some(email.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.slot().take();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_store_round_trips_and_clears() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileEmailStore::new(dir.path().join("storage.json"));

        assert_eq!(store.load().unwrap(), None);
        store.save("ana@example.com").unwrap();

        let reopened = FileEmailStore::new(store.path().to_path_buf());
        assert_eq!(reopened.load().unwrap().as_deref(), Some("ana@example.com"));

        reopened.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn file_store_keeps_unrelated_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, r#"{"theme":"dark"}"#).unwrap();

        let store = FileEmailStore::new(&path);
        store.save("ana@example.com").unwrap();
        store.clear().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("theme"));
        assert!(!raw.contains(PENDING_EMAIL_KEY));
    }

    #[test]
    fn corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("storage.json");
        fs::write(&path, "not json").unwrap();

        let err = FileEmailStore::new(&path).load().unwrap_err();
        assert!(matches!(err, StoreError::Corrupt(_)));
    }

    #[test]
    fn memory_store() {
        let store = MemoryEmailStore::default();
        store.save("bo@example.com").unwrap();
        assert_eq!(store.load().unwrap().as_deref(), Some("bo@example.com"));
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }
}
