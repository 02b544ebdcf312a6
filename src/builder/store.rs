//! Durable page storage for the builder
//!
//! One entry per page: a JSON-serialized ordered sequence of module
//! instances, keyed by the page name. `FileStore` namespaces entries under
//! a directory; `MemoryStore` mirrors the browser-local `builder:<name>`
//! key scheme and counts writes so tests can assert no-write transitions.

use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::Site;

/// Durable key-value storage for builder pages
pub trait PageStore {
    /// Load a page's module sequence, `None` if the page has never been saved
    fn load(&self, name: &str) -> Result<Option<Vec<Value>>, StoreError>;

    /// Persist a page's module sequence
    fn save(&self, name: &str, modules: &[Value]) -> Result<(), StoreError>;

    /// Delete a page's persisted entry (absent entries are fine)
    fn remove(&self, name: &str) -> Result<(), StoreError>;

    /// Names of all persisted pages, sorted
    fn list(&self) -> Result<Vec<String>, StoreError>;
}

/// Page storage backed by one JSON file per page
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the site's pages directory
    pub fn for_site(site: &Site) -> Self {
        Self::new(site.pages_dir())
    }

    fn path_for(&self, name: &str) -> Result<PathBuf, StoreError> {
        if name.is_empty()
            || name.starts_with('.')
            || name.contains('/')
            || name.contains('\\')
        {
            return Err(StoreError::InvalidName(name.to_string()));
        }
        Ok(self.dir.join(format!("{name}.json")))
    }
}

impl PageStore for FileStore {
    fn load(&self, name: &str) -> Result<Option<Vec<Value>>, StoreError> {
        let path = self.path_for(name)?;
        if !path.is_file() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&path).map_err(|source| StoreError::Io {
            path: path.clone(),
            source,
        })?;
        let modules =
            serde_json::from_str(&contents).map_err(|source| StoreError::Corrupt {
                name: name.to_string(),
                source,
            })?;
        Ok(Some(modules))
    }

    fn save(&self, name: &str, modules: &[Value]) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })?;
        let contents =
            serde_json::to_string_pretty(modules).expect("module sequence serializes");
        std::fs::write(&path, contents).map_err(|source| StoreError::Io { path, source })
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        let path = self.path_for(name)?;
        if path.is_file() {
            std::fs::remove_file(&path).map_err(|source| StoreError::Io { path, source })?;
        }
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.dir).map_err(|source| StoreError::Io {
            path: self.dir.clone(),
            source,
        })? {
            let entry = entry.map_err(|source| StoreError::Io {
                path: self.dir.clone(),
                source,
            })?;
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }
}

/// In-memory page storage with the `builder:<name>` key scheme
///
/// Used by tests and by embedders that want ephemeral pages. Tracks the
/// number of writes so "no persistence write" transitions can be asserted.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, String>>,
    writes: Cell<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `save` calls since construction
    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    /// Raw serialized entry for a page, if present
    pub fn raw(&self, name: &str) -> Option<String> {
        self.entries.borrow().get(&Self::key(name)).cloned()
    }

    fn key(name: &str) -> String {
        format!("builder:{name}")
    }
}

impl PageStore for MemoryStore {
    fn load(&self, name: &str) -> Result<Option<Vec<Value>>, StoreError> {
        match self.entries.borrow().get(&Self::key(name)) {
            Some(contents) => {
                let modules =
                    serde_json::from_str(contents).map_err(|source| StoreError::Corrupt {
                        name: name.to_string(),
                        source,
                    })?;
                Ok(Some(modules))
            }
            None => Ok(None),
        }
    }

    fn save(&self, name: &str, modules: &[Value]) -> Result<(), StoreError> {
        let contents = serde_json::to_string(modules).expect("module sequence serializes");
        self.entries.borrow_mut().insert(Self::key(name), contents);
        self.writes.set(self.writes.get() + 1);
        Ok(())
    }

    fn remove(&self, name: &str) -> Result<(), StoreError> {
        self.entries.borrow_mut().remove(&Self::key(name));
        Ok(())
    }

    fn list(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .entries
            .borrow()
            .keys()
            .filter_map(|key| key.strip_prefix("builder:"))
            .map(str::to_string)
            .collect())
    }
}

/// Errors that can occur in page storage
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid page name: {0:?}")]
    InvalidName(String),

    #[error("failed to access {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("persisted page \"{name}\" is corrupt")]
    Corrupt {
        name: String,
        #[source]
        source: serde_json::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("pages"));

        let modules = vec![
            json!({ "@type": "Article", "title": "One" }),
            json!({ "@type": "Quote", "text": "Two" }),
        ];
        store.save("My page", &modules).unwrap();
        assert_eq!(store.load("My page").unwrap().unwrap(), modules);
    }

    #[test]
    fn test_file_store_unknown_page_is_none() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        assert!(store.load("Nope").unwrap().is_none());
    }

    #[test]
    fn test_file_store_rejects_path_traversal_names() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path());
        assert!(matches!(
            store.save("../escape", &[]),
            Err(StoreError::InvalidName(_))
        ));
        assert!(matches!(
            store.save(".hidden", &[]),
            Err(StoreError::InvalidName(_))
        ));
    }

    #[test]
    fn test_file_store_list_and_remove() {
        let tmp = tempdir().unwrap();
        let store = FileStore::new(tmp.path().join("pages"));
        store.save("b", &[]).unwrap();
        store.save("a", &[]).unwrap();

        assert_eq!(store.list().unwrap(), vec!["a", "b"]);
        store.remove("a").unwrap();
        assert_eq!(store.list().unwrap(), vec!["b"]);
        // removing an absent entry is fine
        store.remove("a").unwrap();
    }

    #[test]
    fn test_memory_store_counts_writes() {
        let store = MemoryStore::new();
        assert_eq!(store.writes(), 0);
        store.save("p", &[json!({ "@type": "X" })]).unwrap();
        store.save("p", &[]).unwrap();
        assert_eq!(store.writes(), 2);
        assert_eq!(store.list().unwrap(), vec!["p"]);
    }
}
