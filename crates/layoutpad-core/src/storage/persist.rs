//! Persistence of the layout document under a single key.
//!
//! Gesture moves only mark the layout dirty; the write happens when the
//! gesture is released. Discrete edits write straight away.
//!
//! A stored layout that cannot be parsed is copied to `<key>.bak` before the
//! first write replaces it.

use super::{KeyValueStore, StorageError, StorageResult};
use crate::document::{LayoutDocument, LayoutError};

/// Reads and writes the layout document through a [`KeyValueStore`].
pub struct LayoutPersistence<S: KeyValueStore> {
    store: S,
    key: String,
    /// Whether the in-memory layout has changes not yet written.
    dirty: bool,
    /// Stored value that failed to parse, not yet copied to the backup key.
    unreadable: Option<String>,
}

impl<S: KeyValueStore> LayoutPersistence<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
            dirty: false,
            unreadable: None,
        }
    }

    /// Key the layout is stored under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Key an unreadable layout is moved to before it is overwritten.
    pub fn backup_key(&self) -> String {
        format!("{}.bak", self.key())
    }

    /// Mark the layout as having unsaved changes.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read the persisted layout. `Ok(None)` if nothing was ever saved.
    pub fn try_load(&self) -> Result<Option<LayoutDocument>, LoadError> {
        match self.store.get(&self.key)? {
            Some(json) => Ok(Some(LayoutDocument::from_json(&json)?)),
            None => Ok(None),
        }
    }

    /// Read the persisted layout, degrading to an empty document on any failure.
    ///
    /// An unparseable value is remembered so the next save can back it up.
    pub fn load(&mut self) -> LayoutDocument {
        let json = match self.store.get(&self.key) {
            Ok(Some(json)) => json,
            Ok(None) => {
                log::info!("No saved layout under '{}', starting empty", self.key);
                return LayoutDocument::new();
            }
            Err(e) => {
                log::warn!("Layout storage unreadable, starting empty: {}", e);
                return LayoutDocument::new();
            }
        };

        match LayoutDocument::from_json(&json) {
            Ok(document) => {
                log::info!("Loaded layout '{}' ({} elements)", self.key, document.len());
                document
            }
            Err(e) => {
                log::warn!(
                    "Layout '{}' failed to load, starting empty: {}. It is kept under '{}'",
                    self.key,
                    e,
                    self.backup_key()
                );
                self.unreadable = Some(json);
                LayoutDocument::new()
            }
        }
    }

    /// Write the layout now.
    ///
    /// If the previous value could not be read, it is copied to
    /// [`backup_key`](Self::backup_key) first. Nothing is overwritten when
    /// that copy fails.
    pub fn save(&mut self, document: &LayoutDocument) -> StorageResult<()> {
        let json = document
            .to_json()
            .map_err(|e| StorageError::Other(format!("Failed to serialize layout: {}", e)))?;
        if let Some(raw) = &self.unreadable {
            let backup = self.backup_key();
            self.store.set(&backup, raw)?;
            log::info!("Backed up unreadable layout to '{}'", backup);
            self.unreadable = None;
        }
        self.store.set(&self.key, &json)?;
        self.dirty = false;
        Ok(())
    }

    /// Write the layout if it has unsaved changes. Returns true if written.
    pub fn save_if_dirty(&mut self, document: &LayoutDocument) -> StorageResult<bool> {
        if !self.dirty {
            return Ok(false);
        }
        self.save(document)?;
        Ok(true)
    }

    /// Get a reference to the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }
}

/// Why a persisted layout could not be read.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use crate::geometry::Geometry;
    use crate::storage::MemoryStore;

    /// Store that fails every call.
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(StorageError::Unavailable("offline".to_string()))
        }

        fn set(&mut self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Io("disk full".to_string()))
        }
    }

    fn sample() -> LayoutDocument {
        let mut doc = LayoutDocument::new();
        doc.add_element(ElementKind::Rectangle, Geometry::new(1.0, 2.0, 3.0, 4.0));
        doc
    }

    #[test]
    fn test_save_then_load() {
        let mut persistence = LayoutPersistence::new(MemoryStore::new(), "layout");
        let doc = sample();
        persistence.save(&doc).unwrap();

        assert_eq!(persistence.load(), doc);
        assert!(persistence.store().get("layout").unwrap().is_some());
    }

    #[test]
    fn test_missing_layout_is_empty() {
        let mut persistence = LayoutPersistence::new(MemoryStore::new(), "layout");
        assert!(matches!(persistence.try_load(), Ok(None)));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_malformed_layout_falls_back_to_empty() {
        let store = MemoryStore::with_entry("layout", "[{\"id\":");
        let mut persistence = LayoutPersistence::new(store, "layout");

        assert!(matches!(persistence.try_load(), Err(LoadError::Layout(_))));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_unreadable_layout_backed_up_before_first_save() {
        let bad = "[{\"id\":";
        let mut persistence = LayoutPersistence::new(MemoryStore::with_entry("layout", bad), "layout");
        assert!(persistence.load().is_empty());
        assert_eq!(persistence.store().get("layout.bak").unwrap(), None);

        let doc = sample();
        persistence.save(&doc).unwrap();
        assert_eq!(persistence.store().get("layout.bak").unwrap().as_deref(), Some(bad));
        assert_eq!(persistence.load(), doc);

        // Later saves leave the backup alone.
        persistence.save(&LayoutDocument::new()).unwrap();
        assert_eq!(persistence.store().get("layout.bak").unwrap().as_deref(), Some(bad));
    }

    #[test]
    fn test_duplicate_ids_backed_up() {
        let doc = sample();
        let element = doc.elements()[0].clone();
        let duplicated = serde_json::to_string(&vec![element.clone(), element]).unwrap();
        let store = MemoryStore::with_entry("draft", &duplicated);
        let mut persistence = LayoutPersistence::new(store, "draft");

        assert!(matches!(persistence.try_load(), Err(LoadError::Layout(LayoutError::DuplicateId(_)))));
        assert!(persistence.load().is_empty());
        assert_eq!(persistence.backup_key(), "draft.bak");

        persistence.save(&doc).unwrap();
        assert_eq!(persistence.store().get("draft.bak").unwrap(), Some(duplicated));
    }

    #[test]
    fn test_failed_backup_keeps_original() {
        /// Accepts every write except backups.
        struct NoBackups(MemoryStore);

        impl KeyValueStore for NoBackups {
            fn get(&self, key: &str) -> StorageResult<Option<String>> {
                self.0.get(key)
            }

            fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
                if key.ends_with(".bak") {
                    return Err(StorageError::Io("quota exceeded".to_string()));
                }
                self.0.set(key, value)
            }
        }

        let store = NoBackups(MemoryStore::with_entry("layout", "garbage"));
        let mut persistence = LayoutPersistence::new(store, "layout");
        assert!(persistence.load().is_empty());

        assert!(persistence.save(&sample()).is_err());
        assert_eq!(persistence.store().get("layout").unwrap().as_deref(), Some("garbage"));
    }

    #[test]
    fn test_unreadable_store_falls_back_to_empty() {
        let mut persistence = LayoutPersistence::new(BrokenStore, "layout");
        assert!(matches!(persistence.try_load(), Err(LoadError::Storage(_))));
        assert!(persistence.load().is_empty());
    }

    #[test]
    fn test_dirty_flag() {
        let mut persistence = LayoutPersistence::new(MemoryStore::new(), "layout");
        let doc = sample();

        assert!(!persistence.save_if_dirty(&doc).unwrap());
        assert_eq!(persistence.store().get("layout").unwrap(), None);

        persistence.mark_dirty();
        assert!(persistence.is_dirty());
        assert!(persistence.save_if_dirty(&doc).unwrap());
        assert!(!persistence.is_dirty());
    }

    #[test]
    fn test_failed_write_keeps_dirty() {
        let mut persistence = LayoutPersistence::new(BrokenStore, "layout");
        persistence.mark_dirty();
        assert!(persistence.save(&sample()).is_err());
        assert!(persistence.is_dirty());
    }
}
