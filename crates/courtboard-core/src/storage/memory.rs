//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document::PlayDocument;
use std::collections::HashMap;
use std::sync::RwLock;

/// Documents held in a map; lost when dropped.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, PlayDocument>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

fn lock_error(err: impl std::fmt::Display) -> StorageError {
    StorageError::Other(format!("Lock error: {}", err))
}

impl Storage for MemoryStorage {
    fn save(&self, document: &PlayDocument) -> BoxFuture<'_, StorageResult<()>> {
        let document = document.clone();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(lock_error)?;
            docs.insert(document.id.clone(), document);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<PlayDocument>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            docs.get(&id).cloned().ok_or(StorageError::NotFound(id))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut docs = self.documents.write().map_err(lock_error)?;
            docs.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            Ok(docs.keys().cloned().collect())
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self.documents.read().map_err(lock_error)?;
            Ok(docs.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::block_on;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let doc = PlayDocument::untitled();

        block_on(storage.save(&doc)).unwrap();
        let loaded = block_on(storage.load(&doc.id)).unwrap();
        assert_eq!(loaded, doc);
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_save_overwrites() {
        let storage = MemoryStorage::new();
        let mut doc = PlayDocument::untitled();
        block_on(storage.save(&doc)).unwrap();
        doc.name = "Renamed".to_string();
        block_on(storage.save(&doc)).unwrap();

        assert_eq!(block_on(storage.list()).unwrap().len(), 1);
        assert_eq!(block_on(storage.load(&doc.id)).unwrap().name, "Renamed");
    }

    #[test]
    fn test_delete_and_exists() {
        let storage = MemoryStorage::new();
        let doc = PlayDocument::untitled();

        assert!(!block_on(storage.exists(&doc.id)).unwrap());
        block_on(storage.save(&doc)).unwrap();
        assert!(block_on(storage.exists(&doc.id)).unwrap());
        block_on(storage.delete(&doc.id)).unwrap();
        assert!(!block_on(storage.exists(&doc.id)).unwrap());
        block_on(storage.delete(&doc.id)).unwrap();
    }
}
