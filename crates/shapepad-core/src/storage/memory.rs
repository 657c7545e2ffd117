//! In-memory storage.

use super::{BoxFuture, Storage, StorageError, StorageResult};
use crate::document;
use crate::scene::Scene;
use crate::shapes::Shape;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory storage for testing and ephemeral use.
///
/// Documents are kept in their serialized form so a load goes through the
/// same validation as a file.
#[derive(Default)]
pub struct MemoryStorage {
    documents: RwLock<HashMap<String, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn save(&self, id: &str, scene: &Scene) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        let bytes =
            document::serialize(scene).map_err(|e| StorageError::Serialization(e.to_string()));
        Box::pin(async move {
            let bytes = bytes?;
            let mut docs = self
                .documents
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            docs.insert(id, bytes);
            Ok(())
        })
    }

    fn load(&self, id: &str) -> BoxFuture<'_, StorageResult<Vec<Shape>>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self
                .documents
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            let bytes = docs.get(&id).ok_or_else(|| StorageError::NotFound(id.clone()))?;
            document::deserialize(bytes).map_err(|e| StorageError::Serialization(e.to_string()))
        })
    }

    fn delete(&self, id: &str) -> BoxFuture<'_, StorageResult<()>> {
        let id = id.to_string();
        Box::pin(async move {
            let mut docs = self
                .documents
                .write()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            docs.remove(&id);
            Ok(())
        })
    }

    fn list(&self) -> BoxFuture<'_, StorageResult<Vec<String>>> {
        Box::pin(async move {
            let docs = self
                .documents
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            let mut ids: Vec<String> = docs.keys().cloned().collect();
            ids.sort();
            Ok(ids)
        })
    }

    fn exists(&self, id: &str) -> BoxFuture<'_, StorageResult<bool>> {
        let id = id.to_string();
        Box::pin(async move {
            let docs = self
                .documents
                .read()
                .map_err(|e| StorageError::Other(format!("Lock error: {}", e)))?;
            Ok(docs.contains_key(&id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::block_on;
    use super::*;
    use kurbo::Point;

    #[test]
    fn test_save_and_load() {
        let storage = MemoryStorage::new();
        let mut scene = Scene::new();
        scene
            .add_polyline(vec![Point::new(1.0, 2.0), Point::new(3.0, 4.0)])
            .unwrap();

        block_on(storage.save("test", &scene)).unwrap();
        let loaded = block_on(storage.load("test")).unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id().as_str(), "polyline_1");
    }

    #[test]
    fn test_not_found() {
        let storage = MemoryStorage::new();
        let result = block_on(storage.load("nonexistent"));
        assert!(matches!(result, Err(StorageError::NotFound(_))));
    }

    #[test]
    fn test_exists_and_delete() {
        let storage = MemoryStorage::new();
        let scene = Scene::new();

        assert!(!block_on(storage.exists("test")).unwrap());
        block_on(storage.save("test", &scene)).unwrap();
        assert!(block_on(storage.exists("test")).unwrap());

        block_on(storage.delete("test")).unwrap();
        assert!(!block_on(storage.exists("test")).unwrap());
    }

    #[test]
    fn test_list() {
        let storage = MemoryStorage::new();
        let scene = Scene::new();

        block_on(storage.save("doc2", &scene)).unwrap();
        block_on(storage.save("doc1", &scene)).unwrap();

        let list = block_on(storage.list()).unwrap();
        assert_eq!(list, vec!["doc1".to_string(), "doc2".to_string()]);
    }

    #[test]
    fn test_save_overwrites() {
        let storage = MemoryStorage::new();
        let mut scene = Scene::new();
        block_on(storage.save("doc", &scene)).unwrap();
        scene.add_text("later", None).unwrap();
        block_on(storage.save("doc", &scene)).unwrap();
        assert_eq!(block_on(storage.load("doc")).unwrap().len(), 1);
    }
}
