use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::cache::entry::CacheEntry;
use crate::cache::key::CollectionKey;
use crate::models::{Budget, Client, Product, Representative};

/// Single blob file holding every persisted collection snapshot.
const CACHE_FILE: &str = "collections.json";

/// On-disk mirror of the cache table: one optional entry per
/// collection, absent keys simply missing from the JSON object.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheBlob {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budgets: Option<CacheEntry<Vec<Budget>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clients: Option<CacheEntry<Vec<Client>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub products: Option<CacheEntry<Vec<Product>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub representatives: Option<CacheEntry<Vec<Representative>>>,
}

impl CacheBlob {
    /// Drop one collection's entry from the blob.
    pub fn clear(&mut self, key: CollectionKey) {
        match key {
            CollectionKey::Budgets => self.budgets = None,
            CollectionKey::Clients => self.clients = None,
            CollectionKey::Products => self.products = None,
            CollectionKey::Representatives => self.representatives = None,
        }
    }

    pub fn contains(&self, key: CollectionKey) -> bool {
        match key {
            CollectionKey::Budgets => self.budgets.is_some(),
            CollectionKey::Clients => self.clients.is_some(),
            CollectionKey::Products => self.products.is_some(),
            CollectionKey::Representatives => self.representatives.is_some(),
        }
    }
}

/// Adapter over the durable local store. Values are plain serialized
/// JSON; one fixed file name plays the role of the single storage key.
pub struct CacheStorage {
    cache_dir: PathBuf,
}

impl CacheStorage {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir)
            .with_context(|| format!("Failed to create cache directory {}", cache_dir.display()))?;
        Ok(Self { cache_dir })
    }

    fn blob_path(&self) -> PathBuf {
        self.cache_dir.join(CACHE_FILE)
    }

    /// Read the persisted blob. A missing file is `Ok(None)`, not an
    /// error; a present-but-unreadable file is an error for the caller
    /// to degrade on.
    pub fn load(&self) -> Result<Option<CacheBlob>> {
        let path = self.blob_path();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read cache file {}", path.display()))?;

        let blob: CacheBlob = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse cache file {}", path.display()))?;

        Ok(Some(blob))
    }

    /// Overwrite the persisted blob wholesale.
    pub fn save(&self, blob: &CacheBlob) -> Result<()> {
        let contents = serde_json::to_string_pretty(blob)?;
        std::fs::write(self.blob_path(), contents)
            .with_context(|| "Failed to write cache file".to_string())?;
        Ok(())
    }

    /// Remove the blob entirely.
    pub fn delete(&self) -> Result<()> {
        let path = self.blob_path();
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("Failed to delete cache file {}", path.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::default_ttl;

    #[test]
    fn test_load_missing_blob_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_save_load_roundtrip_keeps_absent_keys_absent() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();

        let mut blob = CacheBlob::default();
        blob.clients = Some(CacheEntry::new(
            vec![Client {
                id: "c1".to_string(),
                name: "Acme".to_string(),
                ..Default::default()
            }],
            default_ttl(),
        ));
        storage.save(&blob).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert!(loaded.contains(CollectionKey::Clients));
        assert!(!loaded.contains(CollectionKey::Budgets));
        assert_eq!(loaded.clients.unwrap().data[0].name, "Acme");
    }

    #[test]
    fn test_clear_then_save_drops_key() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();

        let mut blob = CacheBlob::default();
        blob.products = Some(CacheEntry::new(Vec::<Product>::new(), default_ttl()));
        blob.clear(CollectionKey::Products);
        storage.save(&blob).unwrap();

        let loaded = storage.load().unwrap().unwrap();
        assert!(!loaded.contains(CollectionKey::Products));
    }

    #[test]
    fn test_delete_removes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();

        storage.save(&CacheBlob::default()).unwrap();
        assert!(storage.load().unwrap().is_some());

        storage.delete().unwrap();
        assert!(storage.load().unwrap().is_none());
        // Deleting again is a no-op
        storage.delete().unwrap();
    }

    #[test]
    fn test_corrupt_blob_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();

        std::fs::write(dir.path().join("collections.json"), "not json").unwrap();
        assert!(storage.load().is_err());
    }
}
