use chrono::Duration;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::cache::entry::{default_ttl, CacheEntry};
use crate::cache::key::CollectionKey;
use crate::cache::storage::{CacheBlob, CacheStorage};
use crate::models::{Budget, Client, Product, Representative};

/// In-memory tier: one typed slot per collection. Created empty on
/// every process start; the persistent tier is what survives restarts.
#[derive(Default)]
struct CacheSlots {
    budgets: Option<CacheEntry<Vec<Budget>>>,
    clients: Option<CacheEntry<Vec<Client>>>,
    products: Option<CacheEntry<Vec<Product>>>,
    representatives: Option<CacheEntry<Vec<Representative>>>,
}

/// Diagnostic snapshot for one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CollectionStats {
    pub cached: bool,
    pub expired: bool,
    pub item_count: usize,
}

/// Diagnostic snapshot across all four collections.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CacheStats {
    pub budgets: CollectionStats,
    pub clients: CollectionStats,
    pub products: CollectionStats,
    pub representatives: CollectionStats,
}

impl CacheStats {
    pub fn for_key(&self, key: CollectionKey) -> &CollectionStats {
        match key {
            CollectionKey::Budgets => &self.budgets,
            CollectionKey::Clients => &self.clients,
            CollectionKey::Products => &self.products,
            CollectionKey::Representatives => &self.representatives,
        }
    }
}

/// Display ages of the in-memory entries, for status output.
#[derive(Debug, Default, Serialize)]
pub struct CacheAges {
    pub budgets: Option<String>,
    pub clients: Option<String>,
    pub products: Option<String>,
    pub representatives: Option<String>,
}

/// Single source of truth for "is this collection fresh, and if so,
/// what is it."
///
/// Reads go memory first, then the persisted blob (promoting storage
/// hits back into memory); writes go through to both tiers so a
/// process restart within the TTL window still serves locally.
///
/// Persistence failures never propagate: they are logged and the
/// operation degrades to a miss or a no-op, because the remote store
/// is always the ultimate fallback.
///
/// The mutex serializes both the slot table and every
/// read-modify-write of the shared blob, which keeps the single-file
/// layout safe on the multi-threaded runtime.
pub struct CacheService {
    slots: Mutex<CacheSlots>,
    storage: CacheStorage,
}

impl CacheService {
    pub fn new(storage: CacheStorage) -> Self {
        Self {
            slots: Mutex::new(CacheSlots::default()),
            storage,
        }
    }

    /// True when no in-memory entry exists or its TTL has elapsed.
    /// Missing is "expired" by definition, never an error.
    pub fn is_expired(&self, key: CollectionKey) -> bool {
        let slots = self.slots.lock();
        match key {
            CollectionKey::Budgets => slot_expired(&slots.budgets),
            CollectionKey::Clients => slot_expired(&slots.clients),
            CollectionKey::Products => slot_expired(&slots.products),
            CollectionKey::Representatives => slot_expired(&slots.representatives),
        }
    }

    // ===== Budgets =====

    pub fn get_budgets(&self) -> Option<Vec<Budget>> {
        let mut slots = self.slots.lock();
        if let Some(entry) = slots.budgets.as_ref().filter(|e| !e.is_expired()) {
            debug!(key = %CollectionKey::Budgets, "cache hit (memory)");
            return Some(entry.data.clone());
        }
        match self.load_blob().and_then(|b| b.budgets).filter(|e| !e.is_expired()) {
            Some(entry) => {
                debug!(key = %CollectionKey::Budgets, "cache hit (storage)");
                let data = entry.data.clone();
                slots.budgets = Some(entry);
                Some(data)
            }
            None => {
                debug!(key = %CollectionKey::Budgets, "cache miss");
                None
            }
        }
    }

    pub fn set_budgets(&self, budgets: &[Budget], ttl: Option<Duration>) {
        let entry = CacheEntry::new(budgets.to_vec(), ttl.unwrap_or_else(default_ttl));
        let mut slots = self.slots.lock();
        let mut blob = self.load_blob().unwrap_or_default();
        blob.budgets = Some(entry.clone());
        self.store_blob(&blob);
        slots.budgets = Some(entry);
    }

    // ===== Clients =====

    pub fn get_clients(&self) -> Option<Vec<Client>> {
        let mut slots = self.slots.lock();
        if let Some(entry) = slots.clients.as_ref().filter(|e| !e.is_expired()) {
            debug!(key = %CollectionKey::Clients, "cache hit (memory)");
            return Some(entry.data.clone());
        }
        match self.load_blob().and_then(|b| b.clients).filter(|e| !e.is_expired()) {
            Some(entry) => {
                debug!(key = %CollectionKey::Clients, "cache hit (storage)");
                let data = entry.data.clone();
                slots.clients = Some(entry);
                Some(data)
            }
            None => {
                debug!(key = %CollectionKey::Clients, "cache miss");
                None
            }
        }
    }

    pub fn set_clients(&self, clients: &[Client], ttl: Option<Duration>) {
        let entry = CacheEntry::new(clients.to_vec(), ttl.unwrap_or_else(default_ttl));
        let mut slots = self.slots.lock();
        let mut blob = self.load_blob().unwrap_or_default();
        blob.clients = Some(entry.clone());
        self.store_blob(&blob);
        slots.clients = Some(entry);
    }

    // ===== Products =====

    pub fn get_products(&self) -> Option<Vec<Product>> {
        let mut slots = self.slots.lock();
        if let Some(entry) = slots.products.as_ref().filter(|e| !e.is_expired()) {
            debug!(key = %CollectionKey::Products, "cache hit (memory)");
            return Some(entry.data.clone());
        }
        match self.load_blob().and_then(|b| b.products).filter(|e| !e.is_expired()) {
            Some(entry) => {
                debug!(key = %CollectionKey::Products, "cache hit (storage)");
                let data = entry.data.clone();
                slots.products = Some(entry);
                Some(data)
            }
            None => {
                debug!(key = %CollectionKey::Products, "cache miss");
                None
            }
        }
    }

    pub fn set_products(&self, products: &[Product], ttl: Option<Duration>) {
        let entry = CacheEntry::new(products.to_vec(), ttl.unwrap_or_else(default_ttl));
        let mut slots = self.slots.lock();
        let mut blob = self.load_blob().unwrap_or_default();
        blob.products = Some(entry.clone());
        self.store_blob(&blob);
        slots.products = Some(entry);
    }

    // ===== Representatives =====

    pub fn get_representatives(&self) -> Option<Vec<Representative>> {
        let mut slots = self.slots.lock();
        if let Some(entry) = slots.representatives.as_ref().filter(|e| !e.is_expired()) {
            debug!(key = %CollectionKey::Representatives, "cache hit (memory)");
            return Some(entry.data.clone());
        }
        match self
            .load_blob()
            .and_then(|b| b.representatives)
            .filter(|e| !e.is_expired())
        {
            Some(entry) => {
                debug!(key = %CollectionKey::Representatives, "cache hit (storage)");
                let data = entry.data.clone();
                slots.representatives = Some(entry);
                Some(data)
            }
            None => {
                debug!(key = %CollectionKey::Representatives, "cache miss");
                None
            }
        }
    }

    pub fn set_representatives(&self, representatives: &[Representative], ttl: Option<Duration>) {
        let entry = CacheEntry::new(representatives.to_vec(), ttl.unwrap_or_else(default_ttl));
        let mut slots = self.slots.lock();
        let mut blob = self.load_blob().unwrap_or_default();
        blob.representatives = Some(entry.clone());
        self.store_blob(&blob);
        slots.representatives = Some(entry);
    }

    // ===== Invalidation =====

    /// Drop one collection from both tiers. A missing persisted blob
    /// is a no-op.
    pub fn invalidate(&self, key: CollectionKey) {
        let mut slots = self.slots.lock();
        match key {
            CollectionKey::Budgets => slots.budgets = None,
            CollectionKey::Clients => slots.clients = None,
            CollectionKey::Products => slots.products = None,
            CollectionKey::Representatives => slots.representatives = None,
        }
        if let Some(mut blob) = self.load_blob() {
            blob.clear(key);
            self.store_blob(&blob);
        }
        debug!(key = %key, "cache invalidated");
    }

    /// Drop everything: all four slots and the blob file itself.
    pub fn invalidate_all(&self) {
        let mut slots = self.slots.lock();
        *slots = CacheSlots::default();
        if let Err(e) = self.storage.delete() {
            warn!(error = %e, "Failed to delete cache file");
        }
        debug!("cache fully invalidated");
    }

    // ===== Diagnostics =====

    /// Per-collection cached/expired/count snapshot. No side effects.
    pub fn stats(&self) -> CacheStats {
        let slots = self.slots.lock();
        CacheStats {
            budgets: slot_stats(&slots.budgets),
            clients: slot_stats(&slots.clients),
            products: slot_stats(&slots.products),
            representatives: slot_stats(&slots.representatives),
        }
    }

    /// Display ages of whatever is in memory, fresh or not.
    pub fn ages(&self) -> CacheAges {
        let slots = self.slots.lock();
        CacheAges {
            budgets: slots.budgets.as_ref().map(CacheEntry::age_display),
            clients: slots.clients.as_ref().map(CacheEntry::age_display),
            products: slots.products.as_ref().map(CacheEntry::age_display),
            representatives: slots.representatives.as_ref().map(CacheEntry::age_display),
        }
    }

    // ===== Persistence plumbing =====

    /// Load the blob, degrading read failures to "nothing persisted".
    fn load_blob(&self) -> Option<CacheBlob> {
        match self.storage.load() {
            Ok(blob) => blob,
            Err(e) => {
                warn!(error = %e, "Failed to load persisted cache, treating as empty");
                None
            }
        }
    }

    /// Write the blob, degrading failures to memory-only caching.
    fn store_blob(&self, blob: &CacheBlob) {
        if let Err(e) = self.storage.save(blob) {
            warn!(error = %e, "Failed to persist cache, keeping in-memory copy only");
        }
    }
}

fn slot_expired<T>(slot: &Option<CacheEntry<T>>) -> bool {
    slot.as_ref().map_or(true, CacheEntry::is_expired)
}

fn slot_stats<T>(slot: &Option<CacheEntry<Vec<T>>>) -> CollectionStats {
    CollectionStats {
        cached: slot.is_some(),
        expired: slot_expired(slot),
        item_count: slot.as_ref().map_or(0, |e| e.data.len()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_in(dir: &std::path::Path) -> CacheService {
        CacheService::new(CacheStorage::new(dir.to_path_buf()).unwrap())
    }

    fn client(id: &str, name: &str) -> Client {
        Client {
            id: id.to_string(),
            name: name.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_get_on_empty_cache_is_miss() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());
        assert!(cache.get_clients().is_none());
        assert!(cache.is_expired(CollectionKey::Clients));
    }

    #[test]
    fn test_set_then_get_hits_memory() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());

        cache.set_clients(&[client("c1", "Acme")], None);
        assert!(!cache.is_expired(CollectionKey::Clients));

        let clients = cache.get_clients().unwrap();
        assert_eq!(clients.len(), 1);
        assert_eq!(clients[0].id, "c1");
    }

    #[test]
    fn test_storage_tier_survives_restart_and_promotes() {
        let dir = tempfile::tempdir().unwrap();
        service_in(dir.path()).set_clients(&[client("c1", "Acme")], None);

        // Fresh service simulates a process restart: memory empty,
        // persisted blob still within its TTL.
        let cache = service_in(dir.path());
        assert!(cache.is_expired(CollectionKey::Clients));

        let clients = cache.get_clients().unwrap();
        assert_eq!(clients[0].name, "Acme");

        // The storage hit repopulated the memory tier
        assert!(!cache.is_expired(CollectionKey::Clients));
    }

    #[test]
    fn test_expired_entry_misses_in_both_tiers() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());

        cache.set_clients(&[client("c1", "Acme")], Some(Duration::minutes(-1)));
        assert!(cache.is_expired(CollectionKey::Clients));
        assert!(cache.get_clients().is_none());

        // And the persisted copy is just as stale
        let restarted = service_in(dir.path());
        assert!(restarted.get_clients().is_none());
    }

    #[test]
    fn test_set_overwrites_unconditionally() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());

        cache.set_clients(&[client("c1", "Acme")], None);
        cache.set_clients(&[client("c2", "Umbrella"), client("c3", "Initech")], None);

        let clients = cache.get_clients().unwrap();
        assert_eq!(clients.len(), 2);
        assert_eq!(clients[0].id, "c2");
    }

    #[test]
    fn test_invalidate_clears_memory_and_blob_key() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());

        cache.set_clients(&[client("c1", "Acme")], None);
        cache.set_products(&[Product::default()], None);
        cache.invalidate(CollectionKey::Clients);

        assert!(cache.get_clients().is_none());

        // The blob no longer carries a clients entry but keeps products
        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();
        let blob = storage.load().unwrap().unwrap();
        assert!(!blob.contains(CollectionKey::Clients));
        assert!(blob.contains(CollectionKey::Products));
    }

    #[test]
    fn test_invalidate_without_blob_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());
        cache.invalidate(CollectionKey::Budgets);
        assert!(cache.get_budgets().is_none());
    }

    #[test]
    fn test_invalidate_all_deletes_blob() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());

        cache.set_clients(&[client("c1", "Acme")], None);
        cache.set_budgets(&[Budget::default()], None);
        cache.invalidate_all();

        assert!(cache.get_clients().is_none());
        assert!(cache.get_budgets().is_none());

        let storage = CacheStorage::new(dir.path().to_path_buf()).unwrap();
        assert!(storage.load().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_blob_degrades_to_miss() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("collections.json"), "{ nope").unwrap();

        let cache = service_in(dir.path());
        assert!(cache.get_clients().is_none());

        // Writes straight over the corrupt file recover it
        cache.set_clients(&[client("c1", "Acme")], None);
        assert_eq!(service_in(dir.path()).get_clients().unwrap().len(), 1);
    }

    #[test]
    fn test_stats_reports_per_collection() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());

        assert!(cache.get_budgets().is_none());
        cache.set_budgets(&[Budget::default()], None);

        let stats = cache.stats();
        assert_eq!(
            stats.budgets,
            CollectionStats {
                cached: true,
                expired: false,
                item_count: 1
            }
        );
        assert_eq!(
            *stats.for_key(CollectionKey::Clients),
            CollectionStats {
                cached: false,
                expired: true,
                item_count: 0
            }
        );
    }

    #[test]
    fn test_ages_tracks_memory_entries() {
        let dir = tempfile::tempdir().unwrap();
        let cache = service_in(dir.path());

        assert!(cache.ages().clients.is_none());
        cache.set_clients(&[client("c1", "Acme")], None);
        assert_eq!(cache.ages().clients.as_deref(), Some("just now"));
    }
}
