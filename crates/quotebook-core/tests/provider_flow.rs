//! End-to-end flow: cold cache, remote fill, write-through mutations,
//! and a second provider instance served entirely from the persisted
//! tier.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use quotebook_core::cache::CacheStorage;
use quotebook_core::models::{Budget, Client, Product, Representative};
use quotebook_core::{CacheService, CollectionKey, DataProvider, RemoteSource};

/// Remote stub counting whole-collection fetches.
#[derive(Default)]
struct CountingRemote {
    budgets: Vec<Budget>,
    clients: Vec<Client>,
    calls: AtomicUsize,
}

#[async_trait]
impl RemoteSource for CountingRemote {
    async fn list_budgets(&self) -> anyhow::Result<Vec<Budget>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.budgets.clone())
    }

    async fn list_clients(&self) -> anyhow::Result<Vec<Client>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.clients.clone())
    }

    async fn list_products(&self) -> anyhow::Result<Vec<Product>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }

    async fn list_representatives(&self) -> anyhow::Result<Vec<Representative>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(Vec::new())
    }
}

fn cache_in(dir: &std::path::Path) -> CacheService {
    CacheService::new(CacheStorage::new(dir.to_path_buf()).unwrap())
}

#[tokio::test]
async fn test_cold_start_fill_mutate_and_restart() {
    let dir = tempfile::tempdir().unwrap();

    let remote = CountingRemote {
        budgets: vec![Budget {
            id: "1".to_string(),
            number: 1,
            client_id: "c1".to_string(),
            ..Default::default()
        }],
        clients: vec![Client {
            id: "c1".to_string(),
            name: "Acme".to_string(),
            ..Default::default()
        }],
        ..Default::default()
    };

    // Cold cache: every collection misses and is filled remotely
    let cache = cache_in(dir.path());
    assert!(cache.get_budgets().is_none());

    let mut provider = DataProvider::new(remote, cache);
    provider.initialize().await;

    assert!(!provider.loading);
    assert_eq!(provider.budgets.len(), 1);

    let stats = provider.cache_stats();
    assert!(stats.budgets.cached);
    assert!(!stats.budgets.expired);
    assert_eq!(stats.budgets.item_count, 1);

    // A confirmed remote write is mirrored locally without a refetch
    provider.add_client_to_cache(Client {
        id: "c2".to_string(),
        name: "Initech".to_string(),
        ..Default::default()
    });
    provider.remove_budget_from_cache("1");

    assert_eq!(provider.clients.len(), 2);
    assert!(provider.budgets.is_empty());
    assert_eq!(provider.cache_stats().clients.item_count, 2);

    // Second provider over the same cache directory: the persisted
    // tier serves everything, zero remote calls
    let restarted_remote = CountingRemote::default();
    let mut restarted = DataProvider::new(restarted_remote, cache_in(dir.path()));
    restarted.initialize().await;

    assert_eq!(restarted.clients.len(), 2);
    assert!(restarted.budgets.is_empty());

    // Per-key invalidation forces exactly one collection back to the remote
    restarted.cache().invalidate(CollectionKey::Clients);
    restarted.refresh(CollectionKey::Clients).await;
    assert!(restarted.clients.is_empty());
}
