//! Data provider bridging the cache service and the remote store.
//!
//! UI layers read the four collection arrays from here and never talk
//! to the remote store directly. Initialization is cache-first with a
//! concurrent remote fill on misses; local mutations patch the exposed
//! array and write through the cache so a confirmed remote write never
//! forces a refetch.

use chrono::Duration;
use tracing::{debug, error, info};

use crate::api::RemoteSource;
use crate::cache::{CacheService, CacheStats, CollectionKey};
use crate::models::{Budget, Client, Product, Representative};

/// Consumer-facing source of truth for the four cached collections.
///
/// Mutation helpers are pure local bookkeeping: they must be called
/// only after the corresponding remote write has already succeeded.
/// The provider never originates writes to the remote store.
pub struct DataProvider<R: RemoteSource> {
    remote: R,
    cache: CacheService,
    /// Uniform TTL override from config; `None` means the cache default.
    ttl: Option<Duration>,

    pub budgets: Vec<Budget>,
    pub clients: Vec<Client>,
    pub products: Vec<Product>,
    pub representatives: Vec<Representative>,

    /// True from construction until `initialize` has resolved all four
    /// collections, success or failure.
    pub loading: bool,
}

impl<R: RemoteSource> DataProvider<R> {
    pub fn new(remote: R, cache: CacheService) -> Self {
        Self {
            remote,
            cache,
            ttl: None,
            budgets: Vec::new(),
            clients: Vec::new(),
            products: Vec::new(),
            representatives: Vec::new(),
            loading: true,
        }
    }

    /// Override the uniform TTL applied to every cache write.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Populate all four collections, cache-first with remote fallback.
    ///
    /// The four fills run concurrently; a failed fetch logs and yields
    /// an empty collection rather than blocking the other three, and
    /// `loading` resolves either way.
    pub async fn initialize(&mut self) {
        self.loading = true;

        let (budgets, clients, products, representatives) = tokio::join!(
            Self::fill_budgets(&self.cache, &self.remote, self.ttl),
            Self::fill_clients(&self.cache, &self.remote, self.ttl),
            Self::fill_products(&self.cache, &self.remote, self.ttl),
            Self::fill_representatives(&self.cache, &self.remote, self.ttl),
        );

        self.budgets = budgets;
        self.clients = clients;
        self.products = products;
        self.representatives = representatives;
        self.loading = false;

        info!(
            budgets = self.budgets.len(),
            clients = self.clients.len(),
            products = self.products.len(),
            representatives = self.representatives.len(),
            "Data provider initialized"
        );
    }

    async fn fill_budgets(cache: &CacheService, remote: &R, ttl: Option<Duration>) -> Vec<Budget> {
        if let Some(cached) = cache.get_budgets() {
            return cached;
        }
        match remote.list_budgets().await {
            Ok(data) => {
                cache.set_budgets(&data, ttl);
                data
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch budgets, starting empty");
                Vec::new()
            }
        }
    }

    async fn fill_clients(cache: &CacheService, remote: &R, ttl: Option<Duration>) -> Vec<Client> {
        if let Some(cached) = cache.get_clients() {
            return cached;
        }
        match remote.list_clients().await {
            Ok(data) => {
                cache.set_clients(&data, ttl);
                data
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch clients, starting empty");
                Vec::new()
            }
        }
    }

    async fn fill_products(cache: &CacheService, remote: &R, ttl: Option<Duration>) -> Vec<Product> {
        if let Some(cached) = cache.get_products() {
            return cached;
        }
        match remote.list_products().await {
            Ok(data) => {
                cache.set_products(&data, ttl);
                data
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch products, starting empty");
                Vec::new()
            }
        }
    }

    async fn fill_representatives(
        cache: &CacheService,
        remote: &R,
        ttl: Option<Duration>,
    ) -> Vec<Representative> {
        if let Some(cached) = cache.get_representatives() {
            return cached;
        }
        match remote.list_representatives().await {
            Ok(data) => {
                cache.set_representatives(&data, ttl);
                data
            }
            Err(e) => {
                error!(error = %e, "Failed to fetch representatives, starting empty");
                Vec::new()
            }
        }
    }

    // =========================================================================
    // Budget mutations
    // =========================================================================

    pub fn add_budget_to_cache(&mut self, budget: Budget) {
        let mut next = self.budgets.clone();
        next.push(budget);
        self.cache.set_budgets(&next, self.ttl);
        self.budgets = next;
    }

    pub fn update_budget_in_cache(&mut self, budget: Budget) {
        let Some(pos) = self.budgets.iter().position(|b| b.id == budget.id) else {
            debug!(id = %budget.id, "Budget not in cache, update ignored");
            return;
        };
        let mut next = self.budgets.clone();
        next[pos] = budget;
        self.cache.set_budgets(&next, self.ttl);
        self.budgets = next;
    }

    pub fn remove_budget_from_cache(&mut self, id: &str) {
        if !self.budgets.iter().any(|b| b.id == id) {
            return;
        }
        let next: Vec<Budget> = self.budgets.iter().filter(|b| b.id != id).cloned().collect();
        self.cache.set_budgets(&next, self.ttl);
        self.budgets = next;
    }

    // =========================================================================
    // Client mutations
    // =========================================================================

    pub fn add_client_to_cache(&mut self, client: Client) {
        let mut next = self.clients.clone();
        next.push(client);
        self.cache.set_clients(&next, self.ttl);
        self.clients = next;
    }

    pub fn update_client_in_cache(&mut self, client: Client) {
        let Some(pos) = self.clients.iter().position(|c| c.id == client.id) else {
            debug!(id = %client.id, "Client not in cache, update ignored");
            return;
        };
        let mut next = self.clients.clone();
        next[pos] = client;
        self.cache.set_clients(&next, self.ttl);
        self.clients = next;
    }

    pub fn remove_client_from_cache(&mut self, id: &str) {
        if !self.clients.iter().any(|c| c.id == id) {
            return;
        }
        let next: Vec<Client> = self.clients.iter().filter(|c| c.id != id).cloned().collect();
        self.cache.set_clients(&next, self.ttl);
        self.clients = next;
    }

    // =========================================================================
    // Product mutations
    // =========================================================================

    pub fn add_product_to_cache(&mut self, product: Product) {
        let mut next = self.products.clone();
        next.push(product);
        self.cache.set_products(&next, self.ttl);
        self.products = next;
    }

    pub fn update_product_in_cache(&mut self, product: Product) {
        let Some(pos) = self.products.iter().position(|p| p.id == product.id) else {
            debug!(id = %product.id, "Product not in cache, update ignored");
            return;
        };
        let mut next = self.products.clone();
        next[pos] = product;
        self.cache.set_products(&next, self.ttl);
        self.products = next;
    }

    pub fn remove_product_from_cache(&mut self, id: &str) {
        if !self.products.iter().any(|p| p.id == id) {
            return;
        }
        let next: Vec<Product> = self.products.iter().filter(|p| p.id != id).cloned().collect();
        self.cache.set_products(&next, self.ttl);
        self.products = next;
    }

    // =========================================================================
    // Representative mutations
    // =========================================================================

    pub fn add_representative_to_cache(&mut self, rep: Representative) {
        let mut next = self.representatives.clone();
        next.push(rep);
        self.cache.set_representatives(&next, self.ttl);
        self.representatives = next;
    }

    pub fn update_representative_in_cache(&mut self, rep: Representative) {
        let Some(pos) = self.representatives.iter().position(|r| r.id == rep.id) else {
            debug!(id = %rep.id, "Representative not in cache, update ignored");
            return;
        };
        let mut next = self.representatives.clone();
        next[pos] = rep;
        self.cache.set_representatives(&next, self.ttl);
        self.representatives = next;
    }

    pub fn remove_representative_from_cache(&mut self, id: &str) {
        if !self.representatives.iter().any(|r| r.id == id) {
            return;
        }
        let next: Vec<Representative> = self
            .representatives
            .iter()
            .filter(|r| r.id != id)
            .cloned()
            .collect();
        self.cache.set_representatives(&next, self.ttl);
        self.representatives = next;
    }

    // =========================================================================
    // Refresh
    // =========================================================================

    /// Force-refetch one collection from the remote, overwriting both
    /// the cache and the exposed array. On fetch failure the current
    /// data is kept.
    pub async fn refresh(&mut self, key: CollectionKey) {
        debug!(key = %key, "Forced refresh");
        match key {
            CollectionKey::Budgets => match self.remote.list_budgets().await {
                Ok(data) => {
                    self.cache.set_budgets(&data, self.ttl);
                    self.budgets = data;
                }
                Err(e) => error!(error = %e, "Budgets refresh failed, keeping cached data"),
            },
            CollectionKey::Clients => match self.remote.list_clients().await {
                Ok(data) => {
                    self.cache.set_clients(&data, self.ttl);
                    self.clients = data;
                }
                Err(e) => error!(error = %e, "Clients refresh failed, keeping cached data"),
            },
            CollectionKey::Products => match self.remote.list_products().await {
                Ok(data) => {
                    self.cache.set_products(&data, self.ttl);
                    self.products = data;
                }
                Err(e) => error!(error = %e, "Products refresh failed, keeping cached data"),
            },
            CollectionKey::Representatives => match self.remote.list_representatives().await {
                Ok(data) => {
                    self.cache.set_representatives(&data, self.ttl);
                    self.representatives = data;
                }
                Err(e) => error!(error = %e, "Representatives refresh failed, keeping cached data"),
            },
        }
    }

    /// Drop everything and re-run the initialization fill.
    pub async fn refresh_all(&mut self) {
        self.cache.invalidate_all();
        self.initialize().await;
    }

    // =========================================================================
    // Diagnostics
    // =========================================================================

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// The underlying cache service, for diagnostics and tests.
    pub fn cache(&self) -> &CacheService {
        &self.cache
    }
}
