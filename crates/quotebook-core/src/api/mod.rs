//! Boundary to the remote document store.
//!
//! `ApiClient` speaks the store's per-collection JSON endpoints;
//! `RemoteSource` is the narrow slice of that surface the data
//! provider consumes, kept as a trait so tests can substitute an
//! in-process stub.

pub mod client;
pub mod error;

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{Budget, Client, Product, Representative};

pub use client::ApiClient;
pub use error::RemoteError;

/// Whole-collection retrieval, one function per collection.
///
/// This is everything the data provider needs from the remote store:
/// it only ever fills caches from full snapshots, never from
/// single-document reads.
#[async_trait]
pub trait RemoteSource: Send + Sync {
    async fn list_budgets(&self) -> Result<Vec<Budget>>;
    async fn list_clients(&self) -> Result<Vec<Client>>;
    async fn list_products(&self) -> Result<Vec<Product>>;
    async fn list_representatives(&self) -> Result<Vec<Representative>>;
}
