//! Core library for quotebook, a business-management application
//! (clients, representatives, products, quotes) backed by a remote
//! document store.
//!
//! The interesting part lives in [`cache`] and [`provider`]: a
//! read-through, TTL-expiring, two-tier collection cache and the data
//! provider that keeps cached collections consistent with confirmed
//! remote writes without refetching. [`api`] is the HTTP boundary to
//! the store; [`models`] are the cached document shapes.

pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod provider;

pub use api::{ApiClient, RemoteError, RemoteSource};
pub use cache::{CacheService, CacheStats, CacheStorage, CollectionKey};
pub use config::Config;
pub use provider::DataProvider;
