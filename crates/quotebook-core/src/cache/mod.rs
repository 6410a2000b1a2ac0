//! Two-tier collection cache: an in-memory slot table backed by one
//! persisted JSON blob.
//!
//! Reads check memory first, then the blob (promoting storage hits
//! back into memory); writes go through to both tiers. Entries carry
//! their own expiry so a restarted process can still judge freshness
//! from the persisted copy alone.

pub mod entry;
pub mod key;
pub mod service;
pub mod storage;

pub use entry::{default_ttl, CacheEntry, DEFAULT_TTL_MINUTES};
pub use key::CollectionKey;
pub use service::{CacheAges, CacheService, CacheStats, CollectionStats};
pub use storage::{CacheBlob, CacheStorage};
