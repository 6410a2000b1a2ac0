//! Data models for the quotebook document collections.
//!
//! This module contains the data structures stored in the remote
//! document store and mirrored by the local cache:
//!
//! - `Client`: customer records with billing and contact info
//! - `Product`: catalog items with pricing
//! - `Representative`: sales reps and their commission terms
//! - `Budget`, `BudgetItem`: quotes and their selected-product line items
//!
//! Field names serialize as camelCase to match the documents the web
//! frontend writes. The cache layer treats all of these as opaque
//! payloads; only the UI and the quote math helpers look inside.

pub mod budget;
pub mod client;
pub mod product;
pub mod representative;

pub use budget::{Budget, BudgetItem, BudgetStatus};
pub use client::Client;
pub use product::Product;
pub use representative::Representative;
