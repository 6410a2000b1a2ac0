//! Cache maintenance CLI for quotebook.
//!
//! Non-visual utility commands for inspecting and managing the local
//! collection cache: `stats` prints per-collection diagnostics, `warm`
//! fills the cache from the configured remote store, `clear` drops it.

use std::io;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quotebook_core::cache::CacheStorage;
use quotebook_core::{ApiClient, CacheService, CollectionKey, Config, DataProvider};

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

fn print_usage() {
    eprintln!("Usage: quotebook <command>");
    eprintln!();
    eprintln!("Commands:");
    eprintln!("  stats   Print per-collection cache diagnostics");
    eprintln!("  warm    Fill the cache from the remote store");
    eprintln!("  clear   Delete the entire local cache");
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(String::as_str) {
        Some("stats") => stats(),
        Some("warm") => warm().await,
        Some("clear") => clear(),
        _ => {
            print_usage();
            std::process::exit(2);
        }
    }
}

fn open_cache(config: &Config) -> Result<CacheService> {
    let cache_dir = config.cache_dir()?;
    Ok(CacheService::new(CacheStorage::new(cache_dir)?))
}

/// Print per-collection diagnostics from whatever is on disk.
fn stats() -> Result<()> {
    let config = Config::load()?;
    let cache = open_cache(&config)?;

    // Promote persisted entries into memory so stats and ages reflect
    // the disk state, not the empty process-start table
    let _ = cache.get_budgets();
    let _ = cache.get_clients();
    let _ = cache.get_products();
    let _ = cache.get_representatives();

    let stats = cache.stats();
    let ages = cache.ages();

    println!("{:<16} {:>7} {:>8} {:>6}  {}", "collection", "cached", "expired", "items", "age");
    for key in CollectionKey::ALL {
        let s = stats.for_key(key);
        let age = match key {
            CollectionKey::Budgets => ages.budgets.as_deref(),
            CollectionKey::Clients => ages.clients.as_deref(),
            CollectionKey::Products => ages.products.as_deref(),
            CollectionKey::Representatives => ages.representatives.as_deref(),
        };
        println!(
            "{:<16} {:>7} {:>8} {:>6}  {}",
            key.as_str(),
            s.cached,
            s.expired,
            s.item_count,
            age.unwrap_or("-")
        );
    }
    Ok(())
}

/// Fill every collection from the configured remote and report counts.
async fn warm() -> Result<()> {
    let config = Config::load()?;
    let base_url = config
        .api_base_url
        .clone()
        .context("No api_base_url configured; set it in the quotebook config file")?;

    let mut api = ApiClient::new(&base_url)?;
    if let Some(ref token) = config.api_token {
        api = api.with_token(token.clone());
    }

    eprintln!("Warming cache from {}...", base_url);

    let mut provider = DataProvider::new(api, open_cache(&config)?);
    if let Some(ttl) = config.cache_ttl() {
        provider = provider.with_ttl(ttl);
    }
    provider.initialize().await;

    info!("Cache warm complete");
    println!("budgets: {}", provider.budgets.len());
    println!("clients: {}", provider.clients.len());
    println!("products: {}", provider.products.len());
    println!("representatives: {}", provider.representatives.len());
    Ok(())
}

/// Drop the whole local cache.
fn clear() -> Result<()> {
    let config = Config::load()?;
    let cache = open_cache(&config)?;
    cache.invalidate_all();
    eprintln!("Cache cleared");
    Ok(())
}
