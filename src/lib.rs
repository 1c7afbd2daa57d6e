//! pageconf - CMS page-configuration resolution with stale-while-revalidate caching
//!
//! This library resolves themed page-configuration documents from a remote
//! CMS over an injectable persistent cache:
//!
//! - Partial remote documents are deep-merged over complete hardcoded
//!   defaults, so consumers always receive a fully populated config
//! - Raw remote documents are cached in a pluggable key-value store with a
//!   time-based expiry (in-memory and file-backed stores included)
//! - Fresh cache entries are served immediately while a background
//!   revalidation refreshes the store
//! - Fetch failures fall back to cache, then to defaults; errors never
//!   reach the rendering path
//!
//! Also included: a typed, versioned [`pages::PageConfig`] schema validated
//! at the API boundary, blog content display records, text utilities (slug,
//! reading time, excerpts) and a bounded readiness probe.

mod config;
mod error;
mod fetch;
mod merge;
mod resolver;
mod store;

pub mod content;
pub mod pages;
pub mod readiness;
pub mod text;

pub use config::CacheConfig;
pub use error::ConfigError;
pub use fetch::{HttpFetcher, PageDocument, RemoteFetcher};
pub use merge::deep_merge;
pub use resolver::{ConfigResolver, ConfigSource, Resolution};
pub use store::{
    CacheEntry, ConfigStore, FileStore, MemoryStore, StoreError, read_fresh, write_through,
};

// Re-export async_trait for convenience
pub use async_trait::async_trait;
