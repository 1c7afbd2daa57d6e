//! Stale-while-revalidate config resolution
//!
//! The resolver ties a persistent [`ConfigStore`], a [`RemoteFetcher`] and a
//! complete defaults document together:
//!
//! - a fresh cache entry is served immediately (no loading flash) while a
//!   detached revalidation refreshes the store in the background
//! - a cache miss awaits the remote fetch
//! - a failed fetch falls back to the cached value, or to the defaults when
//!   no cache exists
//!
//! The returned config is always fully populated: the raw remote document is
//! merged over the defaults on every read. Overlapping revalidations are not
//! coalesced or cancelled; the store is last-write-wins, which is acceptable
//! for display-only configuration.

use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, warn};

use crate::config::CacheConfig;
use crate::error::ConfigError;
use crate::fetch::RemoteFetcher;
use crate::merge::deep_merge;
use crate::store::{ConfigStore, read_fresh, write_through};

/// Where the resolved config came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Served from a fresh cache entry
    Cache,
    /// Served from a successful remote fetch
    Remote,
    /// Served from the hardcoded defaults (cold start with a failed fetch)
    Defaults,
}

/// Outcome of a resolution cycle.
///
/// `config` is always usable; `error` is informational and only set when
/// neither cache nor remote could supply a document.
#[derive(Debug, Clone)]
pub struct Resolution {
    /// Fully populated config (remote or cached document merged over defaults)
    pub config: Value,
    pub source: ConfigSource,
    pub error: Option<String>,
}

struct ResolverInner<S, F>
where
    S: ConfigStore,
    F: RemoteFetcher,
{
    store: S,
    fetcher: F,
    defaults: Value,
    config: CacheConfig,
    component: String,
}

/// Stale-while-revalidate resolver for one component's page configs.
pub struct ConfigResolver<S, F>
where
    S: ConfigStore,
    F: RemoteFetcher,
{
    inner: Arc<ResolverInner<S, F>>,
}

impl<S, F> Clone for ConfigResolver<S, F>
where
    S: ConfigStore,
    F: RemoteFetcher,
{
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, F> ConfigResolver<S, F>
where
    S: ConfigStore,
    F: RemoteFetcher,
{
    /// Create a resolver.
    ///
    /// `component` namespaces store keys as `{component}_{slug}` so several
    /// resolvers can share one store. `defaults` must be a complete document;
    /// every merged result keeps its shape.
    pub fn new(
        store: S,
        fetcher: F,
        defaults: Value,
        component: impl Into<String>,
        config: CacheConfig,
    ) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                store,
                fetcher,
                defaults,
                config,
                component: component.into(),
            }),
        }
    }

    /// The complete defaults document.
    pub fn defaults(&self) -> &Value {
        &self.inner.defaults
    }

    fn cache_key(&self, slug: &str) -> String {
        format!("{}_{}", self.inner.component, slug)
    }

    /// Merge a raw remote document over the defaults.
    ///
    /// A non-object document cannot be merged meaningfully and yields the
    /// pure defaults, keeping the full-population guarantee.
    fn merged(&self, raw: &Value) -> Value {
        if raw.is_object() {
            deep_merge(&self.inner.defaults, raw)
        } else {
            warn!(
                "Ignoring non-object config document for component {}",
                self.inner.component
            );
            self.inner.defaults.clone()
        }
    }

    /// Synchronous cache read, merged over defaults. No fetch is issued.
    pub fn cached(&self, slug: &str) -> Option<Value> {
        let key = self.cache_key(slug);
        read_fresh(&self.inner.store, &key, self.inner.config.ttl).map(|raw| self.merged(&raw))
    }

    /// One fetch-or-cache resolution cycle.
    ///
    /// Cache hit: returns the merged cached value immediately and, when
    /// enabled, spawns a detached background revalidation. Cache miss: awaits
    /// the fetch, falling back to the defaults (with `error` set) on failure.
    pub async fn resolve(&self, slug: &str) -> Resolution {
        let key = self.cache_key(slug);

        if let Some(raw) = read_fresh(&self.inner.store, &key, self.inner.config.ttl) {
            debug!("Cache hit for key: {}", key);

            if self.inner.config.background_revalidate {
                let resolver = self.clone();
                let slug = slug.to_owned();
                tokio::spawn(async move {
                    if let Err(e) = resolver.revalidate(&slug).await {
                        warn!("Background revalidation failed for {}: {}", slug, e);
                    }
                });
            }

            return Resolution {
                config: self.merged(&raw),
                source: ConfigSource::Cache,
                error: None,
            };
        }

        debug!("Cache miss for key: {}", key);

        match self.revalidate(slug).await {
            Ok(config) => Resolution {
                config,
                source: ConfigSource::Remote,
                error: None,
            },
            Err(e) => {
                warn!("Fetch failed for {} with no cached fallback: {}", slug, e);
                Resolution {
                    config: self.inner.defaults.clone(),
                    source: ConfigSource::Defaults,
                    error: Some(e.to_string()),
                }
            }
        }
    }

    /// Awaited fetch + store rewrite + merge.
    ///
    /// The raw remote document is persisted with a fresh timestamp; the
    /// merged result is returned.
    pub async fn revalidate(&self, slug: &str) -> Result<Value, ConfigError> {
        let document = self.inner.fetcher.fetch(slug).await?;
        let key = self.cache_key(slug);

        write_through(&self.inner.store, &key, &document.content);

        Ok(self.merged(&document.content))
    }

    /// Drop the cached entry for a slug (manual cache-busting).
    pub fn invalidate(&self, slug: &str) {
        let key = self.cache_key(slug);
        self.inner.store.remove(&key);
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use serde_json::json;

    use crate::fetch::PageDocument;
    use crate::store::MemoryStore;

    use super::*;

    struct StaticFetcher {
        content: Value,
    }

    #[async_trait]
    impl RemoteFetcher for StaticFetcher {
        async fn fetch(&self, _slug: &str) -> Result<PageDocument, ConfigError> {
            Ok(PageDocument {
                content: self.content.clone(),
                seo: None,
            })
        }
    }

    struct FailingFetcher;

    #[async_trait]
    impl RemoteFetcher for FailingFetcher {
        async fn fetch(&self, _slug: &str) -> Result<PageDocument, ConfigError> {
            Err(ConfigError::Status(500))
        }
    }

    fn defaults() -> Value {
        json!({
            "hero": {"title": "Welcome", "dark": {"bg": "#000", "fg": "#fff"}},
            "cta": {"visible": true}
        })
    }

    fn foreground_config() -> CacheConfig {
        CacheConfig {
            background_revalidate: false,
            ..CacheConfig::default()
        }
    }

    fn resolver<F: RemoteFetcher>(fetcher: F) -> ConfigResolver<MemoryStore, F> {
        ConfigResolver::new(
            MemoryStore::default(),
            fetcher,
            defaults(),
            "publicPage",
            foreground_config(),
        )
    }

    #[tokio::test]
    async fn cold_start_fetch_success() {
        let resolver = resolver(StaticFetcher {
            content: json!({"hero": {"title": "Hola"}}),
        });

        let resolution = resolver.resolve("home").await;

        assert_eq!(resolution.source, ConfigSource::Remote);
        assert!(resolution.error.is_none());
        assert_eq!(resolution.config["hero"]["title"], json!("Hola"));
        // Unspecified nested defaults survive
        assert_eq!(resolution.config["hero"]["dark"], json!({"bg": "#000", "fg": "#fff"}));
        assert_eq!(resolution.config["cta"], json!({"visible": true}));
    }

    #[tokio::test]
    async fn fetch_persists_raw_document() {
        let resolver = resolver(StaticFetcher {
            content: json!({"hero": {"title": "Hola"}}),
        });

        resolver.resolve("home").await;

        // The store holds the raw remote document, not the merged result
        let cached = resolver.cached("home").expect("cached");
        assert_eq!(cached["hero"]["title"], json!("Hola"));
        assert_eq!(cached["cta"], json!({"visible": true}));
    }

    #[tokio::test]
    async fn stale_while_revalidate_masks_fetch_failure() {
        let resolver = resolver(FailingFetcher);
        write_through(
            &resolver.inner.store,
            "publicPage_home",
            &json!({"hero": {"title": "Cached"}}),
        );

        let resolution = resolver.resolve("home").await;

        assert_eq!(resolution.source, ConfigSource::Cache);
        assert!(resolution.error.is_none());
        assert_eq!(resolution.config["hero"]["title"], json!("Cached"));
        assert_eq!(resolution.config["cta"], json!({"visible": true}));
    }

    #[tokio::test]
    async fn cold_start_fetch_failure_falls_back_to_defaults() {
        let resolver = resolver(FailingFetcher);

        let resolution = resolver.resolve("home").await;

        assert_eq!(resolution.source, ConfigSource::Defaults);
        assert_eq!(resolution.config, defaults());
        assert!(resolution.error.is_some());
    }

    #[tokio::test]
    async fn background_revalidation_rewrites_store() {
        let resolver = ConfigResolver::new(
            MemoryStore::default(),
            StaticFetcher {
                content: json!({"hero": {"title": "Fresh"}}),
            },
            defaults(),
            "publicPage",
            foreground_config(),
        );
        write_through(
            &resolver.inner.store,
            "publicPage_home",
            &json!({"hero": {"title": "Stale"}}),
        );

        let merged = resolver.revalidate("home").await.expect("revalidate");

        assert_eq!(merged["hero"]["title"], json!("Fresh"));
        let cached = resolver.cached("home").expect("cached");
        assert_eq!(cached["hero"]["title"], json!("Fresh"));
    }

    #[tokio::test]
    async fn non_object_document_yields_defaults() {
        let resolver = resolver(StaticFetcher {
            content: json!("not an object"),
        });

        let resolution = resolver.resolve("home").await;

        assert_eq!(resolution.source, ConfigSource::Remote);
        assert_eq!(resolution.config, defaults());
    }

    #[tokio::test]
    async fn invalidate_forces_next_fetch() {
        let resolver = resolver(StaticFetcher {
            content: json!({"hero": {"title": "Hola"}}),
        });

        resolver.resolve("home").await;
        assert!(resolver.cached("home").is_some());

        resolver.invalidate("home");
        assert!(resolver.cached("home").is_none());
    }

    #[tokio::test]
    async fn keys_are_namespaced_per_component() {
        let shared = MemoryStore::default();
        write_through(&shared, "publicFooter_pageData", &json!({"footer": {}}));

        let resolver = ConfigResolver::new(
            shared,
            FailingFetcher,
            defaults(),
            "publicPage",
            foreground_config(),
        );

        // A different component's entry is not visible under this namespace
        assert!(resolver.cached("pageData").is_none());
    }
}
