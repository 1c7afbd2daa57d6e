//! Remote config fetching
//!
//! The [`RemoteFetcher`] trait is the seam between the resolver and the CMS.
//! Implementations can use HTTP or any other transport; [`HttpFetcher`] is
//! the reqwest-based implementation against the CMS pages endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::error::ConfigError;
use crate::store::now_ms;

/// A page's content document as returned by the CMS.
#[derive(Debug, Clone, Deserialize)]
pub struct PageDocument {
    /// Partial page configuration; every field is optional
    #[serde(default = "empty_object")]
    pub content: Value,
    /// Optional SEO metadata block
    #[serde(default)]
    pub seo: Option<Value>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}

#[derive(Debug, Deserialize)]
struct Envelope {
    data: PageDocument,
}

/// Trait for fetching a page document from the CMS.
#[async_trait]
pub trait RemoteFetcher: Send + Sync + 'static {
    /// Fetch the document for the given page slug.
    async fn fetch(&self, slug: &str) -> Result<PageDocument, ConfigError>;
}

/// HTTP fetcher against `GET {base}/cms/pages/{slug}`.
///
/// When cache busting is enabled, a millisecond timestamp query parameter
/// (`?t=<epoch>`) is appended to defeat intermediary HTTP caches. This is
/// independent of the local store TTL.
pub struct HttpFetcher {
    client: Client,
    base: Url,
    cache_bust: bool,
}

impl HttpFetcher {
    /// Create a fetcher for the given CMS base URL.
    pub fn new(base: &str, cache_bust: bool) -> Result<Self, ConfigError> {
        let client = Client::builder().user_agent(Self::user_agent()).build()?;
        Ok(Self::with_client(client, Url::parse(base)?, cache_bust))
    }

    /// Create a fetcher reusing an existing reqwest client.
    pub fn with_client(client: Client, base: Url, cache_bust: bool) -> Self {
        Self {
            client,
            base,
            cache_bust,
        }
    }

    fn user_agent() -> &'static str {
        concat!("pageconf/", env!("CARGO_PKG_VERSION"))
    }

    fn page_url(&self, slug: &str) -> Result<Url, ConfigError> {
        let mut url = self.base.join(&format!("/cms/pages/{slug}"))?;
        if self.cache_bust {
            url.query_pairs_mut()
                .append_pair("t", &now_ms().to_string());
        }
        Ok(url)
    }
}

#[async_trait]
impl RemoteFetcher for HttpFetcher {
    async fn fetch(&self, slug: &str) -> Result<PageDocument, ConfigError> {
        let resp = self.client.get(self.page_url(slug)?).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ConfigError::NotFound);
        }
        if !status.is_success() {
            return Err(ConfigError::Status(status.as_u16()));
        }

        let envelope: Envelope = resp
            .json()
            .await
            .map_err(|e| ConfigError::Shape(e.to_string()))?;
        Ok(envelope.data)
    }
}
