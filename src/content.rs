//! CMS content entities
//!
//! Blog posts, categories and tags are plain display records fetched from
//! the remote API; there is no lifecycle logic beyond create/read on the CMS
//! side. Posts are enriched on decode with a sanitized excerpt and a
//! reading-time estimate.

use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::ConfigError;
use crate::text;

const EXCERPT_MAX_CHARS: usize = 200;

/// A blog category display record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogCategory {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// A blog tag display record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogTag {
    pub id: String,
    pub slug: String,
    pub name: String,
}

/// A blog post display record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default, rename_all = "camelCase")]
pub struct BlogPost {
    pub id: String,
    pub slug: String,
    pub title: String,
    /// Sanitized HTML body
    pub content: String,
    /// Plain-text excerpt; derived from the body when the CMS omits it
    pub excerpt: String,
    pub featured: bool,
    /// RFC 3339 publication timestamp as supplied by the CMS
    pub published_at: Option<String>,
    pub category: Option<BlogCategory>,
    pub tags: Vec<BlogTag>,
    /// Estimated reading time in minutes, derived from the body
    pub reading_time_minutes: u32,
}

impl BlogPost {
    /// Sanitize the body and fill in the derived display fields.
    fn enrich(mut self) -> Self {
        self.content = text::sanitize_html(&self.content);
        self.reading_time_minutes = text::calculate_reading_time(&text::plain_text(&self.content));
        if self.excerpt.trim().is_empty() {
            self.excerpt = text::excerpt(&self.content, EXCERPT_MAX_CHARS);
        }
        if self.slug.is_empty() {
            self.slug = text::generate_slug(&self.title);
        }
        self
    }
}

#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    data: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct ItemEnvelope<T> {
    data: T,
}

/// HTTP client for CMS content entities.
pub struct ContentClient {
    client: Client,
    base: Url,
}

impl ContentClient {
    /// Create a client for the given CMS base URL.
    pub fn new(base: &str) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .user_agent(concat!("pageconf/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, Url::parse(base)?))
    }

    /// Create a client reusing an existing reqwest client.
    pub fn with_client(client: Client, base: Url) -> Self {
        Self { client, base }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ConfigError> {
        let mut url = self.base.join(path)?;
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }

        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(ConfigError::NotFound);
        }
        if !status.is_success() {
            return Err(ConfigError::Status(status.as_u16()));
        }

        resp.json().await.map_err(|e| ConfigError::Shape(e.to_string()))
    }

    /// List published posts, newest first.
    pub async fn list_posts(&self, page: u32, per_page: u32) -> Result<Vec<BlogPost>, ConfigError> {
        let envelope: ListEnvelope<BlogPost> = self
            .get_json(
                "/cms/posts",
                &[("page", page.to_string()), ("perPage", per_page.to_string())],
            )
            .await?;
        Ok(envelope.data.into_iter().map(BlogPost::enrich).collect())
    }

    /// List posts flagged as featured, up to `limit`.
    pub async fn featured_posts(&self, limit: u32) -> Result<Vec<BlogPost>, ConfigError> {
        let envelope: ListEnvelope<BlogPost> = self
            .get_json(
                "/cms/posts",
                &[("featured", "true".to_owned()), ("limit", limit.to_string())],
            )
            .await?;
        Ok(envelope.data.into_iter().map(BlogPost::enrich).collect())
    }

    /// Fetch a single post by slug. Missing posts map to
    /// [`ConfigError::NotFound`] so the caller can show a fallback screen.
    pub async fn get_post(&self, slug: &str) -> Result<BlogPost, ConfigError> {
        let envelope: ItemEnvelope<BlogPost> =
            self.get_json(&format!("/cms/posts/{slug}"), &[]).await?;
        Ok(envelope.data.enrich())
    }

    /// List all blog categories.
    pub async fn list_categories(&self) -> Result<Vec<BlogCategory>, ConfigError> {
        let envelope: ListEnvelope<BlogCategory> =
            self.get_json("/cms/categories", &[]).await?;
        Ok(envelope.data)
    }

    /// List all blog tags.
    pub async fn list_tags(&self) -> Result<Vec<BlogTag>, ConfigError> {
        let envelope: ListEnvelope<BlogTag> = self.get_json("/cms/tags", &[]).await?;
        Ok(envelope.data)
    }
}
