//! Typed page configuration schema and the per-page config cache
//!
//! The CMS supplies page configuration as a partial JSON document: every
//! field optional, themed sub-objects nested per section. Rather than
//! passing duck-typed values through to render time, the schema here is a
//! versioned struct with a complete `Default`, decoded and validated once at
//! the API boundary. A document that fails to decode falls back to the
//! defaults instead of leaking malformed values downstream.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::config::CacheConfig;
use crate::error::ConfigError;
use crate::fetch::HttpFetcher;
use crate::resolver::{ConfigResolver, ConfigSource, Resolution};
use crate::store::ConfigStore;

/// Style values for one theme variant of a section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeStyle {
    pub background: String,
    pub title_color: String,
    pub text_color: String,
    pub accent_color: String,
    pub border_color: String,
}

impl ThemeStyle {
    pub fn light() -> Self {
        Self {
            background: "#ffffff".to_owned(),
            title_color: "#111827".to_owned(),
            text_color: "#374151".to_owned(),
            accent_color: "#2563eb".to_owned(),
            border_color: "#e5e7eb".to_owned(),
        }
    }

    pub fn dark() -> Self {
        Self {
            background: "#0b1120".to_owned(),
            title_color: "#f9fafb".to_owned(),
            text_color: "#d1d5db".to_owned(),
            accent_color: "#60a5fa".to_owned(),
            border_color: "#1f2937".to_owned(),
        }
    }
}

impl Default for ThemeStyle {
    fn default() -> Self {
        Self::light()
    }
}

/// Hero layout variants known to the frontend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum HeroLayout {
    #[default]
    Centered,
    SplitLeft,
    SplitRight,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HeroSection {
    pub visible: bool,
    pub layout: HeroLayout,
    pub title: String,
    pub subtitle: String,
    pub background_gradient: String,
    pub title_font: String,
    pub light: ThemeStyle,
    pub dark: ThemeStyle,
}

impl Default for HeroSection {
    fn default() -> Self {
        Self {
            visible: true,
            layout: HeroLayout::default(),
            title: "Digital products, delivered".to_owned(),
            subtitle: "We design and build software that moves your business".to_owned(),
            background_gradient: "linear-gradient(135deg, #1e3a8a 0%, #2563eb 100%)".to_owned(),
            title_font: "Inter, sans-serif".to_owned(),
            light: ThemeStyle::light(),
            dark: ThemeStyle::dark(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FeaturedPostsSection {
    pub visible: bool,
    pub max_posts: u32,
    pub card_border_radius: String,
    pub show_reading_time: bool,
    pub light: ThemeStyle,
    pub dark: ThemeStyle,
}

impl Default for FeaturedPostsSection {
    fn default() -> Self {
        Self {
            visible: true,
            max_posts: 3,
            card_border_radius: "12px".to_owned(),
            show_reading_time: true,
            light: ThemeStyle::light(),
            dark: ThemeStyle::dark(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AllNewsSection {
    pub visible: bool,
    pub page_size: u32,
    pub show_categories: bool,
    pub light: ThemeStyle,
    pub dark: ThemeStyle,
}

impl Default for AllNewsSection {
    fn default() -> Self {
        Self {
            visible: true,
            page_size: 9,
            show_categories: true,
            light: ThemeStyle::light(),
            dark: ThemeStyle::dark(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CtaSection {
    pub visible: bool,
    pub title: String,
    pub button_label: String,
    pub button_href: String,
    pub light: ThemeStyle,
    pub dark: ThemeStyle,
}

impl Default for CtaSection {
    fn default() -> Self {
        Self {
            visible: true,
            title: "Ready to start your project?".to_owned(),
            button_label: "Talk to us".to_owned(),
            button_href: "/contact".to_owned(),
            light: ThemeStyle::light(),
            dark: ThemeStyle::dark(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FooterSection {
    pub show_social_links: bool,
    pub copyright: String,
    pub light: ThemeStyle,
    pub dark: ThemeStyle,
}

impl Default for FooterSection {
    fn default() -> Self {
        Self {
            show_social_links: true,
            copyright: "© Scuti Company. All rights reserved.".to_owned(),
            light: ThemeStyle::light(),
            dark: ThemeStyle::dark(),
        }
    }
}

/// Complete page configuration, keyed by logical section.
///
/// The schema is versioned; documents written by older CMS releases decode
/// against the current defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageConfig {
    pub version: u32,
    pub hero: HeroSection,
    pub featured_posts: FeaturedPostsSection,
    pub all_news: AllNewsSection,
    pub cta: CtaSection,
    pub footer: FooterSection,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            version: 1,
            hero: HeroSection::default(),
            featured_posts: FeaturedPostsSection::default(),
            all_news: AllNewsSection::default(),
            cta: CtaSection::default(),
            footer: FooterSection::default(),
        }
    }
}

impl PageConfig {
    /// Decode a merged document, falling back to defaults when the document
    /// fails validation (wrong types are rejected, not passed through).
    pub fn decode(value: Value) -> Self {
        match serde_json::from_value(value) {
            Ok(config) => config,
            Err(e) => {
                warn!("Page config failed validation, using defaults: {}", e);
                Self::default()
            }
        }
    }

    /// The defaults as a JSON document, for use as a merge base.
    pub fn default_value() -> Value {
        serde_json::to_value(Self::default())
            .unwrap_or_else(|_| Value::Object(serde_json::Map::new()))
    }
}

/// Typed resolution outcome for a page.
#[derive(Debug, Clone)]
pub struct PageResolution {
    pub config: PageConfig,
    pub source: ConfigSource,
    pub error: Option<String>,
}

impl PageResolution {
    fn from_raw(resolution: Resolution) -> Self {
        Self {
            config: PageConfig::decode(resolution.config),
            source: resolution.source,
            error: resolution.error,
        }
    }
}

/// Stale-while-revalidate cache for typed page configuration.
///
/// Binds an [`HttpFetcher`] and the [`PageConfig`] defaults to a
/// [`ConfigResolver`] over the injected store. Store keys follow the
/// `{component}_{slug}` convention (e.g. `publicFooter_pageData`).
pub struct PageConfigCache<S: ConfigStore> {
    inner: ConfigResolver<S, HttpFetcher>,
}

impl<S: ConfigStore> Clone for PageConfigCache<S> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<S: ConfigStore> PageConfigCache<S> {
    /// Create a page config cache for the given CMS base URL.
    ///
    /// `component` namespaces the store keys; pages of different site
    /// components can share one store without clashing.
    pub fn new(
        store: S,
        base_url: &str,
        component: &str,
        config: CacheConfig,
    ) -> Result<Self, ConfigError> {
        let fetcher = HttpFetcher::new(base_url, config.cache_bust)?;
        Ok(Self {
            inner: ConfigResolver::new(
                store,
                fetcher,
                PageConfig::default_value(),
                component,
                config,
            ),
        })
    }

    /// Synchronous cache read for the init path; no fetch is issued.
    pub fn cached(&self, slug: &str) -> Option<PageConfig> {
        self.inner.cached(slug).map(PageConfig::decode)
    }

    /// One fetch-or-cache resolution cycle; always yields a usable config.
    pub async fn get(&self, slug: &str) -> PageResolution {
        PageResolution::from_raw(self.inner.resolve(slug).await)
    }

    /// Awaited refresh, bypassing the cached value.
    pub async fn refresh(&self, slug: &str) -> Result<PageConfig, ConfigError> {
        self.inner.revalidate(slug).await.map(PageConfig::decode)
    }

    /// Drop the cached entry for a slug.
    pub fn invalidate(&self, slug: &str) {
        self.inner.invalidate(slug);
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::merge::deep_merge;

    use super::*;

    #[test]
    fn defaults_round_trip_through_json() {
        let value = PageConfig::default_value();
        let decoded = PageConfig::decode(value);
        assert_eq!(decoded, PageConfig::default());
    }

    #[test]
    fn partial_theme_overlay_keeps_sibling_defaults() {
        let overlay = json!({"hero": {"dark": {"titleColor": "#ffee00"}}});
        let merged = deep_merge(&PageConfig::default_value(), &overlay);

        let config = PageConfig::decode(merged);

        assert_eq!(config.hero.dark.title_color, "#ffee00");
        // Sibling dark fields and the whole light block are preserved
        assert_eq!(config.hero.dark.background, ThemeStyle::dark().background);
        assert_eq!(config.hero.light, ThemeStyle::light());
    }

    #[test]
    fn section_fields_use_camel_case() {
        let overlay = json!({
            "featuredPosts": {"maxPosts": 6, "cardBorderRadius": "4px"},
            "cta": {"buttonLabel": "Hablemos"}
        });
        let merged = deep_merge(&PageConfig::default_value(), &overlay);

        let config = PageConfig::decode(merged);

        assert_eq!(config.featured_posts.max_posts, 6);
        assert_eq!(config.featured_posts.card_border_radius, "4px");
        assert_eq!(config.cta.button_label, "Hablemos");
    }

    #[test]
    fn layout_enum_decodes_kebab_case() {
        let overlay = json!({"hero": {"layout": "split-left"}});
        let merged = deep_merge(&PageConfig::default_value(), &overlay);

        let config = PageConfig::decode(merged);

        assert_eq!(config.hero.layout, HeroLayout::SplitLeft);
    }

    #[test]
    fn malformed_document_falls_back_to_defaults() {
        let overlay = json!({"hero": {"visible": "definitely-not-a-bool"}});
        let merged = deep_merge(&PageConfig::default_value(), &overlay);

        let config = PageConfig::decode(merged);

        assert_eq!(config, PageConfig::default());
    }

    #[test]
    fn decoded_config_has_no_missing_fields() {
        // An empty document decodes to the complete defaults
        let config = PageConfig::decode(json!({}));
        assert_eq!(config, PageConfig::default());
        assert!(!config.footer.copyright.is_empty());
        assert!(!config.hero.dark.background.is_empty());
    }
}
