//! Candidate URL enumeration.
//!
//! The site's public surface is assembled from five sources, always in the
//! same order: listings, locations, state and state-guide pages, blog posts,
//! then the fixed static pages.

pub mod blog;
pub mod sitemap;
pub mod supabase;

pub use blog::{discover_posts, BlogPost};
pub use sitemap::{render_sitemap, write_sitemap};
pub use supabase::SupabaseSource;

use async_trait::async_trait;
use std::collections::HashSet;
use std::path::PathBuf;

use crate::config::{Config, SiteConfig};
use crate::error::Result;
use crate::guides;

/// Database-backed records that own a public page
#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn listing_slugs(&self) -> Result<Vec<String>>;
    async fn location_slugs(&self) -> Result<Vec<String>>;
}

/// Anything that can produce the ordered candidate URL list
#[async_trait]
pub trait CandidateSource: Send + Sync {
    async fn candidate_urls(&self) -> Result<Vec<String>>;
}

/// A fixed list, used for previews and tests
#[async_trait]
impl CandidateSource for Vec<String> {
    async fn candidate_urls(&self) -> Result<Vec<String>> {
        Ok(self.clone())
    }
}

/// Builds absolute URLs from every source of public pages
pub struct UrlEnumerator<S: RecordSource> {
    source: S,
    base_url: String,
    site: SiteConfig,
    blog_dir: PathBuf,
}

impl<S: RecordSource> UrlEnumerator<S> {
    pub fn new(source: S, config: &Config) -> Self {
        Self {
            source,
            base_url: config.base_url().to_string(),
            site: config.site.clone(),
            blog_dir: config.blog_dir().to_path_buf(),
        }
    }

    /// Enumerate every candidate URL.
    ///
    /// Any source failure aborts the whole enumeration.
    pub async fn enumerate(&self) -> Result<Vec<String>> {
        let mut urls = OrderedUrls::default();

        let listings = self.source.listing_slugs().await?;
        for slug in &listings {
            urls.push(self.page(&self.site.listing_prefix, slug));
        }

        let locations = self.source.location_slugs().await?;
        for slug in &locations {
            urls.push(self.page(&self.site.location_prefix, slug));
        }

        let states = guides::guide_slugs();
        for slug in &states {
            urls.push(self.page(&self.site.state_prefix, slug));
            urls.push(self.page(&self.site.guide_prefix, slug));
        }

        let posts = discover_posts(&self.blog_dir)?;
        for post in &posts {
            urls.push(self.page(&self.site.blog_prefix, &post.slug));
        }

        for path in &self.site.static_pages {
            urls.push(format!("{}{}", self.base_url, path));
        }

        log::info!(
            "Enumerated {} URLs (listings: {}, locations: {}, state pages: {}, blog posts: {}, static: {})",
            urls.len(),
            listings.len(),
            locations.len(),
            states.len() * 2,
            posts.len(),
            self.site.static_pages.len()
        );

        Ok(urls.into_vec())
    }

    fn page(&self, prefix: &str, slug: &str) -> String {
        format!("{}{}/{}", self.base_url, prefix, slug.trim_matches('/'))
    }
}

#[async_trait]
impl<S: RecordSource> CandidateSource for UrlEnumerator<S> {
    async fn candidate_urls(&self) -> Result<Vec<String>> {
        self.enumerate().await
    }
}

/// Insertion-ordered URL list that drops exact repeats
#[derive(Default)]
struct OrderedUrls {
    seen: HashSet<String>,
    urls: Vec<String>,
}

impl OrderedUrls {
    fn push(&mut self, url: String) {
        if self.seen.insert(url.clone()) {
            self.urls.push(url);
        } else {
            log::debug!("Duplicate URL dropped: {}", url);
        }
    }

    fn len(&self) -> usize {
        self.urls.len()
    }

    fn into_vec(self) -> Vec<String> {
        self.urls
    }
}
