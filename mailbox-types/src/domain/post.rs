//! Blog post catalog.
//!
//! Posts come from a manifest generated at build time. The catalog is loaded
//! once and is read-only afterwards: no file-system or network access happens
//! on lookup.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Post author metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Author {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    pub bio: String,
}

/// A single author or a list of co-authors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum Authors {
    One(Author),
    Many(Vec<Author>),
}

/// Frontmatter metadata of a post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostFrontmatter {
    #[schema(example = "Why disposable inboxes matter")]
    pub title: String,
    /// ISO 8601 date string
    #[schema(example = "2023-10-26T00:00:00.000Z")]
    pub date: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Authors>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
}

impl PostFrontmatter {
    /// Publication time; accepts RFC 3339 timestamps and bare `YYYY-MM-DD` dates.
    pub fn published_at(&self) -> Option<DateTime<Utc>> {
        if let Ok(dt) = DateTime::parse_from_rfc3339(&self.date) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|naive| naive.and_utc())
    }
}

/// Post metadata without its content, for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BlogPost {
    #[schema(example = "why-disposable-inboxes")]
    pub slug: String,
    #[serde(flatten)]
    pub frontmatter: PostFrontmatter,
}

/// A manifest record: metadata plus markdown content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FullBlogPost {
    #[serde(flatten)]
    pub meta: BlogPost,
    pub content: String,
}

/// A single post split into frontmatter and content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PostDetail {
    pub data: PostFrontmatter,
    pub content: String,
}

/// Immutable, newest-first list of posts.
#[derive(Debug, Clone, Default)]
pub struct PostCatalog {
    posts: Vec<FullBlogPost>,
}

impl PostCatalog {
    /// Builds a catalog, ordering posts by date descending.
    ///
    /// Manifests are expected to be pre-sorted; the stable sort keeps their
    /// order for equal dates. Undated posts go last.
    pub fn new(mut posts: Vec<FullBlogPost>) -> Self {
        posts.sort_by_key(|p| std::cmp::Reverse(p.meta.frontmatter.published_at()));
        Self { posts }
    }

    /// Parses a JSON manifest (an array of post records).
    pub fn from_json(manifest: &str) -> Result<Self, serde_json::Error> {
        let posts: Vec<FullBlogPost> = serde_json::from_str(manifest)?;
        Ok(Self::new(posts))
    }

    /// All posts without their content.
    pub fn list(&self) -> Vec<BlogPost> {
        self.posts.iter().map(|p| p.meta.clone()).collect()
    }

    pub fn slugs(&self) -> Vec<&str> {
        self.posts.iter().map(|p| p.meta.slug.as_str()).collect()
    }

    pub fn by_slug(&self, slug: &str) -> Option<PostDetail> {
        self.posts
            .iter()
            .find(|p| p.meta.slug == slug)
            .map(|p| PostDetail {
                data: p.meta.frontmatter.clone(),
                content: p.content.clone(),
            })
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}
