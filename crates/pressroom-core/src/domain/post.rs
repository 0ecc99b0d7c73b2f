use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::Author;

pub const DEFAULT_CATEGORY: &str = "Uncategorized";
pub const EXCERPT_MAX_CHARS: usize = 200;

/// Post entity - a blog article with a view counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Uuid,
    pub featured_image: Option<String>,
    pub is_published: bool,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a post from already-resolved fields.
    pub fn new(author: Uuid, fields: PostFields) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: fields.title,
            slug: fields.slug,
            content: fields.content,
            excerpt: fields.excerpt,
            category: fields.category,
            tags: fields.tags,
            author,
            featured_image: fields.featured_image,
            is_published: fields.is_published,
            views: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply a resolved patch and stamp `updated_at`.
    pub fn apply(&mut self, patch: PostPatch, at: DateTime<Utc>) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(slug) = patch.slug {
            self.slug = slug;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(excerpt) = patch.excerpt {
            self.excerpt = excerpt;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
        if let Some(featured_image) = patch.featured_image {
            self.featured_image = Some(featured_image);
        }
        if let Some(is_published) = patch.is_published {
            self.is_published = is_published;
        }
        self.updated_at = at;
    }
}

/// Raw create input as submitted by the editor. `tags` is comma-separated.
#[derive(Debug, Clone, Default)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub is_published: Option<bool>,
}

/// Raw partial update as submitted by the editor.
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub content: Option<String>,
    pub excerpt: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub is_published: Option<bool>,
}

/// Fully resolved fields for a new post (slug derived, tags parsed).
#[derive(Debug, Clone)]
pub struct PostFields {
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub featured_image: Option<String>,
    pub is_published: bool,
}

/// Resolved partial update handed to the repository.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    /// `Some(None)` clears the excerpt.
    pub excerpt: Option<Option<String>>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
    pub featured_image: Option<String>,
    pub is_published: Option<bool>,
}

/// Owner dashboard projection, any publish state.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl From<Post> for PostSummary {
    fn from(post: Post) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            is_published: post.is_published,
            category: post.category,
            created_at: post.created_at,
        }
    }
}

/// Public listing projection of a published post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListing {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub excerpt: Option<String>,
    pub featured_image: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub author: Option<Author>,
}

impl PostListing {
    pub fn new(post: Post, author: Option<Author>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            excerpt: post.excerpt,
            featured_image: post.featured_image,
            category: post.category,
            tags: post.tags,
            created_at: post.created_at,
            author,
        }
    }
}

/// Full public view of a published post with the author narrowed to
/// [`Author`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub category: String,
    pub tags: Vec<String>,
    pub author: Option<Author>,
    pub featured_image: Option<String>,
    pub views: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PostView {
    pub fn new(post: Post, author: Option<Author>) -> Self {
        Self {
            id: post.id,
            title: post.title,
            slug: post.slug,
            content: post.content,
            excerpt: post.excerpt,
            category: post.category,
            tags: post.tags,
            author,
            featured_image: post.featured_image,
            views: post.views,
            created_at: post.created_at,
            updated_at: post.updated_at,
        }
    }
}
