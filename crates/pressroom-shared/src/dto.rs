//! Data Transfer Objects - request/response types for the API.
//!
//! Field names are camelCase on the wire.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use pressroom_core::domain::{
    Component, NewPage, NewPost, Page, PageChanges, PageSummary, PostChanges, PostListing,
    PostSummary, PostView, User,
};

// ----------------------------------------------------------------------------
// Auth
// ----------------------------------------------------------------------------

/// Request to register a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Request to login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// A user's public information.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// Issued token plus the user it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub token_type: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserBody {
    pub user: UserResponse,
}

// ----------------------------------------------------------------------------
// Pages
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePageRequest {
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub layout: Vec<serde_json::Value>,
    #[serde(default)]
    pub components: Vec<Component>,
}

impl From<CreatePageRequest> for NewPage {
    fn from(req: CreatePageRequest) -> Self {
        Self {
            title: req.title,
            slug: req.slug,
            layout: req.layout,
            components: req.components,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePageRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub layout: Option<Vec<serde_json::Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<Component>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl From<UpdatePageRequest> for PageChanges {
    fn from(req: UpdatePageRequest) -> Self {
        Self {
            title: req.title,
            layout: req.layout,
            components: req.components,
            is_published: req.is_published,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBody {
    pub page: Page,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagesBody {
    pub pages: Vec<PageSummary>,
}

// ----------------------------------------------------------------------------
// Posts
// ----------------------------------------------------------------------------

/// Create payload. `tags` is a comma-separated string; a JSON array of
/// strings is accepted too.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "tags_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl From<CreatePostRequest> for NewPost {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            excerpt: req.excerpt,
            category: req.category,
            tags: req.tags,
            is_published: req.is_published,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(
        default,
        deserialize_with = "tags_field",
        skip_serializing_if = "Option::is_none"
    )]
    pub tags: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_published: Option<bool>,
}

impl From<UpdatePostRequest> for PostChanges {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            title: req.title,
            content: req.content,
            excerpt: req.excerpt,
            category: req.category,
            tags: req.tags,
            is_published: req.is_published,
        }
    }
}

/// `?page=&limit=` on the public post listing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListPostsQuery {
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostBody<P = PostView> {
    pub post: P,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostsBody {
    pub posts: Vec<PostSummary>,
}

/// One page of the public post listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListBody {
    pub posts: Vec<PostListing>,
    pub total: u64,
    pub pages: u64,
    pub current_page: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageBody {
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

fn tags_field<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Tags {
        Joined(String),
        List(Vec<String>),
    }

    Ok(Option::<Tags>::deserialize(deserializer)?.map(|tags| match tags {
        Tags::Joined(s) => s,
        Tags::List(items) => items.join(","),
    }))
}
