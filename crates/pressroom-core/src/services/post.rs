//! Post service - slug derivation, publishing views and ownership-checked CRUD.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{
    Author, DEFAULT_CATEGORY, EXCERPT_MAX_CHARS, NewPost, PageRequest, Paginated, Post,
    PostChanges, PostFields, PostListing, PostPatch, PostSummary, PostView, parse_tags, slugify,
};
use crate::error::{DomainError, RepoError};
use crate::ports::{MediaStorage, PostRepository, UploadedFile, UserRepository};

const ENTITY: &str = "Post";

pub struct PostService {
    posts: Arc<dyn PostRepository>,
    users: Arc<dyn UserRepository>,
    media: Arc<dyn MediaStorage>,
}

impl PostService {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        users: Arc<dyn UserRepository>,
        media: Arc<dyn MediaStorage>,
    ) -> Self {
        Self {
            posts,
            users,
            media,
        }
    }

    /// Create a post. The slug is derived from the title and an attached
    /// file becomes the featured image.
    pub async fn create(
        &self,
        author: Uuid,
        input: NewPost,
        upload: Option<UploadedFile>,
    ) -> Result<Post, DomainError> {
        if input.title.trim().is_empty() {
            return Err(DomainError::validation("Title is required"));
        }
        if input.content.trim().is_empty() {
            return Err(DomainError::validation("Content is required"));
        }
        check_excerpt(input.excerpt.as_deref())?;

        let featured_image = self.store_upload(upload).await?;
        let stored = featured_image.clone();

        let fields = PostFields {
            slug: slugify(&input.title),
            title: input.title,
            content: input.content,
            excerpt: input.excerpt.filter(|e| !e.trim().is_empty()),
            category: normalize_category(input.category),
            tags: input.tags.as_deref().map(parse_tags).unwrap_or_default(),
            featured_image,
            is_published: input.is_published.unwrap_or(false),
        };
        let post = Post::new(author, fields);
        let slug = post.slug.clone();

        let result = self
            .posts
            .insert(post)
            .await
            .map_err(|e| conflict_on_slug(e, &slug));
        if result.is_err() {
            self.discard_upload(stored.as_deref()).await;
        }
        result
    }

    /// Update a post the caller authored. A new title re-derives the slug and
    /// an attached file replaces the featured image.
    pub async fn update(
        &self,
        id: Uuid,
        author: Uuid,
        changes: PostChanges,
        upload: Option<UploadedFile>,
    ) -> Result<Post, DomainError> {
        if changes.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DomainError::validation("Title cannot be empty"));
        }
        if changes.content.as_deref().is_some_and(|c| c.trim().is_empty()) {
            return Err(DomainError::validation("Content cannot be empty"));
        }
        check_excerpt(changes.excerpt.as_deref())?;

        let stored = self.store_upload(upload).await?;
        let patch = PostPatch {
            slug: changes.title.as_deref().map(slugify),
            title: changes.title,
            content: changes.content,
            excerpt: changes.excerpt.map(|e| Some(e).filter(|e| !e.trim().is_empty())),
            category: changes.category.map(|c| normalize_category(Some(c))),
            tags: changes.tags.as_deref().map(parse_tags),
            featured_image: stored.clone(),
            is_published: changes.is_published,
        };
        let slug = patch.slug.clone().unwrap_or_default();

        let result = self
            .posts
            .update_owned(id, author, patch, Utc::now())
            .await
            .map_err(|e| conflict_on_slug(e, &slug))
            .and_then(|post| post.ok_or(DomainError::not_found(ENTITY)));
        if result.is_err() {
            self.discard_upload(stored.as_deref()).await;
        }
        result
    }

    /// One window of published posts, newest first, with public author info.
    pub async fn list_published(
        &self,
        window: PageRequest,
    ) -> Result<Paginated<PostListing>, DomainError> {
        let (posts, total) = self.posts.list_published(window).await?;
        let authors = self.authors_of(&posts).await?;

        let items = posts
            .into_iter()
            .map(|post| {
                let author = authors.get(&post.author).cloned();
                PostListing::new(post, author)
            })
            .collect();

        Ok(Paginated::new(items, total, window))
    }

    /// A published post by slug. Every successful call counts one view.
    pub async fn get_published(&self, slug: &str) -> Result<PostView, DomainError> {
        let post = self
            .posts
            .record_view(slug)
            .await?
            .ok_or(DomainError::not_found(ENTITY))?;

        let author = self
            .users
            .find_by_id(post.author)
            .await?
            .map(|user| Author::from(&user));

        Ok(PostView::new(post, author))
    }

    /// The caller's posts in any state, newest first.
    pub async fn list_owned(&self, author: Uuid) -> Result<Vec<PostSummary>, DomainError> {
        let posts = self.posts.list_by_author(author).await?;
        Ok(posts.into_iter().map(PostSummary::from).collect())
    }

    pub async fn delete(&self, id: Uuid, author: Uuid) -> Result<(), DomainError> {
        if self.posts.delete_owned(id, author).await? {
            Ok(())
        } else {
            Err(DomainError::not_found(ENTITY))
        }
    }

    async fn store_upload(
        &self,
        upload: Option<UploadedFile>,
    ) -> Result<Option<String>, DomainError> {
        match upload {
            Some(file) => Ok(Some(self.media.store(file).await?)),
            None => Ok(None),
        }
    }

    /// Drop a file stored for a write that did not go through.
    async fn discard_upload(&self, path: Option<&str>) {
        let Some(path) = path else { return };
        if let Err(e) = self.media.remove(path).await {
            tracing::warn!(path, error = %e, "Failed to remove unused upload");
        }
    }

    async fn authors_of(&self, posts: &[Post]) -> Result<HashMap<Uuid, Author>, DomainError> {
        let mut ids: Vec<Uuid> = posts.iter().map(|p| p.author).collect();
        ids.sort_unstable();
        ids.dedup();

        if ids.is_empty() {
            return Ok(HashMap::new());
        }

        let users = self.users.find_many(&ids).await?;
        Ok(users
            .iter()
            .map(|user| (user.id, Author::from(user)))
            .collect())
    }
}

fn check_excerpt(excerpt: Option<&str>) -> Result<(), DomainError> {
    match excerpt {
        Some(e) if e.chars().count() > EXCERPT_MAX_CHARS => Err(DomainError::validation(
            format!("Excerpt cannot exceed {EXCERPT_MAX_CHARS} characters"),
        )),
        _ => Ok(()),
    }
}

fn normalize_category(category: Option<String>) -> String {
    category
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| DEFAULT_CATEGORY.to_string())
}

fn conflict_on_slug(err: RepoError, slug: &str) -> DomainError {
    match err {
        RepoError::Constraint(_) => {
            DomainError::Conflict(format!("A post with slug '{slug}' already exists"))
        }
        other => other.into(),
    }
}
