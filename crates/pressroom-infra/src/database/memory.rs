//! In-memory repositories - used when no database is configured and in tests.
//!
//! Every mutation runs under a single write-lock acquisition, so the
//! match-then-mutate steps (owner checks, slug uniqueness, view counting)
//! are atomic with respect to concurrent requests. Data is lost on restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use pressroom_core::domain::{Page, PageChanges, PageRequest, Post, PostPatch, User};
use pressroom_core::error::RepoError;
use pressroom_core::ports::{BaseRepository, PageRepository, PostRepository, UserRepository};

fn newest_first<T>(items: &mut [T], created_at: impl Fn(&T) -> DateTime<Utc>) {
    items.sort_by_key(|item| std::cmp::Reverse(created_at(item)));
}

/// In-memory user store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    store: RwLock<HashMap<Uuid, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<User, Uuid> for InMemoryUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, user: User) -> Result<User, RepoError> {
        let mut store = self.store.write().await;

        if store
            .values()
            .any(|u| u.email == user.email || u.username == user.username)
        {
            return Err(RepoError::Constraint(
                "username or email already registered".to_string(),
            ));
        }

        store.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        let store = self.store.read().await;
        Ok(store.values().find(|u| u.email == email).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        let store = self.store.read().await;
        Ok(ids.iter().filter_map(|id| store.get(id).cloned()).collect())
    }
}

/// In-memory page store.
#[derive(Default)]
pub struct InMemoryPageRepository {
    store: RwLock<HashMap<Uuid, Page>>,
}

impl InMemoryPageRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Page, Uuid> for InMemoryPageRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Page>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, page: Page) -> Result<Page, RepoError> {
        let mut store = self.store.write().await;

        if store.values().any(|p| p.slug == page.slug) {
            return Err(RepoError::Constraint(format!(
                "pages.slug '{}' already exists",
                page.slug
            )));
        }

        store.insert(page.id, page.clone());
        Ok(page)
    }
}

#[async_trait]
impl PageRepository for InMemoryPageRepository {
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PageChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Page>, RepoError> {
        let mut store = self.store.write().await;

        match store.get_mut(&id).filter(|p| p.created_by == owner) {
            Some(page) => {
                page.apply(changes, at);
                Ok(Some(page.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;

        if store.get(&id).is_some_and(|p| p.created_by == owner) {
            store.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Page>, RepoError> {
        let store = self.store.read().await;
        let mut pages: Vec<Page> = store
            .values()
            .filter(|p| p.created_by == owner)
            .cloned()
            .collect();
        newest_first(&mut pages, |p| p.created_at);
        Ok(pages)
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Page>, RepoError> {
        let store = self.store.read().await;
        Ok(store
            .values()
            .find(|p| p.slug == slug && p.is_published)
            .cloned())
    }
}

/// In-memory post store.
#[derive(Default)]
pub struct InMemoryPostRepository {
    store: RwLock<HashMap<Uuid, Post>>,
}

impl InMemoryPostRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseRepository<Post, Uuid> for InMemoryPostRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.store.read().await.get(&id).cloned())
    }

    async fn insert(&self, post: Post) -> Result<Post, RepoError> {
        let mut store = self.store.write().await;

        if store.values().any(|p| p.slug == post.slug) {
            return Err(RepoError::Constraint(format!(
                "posts.slug '{}' already exists",
                post.slug
            )));
        }

        store.insert(post.id, post.clone());
        Ok(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn update_owned(
        &self,
        id: Uuid,
        author: Uuid,
        patch: PostPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;

        if !store.get(&id).is_some_and(|p| p.author == author) {
            return Ok(None);
        }

        if let Some(slug) = &patch.slug {
            if store.values().any(|p| p.id != id && &p.slug == slug) {
                return Err(RepoError::Constraint(format!(
                    "posts.slug '{slug}' already exists"
                )));
            }
        }

        Ok(store.get_mut(&id).map(|post| {
            post.apply(patch, at);
            post.clone()
        }))
    }

    async fn delete_owned(&self, id: Uuid, author: Uuid) -> Result<bool, RepoError> {
        let mut store = self.store.write().await;

        if store.get(&id).is_some_and(|p| p.author == author) {
            store.remove(&id);
            return Ok(true);
        }
        Ok(false)
    }

    async fn list_by_author(&self, author: Uuid) -> Result<Vec<Post>, RepoError> {
        let store = self.store.read().await;
        let mut posts: Vec<Post> = store
            .values()
            .filter(|p| p.author == author)
            .cloned()
            .collect();
        newest_first(&mut posts, |p| p.created_at);
        Ok(posts)
    }

    async fn list_published(&self, window: PageRequest) -> Result<(Vec<Post>, u64), RepoError> {
        let store = self.store.read().await;
        let mut published: Vec<Post> = store.values().filter(|p| p.is_published).cloned().collect();
        newest_first(&mut published, |p| p.created_at);

        let total = published.len() as u64;
        let items = published
            .into_iter()
            .skip(window.offset() as usize)
            .take(window.limit() as usize)
            .collect();

        Ok((items, total))
    }

    async fn record_view(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let mut store = self.store.write().await;

        Ok(store
            .values_mut()
            .find(|p| p.slug == slug && p.is_published)
            .map(|post| {
                post.views += 1;
                post.clone()
            }))
    }
}
