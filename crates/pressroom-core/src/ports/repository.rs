use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::{Page, PageChanges, PageRequest, Post, PostPatch, User};
use crate::error::RepoError;

/// Generic repository trait shared by every entity.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Insert a new entity. Unique-key violations surface as
    /// [`RepoError::Constraint`].
    async fn insert(&self, entity: T) -> Result<T, RepoError>;
}

/// User repository with domain-specific methods.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    /// Find a user by their email address.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;

    /// Fetch every user whose id is in `ids`. Missing ids are skipped.
    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError>;
}

/// Page repository.
///
/// Owner-scoped mutations match on `(id, created_by)` in a single atomic
/// step and report a miss as `None` / `false`.
#[async_trait]
pub trait PageRepository: BaseRepository<Page, Uuid> {
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PageChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Page>, RepoError>;

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, RepoError>;

    /// All pages of one owner, newest first.
    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Page>, RepoError>;

    /// The page holding `slug`, only if it is published.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Page>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    async fn update_owned(
        &self,
        id: Uuid,
        author: Uuid,
        patch: PostPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError>;

    async fn delete_owned(&self, id: Uuid, author: Uuid) -> Result<bool, RepoError>;

    /// All posts of one author regardless of state, newest first.
    async fn list_by_author(&self, author: Uuid) -> Result<Vec<Post>, RepoError>;

    /// One window of published posts, newest first, plus the total number
    /// of published posts.
    async fn list_published(&self, window: PageRequest) -> Result<(Vec<Post>, u64), RepoError>;

    /// Atomically add one view to the published post holding `slug` and
    /// return it after the increment.
    async fn record_view(&self, slug: &str) -> Result<Option<Post>, RepoError>;
}
