//! PostgreSQL repository implementations.
//!
//! Owner-scoped updates and the view counter are single `UPDATE ... RETURNING`
//! statements, so the match and the mutation cannot be split by a concurrent
//! request.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect};
use uuid::Uuid;

use pressroom_core::domain::{Page, PageChanges, PageRequest, Post, PostPatch, User};
use pressroom_core::error::RepoError;
use pressroom_core::ports::{PageRepository, PostRepository, UserRepository};

use super::entity::page::{self, Entity as PageEntity, components_json};
use super::entity::post::{self, Entity as PostEntity, tags_json};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL page repository.
pub type PostgresPageRepository = PostgresBaseRepository<PageEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => match local.chars().next() {
            Some(first) if local.chars().count() > 1 => format!("{first}***@{domain}"),
            _ => format!("***@{domain}"),
        },
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        let result = UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let result = UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }
}

#[async_trait]
impl PageRepository for PostgresPageRepository {
    async fn update_owned(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PageChanges,
        at: DateTime<Utc>,
    ) -> Result<Option<Page>, RepoError> {
        let mut update = PageEntity::update_many()
            .col_expr(page::Column::UpdatedAt, Expr::value(at.fixed_offset()));

        if let Some(title) = changes.title {
            update = update.col_expr(page::Column::Title, Expr::value(title));
        }
        if let Some(layout) = changes.layout {
            update = update.col_expr(
                page::Column::Layout,
                Expr::value(serde_json::Value::Array(layout)),
            );
        }
        if let Some(components) = changes.components {
            update = update.col_expr(
                page::Column::Components,
                Expr::value(components_json(&components)),
            );
        }
        if let Some(is_published) = changes.is_published {
            update = update.col_expr(page::Column::IsPublished, Expr::value(is_published));
        }

        let updated = update
            .filter(page::Column::Id.eq(id))
            .filter(page::Column::CreatedBy.eq(owner))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(updated.into_iter().next().map(Into::into))
    }

    async fn delete_owned(&self, id: Uuid, owner: Uuid) -> Result<bool, RepoError> {
        let result = PageEntity::delete_many()
            .filter(page::Column::Id.eq(id))
            .filter(page::Column::CreatedBy.eq(owner))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn list_by_owner(&self, owner: Uuid) -> Result<Vec<Page>, RepoError> {
        let result = PageEntity::find()
            .filter(page::Column::CreatedBy.eq(owner))
            .order_by_desc(page::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Page>, RepoError> {
        let result = PageEntity::find()
            .filter(page::Column::Slug.eq(slug))
            .filter(page::Column::IsPublished.eq(true))
            .one(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.map(Into::into))
    }
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn update_owned(
        &self,
        id: Uuid,
        author: Uuid,
        patch: PostPatch,
        at: DateTime<Utc>,
    ) -> Result<Option<Post>, RepoError> {
        let mut update = PostEntity::update_many()
            .col_expr(post::Column::UpdatedAt, Expr::value(at.fixed_offset()));

        if let Some(title) = patch.title {
            update = update.col_expr(post::Column::Title, Expr::value(title));
        }
        if let Some(slug) = patch.slug {
            update = update.col_expr(post::Column::Slug, Expr::value(slug));
        }
        if let Some(content) = patch.content {
            update = update.col_expr(post::Column::Content, Expr::value(content));
        }
        if let Some(excerpt) = patch.excerpt {
            update = update.col_expr(post::Column::Excerpt, Expr::value(excerpt));
        }
        if let Some(category) = patch.category {
            update = update.col_expr(post::Column::Category, Expr::value(category));
        }
        if let Some(tags) = patch.tags {
            update = update.col_expr(post::Column::Tags, Expr::value(tags_json(tags)));
        }
        if let Some(featured_image) = patch.featured_image {
            update = update.col_expr(post::Column::FeaturedImage, Expr::value(featured_image));
        }
        if let Some(is_published) = patch.is_published {
            update = update.col_expr(post::Column::IsPublished, Expr::value(is_published));
        }

        let updated = update
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorId.eq(author))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(updated.into_iter().next().map(Into::into))
    }

    async fn delete_owned(&self, id: Uuid, author: Uuid) -> Result<bool, RepoError> {
        let result = PostEntity::delete_many()
            .filter(post::Column::Id.eq(id))
            .filter(post::Column::AuthorId.eq(author))
            .exec(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.rows_affected > 0)
    }

    async fn list_by_author(&self, author: Uuid) -> Result<Vec<Post>, RepoError> {
        let result = PostEntity::find()
            .filter(post::Column::AuthorId.eq(author))
            .order_by_desc(post::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(result.into_iter().map(Into::into).collect())
    }

    async fn list_published(&self, window: PageRequest) -> Result<(Vec<Post>, u64), RepoError> {
        let published = PostEntity::find().filter(post::Column::IsPublished.eq(true));

        let total = published
            .clone()
            .count(&self.db)
            .await
            .map_err(map_db_err)?;

        let posts = published
            .order_by_desc(post::Column::CreatedAt)
            .offset(window.offset())
            .limit(window.limit())
            .all(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok((posts.into_iter().map(Into::into).collect(), total))
    }

    async fn record_view(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let updated = PostEntity::update_many()
            .col_expr(post::Column::Views, Expr::col(post::Column::Views).add(1))
            .filter(post::Column::Slug.eq(slug))
            .filter(post::Column::IsPublished.eq(true))
            .exec_with_returning(&self.db)
            .await
            .map_err(map_db_err)?;

        Ok(updated.into_iter().next().map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::mask_email;

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jane@example.com"), "j***@example.com");
        assert_eq!(mask_email("j@example.com"), "***@example.com");
        assert_eq!(mask_email("not-an-email"), "***");
    }
}
