//! Page service - ownership-checked CRUD over pages.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::{NewPage, Page, PageChanges, PageSummary};
use crate::error::{DomainError, RepoError};
use crate::ports::PageRepository;

const ENTITY: &str = "Page";

pub struct PageService {
    pages: Arc<dyn PageRepository>,
}

impl PageService {
    pub fn new(pages: Arc<dyn PageRepository>) -> Self {
        Self { pages }
    }

    /// Create an unpublished page owned by `owner`.
    pub async fn create(&self, owner: Uuid, input: NewPage) -> Result<Page, DomainError> {
        if input.title.trim().is_empty() {
            return Err(DomainError::validation("Title is required"));
        }
        let slug = input.slug.trim().to_string();
        if slug.is_empty() {
            return Err(DomainError::validation("Slug is required"));
        }

        let page = Page::new(owner, NewPage { slug, ..input });
        let slug = page.slug.clone();

        self.pages.insert(page).await.map_err(|e| match e {
            RepoError::Constraint(_) => {
                DomainError::Conflict(format!("Slug '{slug}' is already in use"))
            }
            other => other.into(),
        })
    }

    /// Replace the supplied fields of a page the caller owns.
    pub async fn update(
        &self,
        id: Uuid,
        owner: Uuid,
        changes: PageChanges,
    ) -> Result<Page, DomainError> {
        if changes.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(DomainError::validation("Title cannot be empty"));
        }

        self.pages
            .update_owned(id, owner, changes, Utc::now())
            .await?
            .ok_or(DomainError::not_found(ENTITY))
    }

    /// The caller's pages, newest first.
    pub async fn list_owned(&self, owner: Uuid) -> Result<Vec<PageSummary>, DomainError> {
        let pages = self.pages.list_by_owner(owner).await?;
        Ok(pages.into_iter().map(PageSummary::from).collect())
    }

    /// A published page by slug. Drafts are reported exactly like missing pages.
    pub async fn get_published(&self, slug: &str) -> Result<Page, DomainError> {
        self.pages
            .find_published_by_slug(slug)
            .await?
            .ok_or(DomainError::not_found(ENTITY))
    }

    pub async fn delete(&self, id: Uuid, owner: Uuid) -> Result<(), DomainError> {
        if self.pages.delete_owned(id, owner).await? {
            Ok(())
        } else {
            Err(DomainError::not_found(ENTITY))
        }
    }
}
