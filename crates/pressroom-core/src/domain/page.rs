use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::component::Component;

/// Page entity - a component-assembled document addressable by a unique slug.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    /// Opaque layout descriptors, stored as submitted.
    pub layout: Vec<serde_json::Value>,
    pub components: Vec<Component>,
    pub created_by: Uuid,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Page {
    /// Create a new unpublished page owned by `created_by`.
    pub fn new(created_by: Uuid, input: NewPage) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title: input.title,
            slug: input.slug,
            layout: input.layout,
            components: input.components,
            created_by,
            is_published: false,
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply the supplied fields and stamp `updated_at`.
    pub fn apply(&mut self, changes: PageChanges, at: DateTime<Utc>) {
        if let Some(title) = changes.title {
            self.title = title;
        }
        if let Some(layout) = changes.layout {
            self.layout = layout;
        }
        if let Some(components) = changes.components {
            self.components = components;
        }
        if let Some(is_published) = changes.is_published {
            self.is_published = is_published;
        }
        self.updated_at = at;
    }
}

/// Input for creating a page.
#[derive(Debug, Clone, Default)]
pub struct NewPage {
    pub title: String,
    pub slug: String,
    pub layout: Vec<serde_json::Value>,
    pub components: Vec<Component>,
}

/// Partial page update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default)]
pub struct PageChanges {
    pub title: Option<String>,
    pub layout: Option<Vec<serde_json::Value>>,
    pub components: Option<Vec<Component>>,
    pub is_published: Option<bool>,
}

/// Listing projection for the owner's dashboard.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Page> for PageSummary {
    fn from(page: Page) -> Self {
        Self {
            id: page.id,
            title: page.title,
            slug: page.slug,
            is_published: page.is_published,
            created_at: page.created_at,
        }
    }
}
