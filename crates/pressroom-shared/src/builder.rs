//! Page builder state - the component list editor behind the visual builder.
//!
//! Pure state transitions with no UI toolkit attached. A front end drives it
//! through [`PageBuilder::add`], [`PageBuilder::update`],
//! [`PageBuilder::remove`] and [`PageBuilder::reorder`], then turns the
//! result into an API request with [`PageBuilder::save`].

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use pressroom_core::domain::{
    Component, ComponentKind, ComponentType, Page, Position, Size, StyleMap, default_page_slug,
};

use crate::dto::{CreatePageRequest, UpdatePageRequest};

/// Default body of a freshly added text component.
pub const TEXT_PLACEHOLDER: &str = "<p>Enter your text here...</p>";

/// Vertical offset between stacked components on add.
const ROW_HEIGHT: f64 = 100.0;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    #[error("Please enter a page title")]
    MissingTitle,
}

/// Fields to replace on an existing component. `None` leaves a field as is.
#[derive(Debug, Clone, Default)]
pub struct ComponentPatch {
    pub content: Option<String>,
    pub position: Option<Position>,
    pub size: Option<Size>,
    pub styles: Option<StyleMap>,
}

/// Request produced by [`PageBuilder::save`].
#[derive(Debug, Clone)]
pub enum SaveRequest {
    Create(CreatePageRequest),
    Update {
        id: Uuid,
        request: UpdatePageRequest,
    },
}

/// Editable page state.
#[derive(Debug, Clone, Default)]
pub struct PageBuilder {
    page_id: Option<Uuid>,
    title: String,
    slug: String,
    is_published: bool,
    components: Vec<Component>,
    sequence: u64,
}

impl PageBuilder {
    /// Empty builder for a new page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder seeded from a stored page, saving as an update.
    pub fn load(page: &Page) -> Self {
        Self {
            page_id: Some(page.id),
            title: page.title.clone(),
            slug: page.slug.clone(),
            is_published: page.is_published,
            components: page.components.clone(),
            sequence: 0,
        }
    }

    pub fn page_id(&self) -> Option<Uuid> {
        self.page_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn slug(&self) -> &str {
        &self.slug
    }

    pub fn is_published(&self) -> bool {
        self.is_published
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_slug(&mut self, slug: impl Into<String>) {
        self.slug = slug.into();
    }

    pub fn set_published(&mut self, is_published: bool) {
        self.is_published = is_published;
    }

    /// Append a new component of `component_type` and return its id.
    pub fn add(&mut self, component_type: ComponentType) -> String {
        let content = match component_type {
            ComponentType::Text => TEXT_PLACEHOLDER.to_string(),
            _ => String::new(),
        };
        let id = self.next_id();
        let y = self.components.len() as f64 * ROW_HEIGHT;

        self.components.push(
            Component::new(id.clone(), ComponentKind::new(component_type, content))
                .with_position(0.0, y),
        );
        id
    }

    /// Apply `patch` to the component with `id`. Unknown ids are ignored.
    pub fn update(&mut self, id: &str, patch: ComponentPatch) {
        let Some(component) = self.components.iter_mut().find(|c| c.id == id) else {
            return;
        };

        if let Some(content) = patch.content {
            component.kind.set_content(content);
        }
        if let Some(position) = patch.position {
            component.position = position;
        }
        if let Some(size) = patch.size {
            component.size = size;
        }
        if let Some(styles) = patch.styles {
            component.styles = styles;
        }
    }

    pub fn remove(&mut self, id: &str) {
        self.components.retain(|c| c.id != id);
    }

    /// Move the component `from_id` to the slot currently held by `to_id`.
    pub fn reorder(&mut self, from_id: &str, to_id: &str) {
        if from_id == to_id {
            return;
        }
        let from = self.components.iter().position(|c| c.id == from_id);
        let to = self.components.iter().position(|c| c.id == to_id);

        if let (Some(from), Some(to)) = (from, to) {
            self.components = move_item(std::mem::take(&mut self.components), from, to);
        }
    }

    /// Validate the settings and build the API request for this page.
    ///
    /// A blank slug is filled in from the title. On error nothing changes.
    pub fn save(&mut self) -> Result<SaveRequest, BuilderError> {
        if self.title.trim().is_empty() {
            return Err(BuilderError::MissingTitle);
        }
        if self.slug.trim().is_empty() {
            self.slug = default_page_slug(&self.title);
        }

        Ok(match self.page_id {
            Some(id) => SaveRequest::Update {
                id,
                request: UpdatePageRequest {
                    title: Some(self.title.clone()),
                    layout: None,
                    components: Some(self.components.clone()),
                    is_published: Some(self.is_published),
                },
            },
            None => SaveRequest::Create(CreatePageRequest {
                title: self.title.clone(),
                slug: self.slug.clone(),
                layout: Vec::new(),
                components: self.components.clone(),
            }),
        })
    }

    /// Record the id the server assigned on create, so later saves update.
    pub fn mark_saved(&mut self, page_id: Uuid) {
        self.page_id = Some(page_id);
    }

    fn next_id(&mut self) -> String {
        self.sequence += 1;
        format!("comp-{}-{}", Utc::now().timestamp_millis(), self.sequence)
    }
}

/// Move the element at `from` to index `to`, shifting the ones in between.
/// Out-of-range indices return the sequence unchanged.
pub fn move_item<T>(mut items: Vec<T>, from: usize, to: usize) -> Vec<T> {
    if from >= items.len() || to >= items.len() || from == to {
        return items;
    }
    let item = items.remove(from);
    items.insert(to, item);
    items
}
