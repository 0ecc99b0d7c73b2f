//! Domain entities - the core business objects.

mod component;
mod page;
mod pagination;
mod post;
mod slug;
mod user;

pub use component::{
    Component, ComponentKind, ComponentType, Position, Size, StyleMap, StyleProperty,
    components_from_json,
};
pub use page::{NewPage, Page, PageChanges, PageSummary};
pub use pagination::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, PageRequest, Paginated};
pub use post::{
    DEFAULT_CATEGORY, EXCERPT_MAX_CHARS, NewPost, Post, PostChanges, PostFields, PostListing,
    PostPatch, PostSummary, PostView,
};
pub use slug::{default_page_slug, parse_tags, slugify};
pub use user::{Author, User};
