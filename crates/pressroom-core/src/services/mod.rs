//! Application services - the ownership and slug rules on top of the ports.

mod page;
mod post;

pub use page::PageService;
pub use post::PostService;
