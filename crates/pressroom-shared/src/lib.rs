//! # Pressroom Shared
//!
//! Types and client-side logic shared between the API server and its clients:
//! request/response DTOs, the page builder state machine, the HTML renderer
//! and the session context.
//!
//! ## Feature Flags
//!
//! - `client` - typed HTTP client built on `reqwest`

pub mod builder;
pub mod dto;
pub mod render;
pub mod response;
pub mod session;

#[cfg(feature = "client")]
pub mod client;

pub use builder::{BuilderError, ComponentPatch, PageBuilder, SaveRequest, move_item};
pub use response::{ApiResponse, ErrorResponse};
pub use session::Session;
