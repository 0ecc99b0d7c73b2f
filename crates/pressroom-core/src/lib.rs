//! # Pressroom Core
//!
//! The domain layer of the Pressroom CMS.
//! Entities, ownership-checked services and the ports they talk through.
//! No infrastructure dependencies live here.

pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use error::DomainError;
pub use services::{PageService, PostService};
