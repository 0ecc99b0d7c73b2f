//! SeaORM entities for the `users`, `pages` and `posts` tables.

pub mod page;
pub mod post;
pub mod user;
