//! # Pressroom Infrastructure
//!
//! Concrete implementations of the ports defined in `pressroom-core`.
//!
//! ## Feature Flags
//!
//! - `postgres` (default) - PostgreSQL repositories via SeaORM
//! - `minimal` - No external dependencies, in-memory repositories only

pub mod auth;
pub mod database;
pub mod storage;

pub use auth::{Argon2PasswordService, JwtConfig, JwtTokenService};
pub use database::{
    DatabaseConfig, InMemoryPageRepository, InMemoryPostRepository, InMemoryUserRepository,
};
#[cfg(feature = "postgres")]
pub use database::{
    DatabaseConnections, PostgresPageRepository, PostgresPostRepository, PostgresUserRepository,
};
pub use storage::{LocalMediaStorage, UploadConfig};
