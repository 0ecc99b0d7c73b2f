//! Application state - shared across all handlers.

use std::sync::Arc;

use pressroom_core::ports::{MediaStorage, PageRepository, PostRepository, UserRepository};
use pressroom_core::{PageService, PostService};
use pressroom_infra::{
    InMemoryPageRepository, InMemoryPostRepository, InMemoryUserRepository, LocalMediaStorage,
    UploadConfig,
};

#[cfg(feature = "postgres")]
use pressroom_infra::{
    DatabaseConnections, PostgresPageRepository, PostgresPostRepository, PostgresUserRepository,
};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub pages: Arc<PageService>,
    pub posts: Arc<PostService>,
    /// Largest accepted featured image, checked while streaming multipart.
    pub upload_max_bytes: usize,
}

struct Repositories {
    users: Arc<dyn UserRepository>,
    pages: Arc<dyn PageRepository>,
    posts: Arc<dyn PostRepository>,
}

impl Repositories {
    fn in_memory() -> Self {
        Self {
            users: Arc::new(InMemoryUserRepository::new()),
            pages: Arc::new(InMemoryPageRepository::new()),
            posts: Arc::new(InMemoryPostRepository::new()),
        }
    }
}

impl AppState {
    /// Build the state on PostgreSQL when configured and reachable, otherwise
    /// on in-memory repositories.
    pub async fn new(config: &AppConfig) -> Self {
        #[cfg(feature = "postgres")]
        let repos = match &config.database {
            Some(db_config) => match DatabaseConnections::init(db_config).await {
                Ok(connections) => {
                    let db = connections.main;
                    Repositories {
                        users: Arc::new(PostgresUserRepository::new(db.clone())),
                        pages: Arc::new(PostgresPageRepository::new(db.clone())),
                        posts: Arc::new(PostgresPostRepository::new(db)),
                    }
                }
                Err(e) => {
                    tracing::error!(
                        error = %e,
                        "Failed to connect to database. Using in-memory fallback."
                    );
                    Repositories::in_memory()
                }
            },
            None => {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Repositories::in_memory()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let repos = {
            tracing::info!("Running without postgres feature - using in-memory repositories");
            Repositories::in_memory()
        };

        let state = Self::assemble(repos, &config.upload);
        tracing::info!("Application state initialized");
        state
    }

    /// Fresh in-memory state storing uploads as `upload` says.
    pub fn in_memory(upload: &UploadConfig) -> Self {
        Self::assemble(Repositories::in_memory(), upload)
    }

    fn assemble(repos: Repositories, upload: &UploadConfig) -> Self {
        let media: Arc<dyn MediaStorage> = Arc::new(LocalMediaStorage::new(upload.clone()));

        Self {
            pages: Arc::new(PageService::new(repos.pages)),
            posts: Arc::new(PostService::new(
                repos.posts,
                repos.users.clone(),
                media,
            )),
            users: repos.users,
            upload_max_bytes: upload.max_bytes,
        }
    }
}
