//! Application state - shared across all handlers.

use std::sync::Arc;

use quill_core::ports::{CategoryRepository, CommentRepository, PostRepository};
use quill_infra::database::{DatabaseConfig, DatabaseConnections};
use quill_infra::InMemoryStore;

#[cfg(feature = "postgres")]
use quill_infra::{PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository};

use crate::services::{CategoryService, CommentService, PostService};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostService,
    pub categories: CategoryService,
    pub comments: CommentService,
    pub db: Option<Arc<DatabaseConnections>>,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(db_config: Option<&DatabaseConfig>) -> Self {
        #[cfg(feature = "postgres")]
        let (db, post_repo, category_repo, comment_repo): (
            Option<Arc<DatabaseConnections>>,
            Arc<dyn PostRepository>,
            Arc<dyn CategoryRepository>,
            Arc<dyn CommentRepository>,
        ) = {
            if let Some(config) = db_config {
                match DatabaseConnections::init(config).await {
                    Ok(connections) => {
                        let conn = Arc::new(connections);
                        (
                            Some(conn.clone()),
                            Arc::new(PostgresPostRepository::new(conn.main.clone())),
                            Arc::new(PostgresCategoryRepository::new(conn.main.clone())),
                            Arc::new(PostgresCommentRepository::new(conn.main.clone())),
                        )
                    }
                    Err(e) => {
                        tracing::error!(
                            "Failed to connect to database: {}. Using in-memory fallback.",
                            e
                        );
                        Self::memory_backends()
                    }
                }
            } else {
                tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
                Self::memory_backends()
            }
        };

        #[cfg(not(feature = "postgres"))]
        let (db, post_repo, category_repo, comment_repo): (
            Option<Arc<DatabaseConnections>>,
            Arc<dyn PostRepository>,
            Arc<dyn CategoryRepository>,
            Arc<dyn CommentRepository>,
        ) = {
            let _ = db_config;
            tracing::info!("Running without postgres feature - using in-memory store");
            Self::memory_backends()
        };

        tracing::info!("Application state initialized");

        Self {
            posts: PostService::new(post_repo),
            categories: CategoryService::new(category_repo),
            comments: CommentService::new(comment_repo),
            db,
        }
    }

    /// One shared in-memory store behind all three repository ports, so
    /// cross-entity bookkeeping (comment counters, cascades) still works.
    fn memory_backends() -> (
        Option<Arc<DatabaseConnections>>,
        Arc<dyn PostRepository>,
        Arc<dyn CategoryRepository>,
        Arc<dyn CommentRepository>,
    ) {
        let store = Arc::new(InMemoryStore::new());
        (None, store.clone(), store.clone(), store)
    }

    /// Release held resources. Invoked by the host after the HTTP server
    /// has drained.
    pub async fn shutdown(&self) {
        if let Some(db) = &self.db {
            if let Err(e) = db.close().await {
                tracing::error!("Error closing database connections: {}", e);
            } else {
                tracing::info!("Database connections closed");
            }
        }
    }
}
