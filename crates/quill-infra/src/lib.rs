//! # Quill Infrastructure
//!
//! Concrete implementations of the ports defined in `quill-core`.
//! This crate contains the SeaORM persistence layer and the in-memory
//! fallback repositories.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external dependencies, in-memory only
//! - `postgres` - PostgreSQL support via SeaORM

pub mod database;

pub use database::memory::InMemoryStore;
pub use database::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
pub use database::postgres::{
    PostgresCategoryRepository, PostgresCommentRepository, PostgresPostRepository,
};
