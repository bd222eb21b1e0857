//! # Quill Core
//!
//! The domain layer of the Quill blogging platform.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! entities, content utilities (slugs, read time, relative dates), the
//! comment-tree builder, and the repository ports.

pub mod content;
pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};
