//! PostgreSQL repository implementations over SeaORM.

mod categories;
mod comments;
mod posts;

pub use categories::PostgresCategoryRepository;
pub use comments::PostgresCommentRepository;
pub use posts::PostgresPostRepository;

use quill_core::error::RepoError;
use sea_orm::DbErr;

/// Escape LIKE wildcards so user-supplied search text matches literally.
pub(crate) fn escape_like(query: &str) -> String {
    query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Map a SeaORM error onto the repository error space. Unique-index
/// violations become constraint errors so callers can report conflicts.
pub(crate) fn map_db_err(err: DbErr) -> RepoError {
    let msg = err.to_string();
    if msg.contains("duplicate") || msg.contains("unique") {
        RepoError::Constraint(msg)
    } else {
        RepoError::Query(msg)
    }
}
