//! Service layer - business logic between handlers and repositories.

mod categories;
mod comments;
mod posts;

pub use categories::CategoryService;
pub use comments::CommentService;
pub use posts::PostService;
