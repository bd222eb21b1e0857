//! Domain entities - the core business objects.

mod category;
mod comment;
mod comment_tree;
mod post;

pub use category::Category;
pub use comment::Comment;
pub use comment_tree::{CommentThread, build_tree};
pub use post::{Post, PostWithCategories};
