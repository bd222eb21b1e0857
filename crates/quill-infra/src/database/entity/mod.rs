//! SeaORM entities mirroring the blog schema.

pub mod category;
pub mod comment;
pub mod post;
pub mod post_category;
