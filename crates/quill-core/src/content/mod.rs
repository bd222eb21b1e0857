//! Pure content utilities: slugs, read-time estimation, relative dates.

mod dates;
mod read_time;
mod slug;

pub use dates::{format_comment_timestamp, format_relative_date};
pub use read_time::calculate_read_time;
pub use slug::{ensure_unique_slug, generate_slug};
