//! Database connection management and repository backends.

mod connections;
pub mod memory;

#[cfg(feature = "postgres")]
pub mod entity;

#[cfg(feature = "postgres")]
pub mod postgres;

pub use connections::{DatabaseConfig, DatabaseConnections};

#[cfg(feature = "postgres")]
#[cfg(test)]
mod tests;
