//! Database connection management.

#[cfg(feature = "postgres")]
use std::time::Duration;

#[cfg(feature = "postgres")]
use sea_orm::{ConnectOptions, Database, DbConn, DbErr};

/// Configuration for the primary database.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
}

/// Owns the connection pool for the primary store.
///
/// Constructed once by the composition root and handed to the
/// repositories; shutdown is explicit via [`DatabaseConnections::close`],
/// invoked by the host rather than by ambient signal handlers.
#[cfg(feature = "postgres")]
pub struct DatabaseConnections {
    /// Primary database connection pool.
    pub main: DbConn,
}

#[cfg(not(feature = "postgres"))]
pub struct DatabaseConnections;

#[cfg(not(feature = "postgres"))]
impl DatabaseConnections {
    pub async fn close(&self) -> Result<(), std::convert::Infallible> {
        Ok(())
    }
}

#[cfg(feature = "postgres")]
impl DatabaseConnections {
    /// Initialize the connection pool from configuration.
    pub async fn init(config: &DatabaseConfig) -> Result<Self, DbErr> {
        tracing::info!("Initializing database connection...");

        let opts = ConnectOptions::new(&config.url)
            .max_connections(config.max_connections)
            .min_connections(config.min_connections)
            .connect_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .sqlx_logging(true)
            .to_owned();

        let main = Database::connect(opts).await?;
        tracing::info!(pool = config.max_connections, "Database connected");

        Ok(Self { main })
    }

    /// Close the underlying pool.
    pub async fn close(&self) -> Result<(), DbErr> {
        self.main.close_by_ref().await
    }
}
