//! MySQL connection pool setup

use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::info;

use crate::InfrastructureError;

/// Create a MySQL connection pool from `DATABASE_URL`
///
/// Connection settings are tuned via `DATABASE_MAX_CONNECTIONS` and
/// `DATABASE_CONNECT_TIMEOUT_SECS`; both have working defaults. Fails at
/// startup when the database is unreachable.
pub async fn create_pool() -> Result<MySqlPool, InfrastructureError> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| InfrastructureError::Config("DATABASE_URL not set".to_string()))?;

    let max_connections = std::env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);
    let connect_timeout_secs = std::env::var("DATABASE_CONNECT_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(10);

    let pool = MySqlPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(Duration::from_secs(connect_timeout_secs))
        .connect(&url)
        .await
        .map_err(|e| {
            InfrastructureError::Config(format!("Failed to connect to database: {}", e))
        })?;

    info!(max_connections, "Database connection pool created");
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_creation_requires_database_url() {
        std::env::remove_var("DATABASE_URL");
        let result = create_pool().await;
        assert!(result.is_err());
    }
}
