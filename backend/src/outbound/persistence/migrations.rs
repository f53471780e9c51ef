//! Embedded migration runner.
//!
//! Migrations run on a synchronous connection inside `spawn_blocking`;
//! `diesel_migrations` has no async driver and startup is the only caller.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// SQL migrations compiled into the binary from `backend/migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Failures raised while applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// Connecting to the database failed.
    #[error("failed to connect for migrations: {message}")]
    Connection {
        /// Underlying connection error text.
        message: String,
    },
    /// Applying pending migrations failed.
    #[error("failed to run migrations: {message}")]
    Apply {
        /// Underlying migration error text.
        message: String,
    },
    /// The blocking task was cancelled or panicked.
    #[error("migration task failed: {message}")]
    Task {
        /// Join error text.
        message: String,
    },
}

/// Apply all pending migrations against the given database.
pub async fn run_migrations(database_url: &str) -> Result<(), MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url).map_err(|err| MigrationError::Connection {
            message: err.to_string(),
        })?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply {
                message: err.to_string(),
            })?;
        info!(count = applied.len(), "database migrations applied");
        Ok(())
    })
    .await
    .map_err(|err| MigrationError::Task {
        message: err.to_string(),
    })?
}
