//! Embedded schema migrations.

use diesel::{Connection, PgConnection};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Failure applying migrations.
#[derive(Debug, thiserror::Error)]
pub enum MigrationError {
    /// No connection for the migration run.
    #[error("failed to connect for migrations: {0}")]
    Connect(String),
    /// A migration failed to apply.
    #[error("failed to apply migrations: {0}")]
    Apply(String),
    /// The blocking migration task panicked or was cancelled.
    #[error("migration task aborted: {0}")]
    Join(String),
}

/// Apply pending migrations on a blocking thread.
///
/// The harness needs a synchronous connection, so this opens a dedicated
/// `PgConnection` rather than borrowing one from the async pool.
pub async fn run_pending_migrations(database_url: &str) -> Result<usize, MigrationError> {
    let url = database_url.to_owned();
    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&url)
            .map_err(|err| MigrationError::Connect(err.to_string()))?;
        let applied = conn
            .run_pending_migrations(MIGRATIONS)
            .map_err(|err| MigrationError::Apply(err.to_string()))?;
        for version in &applied {
            info!(%version, "applied migration");
        }
        Ok(applied.len())
    })
    .await
    .map_err(|err| MigrationError::Join(err.to_string()))?
}
