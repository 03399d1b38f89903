use std::future::Future;
use std::time::Duration;

use rand::Rng;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseBackend, DatabaseTransaction, DbErr,
    IsolationLevel, SqlErr, TransactionTrait,
};
use sea_orm_migration::MigratorTrait;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::migrations::Migrator;
use crate::state::DbConn;

/// Attempts made for a transaction that keeps hitting serialization failures
const MAX_TX_ATTEMPTS: usize = 5;

/// Base delay before a retry, multiplied by the attempt number
const RETRY_BACKOFF_MS: u64 = 20;

/// Create a new database connection and run migrations using config
pub async fn connect(config: &Config) -> Result<DbConn> {
    connect_with_url(&config.database.database_url).await
}

/// Create a new database connection with a specific URL and run migrations
pub async fn connect_with_url(database_url: &str) -> Result<DbConn> {
    tracing::info!("Connecting to database...");

    let mut opts = ConnectOptions::new(database_url);
    if database_url.contains(":memory:") {
        // Every pooled connection would get its own private in-memory database
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(10)
            .min_connections(1)
            .idle_timeout(Duration::from_secs(600));
    }
    opts.connect_timeout(Duration::from_secs(30))
        .sqlx_logging(false);

    let db = Database::connect(opts)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to connect to database: {}", e)))?;

    tracing::info!("Running database migrations...");
    Migrator::up(&db, None)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to run migrations: {}", e)))?;
    tracing::info!("Database migrations completed");

    Ok(db)
}

/// Begin a transaction for a mutating operation.
///
/// PostgreSQL runs it SERIALIZABLE so the invariant checks and the write
/// observe one snapshot. SQLite serialises writers and reports a losing
/// writer as busy; `with_retry` runs that transaction again.
pub async fn begin(db: &DbConn) -> Result<DatabaseTransaction> {
    let txn = match db.get_database_backend() {
        DatabaseBackend::Postgres => {
            db.begin_with_config(Some(IsolationLevel::Serializable), None)
                .await?
        }
        _ => db.begin().await?,
    };
    Ok(txn)
}

/// Run `op` again when the database aborted it with a serialization failure
/// or a busy SQLite lock, backing off a little longer each time.
///
/// `op` must open and commit its own transaction.
pub async fn with_retry<F, Fut, T>(mut op: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let mut attempt = 1;
    loop {
        match op().await {
            Err(AppError::Database(err))
                if is_serialization_failure(&err) && attempt < MAX_TX_ATTEMPTS =>
            {
                tracing::debug!(attempt, error = %err, "Transaction conflict, retrying");
                tokio::time::sleep(retry_delay(attempt)).await;
                attempt += 1;
            }
            other => return other,
        }
    }
}

fn retry_delay(attempt: usize) -> Duration {
    let jitter = rand::rng().random_range(0..RETRY_BACKOFF_MS);
    Duration::from_millis(RETRY_BACKOFF_MS * attempt as u64 + jitter)
}

/// SQLSTATE 40001 as reported by PostgreSQL, or SQLITE_BUSY (code 5 and
/// its extended codes) from a writer that lost the race for the lock
pub fn is_serialization_failure(err: &DbErr) -> bool {
    let msg = err.to_string();
    msg.contains("40001")
        || msg.contains("could not serialize")
        || msg.contains("database is locked")
        || msg.contains("(code: 5)")
        || msg.contains("(code: 517)")
}

/// Turn a unique-constraint violation into a `Conflict` carrying `message`
pub fn conflict_on_unique(err: DbErr, message: &str) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::Conflict(message.to_string()),
        _ => AppError::Database(err),
    }
}
