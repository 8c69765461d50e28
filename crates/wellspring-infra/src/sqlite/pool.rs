//! SQLite connection handling for the chat stores.
//!
//! SQLite serializes writers, so `DatabasePool` keeps one writer
//! connection for all mutations and a separate pool of read-only
//! connections for history and summary lookups. Constructed once at
//! startup and cloned into every consumer.

use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};

/// Concurrent SELECTs the service issues per request are shallow; a
/// small reader pool is plenty.
const READER_CONNECTIONS: u32 = 8;

/// How long a connection waits on a locked database before erroring.
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Split read/write pool for a single SQLite database.
#[derive(Clone)]
pub struct DatabasePool {
    /// Read-only pool for SELECT queries.
    pub reader: SqlitePool,
    /// Single-connection pool; all writes go through here.
    pub writer: SqlitePool,
}

impl DatabasePool {
    /// Open the database in WAL mode and run pending migrations.
    ///
    /// Migrations run on the writer before the reader pool opens, so
    /// readers never observe a half-migrated schema.
    pub async fn new(database_url: &str) -> Result<Self, sqlx::Error> {
        let opts = SqliteConnectOptions::from_str(database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT)
            .create_if_missing(true);

        let writer = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(opts.clone())
            .await?;
        sqlx::migrate!("../../migrations").run(&writer).await?;

        let reader = SqlitePoolOptions::new()
            .max_connections(READER_CONNECTIONS)
            .connect_with(opts.read_only(true))
            .await?;

        Ok(Self { reader, writer })
    }
}
