//! SQLite newsletter store implementation.

use chrono::Utc;

use wellspring_core::newsletter::NewsletterStore;
use wellspring_types::error::RepositoryError;
use wellspring_types::newsletter::NewsletterSignup;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `NewsletterStore`.
#[derive(Clone)]
pub struct SqliteNewsletterStore {
    pool: DatabasePool,
    table: String,
}

impl SqliteNewsletterStore {
    pub fn new(pool: DatabasePool, table: String) -> Self {
        Self { pool, table }
    }
}

impl NewsletterStore for SqliteNewsletterStore {
    async fn store_signup(&self, signup: &NewsletterSignup) -> Result<(), RepositoryError> {
        let sql = format!(
            r#"INSERT INTO {table} (email, source, metadata, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)
               ON CONFLICT(email) DO UPDATE SET
                   source = excluded.source,
                   metadata = excluded.metadata,
                   updated_at = excluded.updated_at"#,
            table = self.table
        );

        let metadata = serde_json::to_string(&signup.metadata)
            .map_err(|e| RepositoryError::Query(format!("invalid metadata: {e}")))?;
        let now = Utc::now().to_rfc3339();

        sqlx::query(&sql)
            .bind(&signup.email)
            .bind(&signup.source)
            .bind(metadata)
            .bind(&now)
            .bind(&now)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    async fn test_store() -> (tempfile::TempDir, SqliteNewsletterStore) {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("test.db");
        let url = format!("sqlite://{}?mode=rwc", db_path.display());
        let pool = DatabasePool::new(&url).await.unwrap();
        let store = SqliteNewsletterStore::new(pool, "newsletter_signups".to_string());
        (dir, store)
    }

    #[tokio::test]
    async fn test_signup_upsert_by_email() {
        let (_dir, store) = test_store().await;

        let mut signup = NewsletterSignup {
            email: "user@example.com".to_string(),
            source: "footer".to_string(),
            metadata: serde_json::Value::Null,
        };
        store.store_signup(&signup).await.unwrap();

        signup.source = "landing-page".to_string();
        store.store_signup(&signup).await.unwrap();

        let rows = sqlx::query("SELECT source FROM newsletter_signups WHERE email = ?")
            .bind("user@example.com")
            .fetch_all(&store.pool.reader)
            .await
            .unwrap();
        assert_eq!(rows.len(), 1, "duplicate signup rows");
        let source: String = rows[0].try_get("source").unwrap();
        assert_eq!(source, "landing-page");
    }
}
