use anyhow::Result;
use sqlx::SqlitePool;

use crate::database::models::Settings;

#[derive(Clone)]
pub struct SettingsRepository {
    pool: SqlitePool,
}

impl SettingsRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Fetch the settings row, creating it with defaults on first access.
    pub async fn get(&self) -> Result<Settings> {
        sqlx::query("INSERT OR IGNORE INTO settings (id, publish_results) VALUES (1, 0)")
            .execute(&self.pool)
            .await?;

        let settings = sqlx::query_as::<_, Settings>(
            r#"
            SELECT
                id,
                publish_results
            FROM
                settings
            WHERE
                id = 1
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }

    /// Create-or-update in one statement; the pinned id guarantees a single
    /// row no matter how often this runs.
    pub async fn upsert(&self, publish_results: bool) -> Result<Settings> {
        let settings = sqlx::query_as::<_, Settings>(
            r#"
            INSERT INTO
                settings (id, publish_results)
            VALUES
                (1, ?)
            ON CONFLICT (id) DO UPDATE
            SET
                publish_results = excluded.publish_results
            RETURNING
                id,
                publish_results
            "#,
        )
        .bind(publish_results)
        .fetch_one(&self.pool)
        .await?;

        Ok(settings)
    }
}
