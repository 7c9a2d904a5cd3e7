use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::database::models::{Station, StationInput};

#[derive(Clone)]
pub struct StationRepository {
    pool: SqlitePool,
}

impl StationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: StationInput, access_code: String) -> Result<Station> {
        let now = Utc::now();
        let station = sqlx::query_as::<_, Station>(
            r#"
            INSERT INTO
                stations (
                    id,
                    number,
                    name,
                    members,
                    access_code,
                    sort_order,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING
                id,
                number,
                name,
                members,
                access_code,
                sort_order,
                created_at,
                updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.number)
        .bind(input.name)
        .bind(Json(input.members))
        .bind(access_code)
        .bind(input.sort_order)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(station)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Station>> {
        let station = sqlx::query_as::<_, Station>(
            r#"
            SELECT
                id,
                number,
                name,
                members,
                access_code,
                sort_order,
                created_at,
                updated_at
            FROM
                stations
            WHERE
                id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(station)
    }

    pub async fn find_by_access_code(&self, access_code: &str) -> Result<Option<Station>> {
        let station = sqlx::query_as::<_, Station>(
            r#"
            SELECT
                id,
                number,
                name,
                members,
                access_code,
                sort_order,
                created_at,
                updated_at
            FROM
                stations
            WHERE
                access_code = ?
            "#,
        )
        .bind(access_code)
        .fetch_optional(&self.pool)
        .await?;

        Ok(station)
    }

    pub async fn list(&self) -> Result<Vec<Station>> {
        let stations = sqlx::query_as::<_, Station>(
            r#"
            SELECT
                id,
                number,
                name,
                members,
                access_code,
                sort_order,
                created_at,
                updated_at
            FROM
                stations
            ORDER BY
                number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stations)
    }

    pub async fn update(&self, id: Uuid, input: StationInput) -> Result<Option<Station>> {
        let now = Utc::now();
        let station = sqlx::query_as::<_, Station>(
            r#"
            UPDATE
                stations
            SET
                number = ?,
                name = ?,
                members = ?,
                sort_order = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                number,
                name,
                members,
                access_code,
                sort_order,
                created_at,
                updated_at
            "#,
        )
        .bind(input.number)
        .bind(input.name)
        .bind(Json(input.members))
        .bind(input.sort_order)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(station)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM stations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
