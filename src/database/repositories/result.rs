use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::database::models::StationResult;

#[derive(Clone)]
pub struct ResultRepository {
    pool: SqlitePool,
}

impl ResultRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Atomic check-in. The composite primary key makes the insert the only
    /// arbiter: a second check-in for the same (station, team) pair hits the
    /// conflict clause and yields `None` instead of racing a prior existence
    /// check.
    pub async fn check_in(
        &self,
        station_id: Uuid,
        team_id: Uuid,
        at: DateTime<Utc>,
    ) -> Result<Option<StationResult>> {
        let result = sqlx::query_as::<_, StationResult>(
            r#"
            INSERT INTO
                results (
                    station_id,
                    team_id,
                    checked_in_at,
                    points,
                    created_at,
                    updated_at
                )
            VALUES
                (?, ?, ?, 0, ?, ?)
            ON CONFLICT (station_id, team_id) DO NOTHING
            RETURNING
                station_id,
                team_id,
                checked_in_at,
                checked_out_at,
                points,
                created_at,
                updated_at
            "#,
        )
        .bind(station_id)
        .bind(team_id)
        .bind(at)
        .bind(at)
        .bind(at)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn find(&self, station_id: Uuid, team_id: Uuid) -> Result<Option<StationResult>> {
        let result = sqlx::query_as::<_, StationResult>(
            r#"
            SELECT
                station_id,
                team_id,
                checked_in_at,
                checked_out_at,
                points,
                created_at,
                updated_at
            FROM
                results
            WHERE
                station_id = ?
                AND team_id = ?
            "#,
        )
        .bind(station_id)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn list(&self) -> Result<Vec<StationResult>> {
        let results = sqlx::query_as::<_, StationResult>(
            r#"
            SELECT
                station_id,
                team_id,
                checked_in_at,
                checked_out_at,
                points,
                created_at,
                updated_at
            FROM
                results
            ORDER BY
                checked_in_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    pub async fn list_by_station(&self, station_id: Uuid) -> Result<Vec<StationResult>> {
        let results = sqlx::query_as::<_, StationResult>(
            r#"
            SELECT
                station_id,
                team_id,
                checked_in_at,
                checked_out_at,
                points,
                created_at,
                updated_at
            FROM
                results
            WHERE
                station_id = ?
            ORDER BY
                checked_in_at
            "#,
        )
        .bind(station_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    pub async fn list_by_team(&self, team_id: Uuid) -> Result<Vec<StationResult>> {
        let results = sqlx::query_as::<_, StationResult>(
            r#"
            SELECT
                station_id,
                team_id,
                checked_in_at,
                checked_out_at,
                points,
                created_at,
                updated_at
            FROM
                results
            WHERE
                team_id = ?
            ORDER BY
                checked_in_at
            "#,
        )
        .bind(team_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(results)
    }

    pub async fn update(
        &self,
        station_id: Uuid,
        team_id: Uuid,
        points: Option<i64>,
        checked_out_at: Option<DateTime<Utc>>,
    ) -> Result<Option<StationResult>> {
        let result = sqlx::query_as::<_, StationResult>(
            r#"
            UPDATE
                results
            SET
                points = COALESCE(?, points),
                checked_out_at = COALESCE(?, checked_out_at),
                updated_at = ?
            WHERE
                station_id = ?
                AND team_id = ?
            RETURNING
                station_id,
                team_id,
                checked_in_at,
                checked_out_at,
                points,
                created_at,
                updated_at
            "#,
        )
        .bind(points)
        .bind(checked_out_at)
        .bind(Utc::now())
        .bind(station_id)
        .bind(team_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result)
    }

    pub async fn delete(&self, station_id: Uuid, team_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"
            DELETE FROM
                results
            WHERE
                station_id = ?
                AND team_id = ?
            "#,
        )
        .bind(station_id)
        .bind(team_id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
