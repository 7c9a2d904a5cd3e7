use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::database::models::{RankingGroup, Team, TeamInput};

#[derive(Clone)]
pub struct TeamRepository {
    pool: SqlitePool,
}

impl TeamRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, input: TeamInput) -> Result<Team> {
        let now = Utc::now();
        let team = sqlx::query_as::<_, Team>(
            r#"
            INSERT INTO
                teams (
                    id,
                    number,
                    name,
                    members,
                    ranking_group,
                    penalty_minutes,
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
                started_at,
                finished_at,
                ranking_group,
                penalty_minutes,
                created_at,
                updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(input.number)
        .bind(input.name)
        .bind(Json(input.members))
        .bind(input.ranking_group)
        .bind(input.penalty_minutes)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(team)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            SELECT
                id,
                number,
                name,
                members,
                started_at,
                finished_at,
                ranking_group,
                penalty_minutes,
                created_at,
                updated_at
            FROM
                teams
            WHERE
                id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    pub async fn list(&self) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT
                id,
                number,
                name,
                members,
                started_at,
                finished_at,
                ranking_group,
                penalty_minutes,
                created_at,
                updated_at
            FROM
                teams
            ORDER BY
                number
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    pub async fn list_by_group(&self, group: RankingGroup) -> Result<Vec<Team>> {
        let teams = sqlx::query_as::<_, Team>(
            r#"
            SELECT
                id,
                number,
                name,
                members,
                started_at,
                finished_at,
                ranking_group,
                penalty_minutes,
                created_at,
                updated_at
            FROM
                teams
            WHERE
                ranking_group = ?
            ORDER BY
                number
            "#,
        )
        .bind(group)
        .fetch_all(&self.pool)
        .await?;

        Ok(teams)
    }

    pub async fn update(&self, id: Uuid, input: TeamInput) -> Result<Option<Team>> {
        let now = Utc::now();
        let team = sqlx::query_as::<_, Team>(
            r#"
            UPDATE
                teams
            SET
                number = ?,
                name = ?,
                members = ?,
                ranking_group = ?,
                penalty_minutes = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                number,
                name,
                members,
                started_at,
                finished_at,
                ranking_group,
                penalty_minutes,
                created_at,
                updated_at
            "#,
        )
        .bind(input.number)
        .bind(input.name)
        .bind(Json(input.members))
        .bind(input.ranking_group)
        .bind(input.penalty_minutes)
        .bind(now)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    pub async fn set_started(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            UPDATE
                teams
            SET
                started_at = ?,
                updated_at = ?
            WHERE
                id = ?
            RETURNING
                id,
                number,
                name,
                members,
                started_at,
                finished_at,
                ranking_group,
                penalty_minutes,
                created_at,
                updated_at
            "#,
        )
        .bind(at)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    /// Check-out of the race; only teams that already started can finish.
    pub async fn set_finished(&self, id: Uuid, at: DateTime<Utc>) -> Result<Option<Team>> {
        let team = sqlx::query_as::<_, Team>(
            r#"
            UPDATE
                teams
            SET
                finished_at = ?,
                updated_at = ?
            WHERE
                id = ?
                AND started_at IS NOT NULL
            RETURNING
                id,
                number,
                name,
                members,
                started_at,
                finished_at,
                ranking_group,
                penalty_minutes,
                created_at,
                updated_at
            "#,
        )
        .bind(at)
        .bind(Utc::now())
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(team)
    }

    pub async fn delete(&self, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM teams WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
