use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A team's visit to a station. (station_id, team_id) is the primary key, so
/// at most one result exists per pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StationResult {
    pub station_id: Uuid,
    pub team_id: Uuid,
    pub checked_in_at: DateTime<Utc>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub points: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl StationResult {
    /// A result only counts for the ranking once the team has checked out.
    pub fn is_final(&self) -> bool {
        self.checked_out_at.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckInInput {
    pub station_id: Uuid,
    pub team_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultUpdateInput {
    pub points: Option<i64>,
    pub checked_out_at: Option<DateTime<Utc>>,
}
