use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Team {
    pub id: Uuid,
    pub number: i64, // unique registration number, human-facing ordering
    pub name: String,
    pub members: Json<Vec<String>>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub ranking_group: RankingGroup,
    pub penalty_minutes: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Team {
    /// Started but not yet finished.
    pub fn is_running(&self) -> bool {
        self.started_at.is_some() && self.finished_at.is_none()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamInput {
    pub number: i64,
    pub name: String,
    #[serde(default)]
    pub members: Vec<String>,
    pub ranking_group: RankingGroup,
    #[serde(default)]
    pub penalty_minutes: i64,
}

/// The two cohorts teams compete in; each gets its own leaderboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingGroup {
    Open,
    Fun,
}

impl RankingGroup {
    pub const ALL: [RankingGroup; 2] = [RankingGroup::Open, RankingGroup::Fun];
}

impl std::fmt::Display for RankingGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingGroup::Open => write!(f, "open"),
            RankingGroup::Fun => write!(f, "fun"),
        }
    }
}

impl std::str::FromStr for RankingGroup {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "open" => Ok(RankingGroup::Open),
            "fun" => Ok(RankingGroup::Fun),
            _ => Err(format!("Invalid ranking group: {}", s)),
        }
    }
}

impl sqlx::Type<sqlx::Sqlite> for RankingGroup {
    fn type_info() -> sqlx::sqlite::SqliteTypeInfo {
        <String as sqlx::Type<sqlx::Sqlite>>::type_info()
    }
}

impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for RankingGroup {
    fn encode_by_ref(
        &self,
        buf: &mut Vec<sqlx::sqlite::SqliteArgumentValue<'q>>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<'q, sqlx::Sqlite>>::encode(self.to_string(), buf)
    }
}

impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for RankingGroup {
    fn decode(value: sqlx::sqlite::SqliteValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        s.parse::<RankingGroup>().map_err(|e| e.into())
    }
}
