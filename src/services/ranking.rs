use anyhow::Result;
use chrono::{DateTime, Utc};

use crate::database::models::RankingGroup;
use crate::database::repositories::{ResultRepository, StationRepository, TeamRepository};
use crate::ranking::{TeamStanding, build_standings};

/// Loads fresh snapshots and runs the pure ranking engine over them.
#[derive(Clone)]
pub struct RankingService {
    team_repository: TeamRepository,
    station_repository: StationRepository,
    result_repository: ResultRepository,
}

impl RankingService {
    pub fn new(
        team_repository: TeamRepository,
        station_repository: StationRepository,
        result_repository: ResultRepository,
    ) -> Self {
        Self {
            team_repository,
            station_repository,
            result_repository,
        }
    }

    pub async fn standings(
        &self,
        group: RankingGroup,
        now: DateTime<Utc>,
    ) -> Result<Vec<TeamStanding>> {
        let teams = self.team_repository.list_by_group(group).await?;
        let stations = self.station_repository.list().await?;
        let results = self.result_repository.list().await?;

        Ok(build_standings(&stations, &results, &teams, now))
    }

    /// True while at least one team is out on the course.
    pub async fn any_team_running(&self) -> Result<bool> {
        let teams = self.team_repository.list().await?;
        Ok(teams.iter().any(|t| t.is_running()))
    }
}
