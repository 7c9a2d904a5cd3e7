use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{Station, StationResult, Team};
use crate::ranking::bonus::bonus_for_rank;
use crate::ranking::station_rank::rank_results;

/// One team's contribution at one station. Rank 0 means the team has no
/// finalized result there and contributes nothing.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StationContribution {
    pub station_id: Uuid,
    pub station_name: String,
    pub rank: u32,
    pub time_seconds: i64,
    pub bonus_seconds: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamStanding {
    pub team_id: Uuid,
    pub team_number: i64,
    pub team_name: String,
    /// Raw race clock in seconds, before any adjustment.
    pub total_seconds: i64,
    pub penalty_seconds: i64,
    pub stations: Vec<StationContribution>,
    /// total + penalty - station time - station bonuses; the sort key.
    pub adjusted_seconds: i64,
}

/// Raw elapsed race time in whole seconds.
///
/// A finished team's clock is frozen at its finish; a running team's clock
/// advances against `now`; a team that never started contributes zero.
pub fn elapsed_seconds(team: &Team, now: DateTime<Utc>) -> i64 {
    match (team.started_at, team.finished_at) {
        (Some(started), Some(finished)) => (finished - started).num_seconds(),
        (Some(started), None) => (now - started).num_seconds(),
        _ => 0,
    }
}

/// Compute the standings for one ranking group.
///
/// `teams` must already be restricted to the group being displayed; every
/// result belonging to another group's team is ignored. The output is sorted
/// ascending by adjusted time, ties keeping the encounter order of `teams`.
/// Pure function over snapshots: recomputing on the same inputs yields the
/// same output.
pub fn build_standings(
    stations: &[Station],
    results: &[StationResult],
    teams: &[Team],
    now: DateTime<Utc>,
) -> Vec<TeamStanding> {
    let eligible: HashSet<Uuid> = teams.iter().map(|t| t.id).collect();

    // Rank each station's results once, then look contributions up per team.
    let mut contributions: HashMap<(Uuid, Uuid), (u32, i64)> = HashMap::new();
    for station in stations {
        let station_results: Vec<StationResult> = results
            .iter()
            .filter(|r| r.station_id == station.id)
            .cloned()
            .collect();

        for ranked in rank_results(station.sort_order, &station_results, &eligible) {
            let time = match ranked.result.checked_out_at {
                Some(out) => (out - ranked.result.checked_in_at).num_seconds(),
                None => 0,
            };
            contributions.insert((station.id, ranked.result.team_id), (ranked.rank, time));
        }
    }

    let mut standings: Vec<TeamStanding> = teams
        .iter()
        .map(|team| {
            let total_seconds = elapsed_seconds(team, now);
            let penalty_seconds = team.penalty_minutes * 60;

            let breakdown: Vec<StationContribution> = stations
                .iter()
                .map(|station| {
                    let (rank, time_seconds) = contributions
                        .get(&(station.id, team.id))
                        .copied()
                        .unwrap_or((0, 0));
                    StationContribution {
                        station_id: station.id,
                        station_name: station.name.clone(),
                        rank,
                        time_seconds,
                        bonus_seconds: bonus_for_rank(rank),
                    }
                })
                .collect();

            let station_time: i64 = breakdown.iter().map(|c| c.time_seconds).sum();
            let station_bonus: i64 = breakdown.iter().map(|c| c.bonus_seconds).sum();

            TeamStanding {
                team_id: team.id,
                team_number: team.number,
                team_name: team.name.clone(),
                total_seconds,
                penalty_seconds,
                stations: breakdown,
                adjusted_seconds: total_seconds + penalty_seconds - station_time - station_bonus,
            }
        })
        .collect();

    // Stable, so equal adjusted times stay in encounter order.
    standings.sort_by_key(|s| s.adjusted_seconds);
    standings
}
