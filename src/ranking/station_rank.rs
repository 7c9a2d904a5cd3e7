use std::cmp::Reverse;
use std::collections::HashSet;

use serde::Serialize;
use uuid::Uuid;

use crate::database::models::{SortOrder, StationResult};

/// A result annotated with its competition rank at the station.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankedResult {
    #[serde(flatten)]
    pub result: StationResult,
    pub rank: u32,
}

/// Rank a station's results within a ranking group.
///
/// Only results belonging to an eligible team and carrying a check-out
/// timestamp participate; a team still out on the course at this station is
/// not ranked at all, not ranked last. Ties on points share a rank and the
/// next distinct point total takes its 1-based position in the sorted
/// sequence (10, 10, 8 ranks as 1, 1, 3).
pub fn rank_results(
    order: SortOrder,
    results: &[StationResult],
    eligible_teams: &HashSet<Uuid>,
) -> Vec<RankedResult> {
    let mut finals: Vec<&StationResult> = results
        .iter()
        .filter(|r| eligible_teams.contains(&r.team_id))
        .filter(|r| r.is_final())
        .collect();

    // Stable sort, so ties keep their encounter order.
    match order {
        SortOrder::Asc => finals.sort_by_key(|r| r.points),
        SortOrder::Desc => finals.sort_by_key(|r| Reverse(r.points)),
    }

    let mut ranked: Vec<RankedResult> = Vec::with_capacity(finals.len());
    for (position, result) in finals.into_iter().enumerate() {
        let rank = match ranked.last() {
            Some(prev) if prev.result.points == result.points => prev.rank,
            _ => (position + 1) as u32,
        };
        ranked.push(RankedResult {
            result: result.clone(),
            rank,
        });
    }

    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn result(team_id: Uuid, points: i64, checked_out: bool) -> StationResult {
        let check_in = Utc.with_ymd_and_hms(2025, 6, 14, 10, 0, 0).unwrap();
        StationResult {
            station_id: Uuid::new_v4(),
            team_id,
            checked_in_at: check_in,
            checked_out_at: checked_out.then(|| check_in + Duration::minutes(5)),
            points,
            created_at: check_in,
            updated_at: check_in,
        }
    }

    fn eligible(results: &[StationResult]) -> HashSet<Uuid> {
        results.iter().map(|r| r.team_id).collect()
    }

    #[test]
    fn desc_ties_share_rank_without_compression() {
        let results: Vec<StationResult> = [10, 10, 8, 5]
            .iter()
            .map(|&p| result(Uuid::new_v4(), p, true))
            .collect();

        let ranked = rank_results(SortOrder::Desc, &results, &eligible(&results));
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(ranks, vec![1, 1, 3, 4]);
    }

    #[test]
    fn asc_orders_lowest_first() {
        let results: Vec<StationResult> = [9, 5, 5, 2]
            .iter()
            .map(|&p| result(Uuid::new_v4(), p, true))
            .collect();

        let ranked = rank_results(SortOrder::Asc, &results, &eligible(&results));
        let points: Vec<i64> = ranked.iter().map(|r| r.result.points).collect();
        let ranks: Vec<u32> = ranked.iter().map(|r| r.rank).collect();
        assert_eq!(points, vec![2, 5, 5, 9]);
        assert_eq!(ranks, vec![1, 2, 2, 4]);
    }

    #[test]
    fn missing_check_out_is_excluded_not_last() {
        let finished = result(Uuid::new_v4(), 3, true);
        let still_there = result(Uuid::new_v4(), 99, false);
        let results = vec![still_there.clone(), finished.clone()];

        let ranked = rank_results(SortOrder::Desc, &results, &eligible(&results));
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].result.team_id, finished.team_id);
        assert_eq!(ranked[0].rank, 1);
    }

    #[test]
    fn ineligible_teams_are_filtered_out() {
        let ours = result(Uuid::new_v4(), 5, true);
        let other_group = result(Uuid::new_v4(), 50, true);
        let results = vec![other_group, ours.clone()];

        let ranked = rank_results(
            SortOrder::Desc,
            &results,
            &HashSet::from([ours.team_id]),
        );
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].result.team_id, ours.team_id);
        assert_eq!(ranked[0].rank, 1);
    }

    #[test]
    fn empty_inputs_produce_empty_output() {
        assert!(rank_results(SortOrder::Desc, &[], &HashSet::new()).is_empty());

        let results = vec![result(Uuid::new_v4(), 1, true)];
        assert!(rank_results(SortOrder::Desc, &results, &HashSet::new()).is_empty());
    }
}
