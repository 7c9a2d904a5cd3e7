//! The ranking engine: pure derivations from team/station/result snapshots.
//!
//! Nothing in here touches the database or mutates its inputs; the
//! surrounding service layer feeds it snapshots and a clock.

pub mod bonus;
pub mod live;
pub mod standings;
pub mod station_rank;

pub use bonus::bonus_for_rank;
pub use standings::{StationContribution, TeamStanding, build_standings, elapsed_seconds};
pub use station_rank::{RankedResult, rank_results};
