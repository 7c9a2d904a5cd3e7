use std::time::Duration;

use chrono::Utc;
use serde_json::json;
use tokio::time::MissedTickBehavior;

use crate::database::models::RankingGroup;
use crate::database::repositories::SettingsRepository;
use crate::events::{EventAction, EventBroadcaster};
use crate::services::RankingService;

/// One-second leaderboard ticker.
///
/// While at least one team is running, pushes freshly computed standings for
/// every ranking group to connected listeners, so live elapsed times advance
/// without clients polling. The event stream is open to anyone, so ranking
/// ticks stay silent until `publishResults` is set, same as the ranking
/// endpoint. Idle (no listeners or no running team) ticks do no work. Runs
/// until the owning task is aborted.
pub async fn run_ticker(
    ranking: RankingService,
    settings_repo: SettingsRepository,
    broadcaster: EventBroadcaster,
) {
    let mut interval = tokio::time::interval(Duration::from_secs(1));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        interval.tick().await;

        if broadcaster.receiver_count() == 0 {
            continue;
        }

        match settings_repo.get().await {
            Ok(settings) if settings.publish_results => {}
            Ok(_) => continue,
            Err(e) => {
                log::warn!("Ranking tick skipped, settings lookup failed: {}", e);
                continue;
            }
        }

        match ranking.any_team_running().await {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => {
                log::warn!("Ranking tick skipped, team lookup failed: {}", e);
                continue;
            }
        }

        let now = Utc::now();
        for group in RankingGroup::ALL {
            match ranking.standings(group, now).await {
                Ok(standings) => {
                    broadcaster.publish(
                        "ranking",
                        EventAction::Tick,
                        &json!({
                            "group": group,
                            "standings": standings,
                        }),
                    );
                }
                Err(e) => {
                    log::warn!("Failed to compute {} standings for tick: {}", group, e);
                }
            }
        }
    }
}
