use actix_web::{HttpResponse, web};
use chrono::Utc;
use serde::Deserialize;

use crate::auth::Claims;
use crate::database::models::RankingGroup;
use crate::database::repositories::SettingsRepository;
use crate::error::AppError;
use crate::handlers::shared::ApiResponse;
use crate::services::RankingService;

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    pub group: RankingGroup,
}

/// Current standings for a ranking group. Non-admin viewers only see them
/// once the admin has flipped `publishResults`.
pub async fn get_ranking(
    claims: Option<Claims>,
    ranking_service: web::Data<RankingService>,
    settings_repo: web::Data<SettingsRepository>,
    query: web::Query<RankingQuery>,
) -> Result<HttpResponse, AppError> {
    let is_admin = claims.as_ref().is_some_and(|c| c.is_admin());

    if !is_admin {
        let settings = settings_repo.get().await?;
        if !settings.publish_results {
            return Err(AppError::Forbidden(
                "Results are not published yet".to_string(),
            ));
        }
    }

    let standings = ranking_service.standings(query.group, Utc::now()).await?;

    Ok(HttpResponse::Ok().json(ApiResponse::success(standings)))
}
