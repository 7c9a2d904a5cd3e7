use actix_web::{HttpResponse, web};

use crate::auth::Claims;
use crate::database::models::SettingsInput;
use crate::database::repositories::SettingsRepository;
use crate::error::AppError;
use crate::events::{EventAction, EventBroadcaster};
use crate::handlers::shared::ApiResponse;

pub async fn get_settings(
    settings_repo: web::Data<SettingsRepository>,
) -> Result<HttpResponse, AppError> {
    let settings = settings_repo.get().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::success(settings)))
}

pub async fn update_settings(
    claims: Claims,
    settings_repo: web::Data<SettingsRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    input: web::Json<SettingsInput>,
) -> Result<HttpResponse, AppError> {
    if !claims.is_admin() {
        return Err(AppError::Forbidden("Admin access required".to_string()));
    }

    let settings = settings_repo.upsert(input.publish_results).await?;
    broadcaster.publish("settings", EventAction::Updated, &settings);

    Ok(HttpResponse::Ok().json(ApiResponse::success(settings)))
}
