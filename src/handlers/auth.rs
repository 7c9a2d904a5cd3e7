use actix_web::{HttpResponse, Result, web};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;
use crate::auth::Claims;
use crate::database::models::LoginRequest;
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeResponse {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<Uuid>,
}

/// Admin login with the event admin code.
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match state.auth_service.login_admin(&request.code).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => {
            log::warn!("Admin login rejected: {}", e);
            Ok(HttpResponse::Unauthorized().json(ApiResponse::<()>::error("Invalid access code")))
        }
    }
}

/// Station login with a station's secret access code.
pub async fn station_login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse> {
    match state.auth_service.login_station(&request.code).await {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(response))),
        Err(e) => {
            log::warn!("Station login rejected: {}", e);
            Ok(HttpResponse::Unauthorized().json(ApiResponse::<()>::error("Invalid access code")))
        }
    }
}

pub async fn me(claims: Claims) -> Result<HttpResponse> {
    let response = MeResponse {
        station_id: claims.station_id(),
        role: claims.role,
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}
