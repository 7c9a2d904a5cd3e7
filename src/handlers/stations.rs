use actix_web::{HttpResponse, Result, web};
use uuid::Uuid;

use crate::auth::{Claims, generate_access_code};
use crate::database::models::{Station, StationInput};
use crate::database::repositories::StationRepository;
use crate::events::{EventAction, EventBroadcaster};
use crate::handlers::shared::ApiResponse;

// Station payloads go over the wire without the access code unless the
// caller is an admin.
fn respond(station: Station, claims: &Option<Claims>) -> HttpResponse {
    let is_admin = claims.as_ref().is_some_and(|c| c.is_admin());
    HttpResponse::Ok().json(ApiResponse::success(station.into_response(is_admin)))
}

pub async fn create_station(
    claims: Claims,
    station_repo: web::Data<StationRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    input: web::Json<StationInput>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Ok(
            HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required"))
        );
    }

    let access_code = generate_access_code();

    match station_repo.create(input.into_inner(), access_code).await {
        Ok(station) => {
            broadcaster.publish("station", EventAction::Created, &station.clone().into_response(false));
            Ok(HttpResponse::Created().json(ApiResponse::success(station.into_response(true))))
        }
        Err(e) => {
            log::error!("Failed to create station: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create station")))
        }
    }
}

pub async fn get_stations(
    claims: Option<Claims>,
    station_repo: web::Data<StationRepository>,
) -> Result<HttpResponse> {
    let is_admin = claims.as_ref().is_some_and(|c| c.is_admin());

    match station_repo.list().await {
        Ok(stations) => {
            let views: Vec<_> = stations
                .into_iter()
                .map(|s| s.into_response(is_admin))
                .collect();
            Ok(HttpResponse::Ok().json(ApiResponse::success(views)))
        }
        Err(e) => {
            log::error!("Failed to get stations: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to get stations")))
        }
    }
}

pub async fn get_station(
    claims: Option<Claims>,
    station_repo: web::Data<StationRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let station_id = path.into_inner();

    match station_repo.find_by_id(station_id).await {
        Ok(Some(station)) => Ok(respond(station, &claims)),
        Ok(None) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Station not found")))
        }
        Err(e) => {
            log::error!("Failed to get station: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to get station")))
        }
    }
}

pub async fn update_station(
    claims: Claims,
    station_repo: web::Data<StationRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    input: web::Json<StationInput>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Ok(
            HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required"))
        );
    }

    let station_id = path.into_inner();

    match station_repo.update(station_id, input.into_inner()).await {
        Ok(Some(station)) => {
            broadcaster.publish("station", EventAction::Updated, &station.clone().into_response(false));
            Ok(HttpResponse::Ok().json(ApiResponse::success(station.into_response(true))))
        }
        Ok(None) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Station not found")))
        }
        Err(e) => {
            log::error!("Failed to update station: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update station")))
        }
    }
}

pub async fn delete_station(
    claims: Claims,
    station_repo: web::Data<StationRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Ok(
            HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required"))
        );
    }

    let station_id = path.into_inner();

    match station_repo.delete(station_id).await {
        Ok(true) => {
            broadcaster.publish(
                "station",
                EventAction::Deleted,
                &serde_json::json!({ "id": station_id }),
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_with_message(None, "Station deleted")))
        }
        Ok(false) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Station not found")))
        }
        Err(e) => {
            log::error!("Failed to delete station: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete station")))
        }
    }
}
