use actix_web::{HttpResponse, Result, web};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::{CheckInInput, ResultUpdateInput};
use crate::database::repositories::ResultRepository;
use crate::events::{EventAction, EventBroadcaster};
use crate::handlers::shared::ApiResponse;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultListQuery {
    pub station_id: Option<Uuid>,
    pub team_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutInput {
    pub points: Option<i64>,
}

// Admins may touch any result, a station token only its own station.
fn can_manage(claims: &Claims, station_id: Uuid) -> bool {
    claims.is_admin() || claims.station_id() == Some(station_id)
}

/// Check a team in at a station. The insert itself is the uniqueness check:
/// a duplicate (station, team) pair comes back as a conflict, not a second
/// row.
pub async fn check_in(
    claims: Claims,
    result_repo: web::Data<ResultRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    input: web::Json<CheckInInput>,
) -> Result<HttpResponse> {
    let input = input.into_inner();

    if !can_manage(&claims, input.station_id) {
        return Ok(HttpResponse::Forbidden()
            .json(ApiResponse::<()>::error("Not allowed for this station")));
    }

    match result_repo
        .check_in(input.station_id, input.team_id, Utc::now())
        .await
    {
        Ok(Some(result)) => {
            broadcaster.publish("result", EventAction::Created, &result);
            Ok(HttpResponse::Created().json(ApiResponse::success(result)))
        }
        Ok(None) => Ok(HttpResponse::Conflict().json(ApiResponse::<()>::error(
            "Team is already checked in at this station",
        ))),
        // A bad station or team id trips the foreign keys; that is caller
        // error, not a server fault.
        Err(e) if is_foreign_key_violation(&e) => Ok(
            HttpResponse::NotFound().json(ApiResponse::<()>::error("Unknown station or team"))
        ),
        Err(e) => {
            log::error!("Failed to check in team: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to check in team")))
        }
    }
}

fn is_foreign_key_violation(e: &anyhow::Error) -> bool {
    matches!(
        e.downcast_ref::<sqlx::Error>(),
        Some(sqlx::Error::Database(db_err))
            if db_err.kind() == sqlx::error::ErrorKind::ForeignKeyViolation
    )
}

pub async fn get_results(
    result_repo: web::Data<ResultRepository>,
    query: web::Query<ResultListQuery>,
) -> Result<HttpResponse> {
    let listing = match (query.station_id, query.team_id) {
        (Some(station_id), _) => result_repo.list_by_station(station_id).await,
        (None, Some(team_id)) => result_repo.list_by_team(team_id).await,
        (None, None) => result_repo.list().await,
    };

    match listing {
        Ok(results) => Ok(HttpResponse::Ok().json(ApiResponse::success(results))),
        Err(e) => {
            log::error!("Failed to get results: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to get results")))
        }
    }
}

pub async fn get_result(
    result_repo: web::Data<ResultRepository>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (station_id, team_id) = path.into_inner();

    match result_repo.find(station_id, team_id).await {
        Ok(Some(result)) => Ok(HttpResponse::Ok().json(ApiResponse::success(result))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Result not found"))),
        Err(e) => {
            log::error!("Failed to get result: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to get result")))
        }
    }
}

/// Point corrections and manual check-out timestamps. A check-out before the
/// recorded check-in is rejected.
pub async fn update_result(
    claims: Claims,
    result_repo: web::Data<ResultRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<(Uuid, Uuid)>,
    input: web::Json<ResultUpdateInput>,
) -> Result<HttpResponse> {
    let (station_id, team_id) = path.into_inner();

    if !can_manage(&claims, station_id) {
        return Ok(HttpResponse::Forbidden()
            .json(ApiResponse::<()>::error("Not allowed for this station")));
    }

    let existing = match result_repo.find(station_id, team_id).await {
        Ok(Some(result)) => result,
        Ok(None) => {
            return Ok(
                HttpResponse::NotFound().json(ApiResponse::<()>::error("Result not found"))
            );
        }
        Err(e) => {
            log::error!("Failed to get result: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update result")));
        }
    };

    if let Some(out) = input.checked_out_at {
        if out < existing.checked_in_at {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::<()>::error(
                "Check-out cannot be before check-in",
            )));
        }
    }

    match result_repo
        .update(station_id, team_id, input.points, input.checked_out_at)
        .await
    {
        Ok(Some(result)) => {
            broadcaster.publish("result", EventAction::Updated, &result);
            Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Result not found"))),
        Err(e) => {
            log::error!("Failed to update result: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update result")))
        }
    }
}

/// Check the team out at the current time, optionally recording its points
/// in the same call.
pub async fn check_out(
    claims: Claims,
    result_repo: web::Data<ResultRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<(Uuid, Uuid)>,
    input: web::Json<CheckOutInput>,
) -> Result<HttpResponse> {
    let (station_id, team_id) = path.into_inner();

    if !can_manage(&claims, station_id) {
        return Ok(HttpResponse::Forbidden()
            .json(ApiResponse::<()>::error("Not allowed for this station")));
    }

    match result_repo
        .update(station_id, team_id, input.points, Some(Utc::now()))
        .await
    {
        Ok(Some(result)) => {
            broadcaster.publish("result", EventAction::Updated, &result);
            Ok(HttpResponse::Ok().json(ApiResponse::success(result)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Result not found"))),
        Err(e) => {
            log::error!("Failed to check out team: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to check out team")))
        }
    }
}

pub async fn delete_result(
    claims: Claims,
    result_repo: web::Data<ResultRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse> {
    let (station_id, team_id) = path.into_inner();

    if !can_manage(&claims, station_id) {
        return Ok(HttpResponse::Forbidden()
            .json(ApiResponse::<()>::error("Not allowed for this station")));
    }

    match result_repo.delete(station_id, team_id).await {
        Ok(true) => {
            broadcaster.publish(
                "result",
                EventAction::Deleted,
                &serde_json::json!({ "stationId": station_id, "teamId": team_id }),
            );
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_with_message(None, "Result deleted")))
        }
        Ok(false) => {
            Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Result not found")))
        }
        Err(e) => {
            log::error!("Failed to delete result: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete result")))
        }
    }
}
