use actix_web::{HttpResponse, Result, web};
use chrono::Utc;
use uuid::Uuid;

use crate::auth::Claims;
use crate::database::models::TeamInput;
use crate::database::repositories::TeamRepository;
use crate::events::{EventAction, EventBroadcaster};
use crate::handlers::shared::ApiResponse;

pub async fn create_team(
    claims: Claims,
    team_repo: web::Data<TeamRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    input: web::Json<TeamInput>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Ok(
            HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required"))
        );
    }

    match team_repo.create(input.into_inner()).await {
        Ok(team) => {
            broadcaster.publish("team", EventAction::Created, &team);
            Ok(HttpResponse::Created().json(ApiResponse::success(team)))
        }
        Err(e) => {
            log::error!("Failed to create team: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to create team")))
        }
    }
}

pub async fn get_teams(team_repo: web::Data<TeamRepository>) -> Result<HttpResponse> {
    match team_repo.list().await {
        Ok(teams) => Ok(HttpResponse::Ok().json(ApiResponse::success(teams))),
        Err(e) => {
            log::error!("Failed to get teams: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to get teams")))
        }
    }
}

pub async fn get_team(
    team_repo: web::Data<TeamRepository>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    let team_id = path.into_inner();

    match team_repo.find_by_id(team_id).await {
        Ok(Some(team)) => Ok(HttpResponse::Ok().json(ApiResponse::success(team))),
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Team not found"))),
        Err(e) => {
            log::error!("Failed to get team: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to get team")))
        }
    }
}

pub async fn update_team(
    claims: Claims,
    team_repo: web::Data<TeamRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
    input: web::Json<TeamInput>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Ok(
            HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required"))
        );
    }

    let team_id = path.into_inner();

    match team_repo.update(team_id, input.into_inner()).await {
        Ok(Some(team)) => {
            broadcaster.publish("team", EventAction::Updated, &team);
            Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Team not found"))),
        Err(e) => {
            log::error!("Failed to update team: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to update team")))
        }
    }
}

/// Put the team on the course: stamps `startedAt` with the current time.
pub async fn start_team(
    claims: Claims,
    team_repo: web::Data<TeamRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Ok(
            HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required"))
        );
    }

    let team_id = path.into_inner();

    match team_repo.set_started(team_id, Utc::now()).await {
        Ok(Some(team)) => {
            broadcaster.publish("team", EventAction::Updated, &team);
            Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Team not found"))),
        Err(e) => {
            log::error!("Failed to start team: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to start team")))
        }
    }
}

/// Stop the team's race clock: stamps `finishedAt` with the current time.
pub async fn finish_team(
    claims: Claims,
    team_repo: web::Data<TeamRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Ok(
            HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required"))
        );
    }

    let team_id = path.into_inner();

    // A team that never started has no clock to stop.
    match team_repo.find_by_id(team_id).await {
        Ok(Some(team)) if team.started_at.is_none() => {
            return Ok(HttpResponse::BadRequest()
                .json(ApiResponse::<()>::error("Team has not started yet")));
        }
        Ok(Some(_)) => {}
        Ok(None) => {
            return Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Team not found")));
        }
        Err(e) => {
            log::error!("Failed to get team: {}", e);
            return Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to finish team")));
        }
    }

    match team_repo.set_finished(team_id, Utc::now()).await {
        Ok(Some(team)) => {
            broadcaster.publish("team", EventAction::Updated, &team);
            Ok(HttpResponse::Ok().json(ApiResponse::success(team)))
        }
        Ok(None) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Team not found"))),
        Err(e) => {
            log::error!("Failed to finish team: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to finish team")))
        }
    }
}

pub async fn delete_team(
    claims: Claims,
    team_repo: web::Data<TeamRepository>,
    broadcaster: web::Data<EventBroadcaster>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse> {
    if !claims.is_admin() {
        return Ok(
            HttpResponse::Forbidden().json(ApiResponse::<()>::error("Admin access required"))
        );
    }

    let team_id = path.into_inner();

    match team_repo.delete(team_id).await {
        Ok(true) => {
            broadcaster.publish("team", EventAction::Deleted, &serde_json::json!({ "id": team_id }));
            Ok(HttpResponse::Ok()
                .json(ApiResponse::<()>::success_with_message(None, "Team deleted")))
        }
        Ok(false) => Ok(HttpResponse::NotFound().json(ApiResponse::<()>::error("Team not found"))),
        Err(e) => {
            log::error!("Failed to delete team: {}", e);
            Ok(HttpResponse::InternalServerError()
                .json(ApiResponse::<()>::error("Failed to delete team")))
        }
    }
}
