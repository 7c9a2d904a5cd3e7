use actix_web::{App, http::StatusCode, test, web};
use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use serial_test::serial;

use kistenrennen_be::RankingService;
use kistenrennen_be::database::repositories::{
    ResultRepository, SettingsRepository, StationRepository, TeamRepository,
};
use kistenrennen_be::handlers::ranking;

mod common;

struct Setup {
    ctx: common::TestContext,
    team_repo: TeamRepository,
    station_repo: StationRepository,
    result_repo: ResultRepository,
    settings_repo: SettingsRepository,
}

async fn setup() -> Setup {
    let ctx = common::TestContext::new().await.unwrap();

    Setup {
        team_repo: TeamRepository::new(ctx.pool.clone()),
        station_repo: StationRepository::new(ctx.pool.clone()),
        result_repo: ResultRepository::new(ctx.pool.clone()),
        settings_repo: SettingsRepository::new(ctx.pool.clone()),
        ctx,
    }
}

macro_rules! ranking_app {
    ($setup:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(RankingService::new(
                    $setup.team_repo.clone(),
                    $setup.station_repo.clone(),
                    $setup.result_repo.clone(),
                )))
                .app_data(web::Data::new($setup.settings_repo.clone()))
                .app_data(web::Data::new($setup.ctx.config.clone()))
                .service(
                    web::scope("/api/v1")
                        .route("/ranking", web::get().to(ranking::get_ranking)),
                ),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
async fn unpublished_ranking_is_hidden_from_the_public() {
    let setup = setup().await;
    let app = ranking_app!(setup);

    let req = test::TestRequest::get()
        .uri("/api/v1/ranking?group=open")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FORBIDDEN);
}

#[actix_web::test]
#[serial]
async fn admin_sees_ranking_before_publication() {
    let setup = setup().await;
    let app = ranking_app!(setup);
    let token = common::admin_token(&setup.ctx.config);

    let req = test::TestRequest::get()
        .uri("/api/v1/ranking?group=open")
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
#[serial]
async fn publication_opens_the_ranking_to_everyone() {
    let setup = setup().await;
    let app = ranking_app!(setup);

    setup.settings_repo.upsert(true).await.unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/ranking?group=open")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["data"].is_array());
}

#[actix_web::test]
#[serial]
async fn adjusted_time_subtracts_station_time_and_bonus() {
    let setup = setup().await;
    let app = ranking_app!(setup);
    let token = common::admin_token(&setup.ctx.config);

    let now = Utc::now();
    let team = setup.team_repo.create(common::MockData::team(1)).await.unwrap();
    setup
        .team_repo
        .set_started(team.id, now - Duration::seconds(3600))
        .await
        .unwrap();
    setup.team_repo.set_finished(team.id, now).await.unwrap();

    let station = setup
        .station_repo
        .create(common::MockData::station(1), "CODE-0001".to_string())
        .await
        .unwrap();

    // 60 seconds at the station, sole finisher takes rank 1 and its 300s bonus
    let checked_in = now - Duration::seconds(600);
    setup
        .result_repo
        .check_in(station.id, team.id, checked_in)
        .await
        .unwrap();
    setup
        .result_repo
        .update(
            station.id,
            team.id,
            Some(10),
            Some(checked_in + Duration::seconds(60)),
        )
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/ranking?group=open")
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let standing = &body["data"][0];
    assert_eq!(standing["teamNumber"], 1);
    assert_eq!(standing["totalSeconds"], 3600);
    assert_eq!(standing["adjustedSeconds"], 3600 - 60 - 300);

    let contribution = &standing["stations"][0];
    assert_eq!(contribution["rank"], 1);
    assert_eq!(contribution["timeSeconds"], 60);
    assert_eq!(contribution["bonusSeconds"], 300);
}

#[actix_web::test]
#[serial]
async fn tied_teams_share_the_top_bonus() {
    let setup = setup().await;
    let app = ranking_app!(setup);
    let token = common::admin_token(&setup.ctx.config);

    let now = Utc::now();
    let station = setup
        .station_repo
        .create(common::MockData::station(1), "CODE-0001".to_string())
        .await
        .unwrap();

    for number in [1, 2] {
        let team = setup
            .team_repo
            .create(common::MockData::team(number))
            .await
            .unwrap();
        setup
            .team_repo
            .set_started(team.id, now - Duration::seconds(1800))
            .await
            .unwrap();
        setup.team_repo.set_finished(team.id, now).await.unwrap();

        let checked_in = now - Duration::seconds(900);
        setup
            .result_repo
            .check_in(station.id, team.id, checked_in)
            .await
            .unwrap();
        setup
            .result_repo
            .update(
                station.id,
                team.id,
                Some(10),
                Some(checked_in + Duration::seconds(30)),
            )
            .await
            .unwrap();
    }

    let req = test::TestRequest::get()
        .uri("/api/v1/ranking?group=open")
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let standings = body["data"].as_array().unwrap();
    assert_eq!(standings.len(), 2);
    for standing in standings {
        assert_eq!(standing["stations"][0]["rank"], 1);
        assert_eq!(standing["stations"][0]["bonusSeconds"], 300);
        assert_eq!(standing["adjustedSeconds"], 1800 - 30 - 300);
    }
}

#[actix_web::test]
#[serial]
async fn fun_group_is_ranked_separately() {
    let setup = setup().await;
    let app = ranking_app!(setup);
    let token = common::admin_token(&setup.ctx.config);

    use kistenrennen_be::database::models::RankingGroup;

    setup.team_repo.create(common::MockData::team(1)).await.unwrap();
    setup
        .team_repo
        .create(common::MockData::team_in_group(2, RankingGroup::Fun))
        .await
        .unwrap();

    let req = test::TestRequest::get()
        .uri("/api/v1/ranking?group=fun")
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    let standings = body["data"].as_array().unwrap();
    assert_eq!(standings.len(), 1);
    assert_eq!(standings[0]["teamNumber"], 2);
}
