use actix_web::{App, http::StatusCode, test, web};
use pretty_assertions::assert_eq;
use serde_json::json;
use serial_test::serial;

use kistenrennen_be::database::repositories::StationRepository;
use kistenrennen_be::handlers::auth;

mod common;

async fn setup() -> (common::TestContext, web::Data<kistenrennen_be::AppState>) {
    let ctx = common::TestContext::new().await.unwrap();
    let app_state = web::Data::new(ctx.app_state());
    (ctx, app_state)
}

macro_rules! auth_app {
    ($app_state:expr, $config:expr) => {
        test::init_service(
            App::new()
                .app_data($app_state.clone())
                .app_data(web::Data::new($config.clone()))
                .service(
                    web::scope("/api/v1").service(
                        web::scope("/auth")
                            .route("/login", web::post().to(auth::login))
                            .route("/station-login", web::post().to(auth::station_login))
                            .route("/me", web::get().to(auth::me)),
                    ),
                ),
        )
        .await
    };
}

#[actix_web::test]
#[serial]
async fn admin_login_with_correct_code_returns_token() {
    let (ctx, app_state) = setup().await;
    let app = auth_app!(app_state, ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "code": common::TEST_ADMIN_CODE }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["role"], "admin");
    assert!(body["data"]["token"].as_str().unwrap().len() > 20);
}

#[actix_web::test]
#[serial]
async fn admin_login_with_wrong_code_is_unauthorized() {
    let (ctx, app_state) = setup().await;
    let app = auth_app!(app_state, ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "code": "definitely-wrong" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn station_login_with_access_code_returns_station_token() {
    let (ctx, app_state) = setup().await;

    let station_repo = StationRepository::new(ctx.pool.clone());
    let station = station_repo
        .create(common::MockData::station(1), "AAAA-BBBB".to_string())
        .await
        .unwrap();

    let app = auth_app!(app_state, ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/station-login")
        .set_json(json!({ "code": "AAAA-BBBB" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "station");
    assert_eq!(
        body["data"]["stationId"].as_str().unwrap(),
        station.id.to_string()
    );
}

#[actix_web::test]
#[serial]
async fn station_login_with_unknown_code_is_unauthorized() {
    let (ctx, app_state) = setup().await;
    let app = auth_app!(app_state, ctx.config);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/station-login")
        .set_json(json!({ "code": "XXXX-XXXX" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn me_requires_a_token() {
    let (ctx, app_state) = setup().await;
    let app = auth_app!(app_state, ctx.config);

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
#[serial]
async fn me_echoes_admin_claims() {
    let (ctx, app_state) = setup().await;
    let app = auth_app!(app_state, ctx.config);
    let token = common::admin_token(&ctx.config);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(common::auth_header(&token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["role"], "admin");
}
