use actix_cors::Cors;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, web};
use anyhow::Result;

use kistenrennen_be::database::{
    init_database,
    repositories::{ResultRepository, SettingsRepository, StationRepository, TeamRepository},
};
use kistenrennen_be::handlers::{auth, events, ranking, results, settings, stations, teams};
use kistenrennen_be::ranking::live;
use kistenrennen_be::{AppState, AuthService, Config, EventBroadcaster, RankingService};

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Kistenrennen API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    println!("🚀 Starting Kistenrennen API server...");

    // Load configuration
    let config = Config::from_env()?;
    println!(
        "📋 Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    println!("✅ Database initialized");

    // Initialize repositories and services
    let team_repository = TeamRepository::new(pool.clone());
    let station_repository = StationRepository::new(pool.clone());
    let result_repository = ResultRepository::new(pool.clone());
    let settings_repository = SettingsRepository::new(pool.clone());
    let auth_service = AuthService::new(station_repository.clone(), config.clone())?;
    let ranking_service = RankingService::new(
        team_repository.clone(),
        station_repository.clone(),
        result_repository.clone(),
    );
    let broadcaster = EventBroadcaster::new();

    // Live leaderboard ticker, pushes standings to SSE listeners every second
    // once results are published
    let ticker = tokio::spawn(live::run_ticker(
        ranking_service.clone(),
        settings_repository.clone(),
        broadcaster.clone(),
    ));

    // Create app state and repository data
    let app_state = web::Data::new(AppState { auth_service });
    let team_repo_data = web::Data::new(team_repository);
    let station_repo_data = web::Data::new(station_repository);
    let result_repo_data = web::Data::new(result_repository);
    let settings_repo_data = web::Data::new(settings_repository);
    let ranking_service_data = web::Data::new(ranking_service);
    let broadcaster_data = web::Data::new(broadcaster);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    println!("🌐 Server starting on http://{}", server_address);

    // Start HTTP server
    let server = HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(team_repo_data.clone())
            .app_data(station_repo_data.clone())
            .app_data(result_repo_data.clone())
            .app_data(settings_repo_data.clone())
            .app_data(ranking_service_data.clone())
            .app_data(broadcaster_data.clone())
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin(&config.client_base_url)
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec!["Authorization", "Content-Type", "Accept"])
                    .max_age(3600),
            )
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
            ))
            .service(hello)
            .service(health)
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/auth")
                            .route("/login", web::post().to(auth::login))
                            .route("/station-login", web::post().to(auth::station_login))
                            .route("/me", web::get().to(auth::me)),
                    )
                    .service(
                        web::scope("/teams")
                            .route("", web::post().to(teams::create_team))
                            .route("", web::get().to(teams::get_teams))
                            .route("/{id}", web::get().to(teams::get_team))
                            .route("/{id}", web::put().to(teams::update_team))
                            .route("/{id}", web::delete().to(teams::delete_team))
                            .route("/{id}/start", web::post().to(teams::start_team))
                            .route("/{id}/finish", web::post().to(teams::finish_team)),
                    )
                    .service(
                        web::scope("/stations")
                            .route("", web::post().to(stations::create_station))
                            .route("", web::get().to(stations::get_stations))
                            .route("/{id}", web::get().to(stations::get_station))
                            .route("/{id}", web::put().to(stations::update_station))
                            .route("/{id}", web::delete().to(stations::delete_station)),
                    )
                    .service(
                        web::scope("/results")
                            .route("", web::post().to(results::check_in))
                            .route("", web::get().to(results::get_results))
                            .route(
                                "/{station_id}/{team_id}",
                                web::get().to(results::get_result),
                            )
                            .route(
                                "/{station_id}/{team_id}",
                                web::put().to(results::update_result),
                            )
                            .route(
                                "/{station_id}/{team_id}",
                                web::delete().to(results::delete_result),
                            )
                            .route(
                                "/{station_id}/{team_id}/checkout",
                                web::post().to(results::check_out),
                            ),
                    )
                    .service(
                        web::scope("/settings")
                            .route("", web::get().to(settings::get_settings))
                            .route("", web::put().to(settings::update_settings)),
                    )
                    .service(web::scope("/ranking").route("", web::get().to(ranking::get_ranking)))
                    .service(web::scope("/events").route("", web::get().to(events::stream))),
            )
    })
    .bind(&server_address)?
    .run()
    .await;

    ticker.abort();

    server.map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
