pub mod auth;
pub mod config;
pub mod database;
pub mod error;
pub mod events;
pub mod handlers;
pub mod ranking;
pub mod services;

pub use auth::AuthService;
pub use config::Config;
pub use events::EventBroadcaster;
pub use services::RankingService;

pub struct AppState {
    pub auth_service: AuthService,
}
