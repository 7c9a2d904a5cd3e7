use anyhow::Result;
use chrono::Utc;
use fake::Fake;
use fake::faker::company::en::CompanyName;
use fake::faker::name::en::Name;
use jsonwebtoken::{EncodingKey, Header, encode};
use sqlx::SqlitePool;
use tempfile::TempDir;
use uuid::Uuid;

use kistenrennen_be::auth::{Claims, ROLE_ADMIN, ROLE_STATION};
use kistenrennen_be::config::Config;
use kistenrennen_be::database::init_database;
use kistenrennen_be::database::models::{RankingGroup, SortOrder, StationInput, TeamInput};
use kistenrennen_be::database::repositories::StationRepository;
use kistenrennen_be::{AppState, AuthService};

pub const TEST_ADMIN_CODE: &str = "test-admin-code";

// Test database + services wrapper
pub struct TestContext {
    pub pool: SqlitePool,
    pub config: Config,
    pub auth_service: AuthService,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());
        let pool = init_database(&database_url).await?;

        let config = test_config();
        let auth_service = AuthService::new(StationRepository::new(pool.clone()), config.clone())?;

        Ok(TestContext {
            pool,
            config,
            auth_service,
            _temp_dir: temp_dir,
        })
    }

    pub fn app_state(&self) -> AppState {
        AppState {
            auth_service: self.auth_service.clone(),
        }
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        jwt_secret: "test-jwt-secret-key-that-is-long-enough".to_string(),
        jwt_expiration_days: 1,
        admin_code: TEST_ADMIN_CODE.to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        client_base_url: "http://localhost:3000".to_string(),
    }
}

// Token helpers

pub fn admin_token(config: &Config) -> String {
    make_token("admin", ROLE_ADMIN, config)
}

pub fn station_token(station_id: Uuid, config: &Config) -> String {
    make_token(&station_id.to_string(), ROLE_STATION, config)
}

fn make_token(sub: &str, role: &str, config: &Config) -> String {
    let claims = Claims {
        sub: sub.to_string(),
        role: role.to_string(),
        exp: (Utc::now() + chrono::Duration::hours(24)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_ref()),
    )
    .expect("Failed to create test token")
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

// Mock data generators using the fake crate
pub struct MockData;

impl MockData {
    pub fn team(number: i64) -> TeamInput {
        TeamInput {
            number,
            name: format!("{} Racing", Name().fake::<String>()),
            members: vec![Name().fake(), Name().fake()],
            ranking_group: RankingGroup::Open,
            penalty_minutes: 0,
        }
    }

    pub fn team_in_group(number: i64, ranking_group: RankingGroup) -> TeamInput {
        TeamInput {
            ranking_group,
            ..Self::team(number)
        }
    }

    pub fn station(number: i64) -> StationInput {
        StationInput {
            number,
            name: format!("{} Station", CompanyName().fake::<String>()),
            members: vec![Name().fake()],
            sort_order: SortOrder::Desc,
        }
    }
}
