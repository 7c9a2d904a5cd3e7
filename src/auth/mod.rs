use actix_web::{
    Error as ActixError, FromRequest, HttpRequest, dev::Payload, error::ErrorUnauthorized,
    web::Data,
};
use anyhow::{Result, anyhow};
use bcrypt::{DEFAULT_COST, hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::future::{Ready, ready};
use uuid::Uuid;

use crate::config::Config;
use crate::database::models::AuthResponse;
use crate::database::repositories::StationRepository;

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_STATION: &str = "station";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // "admin" or a station id
    pub role: String,
    pub exp: usize, // expiration time
}

impl Claims {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }

    pub fn is_station(&self) -> bool {
        self.role == ROLE_STATION
    }

    /// The station this token belongs to, if it is a station token.
    pub fn station_id(&self) -> Option<Uuid> {
        if self.is_station() {
            Uuid::parse_str(&self.sub).ok()
        } else {
            None
        }
    }
}

impl FromRequest for Claims {
    type Error = ActixError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let auth_header = req.headers().get("Authorization");

        if let Some(auth_header) = auth_header {
            if let Ok(auth_str) = auth_header.to_str() {
                if let Some(token) = auth_str.strip_prefix("Bearer ") {
                    // Get the config from app data
                    if let Some(config) = req.app_data::<Data<Config>>() {
                        match decode::<Claims>(
                            token,
                            &DecodingKey::from_secret(config.jwt_secret.as_ref()),
                            &Validation::new(Algorithm::HS256),
                        ) {
                            Ok(token_data) => {
                                return ready(Ok(token_data.claims));
                            }
                            Err(_) => {
                                return ready(Err(ErrorUnauthorized("Invalid token")));
                            }
                        }
                    }
                }
            }
        }

        ready(Err(ErrorUnauthorized(
            "Missing or invalid authorization header",
        )))
    }
}

#[derive(Clone)]
pub struct AuthService {
    station_repository: StationRepository,
    config: Config,
    admin_code_hash: String,
}

impl AuthService {
    pub fn new(station_repository: StationRepository, config: Config) -> Result<Self> {
        // Hash once at startup so logins go through bcrypt's constant-time
        // verify instead of a plain string compare.
        let admin_code_hash = hash(&config.admin_code, DEFAULT_COST)?;

        Ok(Self {
            station_repository,
            config,
            admin_code_hash,
        })
    }

    pub async fn login_admin(&self, code: &str) -> Result<AuthResponse> {
        if !verify(code, &self.admin_code_hash)? {
            return Err(anyhow!("Invalid admin code"));
        }

        let token = self.generate_token(ROLE_ADMIN, ROLE_ADMIN)?;

        Ok(AuthResponse {
            token,
            role: ROLE_ADMIN.to_string(),
            station_id: None,
        })
    }

    pub async fn login_station(&self, code: &str) -> Result<AuthResponse> {
        let station = self
            .station_repository
            .find_by_access_code(code)
            .await?
            .ok_or_else(|| anyhow!("Invalid station access code"))?;

        let token = self.generate_token(&station.id.to_string(), ROLE_STATION)?;

        Ok(AuthResponse {
            token,
            role: ROLE_STATION.to_string(),
            station_id: Some(station.id),
        })
    }

    fn generate_token(&self, sub: &str, role: &str) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::days(self.config.jwt_expiration_days))
            .ok_or_else(|| anyhow!("Invalid expiration timestamp"))?
            .timestamp() as usize;

        let claims = Claims {
            sub: sub.to_string(),
            role: role.to_string(),
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_ref()),
        )?;

        Ok(token)
    }
}

/// Random station access code, e.g. "7KQ4-TX9M". Skips easily confused
/// characters.
pub fn generate_access_code() -> String {
    use rand::Rng;

    const ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";
    let mut rng = rand::rng();

    let mut code = String::with_capacity(9);
    for i in 0..8 {
        if i == 4 {
            code.push('-');
        }
        let idx = rng.random_range(0..ALPHABET.len());
        code.push(ALPHABET[idx] as char);
    }
    code
}
