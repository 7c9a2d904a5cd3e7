use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Admin code or station access code, depending on the endpoint.
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub station_id: Option<Uuid>,
}
