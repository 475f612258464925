use poem_openapi::payload::Json;
use poem_openapi::{ApiResponse, Object};
use serde::{Deserialize, Serialize};

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Tokens issued at login
///
/// The access token carries the user's farm roles as they were at login;
/// role changes take effect on the next login.
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,

    /// Exchange at `/auth/refresh` for a new access token
    pub refresh_token: String,

    /// Always `Bearer`
    pub token_type: String,

    /// Access token lifetime in seconds
    pub expires_in: i64,
}

#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// A fresh access token for an existing session
#[derive(Object, Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(ApiResponse)]
pub enum LoginApiResponse {
    /// Credentials accepted and a session opened
    #[oai(status = 200)]
    Ok(Json<TokenResponse>),
}

#[derive(ApiResponse)]
pub enum RefreshApiResponse {
    #[oai(status = 200)]
    Ok(Json<RefreshResponse>),
}

#[derive(ApiResponse)]
pub enum LogoutApiResponse {
    /// Session ended; the access token no longer works
    #[oai(status = 204)]
    NoContent,
}
