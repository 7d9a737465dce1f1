use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpMessage, HttpRequest};
use futures::future::{ready, Ready};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String, // user ID
    pub exp: i64,    // expiration timestamp
}

/// Pulled out of request extensions where the auth middleware stored it.
/// A missing or invalid token turns into a 401, so handlers can simply take
/// `Claims` (required auth) or `Option<Claims>` (optional auth) as arguments.
impl FromRequest for Claims {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(
            req.extensions()
                .get::<Claims>()
                .cloned()
                .ok_or_else(|| ApiError::Unauthorized("No authenticated user".to_string())),
        )
    }
}

#[derive(Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub last_name: Option<String>,
    pub nickname: String,
    pub email: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username_or_email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: String,
    pub name: String,
    pub nickname: String,
    pub role: String,
}
