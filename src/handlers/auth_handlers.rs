use actix_web::{web, HttpResponse};
use bcrypt::{hash, verify};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::{get_conn, DbPool};
use crate::error::ApiError;
use crate::models::message_models::MessageResponse;
use crate::models::token_models::{AuthResponse, LoginRequest, SignupRequest};
use crate::models::user_models::{NewUser, User};
use crate::schema::users::dsl::*;
use crate::utils::auth_utils::ROLE_USER;
use crate::utils::token_utils::generate_jwt;

pub async fn signup(
    pool: web::Data<DbPool>,
    payload: web::Json<SignupRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let data = payload.into_inner();

    if data.nickname.trim().is_empty() || data.email.trim().is_empty() || data.password.is_empty()
    {
        return Err(ApiError::BadRequest(
            "nickname, email and password are required".to_string(),
        ));
    }

    let email_taken = users
        .filter(email.eq(&data.email))
        .select(id)
        .first::<String>(&mut conn)
        .optional()?
        .is_some();
    if email_taken {
        return Err(ApiError::Conflict("Email already in use".to_string()));
    }

    let nickname_taken = users
        .filter(nickname.eq(&data.nickname))
        .select(id)
        .first::<String>(&mut conn)
        .optional()?
        .is_some();
    if nickname_taken {
        return Err(ApiError::Conflict("Nickname already in use".to_string()));
    }

    let pwd_hash = hash(&data.password, bcrypt::DEFAULT_COST)
        .map_err(|_| ApiError::Internal("Failed to hash password".to_string()))?;

    let new_user = NewUser {
        id: Uuid::new_v4().to_string(),
        name: data.name,
        last_name: data.last_name,
        nickname: data.nickname,
        email: data.email,
        password_hash: pwd_hash,
        role: ROLE_USER.to_string(),
        bio: None,
        profile_picture_url: Some("default-profile.jpg".to_string()),
        email_verified: false,
        created_at: Some(Utc::now().naive_utc()),
    };

    diesel::insert_into(users).values(&new_user).execute(&mut conn)?;

    Ok(HttpResponse::Created().json(MessageResponse::new("User registered successfully")))
}

pub async fn login(
    pool: web::Data<DbPool>,
    payload: web::Json<LoginRequest>,
    secret: web::Data<Vec<u8>>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let user = users
        .filter(
            email
                .eq(&payload.username_or_email)
                .or(nickname.eq(&payload.username_or_email)),
        )
        .select(User::as_select())
        .first::<User>(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if !verify(&payload.password, &user.password_hash).unwrap_or(false) {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = generate_jwt(&user.id, &secret);

    Ok(HttpResponse::Ok().json(AuthResponse {
        access_token: token,
        token_type: "Bearer".to_string(),
        user_id: user.id,
        name: user.name,
        nickname: user.nickname,
        role: user.role,
    }))
}
