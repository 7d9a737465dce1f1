use actix_web::{web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;

use crate::db::{get_conn, DbConn, DbPool};
use crate::error::ApiError;
use crate::models::message_models::MessageResponse;
use crate::models::token_models::Claims;
use crate::models::user_models::{UpdateUser, User, UserResponse};
use crate::schema::{follows, users};
use crate::utils::auth_utils::check_owner_or_admin;

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

fn load_user(conn: &mut DbConn, user_id: &str) -> Result<User, ApiError> {
    users::table
        .filter(users::id.eq(user_id))
        .select(User::as_select())
        .first::<User>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

fn follow_edge_exists(
    conn: &mut DbConn,
    follower: &str,
    followed: &str,
) -> Result<bool, ApiError> {
    let edge = follows::table
        .filter(follows::follower_id.eq(follower))
        .filter(follows::followed_id.eq(followed))
        .select(follows::follower_id)
        .first::<String>(conn)
        .optional()?;
    Ok(edge.is_some())
}

pub async fn get_user(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Option<Claims>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user_id = path.into_inner();

    let user = load_user(&mut conn, &user_id)?;
    let mut response = UserResponse::from(user);

    if let Some(claims) = claims {
        response.following = Some(follow_edge_exists(&mut conn, &claims.sub, &user_id)?);
    }

    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_current_user(
    pool: web::Data<DbPool>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user = load_user(&mut conn, &claims.sub)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn update_user(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
    payload: web::Json<UpdateUser>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user_id = path.into_inner();

    load_user(&mut conn, &user_id)?;
    check_owner_or_admin(&mut conn, &claims, &user_id)?;

    let update_data = payload.into_inner();

    if let Some(new_nickname) = &update_data.nickname {
        let taken = users::table
            .filter(users::nickname.eq(new_nickname))
            .filter(users::id.ne(&user_id))
            .select(users::id)
            .first::<String>(&mut conn)
            .optional()?
            .is_some();
        if taken {
            return Err(ApiError::Conflict("Nickname already in use".to_string()));
        }
    }

    // An empty body is a no-op, not an error.
    if update_data.name.is_some()
        || update_data.last_name.is_some()
        || update_data.nickname.is_some()
        || update_data.bio.is_some()
        || update_data.profile_picture_url.is_some()
    {
        diesel::update(users::table.filter(users::id.eq(&user_id)))
            .set(&update_data)
            .execute(&mut conn)?;
    }

    let user = load_user(&mut conn, &user_id)?;
    Ok(HttpResponse::Ok().json(UserResponse::from(user)))
}

pub async fn delete_user(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user_id = path.into_inner();

    load_user(&mut conn, &user_id)?;
    check_owner_or_admin(&mut conn, &claims, &user_id)?;

    diesel::delete(users::table.filter(users::id.eq(&user_id))).execute(&mut conn)?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn follow_user(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let followed_id = path.into_inner();

    if claims.sub == followed_id {
        return Err(ApiError::BadRequest(
            "You cannot follow yourself".to_string(),
        ));
    }

    load_user(&mut conn, &followed_id)?;

    if follow_edge_exists(&mut conn, &claims.sub, &followed_id)? {
        return Err(ApiError::Conflict(
            "You are already following this user".to_string(),
        ));
    }

    diesel::insert_into(follows::table)
        .values((
            follows::follower_id.eq(&claims.sub),
            follows::followed_id.eq(&followed_id),
            follows::created_at.eq(Some(Utc::now().naive_utc())),
        ))
        .execute(&mut conn)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User followed successfully")))
}

pub async fn unfollow_user(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let followed_id = path.into_inner();

    load_user(&mut conn, &followed_id)?;

    if !follow_edge_exists(&mut conn, &claims.sub, &followed_id)? {
        return Err(ApiError::Conflict(
            "You are not following this user".to_string(),
        ));
    }

    diesel::delete(
        follows::table
            .filter(follows::follower_id.eq(&claims.sub))
            .filter(follows::followed_id.eq(&followed_id)),
    )
    .execute(&mut conn)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("User unfollowed successfully")))
}

pub async fn get_followers(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user_id = path.into_inner();

    load_user(&mut conn, &user_id)?;

    let follower_ids = follows::table
        .filter(follows::followed_id.eq(&user_id))
        .select(follows::follower_id)
        .load::<String>(&mut conn)?;

    let list = users::table
        .filter(users::id.eq_any(&follower_ids))
        .select(User::as_select())
        .load::<User>(&mut conn)?
        .into_iter()
        .map(UserResponse::from)
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(list))
}

pub async fn get_following(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user_id = path.into_inner();

    load_user(&mut conn, &user_id)?;

    let followed_ids = follows::table
        .filter(follows::follower_id.eq(&user_id))
        .select(follows::followed_id)
        .load::<String>(&mut conn)?;

    let list = users::table
        .filter(users::id.eq_any(&followed_ids))
        .select(User::as_select())
        .load::<User>(&mut conn)?
        .into_iter()
        .map(UserResponse::from)
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(list))
}

pub async fn search_users(
    pool: web::Data<DbPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let pattern = format!("%{}%", query.query);
    let list = users::table
        .filter(users::nickname.like(pattern))
        .select(User::as_select())
        .load::<User>(&mut conn)?
        .into_iter()
        .map(UserResponse::from)
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(list))
}
