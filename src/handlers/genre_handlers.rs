use actix_web::{web, HttpResponse};
use diesel::prelude::*;

use crate::db::{get_conn, DbConn, DbPool};
use crate::error::ApiError;
use crate::models::genre_models::{Genre, NewGenre, UpdateGenre};
use crate::models::token_models::Claims;
use crate::schema::genres::dsl::*;
use crate::utils::auth_utils::require_admin;

fn load_genre(conn: &mut DbConn, genre_id: i32) -> Result<Genre, ApiError> {
    genres
        .filter(id.eq(genre_id))
        .first::<Genre>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Genre not found".to_string()))
}

fn name_taken(conn: &mut DbConn, genre_name: &str, except: Option<i32>) -> Result<bool, ApiError> {
    let found = match except {
        Some(genre_id) => genres
            .filter(name.eq(genre_name))
            .filter(id.ne(genre_id))
            .select(id)
            .first::<i32>(conn)
            .optional()?,
        None => genres
            .filter(name.eq(genre_name))
            .select(id)
            .first::<i32>(conn)
            .optional()?,
    };
    Ok(found.is_some())
}

pub async fn list_genres(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let list = genres.order(name.asc()).load::<Genre>(&mut conn)?;
    Ok(HttpResponse::Ok().json(list))
}

pub async fn get_genre(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let genre = load_genre(&mut conn, path.into_inner())?;
    Ok(HttpResponse::Ok().json(genre))
}

pub async fn create_genre(
    pool: web::Data<DbPool>,
    claims: Claims,
    payload: web::Json<NewGenre>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    require_admin(&mut conn, &claims)?;

    let data = payload.into_inner();
    if name_taken(&mut conn, &data.name, None)? {
        return Err(ApiError::Conflict(
            "A genre with that name already exists".to_string(),
        ));
    }

    diesel::insert_into(genres).values(&data).execute(&mut conn)?;

    let genre = genres
        .filter(name.eq(&data.name))
        .first::<Genre>(&mut conn)?;

    Ok(HttpResponse::Created().json(genre))
}

pub async fn update_genre(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    claims: Claims,
    payload: web::Json<UpdateGenre>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    require_admin(&mut conn, &claims)?;

    let genre_id = path.into_inner();
    load_genre(&mut conn, genre_id)?;

    let data = payload.into_inner();
    if let Some(new_name) = &data.name {
        if name_taken(&mut conn, new_name, Some(genre_id))? {
            return Err(ApiError::Conflict(
                "A genre with that name already exists".to_string(),
            ));
        }
    }

    // An empty body is a no-op, not an error.
    if data.name.is_some() {
        diesel::update(genres.filter(id.eq(genre_id)))
            .set(&data)
            .execute(&mut conn)?;
    }

    let genre = load_genre(&mut conn, genre_id)?;
    Ok(HttpResponse::Ok().json(genre))
}

pub async fn delete_genre(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    require_admin(&mut conn, &claims)?;

    let genre_id = path.into_inner();
    load_genre(&mut conn, genre_id)?;

    diesel::delete(genres.filter(id.eq(genre_id))).execute(&mut conn)?;

    Ok(HttpResponse::NoContent().finish())
}
