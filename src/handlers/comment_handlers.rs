use actix_web::{web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::{get_conn, DbConn, DbPool};
use crate::error::ApiError;
use crate::models::comment_models::{Comment, CommentRequest, CommentResponse, NewComment};
use crate::models::token_models::Claims;
use crate::schema::{comments, posts, users};
use crate::utils::auth_utils::check_owner_or_admin;

fn load_comment(conn: &mut DbConn, comment_id: &str) -> Result<Comment, ApiError> {
    comments::table
        .filter(comments::id.eq(comment_id))
        .select(Comment::as_select())
        .first::<Comment>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Comment not found".to_string()))
}

fn check_post_exists(conn: &mut DbConn, post_id: &str) -> Result<(), ApiError> {
    posts::table
        .filter(posts::id.eq(post_id))
        .select(posts::id)
        .first::<String>(conn)
        .optional()?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

pub async fn add_comment(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let post_id = path.into_inner();

    check_post_exists(&mut conn, &post_id)?;

    let nickname = users::table
        .filter(users::id.eq(&claims.sub))
        .select(users::nickname)
        .first::<String>(&mut conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let new_comment = NewComment {
        id: Uuid::new_v4().to_string(),
        post_id,
        user_id: claims.sub.clone(),
        content: payload.into_inner().content,
        created_at: Some(Utc::now().naive_utc()),
    };

    diesel::insert_into(comments::table)
        .values(&new_comment)
        .execute(&mut conn)?;

    let comment = load_comment(&mut conn, &new_comment.id)?;
    Ok(HttpResponse::Created().json(CommentResponse::from_comment(comment, nickname)))
}

pub async fn get_comments_for_post(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let post_id = path.into_inner();

    check_post_exists(&mut conn, &post_id)?;

    let rows = comments::table
        .inner_join(users::table)
        .filter(comments::post_id.eq(&post_id))
        .order(comments::created_at.asc())
        .select((Comment::as_select(), users::nickname))
        .load::<(Comment, String)>(&mut conn)?;

    let list = rows
        .into_iter()
        .map(|(comment, nickname)| CommentResponse::from_comment(comment, nickname))
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(list))
}

pub async fn update_comment(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
    payload: web::Json<CommentRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let comment_id = path.into_inner();

    let comment = load_comment(&mut conn, &comment_id)?;
    check_owner_or_admin(&mut conn, &claims, &comment.user_id)?;

    diesel::update(comments::table.filter(comments::id.eq(&comment_id)))
        .set(comments::content.eq(&payload.content))
        .execute(&mut conn)?;

    let comment = load_comment(&mut conn, &comment_id)?;
    let nickname = users::table
        .filter(users::id.eq(&comment.user_id))
        .select(users::nickname)
        .first::<String>(&mut conn)?;

    Ok(HttpResponse::Ok().json(CommentResponse::from_comment(comment, nickname)))
}

pub async fn delete_comment(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let comment_id = path.into_inner();

    let comment = load_comment(&mut conn, &comment_id)?;
    check_owner_or_admin(&mut conn, &claims, &comment.user_id)?;

    diesel::delete(comments::table.filter(comments::id.eq(&comment_id))).execute(&mut conn)?;

    Ok(HttpResponse::NoContent().finish())
}
