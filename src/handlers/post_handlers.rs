use actix_web::{web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::db::{get_conn, DbConn, DbPool};
use crate::error::ApiError;
use crate::models::pagination_models::Pagination;
use crate::models::post_models::{
    NewPost, NewPostVote, Post, PostRequest, PostResponse, UpdatePost, VoteQuery,
};
use crate::models::token_models::Claims;
use crate::schema::{communities, community_members, follows, post_votes, posts, songs, users};
use crate::utils::auth_utils::check_owner_or_admin;
use crate::utils::pagination_utils::validate_pagination;

fn load_post(conn: &mut DbConn, post_id: &str) -> Result<Post, ApiError> {
    posts::table
        .filter(posts::id.eq(post_id))
        .select(Post::as_select())
        .first::<Post>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Post not found".to_string()))
}

fn user_nickname(conn: &mut DbConn, user_id: &str) -> Result<String, ApiError> {
    users::table
        .filter(users::id.eq(user_id))
        .select(users::nickname)
        .first::<String>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

fn is_community_member(
    conn: &mut DbConn,
    community_id: &str,
    user_id: &str,
) -> Result<bool, ApiError> {
    let row = community_members::table
        .filter(community_members::community_id.eq(community_id))
        .filter(community_members::user_id.eq(user_id))
        .select(community_members::user_id)
        .first::<String>(conn)
        .optional()?;
    Ok(row.is_some())
}

fn current_vote(
    conn: &mut SqliteConnection,
    post_id: &str,
    user_id: &str,
) -> Result<Option<i32>, ApiError> {
    Ok(post_votes::table
        .filter(post_votes::post_id.eq(post_id))
        .filter(post_votes::user_id.eq(user_id))
        .select(post_votes::value)
        .first::<i32>(conn)
        .optional()?)
}

/// Signed change to apply to the cached vote total: new value minus the
/// prior one, with an absent prior vote counting as 0.
pub(crate) fn vote_delta(prior: Option<i32>, value: i32) -> i32 {
    value - prior.unwrap_or(0)
}

/// Applies a vote: the cached total and the ledger row change in one
/// transaction, so a failed write cannot leave them diverged.
pub fn apply_vote(
    conn: &mut SqliteConnection,
    post_id: &str,
    user_id: &str,
    value: i32,
) -> Result<(), ApiError> {
    let prior = current_vote(conn, post_id, user_id)?;
    let delta = vote_delta(prior, value);

    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::update(posts::table.filter(posts::id.eq(post_id)))
            .set(posts::vote_count.eq(posts::vote_count + delta))
            .execute(conn)?;

        if value == 0 {
            diesel::delete(
                post_votes::table
                    .filter(post_votes::post_id.eq(post_id))
                    .filter(post_votes::user_id.eq(user_id)),
            )
            .execute(conn)?;
        } else {
            diesel::insert_into(post_votes::table)
                .values(&NewPostVote {
                    post_id: post_id.to_string(),
                    user_id: user_id.to_string(),
                    value,
                })
                .on_conflict((post_votes::post_id, post_votes::user_id))
                .do_update()
                .set(post_votes::value.eq(value))
                .execute(conn)?;
        }

        Ok(())
    })
}

/// Fill in the caller's vote for each post in a listing with one query.
fn set_user_votes(
    conn: &mut DbConn,
    responses: &mut [PostResponse],
    viewer_id: &str,
) -> Result<(), ApiError> {
    let ids: Vec<&str> = responses.iter().map(|p| p.id.as_str()).collect();
    let votes = post_votes::table
        .filter(post_votes::user_id.eq(viewer_id))
        .filter(post_votes::post_id.eq_any(&ids))
        .select((post_votes::post_id, post_votes::value))
        .load::<(String, i32)>(conn)?;

    for response in responses.iter_mut() {
        response.user_vote = votes
            .iter()
            .find(|(post_id, _)| *post_id == response.id)
            .map(|(_, value)| *value)
            .unwrap_or(0);
    }
    Ok(())
}

fn load_post_page(
    conn: &mut DbConn,
    filter_user_ids: Option<&[String]>,
    filter_community_id: Option<&str>,
    by_popularity: bool,
    limit: i64,
    offset: i64,
) -> Result<Vec<PostResponse>, ApiError> {
    let mut query = posts::table
        .inner_join(users::table)
        .select((Post::as_select(), users::nickname))
        .into_boxed();

    if let Some(user_ids) = filter_user_ids {
        query = query.filter(posts::user_id.eq_any(user_ids.to_vec()));
    }
    if let Some(community_id) = filter_community_id {
        query = query.filter(posts::community_id.eq(community_id.to_string()));
    }

    query = if by_popularity {
        query.order(posts::vote_count.desc())
    } else {
        query.order(posts::created_at.desc())
    };

    let rows = query
        .limit(limit)
        .offset(offset)
        .load::<(Post, String)>(conn)?;

    Ok(rows
        .into_iter()
        .map(|(post, nickname)| PostResponse::from_post(post, nickname))
        .collect())
}

pub async fn create_post(
    pool: web::Data<DbPool>,
    claims: Claims,
    payload: web::Json<PostRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let data = payload.into_inner();

    let nickname = user_nickname(&mut conn, &claims.sub)?;

    if let Some(community_id) = &data.community_id {
        let exists = communities::table
            .filter(communities::id.eq(community_id))
            .select(communities::id)
            .first::<String>(&mut conn)
            .optional()?
            .is_some();
        if !exists {
            return Err(ApiError::NotFound("Community not found".to_string()));
        }
        if !is_community_member(&mut conn, community_id, &claims.sub)? {
            return Err(ApiError::Forbidden(
                "You must be a member of the community to post".to_string(),
            ));
        }
    }

    if let Some(song_id) = &data.song_id {
        let exists = songs::table
            .filter(songs::id.eq(song_id))
            .select(songs::id)
            .first::<String>(&mut conn)
            .optional()?
            .is_some();
        if !exists {
            return Err(ApiError::NotFound("Song not found".to_string()));
        }
    }

    let new_post = NewPost {
        id: Uuid::new_v4().to_string(),
        user_id: claims.sub.clone(),
        community_id: data.community_id,
        song_id: data.song_id,
        content: data.content,
        vote_count: 0,
        created_at: Some(Utc::now().naive_utc()),
    };

    diesel::insert_into(posts::table)
        .values(&new_post)
        .execute(&mut conn)?;

    let post = load_post(&mut conn, &new_post.id)?;
    Ok(HttpResponse::Created().json(PostResponse::from_post(post, nickname)))
}

pub async fn get_post(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Option<Claims>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let post_id = path.into_inner();

    let post = load_post(&mut conn, &post_id)?;
    let nickname = user_nickname(&mut conn, &post.user_id)?;
    let mut response = PostResponse::from_post(post, nickname);

    if let Some(claims) = claims {
        response.user_vote = current_vote(&mut conn, &post_id, &claims.sub)?.unwrap_or(0);
    }

    Ok(HttpResponse::Ok().json(response))
}

pub async fn update_post(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
    payload: web::Json<UpdatePost>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let post_id = path.into_inner();

    let post = load_post(&mut conn, &post_id)?;
    check_owner_or_admin(&mut conn, &claims, &post.user_id)?;

    let data = payload.into_inner();

    if let Some(song_id) = &data.song_id {
        let exists = songs::table
            .filter(songs::id.eq(song_id))
            .select(songs::id)
            .first::<String>(&mut conn)
            .optional()?
            .is_some();
        if !exists {
            return Err(ApiError::NotFound("Song not found".to_string()));
        }
    }

    // An empty body is a no-op, not an error.
    if data.content.is_some() || data.song_id.is_some() {
        diesel::update(posts::table.filter(posts::id.eq(&post_id)))
            .set(&data)
            .execute(&mut conn)?;
    }

    let post = load_post(&mut conn, &post_id)?;
    let nickname = user_nickname(&mut conn, &post.user_id)?;
    let mut response = PostResponse::from_post(post, nickname);
    response.user_vote = current_vote(&mut conn, &post_id, &claims.sub)?.unwrap_or(0);

    Ok(HttpResponse::Ok().json(response))
}

pub async fn delete_post(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let post_id = path.into_inner();

    let post = load_post(&mut conn, &post_id)?;
    check_owner_or_admin(&mut conn, &claims, &post.user_id)?;

    diesel::delete(posts::table.filter(posts::id.eq(&post_id))).execute(&mut conn)?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn vote_post(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    query: web::Query<VoteQuery>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let value = query.value;
    if value != -1 && value != 0 && value != 1 {
        return Err(ApiError::BadRequest("Invalid vote value".to_string()));
    }

    let mut conn = get_conn(&pool)?;
    let post_id = path.into_inner();

    let post = load_post(&mut conn, &post_id)?;
    user_nickname(&mut conn, &claims.sub)?;

    apply_vote(&mut conn, &post_id, &claims.sub, value)?;

    let updated = load_post(&mut conn, &post_id)?;
    let nickname = user_nickname(&mut conn, &post.user_id)?;
    let mut response = PostResponse::from_post(updated, nickname);
    response.user_vote = value;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_user_posts(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    query: web::Query<Pagination>,
    claims: Option<Claims>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user_id = path.into_inner();
    let (limit, offset) = validate_pagination(&query)?;

    user_nickname(&mut conn, &user_id)?;

    let mut page = load_post_page(
        &mut conn,
        Some(&[user_id]),
        None,
        false,
        limit,
        offset,
    )?;
    if let Some(claims) = claims {
        set_user_votes(&mut conn, &mut page, &claims.sub)?;
    }

    Ok(HttpResponse::Ok().json(page))
}

pub async fn get_community_posts(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    query: web::Query<Pagination>,
    claims: Option<Claims>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let community_id = path.into_inner();
    let (limit, offset) = validate_pagination(&query)?;

    let exists = communities::table
        .filter(communities::id.eq(&community_id))
        .select(communities::id)
        .first::<String>(&mut conn)
        .optional()?
        .is_some();
    if !exists {
        return Err(ApiError::NotFound("Community not found".to_string()));
    }

    let mut page = load_post_page(
        &mut conn,
        None,
        Some(&community_id),
        false,
        limit,
        offset,
    )?;
    if let Some(claims) = claims {
        set_user_votes(&mut conn, &mut page, &claims.sub)?;
    }

    Ok(HttpResponse::Ok().json(page))
}

/// Personalized feed. Users following nobody get the global popularity
/// listing; everyone else gets the posts of the users they follow.
pub async fn get_feed(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let (limit, offset) = validate_pagination(&query)?;

    user_nickname(&mut conn, &claims.sub)?;

    let following = follows::table
        .filter(follows::follower_id.eq(&claims.sub))
        .select(follows::followed_id)
        .load::<String>(&mut conn)?;

    let mut page = if following.is_empty() {
        load_post_page(&mut conn, None, None, true, limit, offset)?
    } else {
        load_post_page(&mut conn, Some(&following), None, false, limit, offset)?
    };

    set_user_votes(&mut conn, &mut page, &claims.sub)?;

    Ok(HttpResponse::Ok().json(page))
}

#[cfg(test)]
mod tests {
    use super::vote_delta;

    #[test]
    fn first_vote_counts_in_full() {
        assert_eq!(vote_delta(None, 1), 1);
        assert_eq!(vote_delta(None, -1), -1);
    }

    #[test]
    fn removing_a_vote_undoes_it() {
        assert_eq!(vote_delta(Some(1), 0), -1);
        assert_eq!(vote_delta(Some(-1), 0), 1);
    }

    #[test]
    fn flipping_a_vote_swings_by_two() {
        assert_eq!(vote_delta(Some(1), -1), -2);
        assert_eq!(vote_delta(Some(-1), 1), 2);
    }

    #[test]
    fn repeating_a_vote_is_neutral() {
        assert_eq!(vote_delta(Some(1), 1), 0);
        assert_eq!(vote_delta(Some(-1), -1), 0);
    }
}
