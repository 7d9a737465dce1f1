use actix_web::{web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::{get_conn, DbConn, DbPool};
use crate::error::ApiError;
use crate::models::community_models::{
    Community, CommunityRequest, CommunityResponse, NewCommunity, NewCommunityMember,
    UpdateCommunity, ROLE_LEADER, ROLE_MEMBER,
};
use crate::models::message_models::MessageResponse;
use crate::models::token_models::Claims;
use crate::models::user_models::{User, UserResponse};
use crate::schema::{communities, community_members, playlists, users};
use crate::utils::auth_utils::is_admin;

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

#[derive(serde::Deserialize)]
pub struct RadioQuery {
    pub playlist_id: String,
}

fn load_community(conn: &mut DbConn, community_id: &str) -> Result<Community, ApiError> {
    communities::table
        .filter(communities::id.eq(community_id))
        .select(Community::as_select())
        .first::<Community>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Community not found".to_string()))
}

fn user_exists(conn: &mut DbConn, user_id: &str) -> Result<(), ApiError> {
    users::table
        .filter(users::id.eq(user_id))
        .select(users::id)
        .first::<String>(conn)
        .optional()?
        .map(|_| ())
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}

fn member_role(
    conn: &mut DbConn,
    community_id: &str,
    user_id: &str,
) -> Result<Option<String>, ApiError> {
    Ok(community_members::table
        .filter(community_members::community_id.eq(community_id))
        .filter(community_members::user_id.eq(user_id))
        .select(community_members::role)
        .first::<String>(conn)
        .optional()?)
}

fn member_count(conn: &mut DbConn, community_id: &str) -> Result<i64, ApiError> {
    Ok(community_members::table
        .filter(community_members::community_id.eq(community_id))
        .count()
        .get_result(conn)?)
}

/// Leader-or-admin guard for mutating community endpoints.
fn check_leader_or_admin(
    conn: &mut DbConn,
    claims: &Claims,
    community: &Community,
) -> Result<(), ApiError> {
    if claims.sub == community.leader_id || is_admin(conn, claims)? {
        Ok(())
    } else {
        Err(ApiError::Forbidden(
            "Only the community leader can do this".to_string(),
        ))
    }
}

fn build_response(
    conn: &mut DbConn,
    community: Community,
    viewer: Option<&str>,
) -> Result<CommunityResponse, ApiError> {
    let count = member_count(conn, &community.id)?;
    let community_id = community.id.clone();
    let mut response = CommunityResponse::from_community(community, count);

    if let Some(viewer_id) = viewer {
        let role = member_role(conn, &community_id, viewer_id)?;
        response.is_member = Some(role.is_some());
        response.user_role = role;
    }

    Ok(response)
}

pub async fn create_community(
    pool: web::Data<DbPool>,
    claims: Claims,
    payload: web::Json<CommunityRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let data = payload.into_inner();

    user_exists(&mut conn, &claims.sub)?;

    let name_taken = communities::table
        .filter(communities::name.eq(&data.name))
        .select(communities::id)
        .first::<String>(&mut conn)
        .optional()?
        .is_some();
    if name_taken {
        return Err(ApiError::Conflict(
            "A community with that name already exists".to_string(),
        ));
    }

    let new_community = NewCommunity {
        id: Uuid::new_v4().to_string(),
        name: data.name,
        description: data.description,
        image_url: data.image_url,
        leader_id: claims.sub.clone(),
        created_at: Some(Utc::now().naive_utc()),
    };

    // The creator is the first member, with the LEADER role. Both rows land
    // in one transaction so the leader is never outside the member set.
    let leader_row = NewCommunityMember {
        community_id: new_community.id.clone(),
        user_id: claims.sub.clone(),
        role: ROLE_LEADER.to_string(),
        joined_at: Some(Utc::now().naive_utc()),
    };
    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::insert_into(communities::table)
            .values(&new_community)
            .execute(conn)?;
        diesel::insert_into(community_members::table)
            .values(&leader_row)
            .execute(conn)?;
        Ok(())
    })?;

    let community = load_community(&mut conn, &new_community.id)?;
    let response = build_response(&mut conn, community, Some(&claims.sub))?;

    Ok(HttpResponse::Created().json(response))
}

pub async fn get_community(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Option<Claims>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let community_id = path.into_inner();

    let community = load_community(&mut conn, &community_id)?;
    let viewer = claims.as_ref().map(|c| c.sub.as_str());
    let response = build_response(&mut conn, community, viewer)?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn update_community(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
    payload: web::Json<UpdateCommunity>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let community_id = path.into_inner();

    let community = load_community(&mut conn, &community_id)?;
    check_leader_or_admin(&mut conn, &claims, &community)?;

    let update_data = payload.into_inner();

    if let Some(new_name) = &update_data.name {
        let taken = communities::table
            .filter(communities::name.eq(new_name))
            .filter(communities::id.ne(&community_id))
            .select(communities::id)
            .first::<String>(&mut conn)
            .optional()?
            .is_some();
        if taken {
            return Err(ApiError::Conflict(
                "A community with that name already exists".to_string(),
            ));
        }
    }

    // An empty body is a no-op, not an error.
    if update_data.name.is_some()
        || update_data.description.is_some()
        || update_data.image_url.is_some()
    {
        diesel::update(communities::table.filter(communities::id.eq(&community_id)))
            .set(&update_data)
            .execute(&mut conn)?;
    }

    let community = load_community(&mut conn, &community_id)?;
    let response = build_response(&mut conn, community, Some(&claims.sub))?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn delete_community(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let community_id = path.into_inner();

    let community = load_community(&mut conn, &community_id)?;
    check_leader_or_admin(&mut conn, &claims, &community)?;

    diesel::delete(communities::table.filter(communities::id.eq(&community_id)))
        .execute(&mut conn)?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn join_community(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let community_id = path.into_inner();

    load_community(&mut conn, &community_id)?;
    user_exists(&mut conn, &claims.sub)?;

    if member_role(&mut conn, &community_id, &claims.sub)?.is_some() {
        return Err(ApiError::Conflict(
            "You are already a member of this community".to_string(),
        ));
    }

    diesel::insert_into(community_members::table)
        .values(&NewCommunityMember {
            community_id: community_id.clone(),
            user_id: claims.sub.clone(),
            role: ROLE_MEMBER.to_string(),
            joined_at: Some(Utc::now().naive_utc()),
        })
        .execute(&mut conn)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Joined the community successfully")))
}

pub async fn leave_community(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let community_id = path.into_inner();

    let community = load_community(&mut conn, &community_id)?;
    user_exists(&mut conn, &claims.sub)?;

    if community.leader_id == claims.sub {
        return Err(ApiError::Forbidden(
            "The community leader cannot leave the community".to_string(),
        ));
    }

    if member_role(&mut conn, &community_id, &claims.sub)?.is_none() {
        return Err(ApiError::Conflict(
            "You are not a member of this community".to_string(),
        ));
    }

    diesel::delete(
        community_members::table
            .filter(community_members::community_id.eq(&community_id))
            .filter(community_members::user_id.eq(&claims.sub)),
    )
    .execute(&mut conn)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Left the community successfully")))
}

pub async fn get_members(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let community_id = path.into_inner();

    load_community(&mut conn, &community_id)?;

    let rows = community_members::table
        .inner_join(users::table)
        .filter(community_members::community_id.eq(&community_id))
        .select((User::as_select(), community_members::role))
        .load::<(User, String)>(&mut conn)?;

    let members = rows
        .into_iter()
        .map(|(user, role)| {
            let mut response = UserResponse::from(user);
            response.community_role = Some(role);
            response
        })
        .collect::<Vec<_>>();

    Ok(HttpResponse::Ok().json(members))
}

pub async fn set_radio(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    query: web::Query<RadioQuery>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let community_id = path.into_inner();

    let community = load_community(&mut conn, &community_id)?;
    check_leader_or_admin(&mut conn, &claims, &community)?;

    let playlist_exists = playlists::table
        .filter(playlists::id.eq(&query.playlist_id))
        .select(playlists::id)
        .first::<String>(&mut conn)
        .optional()?
        .is_some();
    if !playlist_exists {
        return Err(ApiError::NotFound("Playlist not found".to_string()));
    }

    diesel::update(communities::table.filter(communities::id.eq(&community_id)))
        .set(communities::radio_playlist_id.eq(Some(query.playlist_id.clone())))
        .execute(&mut conn)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Community radio updated successfully")))
}

pub async fn search_communities(
    pool: web::Data<DbPool>,
    query: web::Query<SearchQuery>,
    claims: Option<Claims>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let pattern = format!("%{}%", query.query);
    let found = communities::table
        .filter(communities::name.like(pattern))
        .select(Community::as_select())
        .load::<Community>(&mut conn)?;

    let viewer = claims.as_ref().map(|c| c.sub.clone());
    let mut responses = Vec::with_capacity(found.len());
    for community in found {
        responses.push(build_response(&mut conn, community, viewer.as_deref())?);
    }

    Ok(HttpResponse::Ok().json(responses))
}

pub async fn get_user_communities(
    pool: web::Data<DbPool>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    user_exists(&mut conn, &claims.sub)?;

    let memberships = community_members::table
        .filter(community_members::user_id.eq(&claims.sub))
        .select(community_members::community_id)
        .load::<String>(&mut conn)?;

    let found = communities::table
        .filter(communities::id.eq_any(&memberships))
        .select(Community::as_select())
        .load::<Community>(&mut conn)?;

    let mut responses = Vec::with_capacity(found.len());
    for community in found {
        responses.push(build_response(&mut conn, community, Some(&claims.sub))?);
    }

    Ok(HttpResponse::Ok().json(responses))
}
