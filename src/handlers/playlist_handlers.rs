use actix_web::{web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use crate::db::{get_conn, DbConn, DbPool};
use crate::error::ApiError;
use crate::models::message_models::MessageResponse;
use crate::models::playlist_models::{
    NewPlaylist, NewPlaylistSong, Playlist, PlaylistRequest, PlaylistResponse, UpdatePlaylist,
};
use crate::models::song_models::Song;
use crate::models::token_models::Claims;
use crate::schema::{playlist_songs, playlists, songs, users};
use crate::utils::auth_utils::check_owner_or_admin;

use super::song_handlers::song_responses;

fn load_playlist(conn: &mut DbConn, playlist_id: &str) -> Result<Playlist, ApiError> {
    playlists::table
        .filter(playlists::id.eq(playlist_id))
        .select(Playlist::as_select())
        .first::<Playlist>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Playlist not found".to_string()))
}

fn check_songs_exist(conn: &mut DbConn, song_ids: &[String]) -> Result<(), ApiError> {
    for song_id in song_ids {
        let exists = songs::table
            .filter(songs::id.eq(song_id))
            .select(songs::id)
            .first::<String>(conn)
            .optional()?
            .is_some();
        if !exists {
            return Err(ApiError::NotFound(format!(
                "Song not found with ID: {song_id}"
            )));
        }
    }
    Ok(())
}

/// Swaps a playlist's song list wholesale, keeping the given order. Runs in
/// one transaction: a failed insert leaves the previous list intact.
pub fn replace_playlist_songs(
    conn: &mut SqliteConnection,
    playlist_id: &str,
    song_ids: &[String],
) -> Result<(), ApiError> {
    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::delete(playlist_songs::table.filter(playlist_songs::playlist_id.eq(playlist_id)))
            .execute(conn)?;
        for (position, song_id) in song_ids.iter().enumerate() {
            diesel::insert_into(playlist_songs::table)
                .values(&NewPlaylistSong {
                    playlist_id: playlist_id.to_string(),
                    song_id: song_id.clone(),
                    position: position as i32,
                    added_at: Some(Utc::now().naive_utc()),
                })
                .execute(conn)?;
        }
        Ok(())
    })
}

fn build_response(conn: &mut DbConn, playlist: Playlist) -> Result<PlaylistResponse, ApiError> {
    let list = playlist_songs::table
        .inner_join(songs::table)
        .filter(playlist_songs::playlist_id.eq(&playlist.id))
        .order(playlist_songs::position.asc())
        .select(Song::as_select())
        .load::<Song>(conn)?;

    let song_dtos = song_responses(conn, list)?;
    Ok(PlaylistResponse::from_playlist(playlist, song_dtos))
}

pub async fn create_playlist(
    pool: web::Data<DbPool>,
    claims: Claims,
    payload: web::Json<PlaylistRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let data = payload.into_inner();

    let new_playlist = NewPlaylist {
        id: Uuid::new_v4().to_string(),
        owner_id: claims.sub.clone(),
        name: data.name,
        description: data.description,
        cover_image_url: data.cover_image_url,
        is_public: data.is_public.unwrap_or(false),
        created_at: Some(Utc::now().naive_utc()),
    };

    if let Some(song_ids) = &data.song_ids {
        check_songs_exist(&mut conn, song_ids)?;
    }

    diesel::insert_into(playlists::table)
        .values(&new_playlist)
        .execute(&mut conn)?;

    if let Some(song_ids) = &data.song_ids {
        replace_playlist_songs(&mut conn, &new_playlist.id, song_ids)?;
    }

    let playlist = load_playlist(&mut conn, &new_playlist.id)?;
    Ok(HttpResponse::Created().json(build_response(&mut conn, playlist)?))
}

pub async fn get_playlist(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let playlist = load_playlist(&mut conn, &path.into_inner())?;
    Ok(HttpResponse::Ok().json(build_response(&mut conn, playlist)?))
}

pub async fn update_playlist(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
    payload: web::Json<PlaylistRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let playlist_id = path.into_inner();

    let playlist = load_playlist(&mut conn, &playlist_id)?;
    check_owner_or_admin(&mut conn, &claims, &playlist.owner_id)?;

    let data = payload.into_inner();

    diesel::update(playlists::table.filter(playlists::id.eq(&playlist_id)))
        .set(&UpdatePlaylist {
            name: Some(data.name),
            description: data.description,
            cover_image_url: data.cover_image_url,
            is_public: data.is_public,
        })
        .execute(&mut conn)?;

    // A provided song list replaces the stored one wholesale.
    if let Some(song_ids) = &data.song_ids {
        check_songs_exist(&mut conn, song_ids)?;
        replace_playlist_songs(&mut conn, &playlist_id, song_ids)?;
    }

    let playlist = load_playlist(&mut conn, &playlist_id)?;
    Ok(HttpResponse::Ok().json(build_response(&mut conn, playlist)?))
}

pub async fn delete_playlist(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let playlist_id = path.into_inner();

    let playlist = load_playlist(&mut conn, &playlist_id)?;
    check_owner_or_admin(&mut conn, &claims, &playlist.owner_id)?;

    diesel::delete(playlists::table.filter(playlists::id.eq(&playlist_id)))
        .execute(&mut conn)?;

    Ok(HttpResponse::NoContent().finish())
}

pub async fn add_song_to_playlist(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let (playlist_id, song_id) = path.into_inner();

    let playlist = load_playlist(&mut conn, &playlist_id)?;
    check_owner_or_admin(&mut conn, &claims, &playlist.owner_id)?;
    check_songs_exist(&mut conn, std::slice::from_ref(&song_id))?;

    let already_present = playlist_songs::table
        .filter(playlist_songs::playlist_id.eq(&playlist_id))
        .filter(playlist_songs::song_id.eq(&song_id))
        .select(playlist_songs::song_id)
        .first::<String>(&mut conn)
        .optional()?
        .is_some();
    if already_present {
        return Err(ApiError::Conflict(
            "The song is already in the playlist".to_string(),
        ));
    }

    let count: i64 = playlist_songs::table
        .filter(playlist_songs::playlist_id.eq(&playlist_id))
        .count()
        .get_result(&mut conn)?;

    diesel::insert_into(playlist_songs::table)
        .values(&NewPlaylistSong {
            playlist_id: playlist_id.clone(),
            song_id,
            position: count as i32,
            added_at: Some(Utc::now().naive_utc()),
        })
        .execute(&mut conn)?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Song added to playlist")))
}

pub async fn remove_song_from_playlist(
    pool: web::Data<DbPool>,
    path: web::Path<(String, String)>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let (playlist_id, song_id) = path.into_inner();

    let playlist = load_playlist(&mut conn, &playlist_id)?;
    check_owner_or_admin(&mut conn, &claims, &playlist.owner_id)?;

    let position = playlist_songs::table
        .filter(playlist_songs::playlist_id.eq(&playlist_id))
        .filter(playlist_songs::song_id.eq(&song_id))
        .select(playlist_songs::position)
        .first::<i32>(&mut conn)
        .optional()?;

    let position = match position {
        Some(p) => p,
        None => {
            return Err(ApiError::Conflict(
                "The song is not in the playlist".to_string(),
            ))
        }
    };

    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::delete(
            playlist_songs::table
                .filter(playlist_songs::playlist_id.eq(&playlist_id))
                .filter(playlist_songs::song_id.eq(&song_id)),
        )
        .execute(conn)?;

        // Close the gap left by the removed entry.
        diesel::update(
            playlist_songs::table
                .filter(playlist_songs::playlist_id.eq(&playlist_id))
                .filter(playlist_songs::position.gt(position)),
        )
        .set(playlist_songs::position.eq(playlist_songs::position - 1))
        .execute(conn)?;

        Ok(())
    })?;

    Ok(HttpResponse::Ok().json(MessageResponse::new("Song removed from playlist")))
}

pub async fn get_public_playlists(pool: web::Data<DbPool>) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let list = playlists::table
        .filter(playlists::is_public.eq(true))
        .select(Playlist::as_select())
        .load::<Playlist>(&mut conn)?;

    let mut responses = Vec::with_capacity(list.len());
    for playlist in list {
        responses.push(build_response(&mut conn, playlist)?);
    }

    Ok(HttpResponse::Ok().json(responses))
}

fn owner_playlists(conn: &mut DbConn, owner_id: &str) -> Result<Vec<PlaylistResponse>, ApiError> {
    let list = playlists::table
        .filter(playlists::owner_id.eq(owner_id))
        .select(Playlist::as_select())
        .load::<Playlist>(conn)?;

    let mut responses = Vec::with_capacity(list.len());
    for playlist in list {
        responses.push(build_response(conn, playlist)?);
    }
    Ok(responses)
}

pub async fn get_my_playlists(
    pool: web::Data<DbPool>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    Ok(HttpResponse::Ok().json(owner_playlists(&mut conn, &claims.sub)?))
}

pub async fn get_user_playlists(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let owner_id = path.into_inner();

    check_owner_or_admin(&mut conn, &claims, &owner_id)?;

    Ok(HttpResponse::Ok().json(owner_playlists(&mut conn, &owner_id)?))
}

pub async fn get_user_public_playlists(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let owner_id = path.into_inner();

    let exists = users::table
        .filter(users::id.eq(&owner_id))
        .select(users::id)
        .first::<String>(&mut conn)
        .optional()?
        .is_some();
    if !exists {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let list = playlists::table
        .filter(playlists::owner_id.eq(&owner_id))
        .filter(playlists::is_public.eq(true))
        .select(Playlist::as_select())
        .load::<Playlist>(&mut conn)?;

    let mut responses = Vec::with_capacity(list.len());
    for playlist in list {
        responses.push(build_response(&mut conn, playlist)?);
    }

    Ok(HttpResponse::Ok().json(responses))
}
