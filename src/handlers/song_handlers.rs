use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use diesel::prelude::*;
use diesel::SqliteConnection;
use futures::TryStreamExt;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::db::{get_conn, DbConn, DbPool};
use crate::error::ApiError;
use crate::models::pagination_models::Pagination;
use crate::models::song_models::{
    NewSong, NewSongGenre, Song, SongRequest, SongResponse, UpdateSong,
};
use crate::models::token_models::Claims;
use crate::schema::{genres, song_genres, songs, users};
use crate::utils::auth_utils::check_owner_or_admin;
use crate::utils::file_utils::{delete_media, save_upload, stream_media};
use crate::utils::pagination_utils::validate_pagination;

#[derive(serde::Deserialize)]
pub struct SearchQuery {
    pub query: String,
}

fn load_song(conn: &mut DbConn, song_id: &str) -> Result<Song, ApiError> {
    songs::table
        .filter(songs::id.eq(song_id))
        .select(Song::as_select())
        .first::<Song>(conn)
        .optional()?
        .ok_or_else(|| ApiError::NotFound("Song not found".to_string()))
}

fn check_genres_exist(conn: &mut DbConn, genre_ids: &[i32]) -> Result<(), ApiError> {
    for genre_id in genre_ids {
        let exists = genres::table
            .filter(genres::id.eq(genre_id))
            .select(genres::id)
            .first::<i32>(conn)
            .optional()?
            .is_some();
        if !exists {
            return Err(ApiError::NotFound(format!(
                "Genre not found with ID: {genre_id}"
            )));
        }
    }
    Ok(())
}

fn replace_song_genres(
    conn: &mut SqliteConnection,
    song_id: &str,
    genre_ids: &[i32],
) -> Result<(), ApiError> {
    conn.transaction::<_, ApiError, _>(|conn| {
        diesel::delete(song_genres::table.filter(song_genres::song_id.eq(song_id)))
            .execute(conn)?;
        for genre_id in genre_ids {
            diesel::insert_into(song_genres::table)
                .values(&NewSongGenre {
                    song_id: song_id.to_string(),
                    genre_id: *genre_id,
                })
                .execute(conn)?;
        }
        Ok(())
    })
}

/// Build response DTOs for a batch of songs with two lookups instead of
/// one pair per song.
pub fn song_responses(conn: &mut DbConn, list: Vec<Song>) -> Result<Vec<SongResponse>, ApiError> {
    let song_ids: Vec<String> = list.iter().map(|s| s.id.clone()).collect();
    let uploader_ids: Vec<String> = list.iter().map(|s| s.uploader_id.clone()).collect();

    let genre_rows = song_genres::table
        .inner_join(genres::table)
        .filter(song_genres::song_id.eq_any(&song_ids))
        .select((song_genres::song_id, genres::name))
        .load::<(String, String)>(conn)?;

    let nickname_rows = users::table
        .filter(users::id.eq_any(&uploader_ids))
        .select((users::id, users::nickname))
        .load::<(String, String)>(conn)?;

    Ok(list
        .into_iter()
        .map(|song| {
            let genre_names = genre_rows
                .iter()
                .filter(|(song_id, _)| *song_id == song.id)
                .map(|(_, genre_name)| genre_name.clone())
                .collect();
            let nickname = nickname_rows
                .iter()
                .find(|(user_id, _)| *user_id == song.uploader_id)
                .map(|(_, nickname)| nickname.clone())
                .unwrap_or_default();
            SongResponse::from_song(song, nickname, genre_names)
        })
        .collect())
}

fn song_response(conn: &mut DbConn, song: Song) -> Result<SongResponse, ApiError> {
    Ok(song_responses(conn, vec![song])?
        .pop()
        .expect("one song in, one response out"))
}

pub async fn upload_song(
    pool: web::Data<DbPool>,
    config: web::Data<AppConfig>,
    claims: Claims,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let mut song_data: Option<SongRequest> = None;
    let mut audio: Option<(Option<String>, Vec<u8>)> = None;
    let mut cover: Option<(Option<String>, Vec<u8>)> = None;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|_| ApiError::BadRequest("Malformed multipart payload".to_string()))?
    {
        let (part_name, file_name) = {
            let disposition = field.content_disposition();
            (
                disposition.get_name().unwrap_or("").to_string(),
                disposition.get_filename().map(|s| s.to_string()),
            )
        };

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|_| ApiError::BadRequest("Malformed multipart payload".to_string()))?
        {
            bytes.extend_from_slice(&chunk);
        }

        match part_name.as_str() {
            "songData" => {
                song_data = Some(serde_json::from_slice(&bytes).map_err(|_| {
                    ApiError::BadRequest("Invalid songData JSON".to_string())
                })?);
            }
            "audioFile" => audio = Some((file_name, bytes)),
            "coverImage" => cover = Some((file_name, bytes)),
            _ => {}
        }
    }

    let data =
        song_data.ok_or_else(|| ApiError::BadRequest("Missing songData part".to_string()))?;
    let (audio_name, audio_bytes) =
        audio.ok_or_else(|| ApiError::BadRequest("Missing audioFile part".to_string()))?;

    let mut conn = get_conn(&pool)?;

    if let Some(genre_ids) = &data.genre_ids {
        check_genres_exist(&mut conn, genre_ids)?;
    }

    let audio_path = save_upload(&config.media_dir, audio_name.as_deref(), &audio_bytes)?;
    let cover_path = match cover {
        Some((cover_name, cover_bytes)) => Some(save_upload(
            &config.media_dir,
            cover_name.as_deref(),
            &cover_bytes,
        )?),
        None => None,
    };

    let new_song = NewSong {
        id: Uuid::new_v4().to_string(),
        title: data.title,
        description: data.description,
        uploader_id: claims.sub.clone(),
        audio_path,
        cover_path,
        duration_seconds: data.duration_seconds,
        created_at: Some(Utc::now().naive_utc()),
        updated_at: None,
    };

    diesel::insert_into(songs::table)
        .values(&new_song)
        .execute(&mut conn)?;

    if let Some(genre_ids) = &data.genre_ids {
        replace_song_genres(&mut conn, &new_song.id, genre_ids)?;
    }

    let song = load_song(&mut conn, &new_song.id)?;
    let response = song_response(&mut conn, song)?;

    Ok(HttpResponse::Created().json(response))
}

pub async fn get_song(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let song = load_song(&mut conn, &path.into_inner())?;
    let response = song_response(&mut conn, song)?;
    Ok(HttpResponse::Ok().json(response))
}

pub async fn list_songs(
    pool: web::Data<DbPool>,
    query: web::Query<Pagination>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let (limit, offset) = validate_pagination(&query)?;

    let list = songs::table
        .order(songs::created_at.desc())
        .limit(limit)
        .offset(offset)
        .select(Song::as_select())
        .load::<Song>(&mut conn)?;

    Ok(HttpResponse::Ok().json(song_responses(&mut conn, list)?))
}

pub async fn get_user_songs(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let user_id = path.into_inner();

    let exists = users::table
        .filter(users::id.eq(&user_id))
        .select(users::id)
        .first::<String>(&mut conn)
        .optional()?
        .is_some();
    if !exists {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    let list = songs::table
        .filter(songs::uploader_id.eq(&user_id))
        .order(songs::created_at.desc())
        .select(Song::as_select())
        .load::<Song>(&mut conn)?;

    Ok(HttpResponse::Ok().json(song_responses(&mut conn, list)?))
}

pub async fn search_songs(
    pool: web::Data<DbPool>,
    query: web::Query<SearchQuery>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;

    let pattern = format!("%{}%", query.query);
    let list = songs::table
        .filter(songs::title.like(pattern))
        .select(Song::as_select())
        .load::<Song>(&mut conn)?;

    Ok(HttpResponse::Ok().json(song_responses(&mut conn, list)?))
}

pub async fn get_songs_by_genre(
    pool: web::Data<DbPool>,
    path: web::Path<i32>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let genre_id = path.into_inner();

    check_genres_exist(&mut conn, &[genre_id])?;

    let song_ids = song_genres::table
        .filter(song_genres::genre_id.eq(genre_id))
        .select(song_genres::song_id)
        .load::<String>(&mut conn)?;

    let list = songs::table
        .filter(songs::id.eq_any(&song_ids))
        .select(Song::as_select())
        .load::<Song>(&mut conn)?;

    Ok(HttpResponse::Ok().json(song_responses(&mut conn, list)?))
}

pub async fn stream_song(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let song = load_song(&mut conn, &path.into_inner())?;
    Ok(stream_media(&song.audio_path))
}

pub async fn update_song(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
    payload: web::Json<SongRequest>,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let song_id = path.into_inner();

    let song = load_song(&mut conn, &song_id)?;
    check_owner_or_admin(&mut conn, &claims, &song.uploader_id)?;

    let data = payload.into_inner();

    if let Some(genre_ids) = &data.genre_ids {
        check_genres_exist(&mut conn, genre_ids)?;
        replace_song_genres(&mut conn, &song_id, genre_ids)?;
    }

    diesel::update(songs::table.filter(songs::id.eq(&song_id)))
        .set(&UpdateSong {
            title: Some(data.title),
            description: data.description,
            duration_seconds: data.duration_seconds,
            updated_at: Some(Utc::now().naive_utc()),
        })
        .execute(&mut conn)?;

    let song = load_song(&mut conn, &song_id)?;
    let response = song_response(&mut conn, song)?;

    Ok(HttpResponse::Ok().json(response))
}

pub async fn delete_song(
    pool: web::Data<DbPool>,
    path: web::Path<String>,
    claims: Claims,
) -> Result<HttpResponse, ApiError> {
    let mut conn = get_conn(&pool)?;
    let song_id = path.into_inner();

    let song = load_song(&mut conn, &song_id)?;
    check_owner_or_admin(&mut conn, &claims, &song.uploader_id)?;

    delete_media(&song.audio_path);
    if let Some(cover_path) = &song.cover_path {
        delete_media(cover_path);
    }

    diesel::delete(songs::table.filter(songs::id.eq(&song_id))).execute(&mut conn)?;

    Ok(HttpResponse::NoContent().finish())
}
