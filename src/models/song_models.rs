use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::songs)]
pub struct Song {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub uploader_id: String,
    pub audio_path: String,
    pub cover_path: Option<String>,
    pub duration_seconds: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::songs)]
pub struct NewSong {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub uploader_id: String,
    pub audio_path: String,
    pub cover_path: Option<String>,
    pub duration_seconds: Option<i32>,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

/// The `songData` JSON part of the multipart upload, also the update body.
#[derive(Deserialize)]
pub struct SongRequest {
    pub title: String,
    pub description: Option<String>,
    pub duration_seconds: Option<i32>,
    pub genre_ids: Option<Vec<i32>>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::songs)]
#[diesel(treat_none_as_null = false)]
pub struct UpdateSong {
    pub title: Option<String>,
    pub description: Option<String>,
    pub duration_seconds: Option<i32>,
    pub updated_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::song_genres)]
pub struct NewSongGenre {
    pub song_id: String,
    pub genre_id: i32,
}

#[derive(Serialize, Deserialize)]
pub struct SongResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub uploader_id: String,
    pub uploader_nickname: String,
    pub genres: Vec<String>,
    pub duration_seconds: Option<i32>,
    pub has_cover: bool,
    pub created_at: Option<NaiveDateTime>,
    pub updated_at: Option<NaiveDateTime>,
}

impl SongResponse {
    pub fn from_song(song: Song, uploader_nickname: String, genres: Vec<String>) -> Self {
        Self {
            id: song.id,
            title: song.title,
            description: song.description,
            uploader_id: song.uploader_id,
            uploader_nickname,
            genres,
            duration_seconds: song.duration_seconds,
            has_cover: song.cover_path.is_some(),
            created_at: song.created_at,
            updated_at: song.updated_at,
        }
    }
}
