use chrono::NaiveDateTime;
use diesel::prelude::{AsChangeset, Insertable, Queryable, Selectable};
use serde::{Deserialize, Serialize};

use crate::models::song_models::SongResponse;

#[derive(Queryable, Selectable, Clone)]
#[diesel(table_name = crate::schema::playlists)]
pub struct Playlist {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_public: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::playlists)]
pub struct NewPlaylist {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_public: bool,
    pub created_at: Option<NaiveDateTime>,
}

#[derive(Deserialize)]
pub struct PlaylistRequest {
    pub name: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_public: Option<bool>,
    /// Initial (or replacement) song list, kept in the given order.
    pub song_ids: Option<Vec<String>>,
}

#[derive(AsChangeset)]
#[diesel(table_name = crate::schema::playlists)]
#[diesel(treat_none_as_null = false)]
pub struct UpdatePlaylist {
    pub name: Option<String>,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_public: Option<bool>,
}

#[derive(Insertable)]
#[diesel(table_name = crate::schema::playlist_songs)]
pub struct NewPlaylistSong {
    pub playlist_id: String,
    pub song_id: String,
    pub position: i32,
    pub added_at: Option<NaiveDateTime>,
}

#[derive(Serialize, Deserialize)]
pub struct PlaylistResponse {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub description: Option<String>,
    pub cover_image_url: Option<String>,
    pub is_public: bool,
    pub songs: Vec<SongResponse>,
    pub created_at: Option<NaiveDateTime>,
}

impl PlaylistResponse {
    pub fn from_playlist(playlist: Playlist, songs: Vec<SongResponse>) -> Self {
        Self {
            id: playlist.id,
            owner_id: playlist.owner_id,
            name: playlist.name,
            description: playlist.description,
            cover_image_url: playlist.cover_image_url,
            is_public: playlist.is_public,
            songs,
            created_at: playlist.created_at,
        }
    }
}
