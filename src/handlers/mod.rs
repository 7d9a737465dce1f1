pub mod auth_handlers;
pub mod comment_handlers;
pub mod community_handlers;
pub mod genre_handlers;
pub mod playlist_handlers;
pub mod post_handlers;
pub mod song_handlers;
pub mod user_handlers;
