pub mod comment_models;
pub mod community_models;
pub mod genre_models;
pub mod message_models;
pub mod pagination_models;
pub mod playlist_models;
pub mod post_models;
pub mod song_models;
pub mod token_models;
pub mod user_models;
