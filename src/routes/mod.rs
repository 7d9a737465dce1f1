use actix_web::web;

pub mod auth_routes;
pub mod comment_routes;
pub mod community_routes;
pub mod genre_routes;
pub mod playlist_routes;
pub mod post_routes;
pub mod song_routes;
pub mod user_routes;

pub fn configure(cfg: &mut web::ServiceConfig) {
    auth_routes::configure(cfg);
    user_routes::configure(cfg);
    post_routes::configure(cfg);
    community_routes::configure(cfg);
    song_routes::configure(cfg);
    playlist_routes::configure(cfg);
    comment_routes::configure(cfg);
    genre_routes::configure(cfg);
}
