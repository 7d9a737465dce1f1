use actix_web::web;

use crate::handlers::song_handlers;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/songs")
            .route("", web::get().to(song_handlers::list_songs))
            .route("", web::post().to(song_handlers::upload_song))
            .route("/search", web::get().to(song_handlers::search_songs))
            .route(
                "/user/{user_id}",
                web::get().to(song_handlers::get_user_songs),
            )
            .route(
                "/genre/{genre_id}",
                web::get().to(song_handlers::get_songs_by_genre),
            )
            .route("/{id}/stream", web::get().to(song_handlers::stream_song))
            .route("/{id}", web::get().to(song_handlers::get_song))
            .route("/{id}", web::put().to(song_handlers::update_song))
            .route("/{id}", web::delete().to(song_handlers::delete_song)),
    );
}
